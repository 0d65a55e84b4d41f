//! Pure Yew view components for the stopwatch UI.
//!
//! Everything here renders from props; state lives in the hooks.

use stopwatch::config::{TITLE_LEFT, TITLE_RIGHT, TOGGLE_ARIA_LABEL};
use stopwatch::{DisplayTime, Theme};
use yew::prelude::*;

const SUN_ICON_PATH: &str = "M12 18C8.68629 18 6 15.3137 6 12C6 8.68629 8.68629 6 12 6C15.3137 6 18 8.68629 18 12C18 15.3137 15.3137 18 12 18ZM12 16C14.2091 16 16 14.2091 16 12C16 9.79086 14.2091 8 12 8C9.79086 8 8 9.79086 8 12C8 14.2091 9.79086 16 12 16ZM11 1H13V4H11V1ZM11 20H13V23H11V20ZM3.51472 4.92893L4.92893 3.51472L7.05025 5.63604L5.63604 7.05025L3.51472 4.92893ZM16.9497 18.364L18.364 16.9497L20.4853 19.0711L19.0711 20.4853L16.9497 18.364ZM19.0711 3.51472L20.4853 4.92893L18.364 7.05025L16.9497 5.63604L19.0711 3.51472ZM5.63604 16.9497L7.05025 18.364L4.92893 20.4853L3.51472 19.0711L5.63604 16.9497ZM23 11V13H20V11H23ZM4 11V13H1V11H4Z";
const MOON_ICON_PATH: &str = "M10 7C10 10.866 13.134 14 17 14C18.9584 14 20.729 13.1957 21.9995 11.8995C22 11.933 22 11.9665 22 12C22 17.5228 17.5228 22 12 22C6.47715 22 2 17.5228 2 12C2 6.47715 6.47715 2 12 2C12.0335 2 12.067 2 12.1005 2.00049C10.8043 3.27098 10 5.04157 10 7ZM4 12C4 16.4183 7.58172 20 12 20C15.0583 20 17.7158 18.2839 19.062 15.7621C18.3945 15.9187 17.7035 16 17 16C12.0294 16 8 11.9706 8 7C8 6.29648 8.08133 5.60547 8.2379 4.938C5.71611 6.28423 4 8.9417 4 12Z";

fn icon(path: &'static str, class: &'static str) -> Html {
    html! {
        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="currentColor" class={class}>
            <path d={path}></path>
        </svg>
    }
}

/// Wordmark with the theme toggle standing in for the "O".
#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub theme: Theme,
    pub ontoggle: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    // sun while dark, moon while light
    let glyph = if props.theme.is_dark() {
        icon(SUN_ICON_PATH, "icon rotated")
    } else {
        icon(MOON_ICON_PATH, "icon")
    };

    html! {
        <div class="header">
            <span class="wordmark">{ TITLE_LEFT }</span>
            <button
                class="theme-toggle"
                aria-label={TOGGLE_ARIA_LABEL}
                onclick={props.ontoggle.reform(|_| ())}
            >
                { glyph }
            </button>
            <span class="wordmark">{ TITLE_RIGHT }</span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct TimeDisplayProps {
    pub time: DisplayTime,
}

#[function_component(TimeDisplay)]
pub fn time_display(props: &TimeDisplayProps) -> Html {
    let [minutes, seconds, centiseconds] = props.time.parts();
    html! {
        <div class="time" role="timer">
            <span>{ format!("{}:", minutes) }</span>
            <span>{ format!("{}:", seconds) }</span>
            <span>{ centiseconds }</span>
        </div>
    }
}

/// Start / Stop / Reset. Start is disabled while running, Stop while not.
#[derive(Properties, PartialEq)]
pub struct ControlsProps {
    pub running: bool,
    pub onstart: Callback<()>,
    pub onstop: Callback<()>,
    pub onreset: Callback<()>,
}

#[function_component(Controls)]
pub fn controls(props: &ControlsProps) -> Html {
    html! {
        <div class="controls">
            <button class="btn" onclick={props.onstart.reform(|_| ())} disabled={props.running}>
                { "Start" }
            </button>
            <button class="btn" onclick={props.onstop.reform(|_| ())} disabled={!props.running}>
                { "Stop" }
            </button>
            <button class="btn" onclick={props.onreset.reform(|_| ())}>
                { "Reset" }
            </button>
        </div>
    }
}
