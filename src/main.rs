//! Stopwatch widget entry point.
//! Wires the stopwatch and theme hooks into the view components.

use yew::prelude::*;

mod components;
mod hooks;

use components::{Controls, Header, TimeDisplay};
use hooks::{use_stopwatch, use_theme};

/// Primary application component.
#[function_component]
pub fn App() -> Html {
    let stopwatch = use_stopwatch();
    let theme = use_theme();

    html! {
        <div class={classes!("app", theme.theme.as_str())}>
            <Header theme={theme.theme} ontoggle={theme.toggle.clone()} />
            <TimeDisplay time={stopwatch.snapshot.display()} />
            <Controls
                running={stopwatch.snapshot.running}
                onstart={stopwatch.start.clone()}
                onstop={stopwatch.stop.clone()}
                onreset={stopwatch.reset.clone()}
            />
        </div>
    }
}

/// Entry point: installs logging and renders the App.
fn main() {
    stopwatch::logging::init();
    yew::Renderer::<App>::new().render();
}
