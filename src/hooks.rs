use std::rc::Rc;

use stopwatch::{
    IntervalTicker, Lenient, LocalStore, Snapshot, Theme, ThemeToggle, TimerController, WebClock,
};
use yew::prelude::*;

/// State and callbacks exposed by [`use_stopwatch`].
#[derive(Clone)]
pub struct UseStopwatch {
    /// Most recently published elapsed time and running flag.
    pub snapshot: Snapshot,
    pub start: Callback<()>,
    pub stop: Callback<()>,
    pub reset: Callback<()>,
}

/// Stopwatch bound to the component's lifetime.
///
/// The controller lives in a mutable ref so it survives re-renders; every
/// snapshot it publishes lands in a state handle, which triggers the
/// re-render. Unmounting drops the controller and with it the interval.
#[hook]
pub fn use_stopwatch() -> UseStopwatch {
    let snapshot = use_state(Snapshot::default);

    let controller = {
        let snapshot_setter = snapshot.clone();
        use_mut_ref(move || {
            let mut controller = TimerController::new(WebClock, IntervalTicker);
            controller.set_listener(move |s| snapshot_setter.set(s));
            controller
        })
    };

    let start = {
        let controller = controller.clone();
        Callback::from(move |_: ()| controller.borrow_mut().start())
    };
    let stop = {
        let controller = controller.clone();
        Callback::from(move |_: ()| controller.borrow_mut().stop())
    };
    let reset = {
        let controller = controller.clone();
        Callback::from(move |_: ()| controller.borrow_mut().reset())
    };

    UseStopwatch {
        snapshot: *snapshot,
        start,
        stop,
        reset,
    }
}

/// Current theme plus a callback that flips and persists it.
#[derive(Clone)]
pub struct UseTheme {
    pub theme: Theme,
    pub toggle: Callback<()>,
}

#[hook]
pub fn use_theme() -> UseTheme {
    let preference = use_mut_ref(|| ThemeToggle::load(Lenient(LocalStore)));
    let theme = {
        let preference = Rc::clone(&preference);
        use_state(move || preference.borrow().theme())
    };

    // Mirror onto <html data-theme="..."> so the page background follows.
    use_effect_with(*theme, |theme| {
        let root = gloo_utils::document_element();
        if let Err(e) = root.set_attribute("data-theme", theme.as_str()) {
            log::warn!("Failed to apply theme attribute: {:?}", e);
        }
        || ()
    });

    let toggle = {
        let theme = theme.clone();
        Callback::from(move |_: ()| {
            let next = preference.borrow_mut().toggle();
            theme.set(next);
        })
    };

    UseTheme {
        theme: *theme,
        toggle,
    }
}
