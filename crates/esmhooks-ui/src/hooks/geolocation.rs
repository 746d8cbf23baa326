//! Geolocation hook backed by `navigator.geolocation`.
//!
//! # Design
//! - One `getCurrentPosition` on mount; a second one plus `watchPosition`
//!   while `watch` is set.
//! - One-shot callbacks are handed to JS and freed after they run.
//! - The watch registration is a [`PositionWatch`] handle that clears the
//!   watch when the effect tears down.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Geolocation, GeolocationPosition, GeolocationPositionError};
use yew::prelude::*;

use crate::core::geolocation::{
    Coordinates, GeolocationAction, GeolocationError, GeolocationErrorCode, GeolocationState,
    Position, PositionOptions,
};

/// Current position, last error, and loading flag for the calling component.
#[hook]
pub fn use_geolocation(options: Option<PositionOptions>, watch: bool) -> GeolocationState {
    let state = use_reducer(GeolocationState::default);
    {
        let dispatcher = state.dispatcher();
        use_effect_with_deps(
            move |()| {
                request_position(&dispatcher, options);
                || ()
            },
            (),
        );
    }
    {
        let dispatcher = state.dispatcher();
        use_effect_with_deps(
            move |(options, watch): &(Option<PositionOptions>, bool)| {
                let handle = if *watch {
                    request_position(&dispatcher, *options);
                    PositionWatch::start(&dispatcher, *options)
                } else {
                    None
                };
                move || drop(handle)
            },
            (options, watch),
        );
    }
    (*state).clone()
}

type Dispatcher = UseReducerDispatcher<GeolocationState>;

struct PositionWatch {
    provider: Geolocation,
    id: i32,
    _on_fix: Closure<dyn FnMut(JsValue)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
}

impl PositionWatch {
    fn start(dispatcher: &Dispatcher, options: Option<PositionOptions>) -> Option<Self> {
        let Some(provider) = provider() else {
            dispatcher.dispatch(GeolocationAction::Failed(GeolocationError::unsupported()));
            return None;
        };
        let on_fix = Closure::wrap(fix_handler(dispatcher.clone()));
        let on_error = Closure::wrap(error_handler(dispatcher.clone()));
        match provider.watch_position_with_error_callback_and_options(
            on_fix.as_ref().unchecked_ref(),
            Some(on_error.as_ref().unchecked_ref()),
            &to_web_options(options),
        ) {
            Ok(id) => Some(Self {
                provider,
                id,
                _on_fix: on_fix,
                _on_error: on_error,
            }),
            Err(err) => {
                dispatcher.dispatch(GeolocationAction::Failed(call_failure(&err)));
                None
            }
        }
    }
}

impl Drop for PositionWatch {
    fn drop(&mut self) {
        self.provider.clear_watch(self.id);
    }
}

fn request_position(dispatcher: &Dispatcher, options: Option<PositionOptions>) {
    let Some(provider) = provider() else {
        dispatcher.dispatch(GeolocationAction::Failed(GeolocationError::unsupported()));
        return;
    };
    let on_fix = Closure::once_into_js(fix_handler(dispatcher.clone()));
    let on_error = Closure::once_into_js(error_handler(dispatcher.clone()));
    if let Err(err) = provider.get_current_position_with_error_callback_and_options(
        on_fix.unchecked_ref(),
        Some(on_error.unchecked_ref()),
        &to_web_options(options),
    ) {
        dispatcher.dispatch(GeolocationAction::Failed(call_failure(&err)));
    }
}

fn provider() -> Option<Geolocation> {
    web_sys::window()?.navigator().geolocation().ok()
}

fn fix_handler(dispatcher: Dispatcher) -> Box<dyn FnMut(JsValue)> {
    Box::new(move |value: JsValue| {
        if let Ok(position) = value.dyn_into::<GeolocationPosition>() {
            dispatcher.dispatch(GeolocationAction::Fix(to_position(&position)));
        }
    })
}

fn error_handler(dispatcher: Dispatcher) -> Box<dyn FnMut(JsValue)> {
    Box::new(move |value: JsValue| {
        if let Ok(error) = value.dyn_into::<GeolocationPositionError>() {
            dispatcher.dispatch(GeolocationAction::Failed(GeolocationError {
                code: GeolocationErrorCode::from_code(error.code()),
                message: error.message(),
            }));
        }
    })
}

fn to_position(position: &GeolocationPosition) -> Position {
    let coords = position.coords();
    Position {
        coords: Coordinates {
            latitude: coords.latitude(),
            longitude: coords.longitude(),
            accuracy: coords.accuracy(),
            altitude: coords.altitude(),
            altitude_accuracy: coords.altitude_accuracy(),
            heading: coords.heading(),
            speed: coords.speed(),
        },
        timestamp: position.timestamp(),
    }
}

fn to_web_options(options: Option<PositionOptions>) -> web_sys::PositionOptions {
    let web = web_sys::PositionOptions::new();
    if let Some(options) = options {
        web.set_enable_high_accuracy(options.enable_high_accuracy);
        if let Some(timeout) = options.timeout_ms {
            web.set_timeout(timeout);
        }
        if let Some(maximum_age) = options.maximum_age_ms {
            web.set_maximum_age(maximum_age);
        }
    }
    web
}

fn call_failure(err: &JsValue) -> GeolocationError {
    GeolocationError {
        code: GeolocationErrorCode::PositionUnavailable,
        message: err
            .as_string()
            .unwrap_or_else(|| "geolocation request rejected".to_string()),
    }
}
