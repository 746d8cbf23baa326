//! Geolocation state shared by one-shot and watched position requests.
//!
//! # Design
//! - A fix and a failure each end the `loading` phase; neither clears the
//!   other's last value, so callers can show a stale position next to an error.
//! - Provider errors are carried verbatim (code + message).

use std::rc::Rc;

use yew::functional::Reducible;

/// Options forwarded to the geolocation provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionOptions {
    /// Ask for the most accurate fix the device can produce.
    pub enable_high_accuracy: bool,
    /// Give up after this many milliseconds.
    pub timeout_ms: Option<u32>,
    /// Accept a cached fix no older than this many milliseconds.
    pub maximum_age_ms: Option<u32>,
}

/// Coordinates of a position fix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Accuracy of latitude/longitude in meters.
    pub accuracy: f64,
    /// Altitude in meters, when known.
    pub altitude: Option<f64>,
    /// Accuracy of the altitude in meters, when known.
    pub altitude_accuracy: Option<f64>,
    /// Heading in degrees clockwise from true north, when known.
    pub heading: Option<f64>,
    /// Ground speed in meters per second, when known.
    pub speed: Option<f64>,
}

/// A position fix reported by the provider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    /// Where the device is.
    pub coords: Coordinates,
    /// Milliseconds since the Unix epoch when the fix was taken.
    pub timestamp: f64,
}

/// Failure class reported by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeolocationErrorCode {
    /// The user or policy refused access.
    PermissionDenied,
    /// No fix could be obtained.
    PositionUnavailable,
    /// The request exceeded its timeout.
    Timeout,
}

impl GeolocationErrorCode {
    /// Map the numeric code of a `GeolocationPositionError`.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            3 => Self::Timeout,
            _ => Self::PositionUnavailable,
        }
    }

    /// Numeric code as defined by the Geolocation API.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::PermissionDenied => 1,
            Self::PositionUnavailable => 2,
            Self::Timeout => 3,
        }
    }
}

/// Provider failure, surfaced as reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeolocationError {
    /// Failure class.
    pub code: GeolocationErrorCode,
    /// Provider message.
    pub message: String,
}

impl GeolocationError {
    /// Error used when the environment exposes no geolocation provider.
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            code: GeolocationErrorCode::PositionUnavailable,
            message: "geolocation is not supported".to_string(),
        }
    }
}

/// Provider events fed into [`GeolocationState`].
#[derive(Clone, Debug, PartialEq)]
pub enum GeolocationAction {
    /// A position fix arrived.
    Fix(Position),
    /// The provider reported a failure.
    Failed(GeolocationError),
}

/// Latest geolocation result as seen by a component.
#[derive(Clone, Debug, PartialEq)]
pub struct GeolocationState {
    /// No fix or failure has arrived yet.
    pub loading: bool,
    /// Last provider failure.
    pub error: Option<GeolocationError>,
    /// Last position fix.
    pub position: Option<Position>,
}

impl Default for GeolocationState {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            position: None,
        }
    }
}

impl GeolocationState {
    /// Apply a provider event.
    #[must_use]
    pub fn apply(&self, action: GeolocationAction) -> Self {
        let mut next = self.clone();
        next.loading = false;
        match action {
            GeolocationAction::Fix(position) => next.position = Some(position),
            GeolocationAction::Failed(error) => next.error = Some(error),
        }
        next
    }
}

impl Reducible for GeolocationState {
    type Action = GeolocationAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(action))
    }
}
