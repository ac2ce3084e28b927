//! Location check-in/check-out

mod device;
mod geolocation;
mod service;

pub use device::device_id;
pub use geolocation::{FixedPositionProvider, GeolocationProvider, LocationError};
pub use service::TrackingService;
