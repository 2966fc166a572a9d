pub mod admin;
pub mod health;
pub mod track;

pub use health::{AppStartTime, HealthService};
pub use track::{RegisterPayload, TrackService, track_routes};
