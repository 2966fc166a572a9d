pub mod event_bus_manager;
pub mod events;
pub mod handlers;

pub use event_bus_manager::EventBusManager;
pub use events::{Event, EventBus, EventHandler, EventPayload, EventType};
pub use handlers::TrafficLogHandler;
