use crate::system::event::{EventBus, EventHandler};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Global event bus instance.
pub static GLOBAL_EVENT_BUS: Lazy<Arc<EventBus>> = Lazy::new(|| {
    Arc::new(EventBus::new(1000)) // keep the most recent 1000 events
});

/// Convenience accessors for the global event bus.
pub struct EventBusManager;

impl EventBusManager {
    pub fn instance() -> Arc<EventBus> {
        GLOBAL_EVENT_BUS.clone()
    }

    pub fn register_handler(handler: Arc<dyn EventHandler>) {
        GLOBAL_EVENT_BUS.register_handler(handler);
    }

    pub fn clear_history() {
        GLOBAL_EVENT_BUS.clear_history();
    }

    pub fn get_history_stats() -> (usize, Vec<String>) {
        let history = GLOBAL_EVENT_BUS.get_history();
        let count = history.len();
        let recent_events: Vec<String> = history
            .iter()
            .rev()
            .take(5)
            .map(|e| format!("{:?} from {}", e.event_type, e.source))
            .collect();

        (count, recent_events)
    }
}

/// Publish an event on the global bus, logging publish failures.
#[macro_export]
macro_rules! publish_event {
    ($event:expr) => {
        if let Err(e) = $crate::system::event::event_bus_manager::GLOBAL_EVENT_BUS
            .publish($event)
            .await
        {
            tracing::error!("Failed to publish event: {}", e);
        }
    };
}

#[macro_export]
macro_rules! publish_origin_hit {
    ($code:expr, $title:expr, $path:expr, $params:expr, $redirected_to:expr, $source:expr) => {
        $crate::publish_event!($crate::system::event::Event::origin_hit(
            $code,
            $title,
            $path,
            $params,
            $redirected_to,
            $source
        ));
    };
}

#[macro_export]
macro_rules! publish_registration_recorded {
    ($code:expr, $user_id:expr, $source:expr) => {
        $crate::publish_event!($crate::system::event::Event::registration_recorded(
            $code, $user_id, $source
        ));
    };
}
