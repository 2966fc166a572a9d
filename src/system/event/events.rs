use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tokio::sync::broadcast;
use tracing::{error, warn};

/// Event types raised by the attribution pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// A tracking URL was hit and its origin resolved.
    OriginHit,
    /// A registration was attributed to an origin.
    RegistrationRecorded,
    /// System startup event.
    SystemStartup,
    /// Custom event.
    Custom(String),
}

/// Event data structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: String,
    /// Event type.
    pub event_type: EventType,
    /// Event timestamp.
    pub timestamp: SystemTime,
    /// Event payload.
    pub payload: EventPayload,
    /// Event source.
    pub source: String,
}

/// Event payload data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    /// A resolved hit: the origin plus what the request carried.
    Hit {
        code: String,
        title: String,
        path: String,
        params: HashMap<String, String>,
        redirected_to: String,
    },
    /// An attributed registration.
    Registration { code: String, user_id: String },
    /// System data.
    System {
        message: String,
        details: Option<HashMap<String, String>>,
    },
    /// Custom data.
    Custom(HashMap<String, String>),
}

/// Event handler trait.
#[async_trait::async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle an event.
    async fn handle(&self, event: &Event) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Handler name, used in error logs.
    fn name(&self) -> &str;

    /// Event types this handler wants to receive.
    fn interested_events(&self) -> Vec<EventType>;
}

/// Event bus managing publication and subscription.
///
/// Handlers are invoked in registration order with no ordering guarantee
/// between buses; external consumers can tap the broadcast stream instead.
pub struct EventBus {
    handlers: Arc<Mutex<HashMap<EventType, Vec<Arc<dyn EventHandler>>>>>,
    sender: broadcast::Sender<Event>,
    history: Arc<Mutex<Vec<Event>>>,
    max_history: usize,
}

impl EventBus {
    pub fn new(max_history: usize) -> Self {
        let (sender, _) = broadcast::channel(1000);

        Self {
            handlers: Arc::new(Mutex::new(HashMap::new())),
            sender,
            history: Arc::new(Mutex::new(Vec::new())),
            max_history,
        }
    }

    /// Register an event handler for its interested event types.
    pub fn register_handler(&self, handler: Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.lock().unwrap();

        for event_type in handler.interested_events() {
            handlers
                .entry(event_type)
                .or_insert_with(Vec::new)
                .push(handler.clone());
        }
    }

    /// Publish an event to the broadcast stream and registered handlers.
    ///
    /// Handler failures are logged, never propagated to the publisher.
    pub async fn publish(
        &self,
        event: Event,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        {
            let mut history = self.history.lock().unwrap();
            history.push(event.clone());

            if history.len() > self.max_history {
                history.remove(0);
            }
        }

        if let Err(e) = self.sender.send(event.clone()) {
            warn!("Failed to broadcast event: {}", e);
        }

        let handlers = {
            let handlers = self.handlers.lock().unwrap();
            handlers.get(&event.event_type).cloned()
        };
        if let Some(event_handlers) = handlers {
            for handler in event_handlers {
                if let Err(e) = handler.handle(&event).await {
                    error!("Event handler '{}' failed: {}", handler.name(), e);
                }
            }
        }

        Ok(())
    }

    /// Subscribe to the raw event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn get_history(&self) -> Vec<Event> {
        self.history.lock().unwrap().clone()
    }

    pub fn get_history_by_type(&self, event_type: &EventType) -> Vec<Event> {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter(|event| &event.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn clear_history(&self) {
        self.history.lock().unwrap().clear();
    }
}

/// Event builder.
pub struct EventBuilder {
    event_type: EventType,
    source: String,
    payload: Option<EventPayload>,
}

impl EventBuilder {
    pub fn new(event_type: EventType, source: &str) -> Self {
        Self {
            event_type,
            source: source.to_string(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn build(self) -> Event {
        Event {
            id: uuid::Uuid::new_v4().to_string(),
            event_type: self.event_type,
            timestamp: SystemTime::now(),
            payload: self.payload.unwrap_or(EventPayload::Custom(HashMap::new())),
            source: self.source,
        }
    }
}

impl Event {
    /// Hit event for a resolved origin, tracked or not.
    pub fn origin_hit(
        code: &str,
        title: &str,
        path: &str,
        params: HashMap<String, String>,
        redirected_to: &str,
        source: &str,
    ) -> Self {
        EventBuilder::new(EventType::OriginHit, source)
            .with_payload(EventPayload::Hit {
                code: code.to_string(),
                title: title.to_string(),
                path: path.to_string(),
                params,
                redirected_to: redirected_to.to_string(),
            })
            .build()
    }

    /// Registration event after the counters were updated.
    pub fn registration_recorded(code: &str, user_id: &str, source: &str) -> Self {
        EventBuilder::new(EventType::RegistrationRecorded, source)
            .with_payload(EventPayload::Registration {
                code: code.to_string(),
                user_id: user_id.to_string(),
            })
            .build()
    }

    pub fn system_event(event_type: EventType, message: &str, source: &str) -> Self {
        EventBuilder::new(event_type, source)
            .with_payload(EventPayload::System {
                message: message.to_string(),
                details: None,
            })
            .build()
    }
}
