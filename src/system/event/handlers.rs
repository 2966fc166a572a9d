//! Built-in event subscribers.

use async_trait::async_trait;
use tracing::info;

use super::{Event, EventHandler, EventPayload, EventType};

/// Logs hit and registration events; registered once at startup.
pub struct TrafficLogHandler;

#[async_trait]
impl EventHandler for TrafficLogHandler {
    async fn handle(&self, event: &Event) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match &event.payload {
            EventPayload::Hit {
                code,
                path,
                redirected_to,
                ..
            } => {
                info!(
                    "Origin hit: code={} path={} redirect={}",
                    code, path, redirected_to
                );
            }
            EventPayload::Registration { code, user_id } => {
                info!("Registration attributed: code={} user={}", code, user_id);
            }
            _ => {}
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "traffic_log"
    }

    fn interested_events(&self) -> Vec<EventType> {
        vec![EventType::OriginHit, EventType::RegistrationRecorded]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_traffic_log_handler_accepts_events() {
        let handler = TrafficLogHandler;

        let hit = Event::origin_hit("abc1234", "T", "/i/abc1234/", HashMap::new(), "/", "test");
        assert!(handler.handle(&hit).await.is_ok());

        let reg = Event::registration_recorded("abc1234", "user-1", "test");
        assert!(handler.handle(&reg).await.is_ok());
    }
}
