//! Handler that logs each event in before() and the response in after(); always continues.

use abot_core::{Event, EventKind, Handler, HandlerResponse, Result};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

pub struct EventLogHandler;

#[async_trait]
impl Handler for EventLogHandler {
    #[instrument(skip(self, event))]
    async fn before(&self, event: &Event) -> Result<bool> {
        let detail = match &event.kind {
            EventKind::Command { name, .. } => format!("/{}", name),
            EventKind::Callback { data, .. } => data.clone(),
            EventKind::Message { content, .. } => content.kind_name().to_string(),
        };
        info!(
            user_id = event.user.id,
            chat_id = event.chat.id,
            username = %event.user.username.as_deref().unwrap_or("unknown"),
            kind = event.kind_name(),
            detail = %detail,
            "Received event"
        );
        Ok(true)
    }

    #[instrument(skip(self, event, response))]
    async fn after(&self, event: &Event, response: &HandlerResponse) -> Result<()> {
        debug!(event_id = %event.id, response = ?response, "Processed event");
        Ok(())
    }
}
