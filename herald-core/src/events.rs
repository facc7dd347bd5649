//! Fire-and-forget delivery events

use crate::models::MessageKind;

/// Lifecycle events emitted by vendor bridges
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Sending {
        transport: String,
        kind: MessageKind,
    },
    Sent {
        transport: String,
        message_id: Option<String>,
    },
    Failed {
        transport: String,
        reason: String,
    },
}

/// Receives transport events; must not block or fail
pub trait EventDispatcher: Send + Sync {
    fn dispatch(&self, event: TransportEvent);
}

/// Dispatcher that records events in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDispatcher;

impl EventDispatcher for TracingDispatcher {
    fn dispatch(&self, event: TransportEvent) {
        match event {
            TransportEvent::Sending { transport, kind } => {
                tracing::debug!(transport = %transport, kind = %kind, "Sending message");
            }
            TransportEvent::Sent {
                transport,
                message_id,
            } => {
                tracing::info!(
                    transport = %transport,
                    message_id = message_id.as_deref().unwrap_or(""),
                    "Message sent"
                );
            }
            TransportEvent::Failed { transport, reason } => {
                tracing::warn!(transport = %transport, reason = %reason, "Message delivery failed");
            }
        }
    }
}
