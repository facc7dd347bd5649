//! Null transport: accepts everything, delivers nothing
//!
//! Terminal fallback of the default registry and the usual choice for
//! disabled or test channels (`null://null`).

use super::{Transport, TransportContext, TransportFactory};
use crate::dsn::Dsn;
use crate::error::Result;
use crate::models::{Message, SentMessage};
use async_trait::async_trait;

/// Transport that succeeds without any I/O
#[derive(Debug, Default, Clone)]
pub struct NullTransport {
    context: Option<TransportContext>,
}

impl NullTransport {
    pub fn new(context: TransportContext) -> Self {
        Self {
            context: Some(context),
        }
    }
}

#[async_trait]
impl Transport for NullTransport {
    fn supports(&self, _message: &Message) -> bool {
        true
    }

    async fn send(&self, message: &Message) -> Result<SentMessage> {
        let sent = SentMessage::new(message.clone(), self.describe());
        match &self.context {
            Some(context) => {
                context
                    .deliver(self.describe(), message, async { Ok(sent) })
                    .await
            }
            None => Ok(sent),
        }
    }

    fn describe(&self) -> String {
        "null".to_string()
    }
}

/// Claims every DSN, so it must be registered last
#[derive(Debug, Default, Clone)]
pub struct NullTransportFactory {
    context: TransportContext,
}

impl NullTransportFactory {
    pub fn new(context: TransportContext) -> Self {
        Self { context }
    }
}

impl TransportFactory for NullTransportFactory {
    fn schemes(&self) -> &[&'static str] {
        &["null"]
    }

    fn supports(&self, _dsn: &Dsn) -> bool {
        true
    }

    fn create(&self, _dsn: &Dsn) -> Result<Box<dyn Transport>> {
        Ok(Box::new(NullTransport::new(self.context.clone())))
    }
}
