//! Transport abstraction for message delivery
//!
//! Every destination (a vendor bridge, the null transport, or a composite of
//! other transports) implements [`Transport`]. Factories turn a [`Dsn`] into a
//! transport; the [`TransportResolver`] picks the first factory that claims a
//! DSN and builds failover / round-robin graphs from combined DSN strings.

use crate::dsn::Dsn;
use crate::error::{NotifierError, Result};
use crate::models::{Message, SentMessage};
use async_trait::async_trait;

mod composite;
pub mod context;
pub mod failover;
pub mod null;
pub mod resolver;
pub mod round_robin;
pub mod transports;

pub use context::{Endpoint, TransportContext};
pub use failover::FailoverTransport;
pub use null::{NullTransport, NullTransportFactory};
pub use resolver::{DsnLayout, TransportResolver};
pub use round_robin::RoundRobinTransport;
pub use transports::Transports;

/// Uniform delivery contract
#[async_trait]
pub trait Transport: Send + Sync {
    /// Whether this transport can deliver the message. Pure.
    fn supports(&self, message: &Message) -> bool;

    /// Deliver the message with a single attempt
    async fn send(&self, message: &Message) -> Result<SentMessage>;

    /// Stable identity without credentials, e.g. `sms://host?from=Acme`
    fn describe(&self) -> String;
}

/// Builds transports for the DSN schemes it claims
pub trait TransportFactory: Send + Sync {
    /// Schemes handled by this factory, for diagnostics
    fn schemes(&self) -> &[&'static str];

    fn supports(&self, dsn: &Dsn) -> bool {
        self.schemes().contains(&dsn.scheme())
    }

    fn create(&self, dsn: &Dsn) -> Result<Box<dyn Transport>>;

    /// Guard for `create` when called directly on a DSN it does not claim
    fn ensure_supports(&self, dsn: &Dsn) -> Result<()> {
        if self.supports(dsn) {
            Ok(())
        } else {
            Err(NotifierError::UnsupportedScheme {
                scheme: dsn.scheme().to_string(),
                supported: self.schemes().iter().map(|s| s.to_string()).collect(),
            })
        }
    }
}

/// Error for a message the transport cannot handle
pub fn unsupported_message(transport: &dyn Transport, message: &Message) -> NotifierError {
    NotifierError::UnsupportedMessageType {
        transport: transport.describe(),
        kind: message.kind(),
    }
}
