//! Vendor bridges
//!
//! Each bridge translates one vendor HTTP API into the [`Transport`]
//! contract. They only talk to the network through the injected
//! [`HttpClient`](crate::http::HttpClient).
//!
//! [`Transport`]: crate::transport::Transport

mod lightsms;
mod messagebird;
mod telegram;

pub use lightsms::{LightSmsTransport, LightSmsTransportFactory};
pub use messagebird::{MessageBirdTransport, MessageBirdTransportFactory};
pub use telegram::{TelegramTransport, TelegramTransportFactory};

use crate::transport::{TransportContext, TransportFactory};

/// Bridge factories in resolution priority order
pub fn default_factories(context: &TransportContext) -> Vec<Box<dyn TransportFactory>> {
    vec![
        Box::new(TelegramTransportFactory::new(context.clone())),
        Box::new(MessageBirdTransportFactory::new(context.clone())),
        Box::new(LightSmsTransportFactory::new(context.clone())),
    ]
}
