//! Named transport collection

use super::{unsupported_message, Transport};
use crate::error::{NotifierError, Result};
use crate::models::{Message, SentMessage};
use async_trait::async_trait;

/// Logical channel name -> transport, in insertion order.
///
/// Also a transport itself: a message naming a channel is routed there,
/// any other message goes to the first channel that supports it.
#[derive(Default)]
pub struct Transports {
    transports: Vec<(String, Box<dyn Transport>)>,
}

impl Transports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel; an existing channel with the same name is replaced in place
    pub fn insert(&mut self, name: impl Into<String>, transport: Box<dyn Transport>) {
        let name = name.into();
        match self.transports.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = transport,
            None => self.transports.push((name, transport)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Transport> {
        self.transports
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.as_ref() as &dyn Transport)
    }

    pub fn names(&self) -> Vec<&str> {
        self.transports.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.transports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Transport)> {
        self.transports
            .iter()
            .map(|(n, t)| (n.as_str(), t.as_ref() as &dyn Transport))
    }
}

#[async_trait]
impl Transport for Transports {
    fn supports(&self, message: &Message) -> bool {
        match message.transport() {
            Some(name) => self.get(name).is_some_and(|t| t.supports(message)),
            None => self.transports.iter().any(|(_, t)| t.supports(message)),
        }
    }

    async fn send(&self, message: &Message) -> Result<SentMessage> {
        let Some(name) = message.transport() else {
            return match self.transports.iter().find(|(_, t)| t.supports(message)) {
                Some((_, transport)) => transport.send(message).await,
                None => Err(unsupported_message(self, message)),
            };
        };

        match self.get(name) {
            Some(transport) => transport.send(message).await,
            None => Err(NotifierError::UnknownTransport {
                name: name.to_string(),
                available: self.names().into_iter().map(str::to_string).collect(),
            }),
        }
    }

    fn describe(&self) -> String {
        format!("[{}]", self.names().join(","))
    }
}
