//! Failover transport: first child that delivers wins

use super::composite::Children;
use super::{unsupported_message, Transport};
use crate::error::Result;
use crate::models::{Message, SentMessage};
use async_trait::async_trait;
use std::time::Duration;

/// Tries children in declared priority order until one succeeds.
///
/// Every call starts again from the first child, so the primary is always
/// preferred once it recovers. Fails with an aggregate error listing every
/// child failure when no supporting child delivers.
pub struct FailoverTransport {
    children: Children,
}

impl FailoverTransport {
    pub fn new(transports: Vec<Box<dyn Transport>>) -> Result<Self> {
        Ok(Self {
            children: Children::new("failover", " || ", transports)?,
        })
    }

    /// Skip a failed child on later calls until `period` has elapsed
    pub fn with_retry_period(mut self, period: Duration) -> Self {
        self.children.set_retry_period(period);
        self
    }

    pub fn transports(&self) -> &[Box<dyn Transport>] {
        self.children.transports()
    }
}

#[async_trait]
impl Transport for FailoverTransport {
    fn supports(&self, message: &Message) -> bool {
        self.children.supports(message)
    }

    async fn send(&self, message: &Message) -> Result<SentMessage> {
        if !self.supports(message) {
            return Err(unsupported_message(self, message));
        }
        let (_, sent) = self
            .children
            .dispatch(message, 0..self.children.len())
            .await?;
        Ok(sent)
    }

    fn describe(&self) -> String {
        self.children.describe()
    }
}
