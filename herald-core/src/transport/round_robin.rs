//! Round-robin transport: spreads messages across children

use super::composite::Children;
use super::{unsupported_message, Transport};
use crate::error::Result;
use crate::models::{Message, SentMessage};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Rotates the starting child on every successful send.
///
/// A child that fails is skipped for the rest of the call and the next one
/// is tried, so a single call still fails over. The cursor is shared by all
/// callers; concurrent sends may lose an update but never read out of range.
pub struct RoundRobinTransport {
    children: Children,
    /// Index of the next child to try
    cursor: AtomicUsize,
}

impl RoundRobinTransport {
    pub fn new(transports: Vec<Box<dyn Transport>>) -> Result<Self> {
        Ok(Self {
            children: Children::new("round-robin", " && ", transports)?,
            cursor: AtomicUsize::new(0),
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

    /// Index the next call will start from
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Relaxed) % self.children.len()
    }
}

#[async_trait]
impl Transport for RoundRobinTransport {
    fn supports(&self, message: &Message) -> bool {
        self.children.supports(message)
    }

    async fn send(&self, message: &Message) -> Result<SentMessage> {
        if !self.supports(message) {
            return Err(unsupported_message(self, message));
        }
        let len = self.children.len();
        let start = self.cursor();
        let order = (0..len).map(move |offset| (start + offset) % len);

        let (index, sent) = self.children.dispatch(message, order).await?;
        self.cursor.store((index + 1) % len, Ordering::Relaxed);
        Ok(sent)
    }

    fn describe(&self) -> String {
        self.children.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::NullTransport;

    #[tokio::test]
    async fn test_cursor_wraps() {
        let rr = RoundRobinTransport::new(vec![
            Box::new(NullTransport::default()),
            Box::new(NullTransport::default()),
            Box::new(NullTransport::default()),
        ])
        .unwrap();
        assert_eq!(rr.describe(), "(null && null && null)");

        let message = Message::sms("+1", "x");
        for expected in [1, 2, 0, 1] {
            rr.send(&message).await.unwrap();
            assert_eq!(rr.cursor(), expected);
        }
    }
}
