//! Selection logic shared by failover and round-robin transports

use super::Transport;
use crate::error::{NotifierError, Result, TransportError};
use crate::models::{Message, SentMessage};
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Ordered children plus the table of recently failed ones
pub(crate) struct Children {
    kind: &'static str,
    separator: &'static str,
    transports: Vec<Box<dyn Transport>>,
    /// index -> time of last failure; only filled when `retry_period` is non-zero
    dead: DashMap<usize, Instant>,
    retry_period: Duration,
}

impl Children {
    pub(crate) fn new(
        kind: &'static str,
        separator: &'static str,
        transports: Vec<Box<dyn Transport>>,
    ) -> Result<Self> {
        if transports.is_empty() {
            return Err(NotifierError::NoTransports { composite: kind });
        }
        Ok(Self {
            kind,
            separator,
            transports,
            dead: DashMap::new(),
            retry_period: Duration::ZERO,
        })
    }

    pub(crate) fn set_retry_period(&mut self, period: Duration) {
        self.retry_period = period;
    }

    pub(crate) fn len(&self) -> usize {
        self.transports.len()
    }

    pub(crate) fn transports(&self) -> &[Box<dyn Transport>] {
        &self.transports
    }

    pub(crate) fn supports(&self, message: &Message) -> bool {
        self.transports.iter().any(|t| t.supports(message))
    }

    /// Children joined by the separator, grouped so nested graphs stay distinct
    pub(crate) fn describe(&self) -> String {
        let children = self
            .transports
            .iter()
            .map(|t| t.describe())
            .collect::<Vec<_>>()
            .join(self.separator);
        format!("({})", children)
    }

    fn is_dead(&self, index: usize) -> bool {
        if self.retry_period.is_zero() {
            return false;
        }
        self.dead
            .remove_if(&index, |_, since| since.elapsed() >= self.retry_period);
        self.dead.contains_key(&index)
    }

    fn mark_dead(&self, index: usize) {
        if !self.retry_period.is_zero() {
            self.dead.insert(index, Instant::now());
        }
    }

    /// Try children in `order`, skipping unsupported and dead ones.
    ///
    /// Returns the index that delivered the message. A child that fails is
    /// not tried again during this call. Errors other than delivery failures
    /// propagate immediately.
    pub(crate) async fn dispatch<I>(
        &self,
        message: &Message,
        order: I,
    ) -> Result<(usize, SentMessage)>
    where
        I: Iterator<Item = usize> + Send,
    {
        let mut supported = false;
        let mut failures = Vec::new();

        for index in order {
            let transport = &self.transports[index];
            if !transport.supports(message) {
                debug!(
                    composite = self.kind,
                    transport = %transport.describe(),
                    kind = %message.kind(),
                    "Skipping transport that does not support message"
                );
                continue;
            }
            supported = true;

            if self.is_dead(index) {
                debug!(
                    composite = self.kind,
                    transport = %transport.describe(),
                    "Skipping transport inside its retry period"
                );
                continue;
            }

            match transport.send(message).await {
                Ok(sent) => return Ok((index, sent)),
                Err(e) if e.is_transport_error() => {
                    warn!(
                        composite = self.kind,
                        transport = %transport.describe(),
                        error = %e,
                        "Transport failed, trying the next one"
                    );
                    self.mark_dead(index);
                    failures.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        if !supported {
            return Err(NotifierError::UnsupportedMessageType {
                transport: self.describe(),
                kind: message.kind(),
            });
        }
        Err(TransportError::AllFailed(failures).into())
    }
}
