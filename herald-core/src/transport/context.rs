//! Collaborators shared by every transport a factory builds

use crate::dsn::Dsn;
use crate::error::{Result, TransportError};
use crate::events::{EventDispatcher, TransportEvent};
use crate::http::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::models::{Message, SentMessage};
use std::fmt;
use std::sync::Arc;

/// HTTP client and optional event dispatcher, injected at registry build time
#[derive(Clone)]
pub struct TransportContext {
    http: Arc<dyn HttpClient>,
    events: Option<Arc<dyn EventDispatcher>>,
}

impl TransportContext {
    pub fn new(http: Arc<dyn HttpClient>, events: Option<Arc<dyn EventDispatcher>>) -> Self {
        Self { http, events }
    }

    pub fn http(&self) -> &Arc<dyn HttpClient> {
        &self.http
    }

    pub fn dispatch(&self, event: TransportEvent) {
        if let Some(events) = &self.events {
            events.dispatch(event);
        }
    }

    /// Perform a request, mapping client failures to a `TransportError`
    pub async fn request(&self, transport: &str, request: HttpRequest) -> Result<HttpResponse> {
        self.http.request(request).await.map_err(|source| {
            TransportError::Http {
                transport: transport.to_string(),
                source,
            }
            .into()
        })
    }

    /// Emit `Sending`, run the delivery, then emit `Sent` or `Failed`
    pub async fn deliver<F>(
        &self,
        transport: String,
        message: &Message,
        delivery: F,
    ) -> Result<SentMessage>
    where
        F: std::future::Future<Output = Result<SentMessage>> + Send,
    {
        self.dispatch(TransportEvent::Sending {
            transport: transport.clone(),
            kind: message.kind(),
        });
        let result = delivery.await;
        match &result {
            Ok(sent) => self.dispatch(TransportEvent::Sent {
                transport,
                message_id: sent.message_id().map(str::to_string),
            }),
            Err(e) => self.dispatch(TransportEvent::Failed {
                transport,
                reason: e.to_string(),
            }),
        }
        result
    }
}

impl Default for TransportContext {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::default()), None)
    }
}

impl fmt::Debug for TransportContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportContext")
            .field("events", &self.events.is_some())
            .finish_non_exhaustive()
    }
}

/// Vendor endpoint: the DSN host unless it is the `default` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    default_host: &'static str,
    host: Option<String>,
    port: Option<u16>,
}

impl Endpoint {
    pub fn new(default_host: &'static str) -> Self {
        Self {
            default_host,
            host: None,
            port: None,
        }
    }

    pub fn from_dsn(default_host: &'static str, dsn: &Dsn) -> Self {
        Self {
            host: (!dsn.has_default_host()).then(|| dsn.host().to_string()),
            port: dsn.port(),
            ..Self::new(default_host)
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host.as_deref().unwrap_or(self.default_host))?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}
