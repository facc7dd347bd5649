//! Stub transports, factories and HTTP client shared by integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use herald_core::dsn::Dsn;
use herald_core::events::{EventDispatcher, TransportEvent};
use herald_core::http::{HttpClient, HttpError, HttpRequest, HttpResponse};
use herald_core::models::{Message, MessageKind, SentMessage};
use herald_core::transport::{unsupported_message, Transport, TransportFactory};
use herald_core::{NotifierError, Result, TransportError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Transport that records calls and either succeeds or fails
pub struct StubTransport {
    name: String,
    kinds: Vec<MessageKind>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl StubTransport {
    pub fn ok(name: &str) -> (Self, Arc<AtomicUsize>) {
        Self::build(name, false)
    }

    pub fn failing(name: &str) -> (Self, Arc<AtomicUsize>) {
        Self::build(name, true)
    }

    fn build(name: &str, fail: bool) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let stub = Self {
            name: name.to_string(),
            kinds: vec![MessageKind::Sms, MessageKind::Chat],
            fail,
            calls: Arc::clone(&calls),
        };
        (stub, calls)
    }

    /// Restrict the message kinds this stub supports
    pub fn only(mut self, kind: MessageKind) -> Self {
        self.kinds = vec![kind];
        self
    }

    pub fn boxed(self) -> Box<dyn Transport> {
        Box::new(self)
    }
}

#[async_trait]
impl Transport for StubTransport {
    fn supports(&self, message: &Message) -> bool {
        self.kinds.contains(&message.kind())
    }

    async fn send(&self, message: &Message) -> Result<SentMessage> {
        if !self.supports(message) {
            return Err(unsupported_message(self, message));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TransportError::Rejected {
                transport: self.describe(),
                status: 503,
                reason: format!("{} is down", self.name),
            }
            .into());
        }
        Ok(SentMessage::new(message.clone(), self.describe()).with_message_id(self.name.clone()))
    }

    fn describe(&self) -> String {
        format!("{}://stub", self.name)
    }
}

/// Transport whose `send` fails with a non-delivery error despite claiming support
pub struct MisbehavingTransport;

#[async_trait]
impl Transport for MisbehavingTransport {
    fn supports(&self, _message: &Message) -> bool {
        true
    }

    async fn send(&self, message: &Message) -> Result<SentMessage> {
        Err(NotifierError::UnsupportedMessageType {
            transport: self.describe(),
            kind: message.kind(),
        })
    }

    fn describe(&self) -> String {
        "misbehaving://stub".to_string()
    }
}

/// Factory that labels what it built and counts `create` calls
pub struct StubFactory {
    label: &'static str,
    schemes: &'static [&'static str],
    claim_all: bool,
    created: Arc<AtomicUsize>,
}

impl StubFactory {
    pub fn for_schemes(label: &'static str, schemes: &'static [&'static str]) -> (Self, Arc<AtomicUsize>) {
        let created = Arc::new(AtomicUsize::new(0));
        let factory = Self {
            label,
            schemes,
            claim_all: false,
            created: Arc::clone(&created),
        };
        (factory, created)
    }

    pub fn always(label: &'static str) -> (Self, Arc<AtomicUsize>) {
        let (mut factory, created) = Self::for_schemes(label, &["*"]);
        factory.claim_all = true;
        (factory, created)
    }

    pub fn boxed(self) -> Box<dyn TransportFactory> {
        Box::new(self)
    }
}

impl TransportFactory for StubFactory {
    fn schemes(&self) -> &[&'static str] {
        self.schemes
    }

    fn supports(&self, dsn: &Dsn) -> bool {
        self.claim_all || self.schemes.contains(&dsn.scheme())
    }

    fn create(&self, dsn: &Dsn) -> Result<Box<dyn Transport>> {
        self.ensure_supports(dsn)?;
        if dsn.option("require").is_some() {
            dsn.required_option("from")?;
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(LabelledTransport {
            label: self.label,
            describe: dsn.to_string(),
        }))
    }
}

/// Transport built by [`StubFactory`]; describes itself with its DSN
pub struct LabelledTransport {
    pub label: &'static str,
    describe: String,
}

#[async_trait]
impl Transport for LabelledTransport {
    fn supports(&self, _message: &Message) -> bool {
        true
    }

    async fn send(&self, message: &Message) -> Result<SentMessage> {
        Ok(SentMessage::new(message.clone(), self.describe()).with_message_id(self.label))
    }

    fn describe(&self) -> String {
        self.describe.clone()
    }
}

/// HTTP client replaying canned responses and recording requests
#[derive(Default)]
pub struct RecordingHttpClient {
    responses: Mutex<VecDeque<std::result::Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, reason: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(HttpError::Other(reason.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for RecordingHttpClient {
    async fn request(&self, request: HttpRequest) -> std::result::Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::Other("no canned response".to_string())))
    }
}

/// Event dispatcher that keeps every event
#[derive(Default)]
pub struct RecordingDispatcher {
    events: Mutex<Vec<TransportEvent>>,
}

impl RecordingDispatcher {
    pub fn events(&self) -> Vec<TransportEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventDispatcher for RecordingDispatcher {
    fn dispatch(&self, event: TransportEvent) {
        self.events.lock().unwrap().push(event);
    }
}
