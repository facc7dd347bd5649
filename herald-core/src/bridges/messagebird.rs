//! MessageBird SMS bridge.
//!
//! DSN: `messagebird://TOKEN@default?from=SENDER`

use crate::dsn::Dsn;
use crate::error::{Result, TransportError};
use crate::http::HttpRequest;
use crate::models::{Message, SentMessage, SmsMessage};
use crate::transport::{
    unsupported_message, Endpoint, Transport, TransportContext, TransportFactory,
};
use async_trait::async_trait;

const MESSAGEBIRD_HOST: &str = "rest.messagebird.com";

pub struct MessageBirdTransport {
    auth_token: String,
    from: String,
    endpoint: Endpoint,
    context: TransportContext,
}

impl MessageBirdTransport {
    pub fn new(
        auth_token: impl Into<String>,
        from: impl Into<String>,
        endpoint: Endpoint,
        context: TransportContext,
    ) -> Self {
        Self {
            auth_token: auth_token.into(),
            from: from.into(),
            endpoint,
            context,
        }
    }

    async fn send_sms(&self, sms: &SmsMessage, message: &Message) -> Result<SentMessage> {
        let request = HttpRequest::post(format!("https://{}/messages", self.endpoint))
            .basic_auth("AccessKey", &self.auth_token)
            .form("originator", &self.from)
            .form("recipients", &sms.phone)
            .form("body", &sms.subject);

        let describe = self.describe();
        let res = self.context.request(&describe, request).await?;

        if res.status != 201 {
            let content = res.json().unwrap_or_default();
            let description = content["errors"][0]["description"]
                .as_str()
                .unwrap_or("unknown error");
            return Err(TransportError::Rejected {
                transport: describe,
                status: res.status,
                reason: format!("Unable to send the SMS: {}", description),
            }
            .into());
        }

        let content = res.json().map_err(|e| TransportError::InvalidResponse {
            transport: describe.clone(),
            reason: e.to_string(),
        })?;
        let id = content["id"]
            .as_str()
            .ok_or_else(|| TransportError::InvalidResponse {
                transport: describe.clone(),
                reason: "missing message id".to_string(),
            })?;
        Ok(SentMessage::new(message.clone(), describe).with_message_id(id))
    }
}

#[async_trait]
impl Transport for MessageBirdTransport {
    fn supports(&self, message: &Message) -> bool {
        matches!(message, Message::Sms(_))
    }

    async fn send(&self, message: &Message) -> Result<SentMessage> {
        let Message::Sms(sms) = message else {
            return Err(unsupported_message(self, message));
        };
        self.context
            .deliver(self.describe(), message, self.send_sms(sms, message))
            .await
    }

    fn describe(&self) -> String {
        format!("messagebird://{}?from={}", self.endpoint, self.from)
    }
}

pub struct MessageBirdTransportFactory {
    context: TransportContext,
}

impl MessageBirdTransportFactory {
    pub fn new(context: TransportContext) -> Self {
        Self { context }
    }
}

impl TransportFactory for MessageBirdTransportFactory {
    fn schemes(&self) -> &[&'static str] {
        &["messagebird"]
    }

    fn create(&self, dsn: &Dsn) -> Result<Box<dyn Transport>> {
        self.ensure_supports(dsn)?;

        // Accept the token as user (`TOKEN@`) or as password (`:TOKEN@`)
        let auth_token = dsn
            .user()
            .or(dsn.password())
            .ok_or_else(|| dsn.incomplete("user"))?;
        let from = dsn.required_option("from")?;

        Ok(Box::new(MessageBirdTransport::new(
            auth_token,
            from,
            Endpoint::from_dsn(MESSAGEBIRD_HOST, dsn),
            self.context.clone(),
        )))
    }
}
