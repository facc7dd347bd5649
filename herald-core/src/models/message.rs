//! Message data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of message, used for capability checks and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    #[serde(rename = "sms")]
    Sms,
    #[serde(rename = "chat")]
    Chat,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Sms => write!(f, "sms"),
            MessageKind::Chat => write!(f, "chat"),
        }
    }
}

/// Text message addressed to a phone number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub phone: String,
    pub subject: String,
    /// Name of the transport to route through in a named collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
}

impl SmsMessage {
    pub fn new(phone: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            subject: subject.into(),
            transport: None,
        }
    }

    pub fn transport(mut self, name: impl Into<String>) -> Self {
        self.transport = Some(name.into());
        self
    }
}

/// Message posted to a chat service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub subject: String,
    /// Overrides the channel configured on the transport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
}

impl ChatMessage {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            recipient_id: None,
            transport: None,
        }
    }

    pub fn recipient(mut self, id: impl Into<String>) -> Self {
        self.recipient_id = Some(id.into());
        self
    }

    pub fn transport(mut self, name: impl Into<String>) -> Self {
        self.transport = Some(name.into());
        self
    }
}

/// A notification handed to a transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "sms")]
    Sms(SmsMessage),
    #[serde(rename = "chat")]
    Chat(ChatMessage),
}

impl Message {
    pub fn sms(phone: impl Into<String>, subject: impl Into<String>) -> Self {
        Message::Sms(SmsMessage::new(phone, subject))
    }

    pub fn chat(subject: impl Into<String>) -> Self {
        Message::Chat(ChatMessage::new(subject))
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Sms(_) => MessageKind::Sms,
            Message::Chat(_) => MessageKind::Chat,
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            Message::Sms(m) => &m.subject,
            Message::Chat(m) => &m.subject,
        }
    }

    /// Transport name requested by the sender, if any
    pub fn transport(&self) -> Option<&str> {
        match self {
            Message::Sms(m) => m.transport.as_deref(),
            Message::Chat(m) => m.transport.as_deref(),
        }
    }
}

impl From<SmsMessage> for Message {
    fn from(message: SmsMessage) -> Self {
        Message::Sms(message)
    }
}

impl From<ChatMessage> for Message {
    fn from(message: ChatMessage) -> Self {
        Message::Chat(message)
    }
}

/// Result of a successful delivery
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentMessage {
    original: Message,
    transport: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_id: Option<String>,
}

impl SentMessage {
    pub fn new(original: Message, transport: impl Into<String>) -> Self {
        Self {
            original,
            transport: transport.into(),
            message_id: None,
        }
    }

    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    pub fn original(&self) -> &Message {
        &self.original
    }

    /// `describe()` of the transport that delivered the message
    pub fn transport(&self) -> &str {
        &self.transport
    }

    /// Identifier assigned by the vendor, when it returns one
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }
}
