//! Wire-level message envelope.

use serde::{Deserialize, Serialize};

/// Message body. Queue transports distinguish text from raw bytes, and the
/// codecs care: both current codecs require text and reject binary bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageBody {
    Text(String),
    Binary(Vec<u8>),
}

/// One transport message: a body plus an optional correlation header.
///
/// Built immediately before send and torn apart immediately after receive;
/// nothing in the engine holds on to one across items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    body: MessageBody,
    correlation_id: Option<String>,
}

impl WireMessage {
    /// Text message without a correlation header.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: MessageBody::Text(body.into()),
            correlation_id: None,
        }
    }

    /// Binary message without a correlation header.
    pub fn binary(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: MessageBody::Binary(body.into()),
            correlation_id: None,
        }
    }

    /// Attach a correlation header.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Body as text, if this is a text message.
    pub fn text_body(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text(s) => Some(s),
            MessageBody::Binary(_) => None,
        }
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}
