//! Field visitor extracting the formatted message of an event.
//!
//! `info!("user {} logged in", id)` records its text through `record_debug`
//! on the `message` field; `info!(message = "...")` records it through
//! `record_str`. Both end up as the same plain line. Every other field is
//! ignored, so structured key/value pairs never leak into templates.

use std::fmt;
use tracing::field::{Field, Visit};

const MESSAGE_FIELD: &str = "message";

/// A visitor that keeps the `message` field of an event as a string.
#[derive(Debug, Default)]
pub(crate) struct MessageVisitor {
    message: Option<String>,
}

impl MessageVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the visitor and return the message, if the event had one.
    pub fn into_message(self) -> Option<String> {
        self.message
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(format!("{:?}", value));
        }
    }
}
