use leptos::logging::log;

use crate::error::TransportError;
use crate::models::contact::OutboundMessage;

/// Outbound delivery for contact messages.
#[allow(async_fn_in_trait)]
pub trait MessageTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}

/// Writes messages to the server log instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

impl MessageTransport for LogTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        if message.to_email.is_empty() {
            return Err(TransportError::Rejected("no recipient configured".into()));
        }
        log!(
            "[CONTACT] Message from {} <{}> to {} <{}> ({} chars)",
            message.from_name,
            message.from_email,
            message.to_name,
            message.to_email,
            message.message.chars().count()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to_email: &str) -> OutboundMessage {
        OutboundMessage {
            from_name: "Jo".into(),
            from_email: "jo@example.com".into(),
            to_name: "Owner".into(),
            to_email: to_email.into(),
            message: "Hello, can we talk?".into(),
        }
    }

    #[tokio::test]
    async fn log_transport_accepts_addressed_messages() {
        assert!(LogTransport.send(&message("owner@example.com")).await.is_ok());
        assert!(matches!(
            LogTransport.send(&message("")).await,
            Err(TransportError::Rejected(_))
        ));
    }
}
