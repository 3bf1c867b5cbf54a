//! WhatsApp Business Cloud API dispatch sink.
//!
//! Sends the already-selected message text to a contact via the Graph API.
//! Requires an access token and phone number ID from Meta Business Suite.

use async_trait::async_trait;
use std::time::Duration;

use rekindle_core::config::WhatsAppConfig;
use rekindle_core::{DispatchSink, RekindleError, Result};

const GRAPH_API_BASE: &str = "https://graph.facebook.com/v21.0";

#[derive(Debug)]
pub struct WhatsAppSink {
    config: WhatsAppConfig,
    client: reqwest::Client,
}

impl WhatsAppSink {
    pub fn new(config: WhatsAppConfig) -> Result<Self> {
        if config.access_token.is_empty() {
            return Err(RekindleError::Config(
                "whatsapp access_token not configured".into(),
            ));
        }
        if config.phone_number_id.is_empty() {
            return Err(RekindleError::Config(
                "whatsapp phone_number_id not configured".into(),
            ));
        }
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    fn messages_url(&self) -> String {
        format!("{GRAPH_API_BASE}/{}/messages", self.config.phone_number_id)
    }
}

#[async_trait]
impl DispatchSink for WhatsAppSink {
    async fn send(&self, phone: &str, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": phone,
            "type": "text",
            "text": {
                "preview_url": false,
                "body": text
            }
        });

        let response = self
            .client
            .post(self.messages_url())
            .bearer_auth(&self.config.access_token)
            .json(&body)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| RekindleError::DispatchUnavailable(format!("whatsapp request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(RekindleError::DispatchUnavailable(format!(
                "whatsapp api {status}: {detail}"
            )));
        }

        tracing::debug!(to = %phone, "whatsapp message accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WhatsAppConfig {
        WhatsAppConfig {
            access_token: "token".into(),
            phone_number_id: "123456".into(),
        }
    }

    #[test]
    fn builds_messages_url_from_phone_number_id() {
        let sink = WhatsAppSink::new(config()).unwrap();
        assert_eq!(
            sink.messages_url(),
            "https://graph.facebook.com/v21.0/123456/messages"
        );
    }

    #[test]
    fn rejects_missing_credentials() {
        let err = WhatsAppSink::new(WhatsAppConfig::default()).unwrap_err();
        assert!(matches!(err, RekindleError::Config(_)));

        let no_phone_id = WhatsAppConfig {
            access_token: "token".into(),
            phone_number_id: String::new(),
        };
        assert!(WhatsAppSink::new(no_phone_id).is_err());
    }
}
