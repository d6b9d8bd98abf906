use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use crate::contact::request::ValidContact;

const DEFAULT_SUBJECT: &str = "New contact form submission";

/// Message handed to the mail provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
}

impl OutgoingMail {
    /// Compose the forwarded message. `reference` is echoed in the body so a
    /// reply can be matched to the relay log.
    pub fn compose(from: &str, contact: &ValidContact, reference: Uuid) -> Self {
        let received = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let text = format!(
            "Name: {}\nEmail: {}\nReceived: {}\nReference: {}\n\n{}",
            contact.name, contact.email, received, reference, contact.message
        );

        Self {
            from: from.to_string(),
            to: vec![contact.recipient.clone()],
            reply_to: contact.email.clone(),
            subject: contact
                .subject
                .clone()
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            text,
        }
    }
}

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), String>;
}

/// Sends mail through a JSON HTTP mail API with bearer authentication.
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpMailer {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), String> {
        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(mail)
            .send()
            .await
            .map_err(|e| format!("Request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("Mail API error ({}): {}", status, body));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_uses_default_subject_and_reply_to() {
        let contact = ValidContact {
            name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            subject: None,
            message: "Is the dataset public?".to_string(),
            recipient: "support@example.org".to_string(),
        };
        let reference = Uuid::new_v4();
        let mail = OutgoingMail::compose("noreply@example.org", &contact, reference);

        assert_eq!(mail.subject, DEFAULT_SUBJECT);
        assert_eq!(mail.to, vec!["support@example.org".to_string()]);
        assert_eq!(mail.reply_to, "ada@example.org");
        assert!(mail.text.starts_with("Name: Ada\nEmail: ada@example.org\n"));
        assert!(mail.text.contains(&format!("Reference: {reference}")));
        assert!(mail.text.ends_with("\n\nIs the dataset public?"));
    }
}
