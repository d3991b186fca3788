use anyhow::Context as _;
use serde::Serialize;

use crate::domain::repository::ResetNotifier;
use crate::error::PortalError;

const RESET_SUBJECT: &str = "Reset your portal password";

/// Delivers reset links through an HTTP mail API (JSON POST, bearer key).
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    sender: String,
}

#[derive(Debug, Serialize)]
struct MailMessage<'a> {
    from: &'a str,
    to: &'a str,
    name: &'a str,
    subject: &'a str,
    text: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, sender: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            sender,
        }
    }

    fn reset_message<'a>(&'a self, email: &'a str, name: &'a str, link: &str) -> MailMessage<'a> {
        MailMessage {
            from: &self.sender,
            to: email,
            name,
            subject: RESET_SUBJECT,
            text: format!(
                "Hello {name},\n\nUse the link below to choose a new password. \
                 It expires in one hour.\n\n{link}\n"
            ),
        }
    }
}

impl ResetNotifier for HttpMailer {
    async fn send_reset_link(
        &self,
        email: &str,
        name: &str,
        link: &str,
    ) -> Result<(), PortalError> {
        let message = self.reset_message(email, name, link);
        self.client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await
            .context("send reset mail")?
            .error_for_status()
            .context("mail API rejected reset mail")?;
        Ok(())
    }
}
