use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::Mailbox,
    transport::smtp::authentication::Credentials as SmtpCredentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::credential::Credential;

/// Mail delivery collaborator. Fire-and-forget from the service's
/// perspective: failures are logged by the caller, never propagated as
/// authentication failures.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_confirmation(&self, credential: &Credential) -> anyhow::Result<()>;
    async fn send_password_reset(&self, credential: &Credential) -> anyhow::Result<()>;
}

/// SMTP-backed mailer.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, username: &str, password: &str, sender: &str) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .context("smtp relay")?
            .credentials(SmtpCredentials::new(username.to_string(), password.to_string()))
            .build();
        let sender = sender.parse::<Mailbox>().context("parse sender address")?;
        Ok(Self { transport, sender })
    }

    async fn deliver(&self, to: &str, subject: &str, body: String) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(to.parse().context("parse recipient address")?)
            .subject(subject)
            .body(body)
            .context("build message")?;
        self.transport.send(message).await.context("smtp send")?;
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_confirmation(&self, credential: &Credential) -> anyhow::Result<()> {
        let token = credential.confirmation_token.as_deref().unwrap_or_default();
        self.deliver(
            &credential.email,
            "Please confirm your email address",
            format!(
                "Welcome!\n\nUse this code to confirm your email address: {token}\n"
            ),
        )
        .await
    }

    async fn send_password_reset(&self, credential: &Credential) -> anyhow::Result<()> {
        let token = credential.confirmation_token.as_deref().unwrap_or_default();
        self.deliver(
            &credential.email,
            "Change your password",
            format!(
                "Someone requested a password change for your account.\n\n\
                 Use this code to choose a new password: {token}\n\n\
                 If you did not request this, ignore this message.\n"
            ),
        )
        .await
    }
}
