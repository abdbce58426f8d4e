use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::Path;
use std::time::Duration;

use crate::errors::CoreError;

/// Mail sender configuration, injected at construction instead of read
/// from process-global state. Credentials come from the environment at
/// the composition root and never appear in logs.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub username: String,
    pub password: String,
    /// The From address, e.g. "Ticker Time Machine <bot@example.com>"
    pub from: String,
}

/// Outbound notification seam. The HTTP layer only knows this trait;
/// tests swap in a recording mock.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send an email with a PNG attachment to an already-validated
    /// recipient address.
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: &Path,
    ) -> Result<(), CoreError>;
}

/// SMTP notifier backed by lettre's async transport (STARTTLS relay).
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: MailConfig) -> Result<Self, CoreError> {
        let from = config
            .from
            .parse()
            .map_err(|e| CoreError::Mail(format!("invalid From address: {e}")))?;

        let credentials = Credentials::new(config.username, config.password);
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| CoreError::Mail(format!("SMTP relay setup failed: {e}")))?
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(30)))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: &Path,
    ) -> Result<(), CoreError> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|_| CoreError::InvalidEmail(to.to_string()))?;

        let image = tokio::fs::read(attachment)
            .await
            .map_err(|e| CoreError::Mail(format!("cannot read attachment: {e}")))?;
        let filename = attachment
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "chart.png".to_string());
        let png = ContentType::parse("image/png")
            .map_err(|e| CoreError::Mail(format!("attachment content type: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(Attachment::new(filename).body(image, png)),
            )
            .map_err(|e| CoreError::Mail(format!("message assembly failed: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| CoreError::Mail(e.to_string()))?;

        tracing::info!(recipient = %to, "history chart emailed");
        Ok(())
    }
}
