use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serpwatch_core::AppConfig;

use crate::digest::Digest;
use crate::error::NotifyError;

/// Delivers a rendered [`Digest`] to a list of recipients.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipients: &[String], digest: &Digest) -> Result<(), NotifyError>;
}

/// SMTP delivery over a STARTTLS relay.
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailNotifier {
    /// Builds a notifier from `SENDER_EMAIL`/`SENDER_PASSWORD` and the SMTP
    /// settings in `config`.
    ///
    /// Returns `Ok(None)` when sender credentials are not configured.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Address`] if the sender address is malformed,
    /// or [`NotifyError::Smtp`] if the relay host is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, NotifyError> {
        let (Some(sender), Some(password)) = (&config.sender_email, &config.sender_password)
        else {
            tracing::info!("sender credentials not configured; email notifications disabled");
            return Ok(None);
        };

        let from = parse_mailbox(sender)?;
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)?
            .port(config.smtp_port)
            .credentials(Credentials::new(sender.clone(), password.clone()))
            .build();

        Ok(Some(Self { mailer, from }))
    }

    fn build_message(
        &self,
        recipients: &[String],
        digest: &Digest,
    ) -> Result<Message, NotifyError> {
        if recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }

        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(digest.subject.clone());
        for recipient in recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        let mut body = MultiPart::mixed().singlepart(SinglePart::html(digest.html.clone()));
        if let Some(attachment) = &digest.attachment {
            let content_type = ContentType::parse(attachment.content_type)?;
            body = body.singlepart(
                Attachment::new(attachment.filename.clone())
                    .body(attachment.bytes.clone(), content_type),
            );
        }

        Ok(builder.multipart(body)?)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, recipients: &[String], digest: &Digest) -> Result<(), NotifyError> {
        let message = self.build_message(recipients, digest)?;
        self.mailer.send(message).await?;
        tracing::info!(
            recipients = recipients.len(),
            attached = digest.attachment.is_some(),
            "digest email sent"
        );
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .trim()
        .parse()
        .map_err(|source| NotifyError::Address {
            address: address.to_string(),
            source,
        })
}
