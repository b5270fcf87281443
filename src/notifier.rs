//! Best-effort outbound email.
//!
//! One owner notification plus one visitor auto-reply per submission, each
//! attempted exactly once. Incomplete mail configuration skips sending
//! entirely; transport failures are logged with their cause. Neither outcome
//! ever reaches the request that triggered the send — by the time this runs,
//! that request has already been answered.

use std::time::Duration;

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::Mailbox,
    transport::smtp::authentication::Credentials,
};
use tracing::{error, info, warn};

use crate::{config::MailConfig, models::ContactMessage};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Notifier {
    config: MailConfig,
}

struct ReadyMail<'a> {
    server: &'a str,
    port: u16,
    username: &'a str,
    password: &'a str,
    sender: &'a str,
}

impl Notifier {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Sends both directions for one message. Takes an owned snapshot of the
    /// submission so it can outlive the request that scheduled it.
    pub async fn notify(&self, message: &ContactMessage) {
        let Some(ready) = self.preflight() else {
            return;
        };

        let transport = match build_transport(&ready) {
            Ok(transport) => transport,
            Err(e) => {
                error!("Mail transport setup failed: {e}");
                return;
            }
        };

        let sender: Mailbox = match ready.sender.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                error!("Invalid MAIL_DEFAULT_SENDER address: {e}");
                return;
            }
        };
        let Ok(visitor) = message.email.parse::<Mailbox>() else {
            // Validated syntactically at submission; a parse failure here
            // just means lettre is stricter than our check.
            warn!("Submitter address not sendable: {}", message.email);
            return;
        };

        // Owner notification and auto-reply are independent: one failing
        // must not block the other, and neither is retried.
        match owner_notification(&sender, &visitor, message) {
            Ok(mail) => match transport.send(mail).await {
                Ok(_) => info!("Notification sent to owner from {}", message.email),
                Err(e) => error!("Owner notification failed: {e}"),
            },
            Err(e) => error!("Failed to build owner notification: {e}"),
        }

        match auto_reply(&sender, &visitor, message) {
            Ok(mail) => match transport.send(mail).await {
                Ok(_) => info!("Auto-reply sent to {}", message.email),
                Err(e) => error!("Auto-reply failed: {e}"),
            },
            Err(e) => error!("Failed to build auto-reply: {e}"),
        }
    }

    // "Notification skipped" is an expected outcome, not an error: the
    // server is allowed to run with no mail configuration at all.
    fn preflight(&self) -> Option<ReadyMail<'_>> {
        let c = &self.config;
        match (&c.server, &c.username, &c.password, &c.sender) {
            (Some(server), Some(username), Some(password), Some(sender)) => Some(ReadyMail {
                server,
                port: c.port,
                username,
                password,
                sender,
            }),
            _ => {
                warn!(
                    "Email skipped: missing mail config (server={}, user={}, pass={}, sender={})",
                    c.server.is_some(),
                    c.username.is_some(),
                    c.password.is_some(),
                    c.sender.is_some(),
                );
                None
            }
        }
    }
}

fn build_transport(
    ready: &ReadyMail<'_>,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, lettre::transport::smtp::Error> {
    Ok(
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(ready.server)?
            .port(ready.port)
            .credentials(Credentials::new(
                ready.username.to_string(),
                ready.password.to_string(),
            ))
            .timeout(Some(SEND_TIMEOUT))
            .build(),
    )
}

fn owner_notification(
    sender: &Mailbox,
    visitor: &Mailbox,
    message: &ContactMessage,
) -> Result<Message, lettre::error::Error> {
    Message::builder()
        .from(sender.clone())
        .to(sender.clone())
        .reply_to(visitor.clone())
        .subject(format!("Portfolio Contact: {}", message.subject))
        .body(format!(
            "From: {} ({})\nSubject: {}\n\n{}",
            message.name, message.email, message.subject, message.body
        ))
}

fn auto_reply(
    sender: &Mailbox,
    visitor: &Mailbox,
    message: &ContactMessage,
) -> Result<Message, lettre::error::Error> {
    Message::builder()
        .from(sender.clone())
        .to(visitor.clone())
        .subject("Thanks for reaching out!")
        .body(format!(
            "Hi {},\n\nThanks for your message regarding '{}'. \
             I'll get back to you soon!\n\nBest regards",
            message.name, message.subject
        ))
}
