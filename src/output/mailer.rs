// src/output/mailer.rs
//! Mail composition and SMTP delivery of a digest.

use crate::config::{MailSettings, SmtpSettings};
use crate::error::AppError;
use crate::normalize::ViewerClock;
use crate::types::Digest;
use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::json;

const SUBJECT_TEMPLATE: &str = "mail.subject";
const BODY_TEMPLATE: &str = "mail.body";

/// A fully rendered mail, ready to send or print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    /// Complete HTML document.
    pub html: String,
}

/// Renders the subject and body templates of one database around `digest`.
///
/// Templates see `dbname`, `date` (YYYY-MM-DD), `time` (RFC 822) and
/// `mail.content`, the digest itself. Nothing is escaped: the digest is
/// already HTML.
pub fn compose_mail(
    db_name: &str,
    digest: &Digest,
    settings: &MailSettings,
    now: DateTime<Utc>,
    clock: &ViewerClock,
) -> Result<ComposedMail, AppError> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    let data = json!({
        "dbname": db_name,
        "date": clock.today(now).format("%Y-%m-%d").to_string(),
        "time": clock.short(now),
        "mail": { "content": digest.as_str() },
    });

    let render = |name: &str, template: &str| {
        handlebars
            .render_template(template, &data)
            .map_err(|e| AppError::TemplateRenderError {
                name: name.to_string(),
                message: e.to_string(),
            })
    };
    let subject = render(SUBJECT_TEMPLATE, &settings.subject)?;
    let body = render(BODY_TEMPLATE, &settings.body)?;

    Ok(ComposedMail {
        from: settings.from.clone(),
        to: settings.to.clone(),
        subject: subject.trim().to_string(),
        html: format!("<html>\n<body>\n{}\n</body>\n</html>\n", body),
    })
}

impl ComposedMail {
    /// Builds the MIME message, validating every address.
    pub fn to_message(&self) -> Result<Message, AppError> {
        let from: Mailbox = self.from.parse()?;
        let mut builder = Message::builder().from(from).subject(self.subject.as_str());
        for recipient in &self.to {
            let to: Mailbox = recipient.parse()?;
            builder = builder.to(to);
        }

        Ok(builder
            .header(ContentType::TEXT_HTML)
            .body(self.html.clone())?)
    }

    /// Header block plus body, as printed by a dry run.
    pub fn preview(&self) -> String {
        format!(
            "To: {}\nFrom: {}\nSubject: {}\n\n{}",
            self.to.join(","),
            self.from,
            self.subject,
            self.html
        )
    }
}

/// Sends `mail` over implicit TLS with username/password authentication.
pub async fn send_mail(smtp: &SmtpSettings, mail: &ComposedMail) -> Result<(), AppError> {
    let message = mail.to_message()?;

    let creds = Credentials::new(smtp.username.clone(), smtp.password.clone());
    let transport: AsyncSmtpTransport<Tokio1Executor> =
        AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)?
            .port(smtp.port)
            .credentials(creds)
            .build();

    log::debug!(
        "Sending '{}' to {} recipient(s) via {}:{}",
        mail.subject,
        mail.to.len(),
        smtp.host,
        smtp.port
    );
    transport.send(message).await?;
    log::info!("Mail '{}' sent to {}", mail.subject, mail.to.join(", "));
    Ok(())
}
