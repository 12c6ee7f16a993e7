//! Daily reminder emails.
//!
//! Every run sends exactly one email: a reminder listing due and overdue
//! revisions, or an all-clear carrying a motivational quote when there is
//! nothing to do.

use chrono::NaiveDate;

use crate::domain::{EmailConfig, Problem, RevisionStatus, schedule};

mod email;
pub use email::{API_KEY_VAR, Email, MailError, Mailer, ResendMailer};

mod quote;
pub use quote::{Quote, QuoteError, QuoteSource, ZenQuotes};

mod template;

/// Which email a run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    /// Some revisions need attention.
    Reminder {
        /// Items due today.
        due: usize,
        /// Items past their scheduled date.
        overdue: usize,
    },
    /// Nothing needs attention.
    AllClear {
        /// The quote included in the email.
        quote: Quote,
    },
}

/// A composed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Which email this is.
    pub kind: NotificationKind,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain text body.
    pub text: String,
    /// The provider's message identifier, once sent.
    pub id: Option<String>,
}

impl Notification {
    fn from_rendered(kind: NotificationKind, rendered: template::Rendered) -> Self {
        Self {
            kind,
            subject: rendered.subject,
            html: rendered.html,
            text: rendered.text,
            id: None,
        }
    }

    fn email(&self, from: &str, to: String) -> Email {
        Email {
            from: from.to_string(),
            to: vec![to],
            subject: self.subject.clone(),
            html: self.html.clone(),
            text: Some(self.text.clone()),
        }
    }
}

/// Errors raised while notifying.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Neither the configuration nor the environment names a recipient.
    #[error("no recipient configured; set email.to in config.toml or USER_EMAIL")]
    MissingRecipient,

    /// The email could not be sent.
    #[error("failed to send email")]
    Mail(#[from] MailError),
}

/// Compose the notification for `today` without sending it.
///
/// The quote source is only consulted when nothing is due.
pub fn compose(problems: &[Problem], today: NaiveDate, quotes: &dyn QuoteSource) -> Notification {
    let items = schedule::due_items(problems, today);

    if items.is_empty() {
        let quote = quotes.quote_or_fallback();
        let rendered = template::all_clear(&quote);
        return Notification::from_rendered(NotificationKind::AllClear { quote }, rendered);
    }

    let overdue = items
        .iter()
        .filter(|item| item.status == RevisionStatus::Overdue)
        .count();
    let kind = NotificationKind::Reminder {
        due: items.len() - overdue,
        overdue,
    };

    Notification::from_rendered(kind, template::reminder(&items))
}

/// Compose the notification for `today` and send it.
///
/// # Errors
///
/// Returns an error if there is no recipient or the email cannot be sent.
pub fn notify(
    problems: &[Problem],
    today: NaiveDate,
    mailer: &dyn Mailer,
    quotes: &dyn QuoteSource,
    config: &EmailConfig,
) -> Result<Notification, NotifyError> {
    let to = config.recipient().ok_or(NotifyError::MissingRecipient)?;
    let mut notification = compose(problems, today, quotes);

    match &notification.kind {
        NotificationKind::Reminder { due, overdue } => {
            tracing::info!("Sending reminder for {due} due and {overdue} overdue problems");
        }
        NotificationKind::AllClear { .. } => {
            tracing::info!("Nothing due. Sending all-clear.");
        }
    }

    let id = mailer.send(&notification.email(&config.from, to))?;
    notification.id = Some(id);

    Ok(notification)
}

/// Send a fixed test email to check delivery settings.
///
/// # Errors
///
/// Returns an error if there is no recipient or the email cannot be sent.
pub fn send_test(mailer: &dyn Mailer, config: &EmailConfig) -> Result<String, NotifyError> {
    let to = config.recipient().ok_or(NotifyError::MissingRecipient)?;
    let rendered = template::test();
    let email = Email {
        from: config.from.clone(),
        to: vec![to],
        subject: rendered.subject,
        html: rendered.html,
        text: Some(rendered.text),
    };

    tracing::info!("Sending test email to {}", email.to.join(", "));
    Ok(mailer.send(&email)?)
}
