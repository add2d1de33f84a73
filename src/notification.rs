use std::path::PathBuf;

use itertools::Itertools;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    checkpoint::CheckpointOutcome,
    config::AlertConfig,
    error::Result,
    summary::SessionSummary,
};

/// Payload of a notification, rendered per variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationBody {
    Text { text: String },
    List { failed: Vec<String>, passed: Vec<String> },
    Tally { counts: SessionSummary },
}

impl NotificationBody {
    pub fn render_text(&self) -> String {
        match self {
            NotificationBody::Text { text } => text.clone(),
            NotificationBody::List { failed, passed } => format!(
                "Failed: {}\nPassed: {}",
                none_if_empty(failed.iter().join(", ")),
                none_if_empty(passed.iter().join(", "))
            ),
            NotificationBody::Tally { counts } => counts
                .iter()
                .map(|(label, count)| format!("{label}: {count}"))
                .join("\n"),
        }
    }

    pub fn render_html(&self) -> String {
        match self {
            NotificationBody::Text { text } => format!("<p>{}</p>", escape_html(text)),
            NotificationBody::List { failed, passed } => format!(
                "<h3>Failed checkpoints</h3>{}<h3>Passed checkpoints</h3>{}",
                html_list(failed),
                html_list(passed)
            ),
            NotificationBody::Tally { counts } => {
                let rows = counts
                    .iter()
                    .map(|(label, count)| {
                        format!("<tr><td>{}</td><td>{count}</td></tr>", escape_html(label))
                    })
                    .join("");
                format!("<table><tr><th>Label</th><th>Count</th></tr>{rows}</table>")
            }
        }
    }
}

fn none_if_empty(joined: String) -> String {
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}

fn html_list(items: &[String]) -> String {
    if items.is_empty() {
        return "<p>none</p>".to_string();
    }
    format!(
        "<ul>{}</ul>",
        items
            .iter()
            .map(|item| format!("<li>{}</li>", escape_html(item)))
            .join("")
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// A message for the notification collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipients: Vec<String>,
    pub subject: String,
    pub context: String,
    pub body: Vec<NotificationBody>,
    /// Annotated media shown alongside the mail body.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<PathBuf>,
}

impl Notification {
    pub fn with_attachments<I>(mut self, attachments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
    {
        self.attachments.extend(attachments.into_iter().map(Into::into));
        self
    }

    pub fn render_html(&self) -> String {
        std::iter::once(NotificationBody::Text {
            text: self.context.clone(),
        }
        .render_html())
        .chain(self.body.iter().map(NotificationBody::render_html))
        .join("\n")
    }
}

/// Delivery collaborator, e.g. an SMTP client.
pub trait Notifier {
    fn send(&self, notification: &Notification) -> Result<()>;
}

/// Decides whether a finished session warrants an alert.
#[derive(Clone, Debug)]
pub struct AlertTrigger {
    config: AlertConfig,
}

impl AlertTrigger {
    pub fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    /// Builds an alert if any checkpoint failed. Performs no I/O.
    pub fn evaluate(
        &self,
        outcome: &CheckpointOutcome,
        summary: &SessionSummary,
        context: &str,
    ) -> Option<Notification> {
        if !self.config.effective_enabled() || !outcome.any_failed() {
            return None;
        }
        if self.config.recipients.is_empty() {
            warn!(failed = ?outcome.failed, "checkpoints failed but nobody is subscribed");
            return None;
        }
        Some(Notification {
            recipients: self.config.recipients.clone(),
            subject: self.config.effective_subject().to_string(),
            context: context.to_string(),
            body: vec![
                NotificationBody::List {
                    failed: outcome.failed.clone(),
                    passed: outcome.passed.clone(),
                },
                NotificationBody::Tally {
                    counts: summary.clone(),
                },
            ],
            attachments: Vec::new(),
        })
    }

    /// Hands `notification` to `notifier`, logging instead of failing.
    pub fn dispatch<N: Notifier + ?Sized>(notifier: &N, notification: &Notification) -> bool {
        match notifier.send(notification) {
            Ok(()) => {
                info!(recipients = notification.recipients.len(), "alert sent");
                true
            }
            Err(e) => {
                warn!(error = %e, "alert delivery failed");
                false
            }
        }
    }
}
