//! Notification rendering: filtered rows + directory → (address, body) pairs.

use serde::Serialize;

use crate::directory::EmailDirectory;
use crate::model::{Recipient, ReviewRow};

/// Greeting prepended to every notification.
const GREETING: &str =
    "Привет! Присылаем подзадержавшиеся отзывы. Спасибо за участие в проектах!\n";

/// A composed notification ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub to: String,
    pub body: String,
}

/// A row that produced no message because its recipient has no known address.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    pub recipient: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ComposeOutput {
    pub messages: Vec<ComposedMessage>,
    pub skipped: Vec<SkippedRow>,
}

/// Compose one notification per row, in row order.
///
/// `recipient` selects which of the row's two participants the message goes
/// to; the body always describes the full (student, mentor) pair. Rows whose
/// recipient is absent from the directory are skipped, not fatal.
pub fn compose(
    rows: &[ReviewRow],
    directory: &EmailDirectory,
    recipient: Recipient,
) -> ComposeOutput {
    let mut out = ComposeOutput::default();

    for row in rows {
        let name = match recipient {
            Recipient::Students => row.student(),
            Recipient::Mentors => row.mentor(),
        };

        let Some(address) = directory.lookup(name) else {
            out.skipped.push(SkippedRow {
                recipient: name.to_string(),
                reason: "no e-mail address on file".into(),
            });
            continue;
        };

        out.messages.push(ComposedMessage {
            to: address.to_string(),
            body: render_body(row),
        });
    }

    out
}

fn render_body(row: &ReviewRow) -> String {
    format!(
        "{GREETING}Студент: {}\nМентор: {}\nЧто было хорошо: {}\nЧто можно улучшить: {}\nДополнительные комментарии: {}\nОценка: {}\n",
        row.student(),
        row.mentor(),
        row.good,
        row.improve,
        row.additional,
        row.score,
    )
}
