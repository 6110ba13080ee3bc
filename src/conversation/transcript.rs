//! Plain-text chat transcript.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::service::ConversationMessage;

const HEADER: &str = "---- CHAT TRANSCRIPT ----";
const SEPARATOR: &str = "----";

/// A rendered transcript ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    /// ISO-8601 export time, millisecond precision, UTC.
    pub exported_at: String,
    /// Suggested file name derived from `exported_at`.
    pub file_name: String,
    pub mime: &'static str,
    pub text: String,
}

impl Transcript {
    /// Render `messages` as exported at `now`
    pub fn new(messages: &[ConversationMessage], now: DateTime<Utc>) -> Self {
        let exported_at = export_timestamp(now);
        let file_name = export_file_name(&exported_at);
        Self {
            text: render(&exported_at, messages),
            mime: mime_for(&file_name),
            exported_at,
            file_name,
        }
    }
}

/// `2024-05-01T09:30:00.123Z`
pub fn export_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `chats-<timestamp>.txt` with `:` and `.` replaced by `-`
pub fn export_file_name(exported_at: &str) -> String {
    format!("chats-{}.txt", exported_at.replace([':', '.'], "-"))
}

/// MIME type implied by a file name's extension
pub fn mime_for(file_name: &str) -> &'static str {
    if file_name.to_lowercase().ends_with(".txt") {
        "text/plain"
    } else {
        "application/json"
    }
}

/// Header, then per message: upper-cased role, content, blank, separator, blank.
pub fn render(exported_at: &str, messages: &[ConversationMessage]) -> String {
    let mut lines: Vec<String> = vec![
        format!("ExportedAt: {}", exported_at),
        String::new(),
        HEADER.to_string(),
        String::new(),
    ];

    for message in messages {
        lines.push(message.role.label());
        lines.push(message.content.clone());
        lines.push(String::new());
        lines.push(SEPARATOR.to_string());
        lines.push(String::new());
    }

    lines.join("\n")
}
