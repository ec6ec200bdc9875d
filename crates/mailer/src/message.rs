//! RFC 2822 message assembly for the Gmail `raw` field.

use base64::Engine;

/// A composed notification plus its envelope, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Serialize to an RFC 2822 message: CRLF headers, UTF-8 body, subject
/// encoded per RFC 2047 when it leaves ASCII.
pub fn to_rfc2822(msg: &OutgoingMessage) -> String {
    format!(
        "From: {}\r\nTo: {}\r\nSubject: {}\r\nMIME-Version: 1.0\r\nContent-Type: text/plain; charset=\"utf-8\"\r\nContent-Transfer-Encoding: 8bit\r\n\r\n{}",
        msg.from,
        msg.to,
        encode_subject(&msg.subject),
        msg.body,
    )
}

/// Gmail's `raw` field: the base64url-encoded RFC 2822 message.
pub fn to_raw(msg: &OutgoingMessage) -> String {
    base64::engine::general_purpose::URL_SAFE.encode(to_rfc2822(msg))
}

// Encoded words are capped at 75 chars including framing; 39 input bytes
// encode to 52, keeping even the "Subject: "-prefixed first line under 78.
const ENCODED_WORD_INPUT_LIMIT: usize = 39;

/// RFC 2047 B-encoding for non-ASCII subjects. ASCII passes through.
fn encode_subject(subject: &str) -> String {
    if subject.is_ascii() {
        return subject.to_string();
    }

    let mut words = Vec::new();
    let mut chunk = String::new();
    for c in subject.chars() {
        if chunk.len() + c.len_utf8() > ENCODED_WORD_INPUT_LIMIT {
            words.push(encode_word(&chunk));
            chunk.clear();
        }
        chunk.push(c);
    }
    if !chunk.is_empty() {
        words.push(encode_word(&chunk));
    }

    // Continuation words are separated by folding whitespace.
    words.join("\r\n ")
}

fn encode_word(chunk: &str) -> String {
    format!(
        "=?UTF-8?B?{}?=",
        base64::engine::general_purpose::STANDARD.encode(chunk)
    )
}
