//! Incremental NDJSON decoder for streaming response bodies.
//!
//! The engine emits one JSON object per line, and the transport delivers
//! the body in arbitrary chunks — a record may span any number of chunk
//! boundaries. The decoder keeps exactly one pending partial-line buffer
//! and turns complete lines into records as chunks arrive.

use std::collections::VecDeque;

use crate::error::{ProtonLinkError, Result};
use crate::models::Record;

/// Maximum number of characters of an offending line quoted in a
/// [`ProtonLinkError::DecodeError`] message.
const LINE_PREVIEW_CHARS: usize = 100;

/// Pull-fed NDJSON line decoder.
///
/// Buffering is byte-level and lines are split on `\n` bytes only; a
/// newline byte never occurs inside a multi-byte UTF-8 sequence, so a
/// character split across chunk boundaries is carried forward intact in
/// the pending buffer rather than corrupted.
#[derive(Debug, Default)]
pub(crate) struct NdjsonDecoder {
    /// Pending partial line, carried between chunks. Cleared on flush
    /// or on a decode error.
    buf: Vec<u8>,
}

impl NdjsonDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of body bytes, pushing every complete non-blank
    /// line onto `out` as a decoded record.
    ///
    /// Records decoded from lines preceding a malformed one in the same
    /// chunk are already on `out` when the error returns.
    pub(crate) fn feed(&mut self, chunk: &[u8], out: &mut VecDeque<Record>) -> Result<()> {
        self.buf.extend_from_slice(chunk);

        let mut start = 0;
        while let Some(offset) = self.buf[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            let decoded = decode_line(&self.buf[start..end]);
            start = end + 1;
            match decoded {
                Ok(Some(record)) => out.push_back(record),
                Ok(None) => {},
                Err(e) => {
                    self.buf.clear();
                    return Err(e);
                },
            }
        }
        self.buf.drain(..start);
        Ok(())
    }

    /// Flush the pending buffer once the body has ended.
    ///
    /// A stream may legitimately end without a trailing newline; non-blank
    /// pending content is decoded as the final record.
    pub(crate) fn finish(&mut self, out: &mut VecDeque<Record>) -> Result<()> {
        let tail = std::mem::take(&mut self.buf);
        if let Some(record) = decode_line(&tail)? {
            out.push_back(record);
        }
        Ok(())
    }
}

/// Decode one complete line. Blank (empty or whitespace-only) lines are
/// skipped and yield `None`.
fn decode_line(line: &[u8]) -> Result<Option<Record>> {
    let text = match std::str::from_utf8(line) {
        Ok(text) => text,
        Err(_) => {
            return Err(ProtonLinkError::DecodeError(preview(
                &String::from_utf8_lossy(line),
            )))
        },
    };
    if text.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Record>(text) {
        Ok(record) => Ok(Some(record)),
        Err(_) => Err(ProtonLinkError::DecodeError(preview(text))),
    }
}

/// First [`LINE_PREVIEW_CHARS`] characters of the line, with an ellipsis
/// appended when truncated.
fn preview(line: &str) -> String {
    match line.char_indices().nth(LINE_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}
