// Test fixtures with known inputs and expected splits
// WHY: deterministic input/output pairs shared by library and CLI tests

/// Header block with mixed line endings and a blank line
pub const HEADERS: &[u8] = b"From: alice\r\nTo: bob\r\n\r\nSubject: hi\nX-Spam: no";

pub const HEADERS_LINES: &[&str] = &["From: alice", "To: bob", "Subject: hi", "X-Spam: no"];

/// Comma-separated record with empty fields and trailing delimiter
pub const RECORD: &[u8] = b"id,,name,email,,";

pub const RECORD_FIELDS: &[&str] = &["id", "name", "email"];
