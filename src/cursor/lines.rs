use std::iter::FusedIterator;

use memchr::memchr;
use tracing::trace;

use super::Segment;
use crate::text::TextBuffer;

fn is_line_break(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

/// Forward-only iterator over the lines of a buffer.
///
/// Each step looks for the next `\n`; only when none is left does it fall back to
/// `\r`. Trailing `\r`/`\n` bytes are trimmed from the emitted line, and the whole
/// run of line breaks after it is skipped, so blank lines between content lines
/// are coalesced. A break at the current position yields one empty line first.
#[derive(Debug)]
pub struct LineCursor<'a> {
    buffer: &'a TextBuffer<'a>,
    stringify: bool,
    position: usize,
    /// Set once a scan from the cursor found no `\n` in the rest of the buffer
    newline_exhausted: bool,
}

impl<'a> LineCursor<'a> {
    pub fn new(buffer: &'a TextBuffer<'a>, stringify: bool) -> Self {
        Self {
            buffer,
            stringify,
            position: 0,
            newline_exhausted: false,
        }
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.buffer.len()
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let bytes = self.buffer.as_bytes();
        let start = self.position;
        if start >= bytes.len() {
            return None;
        }

        let rest = &bytes[start..];
        // `\n` anywhere ahead wins over a nearer `\r`. The cursor only moves forward,
        // so once no `\n` is left it never needs to be searched for again.
        let newline = if self.newline_exhausted {
            None
        } else {
            let found = memchr(b'\n', rest);
            self.newline_exhausted = found.is_none();
            found
        };
        let sep = newline.or_else(|| memchr(b'\r', rest));
        let raw_end = start + sep.unwrap_or(rest.len());

        let mut end = raw_end;
        while end > start && is_line_break(bytes[end - 1]) {
            end -= 1;
        }

        let mut next = raw_end;
        while next < bytes.len() && is_line_break(bytes[next]) {
            next += 1;
        }
        self.position = next;

        if self.is_exhausted() {
            trace!(len = bytes.len(), "Line cursor exhausted");
        }

        Some(Segment::new(&bytes[start..end], self.stringify))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.position);
        (usize::from(remaining > 0), Some(remaining))
    }
}

impl FusedIterator for LineCursor<'_> {}
