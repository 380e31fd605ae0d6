use std::iter::FusedIterator;
use std::ops::Range;

use regex_automata::{meta::Regex, Input};
use tracing::trace;

use super::Segment;
use crate::text::TextBuffer;

/// Something that can find the next match in a haystack.
///
/// `search` looks at the whole `haystack` (so assertions can see context before
/// `from`) and returns the first match starting at or after `from`.
pub trait Pattern {
    fn search(&self, haystack: &[u8], from: usize) -> Option<Range<usize>>;
}

impl Pattern for Regex {
    fn search(&self, haystack: &[u8], from: usize) -> Option<Range<usize>> {
        let input = Input::new(haystack).range(from..);
        Regex::search(self, &input).map(|m| m.range())
    }
}

impl<P: Pattern + ?Sized> Pattern for &P {
    fn search(&self, haystack: &[u8], from: usize) -> Option<Range<usize>> {
        (**self).search(haystack, from)
    }
}

impl<P: Pattern + ?Sized> Pattern for Box<P> {
    fn search(&self, haystack: &[u8], from: usize) -> Option<Range<usize>> {
        (**self).search(haystack, from)
    }
}

/// Forward-only iterator over the gaps between pattern matches.
///
/// Delimiters adjacent to the cut point are skipped rather than producing empty
/// segments. A zero-width match at the cut point ends splitting: the rest of the
/// buffer becomes the final segment.
#[derive(Debug)]
pub struct PatternCursor<'a, P> {
    buffer: &'a TextBuffer<'a>,
    pattern: P,
    stringify: bool,
    position: usize,
}

impl<'a, P: Pattern> PatternCursor<'a, P> {
    pub fn new(buffer: &'a TextBuffer<'a>, pattern: P, stringify: bool) -> Self {
        Self {
            buffer,
            pattern,
            stringify,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.buffer.len()
    }

    pub fn pattern(&self) -> &P {
        &self.pattern
    }
}

impl<'a, P: Pattern> Iterator for PatternCursor<'a, P> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let bytes = self.buffer.as_bytes();
        if self.position >= bytes.len() {
            return None;
        }

        let mut scan = self.position;
        loop {
            match self.pattern.search(bytes, scan) {
                Some(found) if found.start > scan => {
                    self.position = found.end;
                    return Some(Segment::new(&bytes[scan..found.start], self.stringify));
                }
                // zero-width match at the cut point: nothing more to split on
                Some(found) if found.start == found.end => break,
                // delimiter right at the cut point, skip it
                Some(found) => scan = found.end,
                None => break,
            }
        }

        self.position = bytes.len();
        if scan < bytes.len() {
            Some(Segment::new(&bytes[scan..], self.stringify))
        } else {
            trace!(len = bytes.len(), "Pattern cursor exhausted on trailing delimiters");
            None
        }
    }
}

impl<P: Pattern> FusedIterator for PatternCursor<'_, P> {}
