#![forbid(unsafe_code)]

//! Owner of the line fragments produced by word wrapping.
//!
//! A [`WrapResult`] never copies text. Each fragment is a byte range into the
//! caller's buffer, and the result borrows that buffer for its whole lifetime,
//! so fragments cannot outlive the input. The only thing the result owns is
//! its array of ranges.
//!
//! # Capacity contract
//!
//! The range array is allocated once, before breaking, with room for
//! `2 * text.len()` fragments (see [`line_capacity_for`]). Every non-blank
//! fragment covers at least one byte and fragments never overlap, and every
//! blank fragment consumes a newline or at least one indentation byte, so the
//! breaker can never need more. Empty input allocates nothing.

use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Index, Range};

use crate::font::Font;
use crate::wrap::break_lines;

/// Number of fragment slots reserved for a text of `text_len` bytes.
#[inline]
#[must_use]
pub const fn line_capacity_for(text_len: usize) -> usize {
    text_len.saturating_mul(2)
}

/// Wrapped lines of a text, in top-to-bottom order.
///
/// Move-only: the fragment array has exactly one owner. [`WrapResult::take`]
/// transfers it and leaves an empty result behind.
pub struct WrapResult<'a> {
    text: &'a [u8],
    lines: Vec<Range<usize>>,
    max_width: u32,
}

impl<'a> WrapResult<'a> {
    /// Wrap `text` so that each line fits in `max_width` pixels.
    ///
    /// See [`crate::wrap`] for the breaking rules.
    #[must_use]
    pub fn new<F: Font + ?Sized>(font: &F, text: &'a [u8], max_width: u32) -> Self {
        if text.is_empty() {
            return Self::empty();
        }

        let mut lines = Vec::with_capacity(line_capacity_for(text.len()));
        let widest = break_lines(font, text, max_width, &mut lines);
        debug_assert!(lines.len() <= line_capacity_for(text.len()));

        let max_width_seen = u32::try_from(widest).unwrap_or(0);
        tracing::trace!(
            bytes = text.len(),
            lines = lines.len(),
            max_width = max_width_seen,
            budget = max_width,
            "wrapped text"
        );

        Self {
            text,
            lines,
            max_width: max_width_seen,
        }
    }

    /// A result with no lines and no allocation.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            text: &[],
            lines: Vec::new(),
            max_width: 0,
        }
    }

    /// Number of lines.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Widest line, in pixels.
    #[inline]
    #[must_use]
    pub const fn max_width(&self) -> u32 {
        self.max_width
    }

    /// Fragment slots currently allocated.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lines.capacity()
    }

    /// The wrapped input.
    #[inline]
    #[must_use]
    pub const fn text(&self) -> &'a [u8] {
        self.text
    }

    /// Line `index`, borrowed from the input.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&'a [u8]> {
        let text = self.text;
        self.lines.get(index).map(|range| &text[range.clone()])
    }

    /// Byte ranges of the lines within [`WrapResult::text`].
    ///
    /// A blank line is an empty range at the offset where it was produced.
    #[inline]
    #[must_use]
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.lines
    }

    /// Iterate over the lines.
    #[must_use]
    pub fn lines(&self) -> Lines<'_, 'a> {
        Lines {
            text: self.text,
            ranges: self.lines.iter(),
        }
    }

    /// Move the lines out, leaving `self` empty.
    #[must_use]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Give up the borrow on the text and keep only the ranges.
    #[must_use]
    pub fn into_ranges(self) -> Vec<Range<usize>> {
        self.lines
    }
}

impl Default for WrapResult<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for WrapResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrapResult")
            .field("max_width", &self.max_width)
            .field(
                "lines",
                &self
                    .lines()
                    .map(String::from_utf8_lossy)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Index<usize> for WrapResult<'_> {
    type Output = [u8];

    fn index(&self, index: usize) -> &[u8] {
        &self.text[self.lines[index].clone()]
    }
}

impl<'r, 'a> IntoIterator for &'r WrapResult<'a> {
    type Item = &'a [u8];
    type IntoIter = Lines<'r, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines()
    }
}

/// Iterator over the lines of a [`WrapResult`].
#[derive(Debug, Clone)]
pub struct Lines<'r, 'a> {
    text: &'a [u8],
    ranges: std::slice::Iter<'r, Range<usize>>,
}

impl<'a> Iterator for Lines<'_, 'a> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        self.ranges.next().map(|range| &text[range.clone()])
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ranges.size_hint()
    }
}

impl DoubleEndedIterator for Lines<'_, '_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let text = self.text;
        self.ranges.next_back().map(|range| &text[range.clone()])
    }
}

impl ExactSizeIterator for Lines<'_, '_> {}

impl FusedIterator for Lines<'_, '_> {}
