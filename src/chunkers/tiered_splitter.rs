//! Tiered recursive splitting: paragraphs, then sentences, then words.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use super::base::char_len;
use crate::types::{ChunkParams, OverlapMode, Segment};

lazy_static! {
    /// Sentence-ending punctuation followed by whitespace.
    static ref SENTENCE_BOUNDARY: Regex = Regex::new(r"[.!?]\s+").unwrap();
}

/// Granularity used to divide text into units.
///
/// Each tier accumulates its units into chunks the same way and differs only
/// in how units are found, how they are joined back together, how much of a
/// flushed chunk is carried into the next one, and which tier takes over when
/// a single unit is larger than the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Blank-line separated blocks
    Paragraph,
    /// Text ending in `.`, `!` or `?` followed by whitespace
    Sentence,
    /// Whitespace separated tokens
    Word,
}

impl Tier {
    /// Get the name of this tier.
    pub fn name(self) -> &'static str {
        match self {
            Tier::Paragraph => "paragraph",
            Tier::Sentence => "sentence",
            Tier::Word => "word",
        }
    }

    /// String used to join units back into chunk text.
    pub fn separator(self) -> &'static str {
        match self {
            Tier::Paragraph => "\n\n",
            Tier::Sentence | Tier::Word => " ",
        }
    }

    /// Tier that splits a unit too large for this one.
    ///
    /// Words have no finer tier: an oversized word becomes a chunk of its own.
    pub fn fallback(self) -> Option<Tier> {
        match self {
            Tier::Paragraph => Some(Tier::Sentence),
            Tier::Sentence => Some(Tier::Word),
            Tier::Word => None,
        }
    }

    /// Divide `text` into this tier's units, in order. Units are never empty.
    pub fn units(self, text: &str) -> Vec<&str> {
        match self {
            Tier::Paragraph => text
                .split("\n\n")
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect(),
            Tier::Sentence => split_sentences(text),
            Tier::Word => text.split_whitespace().collect(),
        }
    }

    /// Number of trailing units of a flushed buffer that seed the next one.
    fn carry(self, buffer: &[&str], params: &ChunkParams) -> usize {
        match (params.overlap_mode, self) {
            (OverlapMode::SlidingWindow, _) | (OverlapMode::Tiered, Tier::Word) => {
                window_carry(buffer, self.separator(), params.overlap_budget)
            }
            (OverlapMode::Tiered, Tier::Paragraph) => last_unit_carry(buffer, params.overlap_budget),
            (OverlapMode::Tiered, Tier::Sentence) => {
                trailing_pair_carry(buffer, self.separator(), params.overlap_budget)
            }
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Split `text` at `tier`, falling back to finer tiers for oversized units.
///
/// Segments come back in strict left-to-right order; the output of a fallback
/// is spliced in at the position of the unit it replaced.
///
/// Only the fresh text of a segment is held to `max_chunk_size`. Carried
/// overlap comes on top, so a segment may exceed the ceiling by less than
/// `overlap_budget` plus one separator; a lone oversized word may exceed it
/// by any amount.
pub fn split_tier(tier: Tier, text: &str, params: &ChunkParams) -> Vec<Segment> {
    let units = tier.units(text);

    accumulate(
        &units,
        tier.separator(),
        params.max_chunk_size,
        |buffer| tier.carry(buffer, params),
        |unit| match tier.fallback() {
            Some(finer) => {
                trace!(%tier, %finer, chars = char_len(unit), "Unit over ceiling, splitting finer");
                split_tier(finer, unit, params)
            }
            None => vec![Segment::new(unit)],
        },
    )
}

/// Pack `units` into segments no longer than `max_size` characters.
///
/// `carry` decides how many trailing units of a flushed buffer seed the next
/// one. `fallback` splits a unit that alone exceeds `max_size`; the buffer is
/// flushed before it and starts empty after it.
fn accumulate<'a, C, F>(
    units: &[&'a str],
    separator: &str,
    max_size: usize,
    carry: C,
    fallback: F,
) -> Vec<Segment>
where
    C: Fn(&[&'a str]) -> usize,
    F: Fn(&'a str) -> Vec<Segment>,
{
    let separator_len = char_len(separator);
    let mut segments = Vec::new();
    let mut buffer = Buffer::new(separator);

    for &unit in units {
        let unit_len = char_len(unit);

        if unit_len > max_size {
            if let Some(segment) = buffer.to_segment() {
                segments.push(segment);
            }
            buffer.clear();
            segments.extend(fallback(unit));
        } else if !buffer.is_empty() && buffer.len + unit_len + separator_len > max_size {
            let keep = carry(buffer.units.as_slice());
            if let Some(segment) = buffer.to_segment() {
                segments.push(segment);
            }
            buffer.reseed(keep);
            buffer.push(unit, unit_len);
        } else {
            buffer.push(unit, unit_len);
        }
    }

    if let Some(segment) = buffer.to_segment() {
        segments.push(segment);
    }

    segments
}

/// In-progress chunk: units plus their accumulated length.
///
/// `len` counts every unit's characters plus one separator per unit.
struct Buffer<'a, 's> {
    units: Vec<&'a str>,
    len: usize,
    carried: usize,
    separator: &'s str,
    separator_len: usize,
}

impl<'a, 's> Buffer<'a, 's> {
    fn new(separator: &'s str) -> Self {
        Self {
            units: Vec::new(),
            len: 0,
            carried: 0,
            separator,
            separator_len: char_len(separator),
        }
    }

    fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn push(&mut self, unit: &'a str, unit_len: usize) {
        self.units.push(unit);
        self.len += unit_len + self.separator_len;
    }

    /// Render the buffer as a segment without clearing it.
    fn to_segment(&self) -> Option<Segment> {
        if self.units.is_empty() {
            return None;
        }

        let overlap_len = self.units[..self.carried]
            .iter()
            .map(|u| u.len() + self.separator.len())
            .sum();

        Some(Segment::with_overlap(self.units.join(self.separator), overlap_len))
    }

    /// Keep only the last `keep` units, marking them as carried overlap.
    fn reseed(&mut self, keep: usize) {
        let keep = keep.min(self.units.len());
        self.units.drain(..self.units.len() - keep);
        self.len = self
            .units
            .iter()
            .map(|u| char_len(u) + self.separator_len)
            .sum();
        self.carried = self.units.len();
    }

    fn clear(&mut self) {
        self.units.clear();
        self.len = 0;
        self.carried = 0;
    }
}

/// Split text after `.`, `!` or `?` followed by whitespace; the whitespace is dropped.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // Punctuation is ASCII, so the sentence ends one byte into the match.
        let end = boundary.start() + 1;
        if end > start {
            sentences.push(&text[start..end]);
        }
        start = boundary.end();
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences.retain(|s| !s.is_empty());
    sentences
}

/// Carry the last unit when it is shorter than the budget.
fn last_unit_carry(buffer: &[&str], budget: usize) -> usize {
    match buffer.last() {
        Some(last) if char_len(last) < budget => 1,
        _ => 0,
    }
}

/// Carry the last one or two units when, joined, they are shorter than the budget.
fn trailing_pair_carry(buffer: &[&str], separator: &str, budget: usize) -> usize {
    let take = buffer.len().min(2);
    if take == 0 {
        return 0;
    }

    let tail = buffer[buffer.len() - take..].join(separator);
    if char_len(&tail) < budget {
        take
    } else {
        0
    }
}

/// Carry trailing units greedily while their cost stays under the budget.
///
/// Each unit costs its length plus one separator; collection stops at the
/// first unit that would reach the budget.
fn window_carry(buffer: &[&str], separator: &str, budget: usize) -> usize {
    let separator_len = char_len(separator);
    let mut collected = 0;
    let mut count = 0;

    for unit in buffer.iter().rev() {
        let cost = char_len(unit) + separator_len;
        if collected + cost < budget {
            collected += cost;
            count += 1;
        } else {
            break;
        }
    }

    count
}
