//! Anchored patterns and their capture groups.
//!
//! Every [`Pattern`] only ever matches at the very start of its input: the
//! source is wrapped as `^(?:...)` when compiled.
//!
//! The `regex` crate has no look-around. A pattern that needs to peek past
//! the end of what it consumes ends with a group named `ahead`
//! ([`LOOKAHEAD_GROUP`]); the match is then cut at the start of that group,
//! so whatever the group matched stays in the input for the next rule.

use std::ops::Range;

use regex::Regex;

use super::error::ParseError;

/// Name of the trailing group that is matched but not consumed.
pub const LOOKAHEAD_GROUP: &str = "ahead";

#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    source: String,
    ahead: Option<usize>,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{source})"))?;
        let ahead = regex
            .capture_names()
            .position(|name| name == Some(LOOKAHEAD_GROUP));
        Ok(Self {
            regex,
            source: source.to_string(),
            ahead,
        })
    }

    /// The pattern as written, without the anchoring wrapper.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of groups, including group 0.
    pub fn captures_len(&self) -> usize {
        self.regex.captures_len()
    }

    /// Matches at the start of `input`, or not at all.
    pub fn match_start<'s>(&self, input: &'s str) -> Option<Captures<'s>> {
        let caps = self.regex.captures(input)?;
        let mut groups: Vec<Option<Range<usize>>> =
            caps.iter().map(|m| m.map(|m| m.range())).collect();

        let full_end = caps.get(0).map_or(0, |m| m.end());
        let end = self
            .ahead
            .and_then(|index| caps.get(index))
            .map_or(full_end, |m| m.start());
        groups[0] = Some(0..end);

        Some(Captures { input, groups })
    }
}

/// The groups of one successful match, as byte ranges into the matched input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures<'s> {
    input: &'s str,
    groups: Vec<Option<Range<usize>>>,
}

impl<'s> Captures<'s> {
    /// Builds captures by hand, for rules that match without a regex.
    ///
    /// `groups[0]` is the consumed prefix of `input`; if it is missing the
    /// match is treated as consuming nothing. Returns `None` if `groups[0]`
    /// does not start at 0, or if any group is reversed, runs past `input` or
    /// splits a character.
    pub fn new(input: &'s str, groups: Vec<Option<Range<usize>>>) -> Option<Self> {
        let prefix_ok = groups
            .first()
            .and_then(|group| group.as_ref())
            .is_none_or(|group| group.start == 0);
        let ranges_ok = groups
            .iter()
            .flatten()
            .all(|range| input.get(range.clone()).is_some());
        (prefix_ok && ranges_ok).then_some(Self { input, groups })
    }

    /// The input the match was run against.
    pub fn input(&self) -> &'s str {
        self.input
    }

    /// Bytes consumed by the match.
    pub fn end(&self) -> usize {
        self.groups
            .first()
            .and_then(|group| group.as_ref())
            .map_or(0, |group| group.end)
    }

    /// The consumed text.
    pub fn as_str(&self) -> &'s str {
        &self.input[..self.end()]
    }

    /// Number of groups, including group 0.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Range of `group`, if it took part in the match.
    pub fn range(&self, group: usize) -> Option<Range<usize>> {
        self.groups.get(group).cloned().flatten()
    }

    /// Text of `group`, if it took part in the match.
    pub fn get(&self, group: usize) -> Option<&'s str> {
        self.range(group).map(|range| &self.input[range])
    }

    /// Like [`Captures::range`], but a missing group is an error.
    pub fn span(&self, group: usize) -> Result<Range<usize>, ParseError> {
        self.range(group).ok_or_else(|| ParseError::MissingGroup {
            group,
            matched: self.as_str().to_string(),
        })
    }

    /// Like [`Captures::get`], but a missing group is an error.
    pub fn group(&self, group: usize) -> Result<&'s str, ParseError> {
        self.span(group).map(|range| &self.input[range])
    }
}
