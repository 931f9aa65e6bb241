// src/core/protocol/command.rs

//! Decodes a single protocol line into a `Command`.
//!
//! A line is either a bare verb (`ping`) or a verb followed by a colon and a
//! parameter section (`play: loop: true single clip: true`). The parameter
//! section is a sequence of `key: value` pairs where the key may contain spaces
//! and the value is a single token. Decoding never fails: anything that does not
//! look like a pair is skipped.

use std::collections::HashMap;

/// A decoded client request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Command {
    /// The verb, e.g. `transport info` or `goto`.
    pub verb: String,
    /// All parameters in the order they appeared, duplicates included.
    pub params: Vec<(String, String)>,
    /// Map view of `params`. The last occurrence of a key wins.
    pub map: HashMap<String, String>,
    /// The original line, kept for logging.
    pub raw: String,
}

impl Command {
    /// Parses a single, already trimmed protocol line.
    pub fn parse(line: &str) -> Self {
        let (verb, params) = match line.find(':') {
            // A leading colon does not start a parameter section.
            None | Some(0) => (line.to_string(), Vec::new()),
            Some(colon) => {
                let verb = line[..colon].trim().to_string();
                let section = line[colon + 1..].trim();
                (verb, parse_params(section))
            }
        };

        let map = params.iter().cloned().collect();
        Self {
            verb,
            params,
            map,
            raw: line.to_string(),
        }
    }

    /// Looks up a parameter through the map view.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }
}

/// Tokenizes a parameter section into ordered `(key, value)` pairs.
///
/// Scanning is greedy and left to right. After a pair is found, scanning resumes
/// one character past the end of its value, which skips the separating space.
fn parse_params(section: &str) -> Vec<(String, String)> {
    let chars: Vec<char> = section.chars().collect();
    let mut pairs = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        match match_pair_at(&chars, pos) {
            Some((key, value, end)) => {
                pairs.push((key, value));
                pos = end + 1;
            }
            None => pos += 1,
        }
    }
    pairs
}

/// Tries to match one `key: value` pair starting exactly at `start`.
///
/// The key runs up to the next colon and must be non-empty. The colon must be
/// followed by exactly one whitespace character. The value is the longest run of
/// non-whitespace characters that ends on a word boundary and is not directly
/// followed by a colon; shorter prefixes are tried when the longest run fails.
/// Returns the trimmed key, the value and the index one past the value.
fn match_pair_at(chars: &[char], start: usize) -> Option<(String, String, usize)> {
    let colon = start + chars[start..].iter().position(|&c| c == ':')?;
    if colon == start {
        return None;
    }
    if !chars.get(colon + 1)?.is_whitespace() {
        return None;
    }

    let value_start = colon + 2;
    if value_start >= chars.len() {
        return None;
    }
    let run_end = chars[value_start..]
        .iter()
        .position(|c| c.is_whitespace())
        .map_or(chars.len(), |p| value_start + p);

    let end = (value_start + 1..=run_end)
        .rev()
        .find(|&end| is_word_boundary(chars, end) && chars.get(end) != Some(&':'))?;

    let key: String = chars[start..colon].iter().collect();
    let value: String = chars[value_start..end].iter().collect();
    Some((key.trim().to_string(), value, end))
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A boundary sits between index `at - 1` and `at` when exactly one side is a word character.
fn is_word_boundary(chars: &[char], at: usize) -> bool {
    let before = at
        .checked_sub(1)
        .and_then(|i| chars.get(i))
        .is_some_and(|&c| is_word_char(c));
    let after = chars.get(at).is_some_and(|&c| is_word_char(c));
    before != after
}
