//! Variable path parsing
//!
//! Grammar, informally: keys separated by `.`, each optionally followed by
//! an `[index]`. The scanner treats `.` and `[` alike as the end of a key, so
//! `a.9].b` reads the same as `a[9].b`; existing scenario content relies on
//! that leniency.

use std::fmt;
use std::str::FromStr;

use crate::config::valid_key;
use crate::error::{VariableError, VariableResult};
use crate::limits::Limits;

/// One step of a parsed path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A named key: an attribute, or the first child of a group
    Key(String),
    /// An explicit position inside the group named by the preceding key.
    /// Negative values count from the end.
    Index(i32),
}

/// A parsed variable path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The empty path addresses the whole tree
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path ends in an explicit index
    pub fn ends_with_index(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Index(_)))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => f.write_str(key)?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = VariableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s, &Limits::default())
    }
}

/// Split `name` into segments.
///
/// Fails with [`VariableError::InvalidName`] on an empty or malformed key,
/// a non-numeric index, an index above `limits.max_loop`, or anything other
/// than `.` or end of input after a `]`.
pub fn parse_path(name: &str, limits: &Limits) -> VariableResult<Path> {
    let mut segments = Vec::new();
    if name.is_empty() {
        return Ok(Path { segments });
    }

    let bytes = name.as_bytes();
    let len = bytes.len();
    let mut token_start = 0;
    let mut pos = 0;
    let mut open_bracket = false;

    while pos < len {
        match bytes[pos] {
            sep @ (b'.' | b'[') => {
                segments.push(Segment::Key(parse_key(name, &name[token_start..pos])?));
                token_start = pos + 1;
                open_bracket = sep == b'[';
            }
            b']' => {
                segments.push(Segment::Index(parse_index(
                    name,
                    &name[token_start..pos],
                    limits,
                )?));
                // Only '.' or the end of the path may follow; the '.' is consumed
                pos += 1;
                if pos < len && bytes[pos] != b'.' {
                    return Err(VariableError::invalid(name));
                }
                token_start = pos + 1;
                open_bracket = false;
            }
            _ => {}
        }
        pos += 1;
    }

    // A path not ending in ']' still has its last key pending, unless an
    // index was opened and never closed
    if token_start <= len {
        if open_bracket {
            return Err(VariableError::invalid(name));
        }
        segments.push(Segment::Key(parse_key(name, &name[token_start..])?));
    }

    Ok(Path { segments })
}

fn parse_key(name: &str, token: &str) -> VariableResult<String> {
    if valid_key(token) {
        Ok(token.to_string())
    } else {
        Err(VariableError::invalid(name))
    }
}

fn parse_index(name: &str, token: &str, limits: &Limits) -> VariableResult<i32> {
    match token.parse::<i32>() {
        Ok(index) if index <= limits.max_loop => Ok(index),
        _ => Err(VariableError::invalid(name)),
    }
}
