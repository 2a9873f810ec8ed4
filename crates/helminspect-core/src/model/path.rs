//! Path language for addressing nodes in a resource tree.
//!
//! A path is an ordered list of segments, each a map key or a sequence
//! index. The canonical string form is dotted for map descent with a
//! bracketed integer suffix for sequence descent:
//!
//! ```text
//! spec.template.spec.volumes[0].configMap.defaultMode
//! ```
//!
//! Two refinements keep `parse(render(p)) == p`:
//!
//! - Everything after `metadata.annotations.` is a single annotation key,
//!   so keys like `checksum/config` or `app.kubernetes.io/name` stay whole.
//!   An annotation key that is empty or has segments below it renders
//!   quoted instead: `metadata.annotations["a.b"].c`.
//! - Any other key containing `.`, `[` or `]` renders as a quoted bracket
//!   segment: `data["app.properties"]`.
//!
//! Parsing never fails. A bracket that holds neither an integer nor a
//! quoted key makes the whole dotted token a literal map key, which simply
//! resolves to nothing on ordinary trees.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// One step of a [`Path`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// Descend into a map by key
    Key(String),
    /// Descend into a sequence by position
    Index(usize),
}

impl PathSegment {
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::Key(key.into())
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(k) => Some(k),
            PathSegment::Index(_) => None,
        }
    }
}

/// Structured path into a resource tree
///
/// The empty path addresses the root and renders as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The root path
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path of the map entry `key` below this path
    pub fn child_key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    /// Path of the sequence element `index` below this path
    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Parse the string form of a path. Total: every input yields a path.
    pub fn parse(input: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = input;

        while !rest.is_empty() {
            if !segments.is_empty() && under_annotations(&segments) {
                segments.push(PathSegment::Key(rest.to_string()));
                break;
            }

            let (token, remainder) = split_token(rest);
            if !token.is_empty() {
                match parse_token(token) {
                    Some(parsed) => segments.extend(parsed),
                    None => segments.push(PathSegment::Key(token.to_string())),
                }
            }
            rest = remainder;
        }

        Self { segments }
    }

    /// Render the canonical string form
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Index(index) => {
                    out.push('[');
                    out.push_str(&index.to_string());
                    out.push(']');
                }
                PathSegment::Key(key)
                    if under_annotations(&self.segments[..i])
                        && !key.is_empty()
                        && i + 1 == self.segments.len() =>
                {
                    out.push('.');
                    out.push_str(key);
                }
                PathSegment::Key(key)
                    if needs_quoting(key) || under_annotations(&self.segments[..i]) =>
                {
                    push_quoted(&mut out, key);
                }
                PathSegment::Key(key) => {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(key);
                }
            }
        }
        out
    }
}

/// True when the segments so far end in `metadata.annotations`.
fn under_annotations(segments: &[PathSegment]) -> bool {
    matches!(
        segments,
        [.., PathSegment::Key(parent), PathSegment::Key(child)]
            if parent == "metadata" && child == "annotations"
    )
}

fn push_quoted(out: &mut String, key: &str) {
    out.push_str("[\"");
    for c in key.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push_str("\"]");
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty() || key.contains(['.', '[', ']', '"'])
}

/// Split off the next dotted token, ignoring dots inside brackets and quotes.
fn split_token(input: &str) -> (&str, &str) {
    let mut in_bracket = false;
    let mut in_quote = false;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quote => escaped = true,
            '"' if in_bracket => in_quote = !in_quote,
            '[' if !in_quote => in_bracket = true,
            ']' if !in_quote => in_bracket = false,
            '.' if !in_bracket && !in_quote => return (&input[..i], &input[i + 1..]),
            _ => {}
        }
    }
    (input, "")
}

/// Parse `name[0]["quoted.key"][1]`; `None` if any bracket group is malformed.
fn parse_token(token: &str) -> Option<Vec<PathSegment>> {
    let (name, mut groups) = match token.find('[') {
        Some(pos) => (&token[..pos], &token[pos..]),
        None => (token, ""),
    };

    let mut segments = Vec::new();
    if !name.is_empty() {
        segments.push(PathSegment::Key(name.to_string()));
    }

    while !groups.is_empty() {
        let inner = groups.strip_prefix('[')?;
        if let Some(quoted) = inner.strip_prefix('"') {
            let mut key = String::new();
            let mut chars = quoted.char_indices();
            let end = loop {
                match chars.next()? {
                    (_, '\\') => key.push(chars.next()?.1),
                    (j, '"') => break j + 1,
                    (_, c) => key.push(c),
                }
            };
            groups = quoted[end..].strip_prefix(']')?;
            segments.push(PathSegment::Key(key));
        } else {
            let close = inner.find(']')?;
            let index = inner[..close].parse::<usize>().ok()?;
            segments.push(PathSegment::Index(index));
            groups = &inner[close + 1..];
        }
    }

    Some(segments)
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for Path {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path::parse(s))
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Path::parse(s)
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Path::parse(&s)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.render()
    }
}
