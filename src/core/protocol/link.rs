//! `Link` header parser.
//!
//! Character-level state machine for the `Link` header format used by
//! Memento servers (RFC 8288 with simplified escaping):
//!
//! ```text
//! <uri>; param=value; param="quoted value"; rel="token token2", <uri2>; ...
//! ```
//!
//! # Parsing Flow
//!
//! 1. **Start**: skip whitespace, expect `<`
//! 2. **Uri**: accumulate the target up to the first `;`
//! 3. **ParamStart**: `;` begins another parameter, `,` begins another link
//! 4. **LinkParam**: parameter name up to `=`
//! 5. **LinkValue**: quoted or bare value, then back to **ParamStart**
//!
//! `rel` values are split on spaces and lower-cased, since relation types are
//! case-insensitive and a single link may carry several (`rel="memento first"`).
//! Any other parameter keeps its distinct values in first-seen order.
//!
//! # Examples
//!
//! ```
//! use memento_rs::parse_link_header;
//!
//! let links = parse_link_header(
//!     r#"<http://a/>;rel="original", <http://a/2010>;rel="Memento LAST"; datetime="Tue, 20 Sep 2016 17:52:06 GMT""#,
//! ).unwrap();
//!
//! assert!(links.get("http://a/").unwrap().has_rel("original"));
//! let last = links.get("http://a/2010").unwrap();
//! assert!(last.has_rel("memento") && last.has_rel("last"));
//! assert_eq!(last.datetime(), Some("Tue, 20 Sep 2016 17:52:06 GMT"));
//! ```

use crate::core::error::{MementoError, Result};
use crate::core::types::LinkHeaderMap;
use std::fmt;

/// Parser state, reported in parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkParseState {
    Start,
    Uri,
    ParamStart,
    LinkParam,
    LinkValue,
}

impl fmt::Display for LinkParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkParseState::Start => "start",
            LinkParseState::Uri => "uri",
            LinkParseState::ParamStart => "paramstart",
            LinkParseState::LinkParam => "linkparam",
            LinkParseState::LinkValue => "linkvalue",
        };
        f.write_str(name)
    }
}

/// Read position over an immutable character buffer with one-step pushback.
struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(input: &str) -> Self {
        Cursor {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    #[inline]
    fn unread(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// Skip whitespace and return the next significant character.
    fn next_significant(&mut self) -> Option<char> {
        loop {
            match self.next() {
                Some(c) if c.is_whitespace() => continue,
                other => return other,
            }
        }
    }

    /// Position of the most recently read character.
    #[inline]
    fn last_position(&self) -> usize {
        self.pos.saturating_sub(1)
    }
}

struct LinkParser {
    cursor: Cursor,
    state: LinkParseState,
    links: LinkHeaderMap,
    uri: String,
    param: String,
}

impl LinkParser {
    fn new(input: &str) -> Self {
        LinkParser {
            cursor: Cursor::new(input),
            state: LinkParseState::Start,
            links: LinkHeaderMap::new(),
            uri: String::new(),
            param: String::new(),
        }
    }

    fn unexpected(&self, found: char) -> MementoError {
        MementoError::LinkParse {
            found,
            state: self.state,
            position: self.cursor.last_position(),
        }
    }

    fn eof(&self) -> MementoError {
        MementoError::LinkParseEof { state: self.state }
    }

    fn require(&mut self) -> Result<char> {
        self.cursor.next().ok_or_else(|| self.eof())
    }

    fn require_significant(&mut self) -> Result<char> {
        self.cursor.next_significant().ok_or_else(|| self.eof())
    }

    fn run(mut self) -> Result<LinkHeaderMap> {
        while !self.cursor.at_end() {
            match self.state {
                LinkParseState::Start => self.start()?,
                LinkParseState::Uri => self.uri()?,
                LinkParseState::ParamStart => {
                    if !self.param_start()? {
                        break;
                    }
                }
                LinkParseState::LinkParam => self.link_param()?,
                LinkParseState::LinkValue => self.link_value()?,
            }
        }

        match self.state {
            // A trailing comma leaves an empty list element, which is allowed.
            LinkParseState::Start | LinkParseState::ParamStart => Ok(self.links),
            _ => Err(self.eof()),
        }
    }

    fn start(&mut self) -> Result<()> {
        let c = match self.cursor.next_significant() {
            Some(c) => c,
            // Only whitespace after a comma.
            None => return Ok(()),
        };
        if c != '<' {
            return Err(self.unexpected(c));
        }
        self.state = LinkParseState::Uri;
        Ok(())
    }

    fn uri(&mut self) -> Result<()> {
        let mut raw = String::new();
        loop {
            let c = self.require()?;
            if c == ';' {
                break;
            }
            raw.push(c);
        }
        self.cursor.unread();

        let trimmed = raw.trim_end();
        let uri = match trimmed.strip_suffix('>') {
            Some(uri) => uri.trim(),
            None => {
                let found = trimmed.chars().last().unwrap_or(';');
                return Err(self.unexpected(found));
            }
        };
        self.uri = uri.to_string();
        self.links.entry_mut(uri);
        self.state = LinkParseState::ParamStart;
        Ok(())
    }

    /// Returns `false` once the input is exhausted between parameters.
    fn param_start(&mut self) -> Result<bool> {
        match self.cursor.next_significant() {
            None => Ok(false),
            Some(';') => {
                self.state = LinkParseState::LinkParam;
                Ok(true)
            }
            Some(',') => {
                self.state = LinkParseState::Start;
                Ok(true)
            }
            Some(c) => Err(self.unexpected(c)),
        }
    }

    fn link_param(&mut self) -> Result<()> {
        let mut c = self.require_significant()?;
        let mut name = String::new();
        while !c.is_whitespace() && c != '=' {
            name.push(c);
            c = self.require()?;
        }
        if c.is_whitespace() {
            c = self.require_significant()?;
        }
        if c != '=' {
            return Err(self.unexpected(c));
        }

        self.param = name.to_lowercase();
        if self.param != "rel" {
            let uri = self.uri.clone();
            self.links
                .entry_mut(&uri)
                .params
                .entry(self.param.clone())
                .or_default();
        }
        self.state = LinkParseState::LinkValue;
        Ok(())
    }

    fn link_value(&mut self) -> Result<()> {
        let first = self.require_significant()?;
        let mut value = String::new();

        if first == '"' {
            loop {
                let c = self.require()?;
                if c == '"' {
                    if value.ends_with('\\') {
                        value.pop();
                        value.push('"');
                        continue;
                    }
                    break;
                }
                value.push(c);
            }
        } else {
            let mut c = first;
            loop {
                if c.is_whitespace() || c == ',' || c == ';' {
                    self.cursor.unread();
                    break;
                }
                value.push(c);
                match self.cursor.next() {
                    Some(next) => c = next,
                    None => break,
                }
            }
        }

        let uri = self.uri.clone();
        let entry = self.links.entry_mut(&uri);
        if self.param == "rel" {
            entry.push_rel(&value);
        } else {
            entry.push_param(&self.param, value);
        }
        self.state = LinkParseState::ParamStart;
        Ok(())
    }
}

/// Parse a raw `Link` header value.
///
/// Empty or whitespace-only input yields an empty map. Malformed input fails
/// with [`MementoError::LinkParse`] or [`MementoError::LinkParseEof`].
pub fn parse_link_header(raw: &str) -> Result<LinkHeaderMap> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(LinkHeaderMap::new());
    }
    LinkParser::new(trimmed).run()
}

/// Parse an optional header value; an absent header is an empty map.
pub fn parse_optional_link_header(raw: Option<&str>) -> Result<LinkHeaderMap> {
    match raw {
        Some(raw) => parse_link_header(raw),
        None => Ok(LinkHeaderMap::new()),
    }
}
