//! Marker selectors.
//!
//! Markers are written in a small subset of CSS selector syntax:
//!
//! - selector lists: `.log-table, .week-table`
//! - descendant combinator: `tbody tr`
//! - compound parts: `td`, `*`, `#estimate-table`, `.row-total`, `[name]`,
//!   `[name="hours"]`, `[style*="vertical-align"]`, `:not(.total-row)`

use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

use super::{Document, Element, NodeId};
use crate::error::{Result, TallyError};

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

/// Compounds joined by descendant combinators; the last one is the subject.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    conditions: Vec<Condition>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Condition {
    Id(String),
    Class(String),
    HasAttr(String),
    AttrEquals(String, String),
    AttrContains(String, String),
    Not(Compound),
}

impl Selector {
    pub fn parse(source: &str) -> Result<Selector> {
        let alternatives = Parser::new(source).parse_list()?;
        Ok(Selector {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    /// The selector text this was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub(crate) fn matches_in(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex.matches_in(doc, node))
    }
}

impl FromStr for Selector {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self> {
        Selector::parse(s)
    }
}

impl Complex {
    fn matches_in(&self, doc: &Document, node: NodeId) -> bool {
        let Some((subject, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        match doc.get(node) {
            Some(element) if subject.matches(element) => {
                ancestors_match(ancestors, doc, node)
            }
            _ => false,
        }
    }
}

/// Match `compounds` right to left against the ancestors of `node`,
/// backtracking when a nearer ancestor leaves the rest unmatched.
fn ancestors_match(compounds: &[Compound], doc: &Document, node: NodeId) -> bool {
    let Some((nearest, rest)) = compounds.split_last() else {
        return true;
    };
    let mut current = doc.parent(node);
    while let Some(ancestor) = current {
        if doc.get(ancestor).is_some_and(|el| nearest.matches(el))
            && ancestors_match(rest, doc, ancestor)
        {
            return true;
        }
        current = doc.parent(ancestor);
    }
    false
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        // The document root is not an element.
        if element.tag.starts_with('#') {
            return false;
        }
        if let Some(tag) = &self.tag
            && *tag != element.tag
        {
            return false;
        }
        self.conditions.iter().all(|c| c.matches(element))
    }
}

impl Condition {
    fn matches(&self, element: &Element) -> bool {
        match self {
            Condition::Id(id) => element.id.as_deref() == Some(id.as_str()),
            Condition::Class(class) => element.has_class(class),
            Condition::HasAttr(name) => element.attribute(name).is_some(),
            Condition::AttrEquals(name, value) => {
                element.attribute(name).as_deref() == Some(value.as_str())
            }
            Condition::AttrContains(name, value) => {
                !value.is_empty()
                    && element
                        .attribute(name)
                        .is_some_and(|attr| attr.contains(value.as_str()))
            }
            Condition::Not(compound) => !compound.matches(element),
        }
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Parser<'a> {
        Parser {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn error(&self, message: impl Into<String>) -> TallyError {
        TallyError::Selector {
            selector: self.source.to_string(),
            message: message.into(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Skip whitespace, returning whether any was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.peek().is_some_and(char::is_whitespace) {
            self.chars.next();
            skipped = true;
        }
        skipped
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.chars.next() {
            Some((_, c)) if c == expected => Ok(()),
            Some((pos, c)) => Err(self.error(format!(
                "expected '{}' at {}, found '{}'",
                expected, pos, c
            ))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn parse_list(&mut self) -> Result<Vec<Complex>> {
        let mut alternatives = Vec::new();
        loop {
            self.skip_whitespace();
            alternatives.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.chars.next() {
                None => return Ok(alternatives),
                Some((_, ',')) => continue,
                Some((pos, c)) => {
                    return Err(self.error(format!("unexpected '{}' at {}", c, pos)));
                }
            }
        }
    }

    fn parse_complex(&mut self) -> Result<Complex> {
        let mut compounds = vec![self.parse_compound()?];
        loop {
            let had_whitespace = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some(_) if had_whitespace => compounds.push(self.parse_compound()?),
                Some(c) => return Err(self.error(format!("unsupported combinator '{}'", c))),
            }
        }
        Ok(Complex { compounds })
    }

    fn parse_compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();
        let mut universal = false;
        match self.peek() {
            Some('*') => {
                self.chars.next();
                universal = true;
            }
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.chars.next();
                    compound.conditions.push(Condition::Id(self.parse_ident()?));
                }
                Some('.') => {
                    self.chars.next();
                    compound.conditions.push(Condition::Class(self.parse_ident()?));
                }
                Some('[') => {
                    self.chars.next();
                    compound.conditions.push(self.parse_attribute()?);
                }
                Some(':') => {
                    self.chars.next();
                    compound.conditions.push(self.parse_not()?);
                }
                _ => break,
            }
        }

        if !universal && compound.tag.is_none() && compound.conditions.is_empty() {
            return Err(self.error("expected a selector"));
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> Result<String> {
        let mut ident = String::new();
        while let Some(c) = self.peek().filter(|&c| is_ident_char(c)) {
            ident.push(c);
            self.chars.next();
        }
        if ident.is_empty() {
            return Err(self.error("expected a name"));
        }
        Ok(ident)
    }

    fn parse_attribute(&mut self) -> Result<Condition> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        let condition = match self.chars.next() {
            Some((_, ']')) => return Ok(Condition::HasAttr(name)),
            Some((_, '=')) => Condition::AttrEquals(name, self.parse_attribute_value()?),
            Some((_, '*')) => {
                self.expect('=')?;
                Condition::AttrContains(name, self.parse_attribute_value()?)
            }
            Some((pos, c)) => {
                return Err(self.error(format!("unexpected '{}' at {} in attribute", c, pos)));
            }
            None => return Err(self.error("unterminated attribute selector")),
        };
        self.skip_whitespace();
        self.expect(']')?;
        Ok(condition)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        self.skip_whitespace();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.chars.next();
                let mut value = String::new();
                loop {
                    match self.chars.next() {
                        Some((_, c)) if c == quote => return Ok(value),
                        Some((_, c)) => value.push(c),
                        None => return Err(self.error("unterminated quoted value")),
                    }
                }
            }
            _ => self.parse_ident(),
        }
    }

    fn parse_not(&mut self) -> Result<Condition> {
        let name = self.parse_ident()?;
        if !name.eq_ignore_ascii_case("not") {
            return Err(self.error(format!("unsupported pseudo-class ':{}'", name)));
        }
        self.expect('(')?;
        self.skip_whitespace();
        let inner = self.parse_compound()?;
        self.skip_whitespace();
        self.expect(')')?;
        Ok(Condition::Not(inner))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
