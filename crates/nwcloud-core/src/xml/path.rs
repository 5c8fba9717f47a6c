//! Minimal structural path queries
//!
//! Grammar: `/step/step...` where a step is a name or `*`, optionally
//! followed by predicates:
//!
//! - `[@attr='value']` attribute equality
//! - `[child='value']` text of a direct child element
//! - `[text()='value']` own text
//!
//! Unprefixed step names match the element's local name, so `/beans/jndi-lookup`
//! finds `<jee:jndi-lookup>`. Prefixed step names match the qualified name.

use crate::errors::{invalid_path, Result};
use crate::xml::document::{XmlDocument, XmlElement, XmlNode};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Local(String),
    Qualified(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Attribute { name: String, value: String },
    Child { name: String, value: String },
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    name: NameTest,
    predicates: Vec<Predicate>,
}

impl Step {
    fn matches(&self, el: &XmlElement) -> bool {
        let name_ok = match &self.name {
            NameTest::Any => true,
            NameTest::Local(name) => el.local_name() == name,
            NameTest::Qualified(name) => el.name() == name,
        };
        name_ok
            && self.predicates.iter().all(|p| match p {
                Predicate::Attribute { name, value } => el.attribute(name) == Some(value.as_str()),
                Predicate::Child { name, value } => el
                    .child_elements()
                    .any(|c| c.local_name() == name && c.text() == *value),
                Predicate::Text(value) => el.text() == *value,
            })
    }
}

/// A parsed path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlPath {
    steps: Vec<Step>,
}

impl XmlPath {
    pub fn parse(expr: &str) -> Result<Self> {
        let body = expr
            .strip_prefix('/')
            .ok_or_else(|| invalid_path(expr, "must start with '/'"))?;
        let steps = split_steps(expr, body)?
            .into_iter()
            .map(|raw| parse_step(expr, raw))
            .collect::<Result<Vec<_>>>()?;
        if steps.is_empty() {
            return Err(invalid_path(expr, "no steps"));
        }
        Ok(Self { steps })
    }

    /// True if no step carries a predicate and no step is `*`
    pub fn is_plain(&self) -> bool {
        self.steps
            .iter()
            .all(|s| s.predicates.is_empty() && s.name != NameTest::Any)
    }

    /// Step names, for plain paths
    pub(crate) fn plain_names(&self) -> Vec<String> {
        self.steps
            .iter()
            .filter_map(|s| match &s.name {
                NameTest::Local(n) | NameTest::Qualified(n) => Some(n.clone()),
                NameTest::Any => None,
            })
            .collect()
    }

    /// Locations of every matching element, as child-index chains from the root
    pub(crate) fn locate(&self, root: &XmlElement) -> Vec<Vec<usize>> {
        let mut current: Vec<Vec<usize>> = Vec::new();
        if self.steps[0].matches(root) {
            current.push(Vec::new());
        }
        for step in &self.steps[1..] {
            let mut next = Vec::new();
            for location in &current {
                let Some(parent) = element_at(root, location) else {
                    continue;
                };
                for (index, node) in parent.children().iter().enumerate() {
                    if let XmlNode::Element(child) = node {
                        if step.matches(child) {
                            let mut loc = location.clone();
                            loc.push(index);
                            next.push(loc);
                        }
                    }
                }
            }
            current = next;
        }
        current
    }
}

impl FromStr for XmlPath {
    type Err = crate::errors::ExError;

    fn from_str(s: &str) -> Result<Self> {
        XmlPath::parse(s)
    }
}

pub(crate) fn element_at<'a>(root: &'a XmlElement, location: &[usize]) -> Option<&'a XmlElement> {
    let mut current = root;
    for &index in location {
        current = current.children().get(index)?.as_element()?;
    }
    Some(current)
}

pub(crate) fn element_at_mut<'a>(
    root: &'a mut XmlElement,
    location: &[usize],
) -> Option<&'a mut XmlElement> {
    let mut current = root;
    for &index in location {
        current = current.children_mut().get_mut(index)?.as_element_mut()?;
    }
    Some(current)
}

/// Split on '/' outside brackets and quotes
fn split_steps<'a>(expr: &str, body: &'a str) -> Result<Vec<&'a str>> {
    let mut steps = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| invalid_path(expr, "unbalanced ']'"))?
            }
            (None, '/') if depth == 0 => {
                steps.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if quote.is_some() {
        return Err(invalid_path(expr, "unterminated quote"));
    }
    if depth != 0 {
        return Err(invalid_path(expr, "unbalanced '['"));
    }
    steps.push(&body[start..]);
    if steps.iter().any(|s| s.trim().is_empty()) {
        return Err(invalid_path(expr, "empty step"));
    }
    Ok(steps)
}

fn parse_step(expr: &str, raw: &str) -> Result<Step> {
    let (name, mut rest) = match raw.find('[') {
        Some(i) => (raw[..i].trim(), &raw[i..]),
        None => (raw.trim(), ""),
    };
    let name = match name {
        "*" => NameTest::Any,
        n if n.contains(':') => NameTest::Qualified(n.to_string()),
        n if is_name(n) => NameTest::Local(n.to_string()),
        n => return Err(invalid_path(expr, &format!("bad step name '{}'", n))),
    };

    let mut predicates = Vec::new();
    while !rest.is_empty() {
        let inner_end = closing_bracket(rest).ok_or_else(|| invalid_path(expr, "unbalanced '['"))?;
        predicates.push(parse_predicate(expr, &rest[1..inner_end])?);
        rest = rest[inner_end + 1..].trim_start();
        if !rest.is_empty() && !rest.starts_with('[') {
            return Err(invalid_path(expr, "unexpected text after predicate"));
        }
    }
    Ok(Step { name, predicates })
}

/// Index of the `]` closing the `[` at position 0
fn closing_bracket(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_predicate(expr: &str, inner: &str) -> Result<Predicate> {
    let (lhs, rhs) = inner
        .split_once('=')
        .ok_or_else(|| invalid_path(expr, "predicate must be an equality"))?;
    let lhs = lhs.trim();
    let rhs = rhs.trim();
    let value = unquote(rhs).ok_or_else(|| invalid_path(expr, "predicate value must be quoted"))?;

    if let Some(attr) = lhs.strip_prefix('@') {
        if !is_name(attr) {
            return Err(invalid_path(expr, "bad attribute name"));
        }
        return Ok(Predicate::Attribute {
            name: attr.to_string(),
            value,
        });
    }
    if lhs == "text()" {
        return Ok(Predicate::Text(value));
    }
    if is_name(lhs) {
        return Ok(Predicate::Child {
            name: lhs.to_string(),
            value,
        });
    }
    Err(invalid_path(expr, &format!("unsupported predicate '{}'", inner)))
}

fn unquote(s: &str) -> Option<String> {
    let first = s.chars().next()?;
    if (first == '\'' || first == '"') && s.len() >= 2 && s.ends_with(first) {
        Some(s[1..s.len() - 1].to_string())
    } else {
        None
    }
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

impl XmlDocument {
    /// First element matching `path`
    pub fn find_first(&self, path: &str) -> Result<Option<&XmlElement>> {
        let path = XmlPath::parse(path)?;
        Ok(path
            .locate(self.root())
            .first()
            .and_then(|loc| element_at(self.root(), loc)))
    }

    /// Every element matching `path`, in document order
    pub fn find_all(&self, path: &str) -> Result<Vec<&XmlElement>> {
        let path = XmlPath::parse(path)?;
        Ok(path
            .locate(self.root())
            .iter()
            .filter_map(|loc| element_at(self.root(), loc))
            .collect())
    }

    /// Mutable access to the first element matching `path`
    pub fn find_first_mut(&mut self, path: &str) -> Result<Option<&mut XmlElement>> {
        let path = XmlPath::parse(path)?;
        let location = path.locate(self.root()).into_iter().next();
        Ok(match location {
            Some(loc) => element_at_mut(self.root_mut(), &loc),
            None => None,
        })
    }
}
