// src/testing/selector.rs
//! CSS selector subset used by acceptance tests: type, universal, `#id`,
//! `.class`, `[attr]` and `[attr=value]` compounds joined by descendant or
//! child combinators, in comma-separated lists.

use crate::testing::dom::{Document, Element, NodeId};
use crate::testing::error::{BrowserError, BrowserResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, element: &Element) -> bool {
        if self.tag.as_deref().is_some_and(|tag| tag != "*" && tag != element.tag_name) {
            return false;
        }
        if self.id.as_deref().is_some_and(|id| element.attr("id") != Some(id)) {
            return false;
        }
        if !self.classes.iter().all(|c| element.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|(name, expected)| match (element.attr(name), expected) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
        })
    }
}

/// Rightmost compound last; each compound after the first carries the
/// combinator linking it to its predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(source: &str) -> BrowserResult<Self> {
        let unsupported = |reason: &str| BrowserError::UnsupportedSelector {
            selector: source.to_string(),
            reason: reason.to_string(),
        };

        let chars: Vec<char> = source.chars().collect();
        let mut parser = Parser { chars: &chars, pos: 0 };
        let mut alternatives = Vec::new();

        loop {
            alternatives.push(parser.complex().map_err(|reason| unsupported(&reason))?);
            parser.skip_whitespace();
            match parser.peek() {
                None => break,
                Some(',') => parser.pos += 1,
                Some(other) => return Err(unsupported(&format!("unexpected `{other}`"))),
            }
        }

        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, dom: &Document, node: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|complex| match_from(dom, node, &complex.parts))
    }

    /// Every matching element in document order.
    pub fn query_all(&self, dom: &Document) -> Vec<NodeId> {
        dom.descendant_elements(dom.root())
            .into_iter()
            .filter(|node| self.matches(dom, *node))
            .collect()
    }
}

fn match_from(dom: &Document, node: NodeId, parts: &[(Combinator, Compound)]) -> bool {
    let Some(((combinator, compound), rest)) = parts.split_last() else {
        return true;
    };
    if !dom.element(node).is_some_and(|e| compound.matches(e)) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }

    let mut ancestor = dom.parent(node);
    while let Some(candidate) = ancestor {
        if dom.element(candidate).is_none() {
            return false;
        }
        if match_from(dom, candidate, rest) {
            return true;
        }
        if *combinator == Combinator::Child {
            return false;
        }
        ancestor = dom.parent(candidate);
    }
    false
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn ident(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn complex(&mut self) -> Result<Complex, String> {
        self.skip_whitespace();
        let mut parts = vec![(Combinator::Descendant, self.compound()?)];

        loop {
            let spaced = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if spaced => Combinator::Descendant,
                Some(other) => return Err(format!("unexpected `{other}`")),
            };
            parts.push((combinator, self.compound()?));
        }

        Ok(Complex { parts })
    }

    fn compound(&mut self) -> Result<Compound, String> {
        let mut compound = Compound::default();

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                compound.tag = Some("*".into());
            }
            Some(c) if c.is_ascii_alphabetic() => {
                compound.tag = Some(self.ident().to_ascii_lowercase());
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    let id = self.ident();
                    if id.is_empty() {
                        return Err("empty id".into());
                    }
                    compound.id = Some(id);
                }
                Some('.') => {
                    self.pos += 1;
                    let class = self.ident();
                    if class.is_empty() {
                        return Err("empty class".into());
                    }
                    compound.classes.push(class);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.attribute()?);
                }
                Some(c) if c == ':' || c == '~' || c == '+' => {
                    return Err(format!("`{c}` is not supported"));
                }
                _ => break,
            }
        }

        if compound.is_empty() {
            return Err(match self.peek() {
                Some(c) => format!("unexpected `{c}`"),
                None => "expected a selector".into(),
            });
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<(String, Option<String>), String> {
        self.skip_whitespace();
        let name = self.ident().to_ascii_lowercase();
        if name.is_empty() {
            return Err("empty attribute name".into());
        }
        self.skip_whitespace();

        let value = match self.peek() {
            Some(']') => None,
            Some('=') => {
                self.pos += 1;
                self.skip_whitespace();
                Some(self.attribute_value()?)
            }
            _ => return Err("only `[attr]` and `[attr=value]` are supported".into()),
        };

        self.skip_whitespace();
        if self.peek() != Some(']') {
            return Err("unclosed attribute selector".into());
        }
        self.pos += 1;
        Ok((name, value))
    }

    fn attribute_value(&mut self) -> Result<String, String> {
        match self.peek() {
            Some(quote) if quote == '"' || quote == '\'' => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err("unclosed quoted value".into());
                }
                let value = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                Ok(value)
            }
            _ => {
                let value = self.ident();
                if value.is_empty() {
                    return Err("empty attribute value".into());
                }
                Ok(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<main id="content">
<section data-test-404-page class="card wide">
<h1 data-test-404-header>Page not found</h1>
<form data-test-404-search-form><input name="q" type="text"></form>
</section>
<ul><li class="row"><a href="/a">a</a></li><li class="row"><a href="/b">b</a></li></ul>
</main>"#;

    fn select(selector: &str) -> Vec<NodeId> {
        let dom = Document::parse(PAGE).unwrap();
        Selector::parse(selector).unwrap().query_all(&dom)
    }

    #[test]
    fn matches_attribute_markers() {
        assert_eq!(select("[data-test-404-header]").len(), 1);
        assert_eq!(select("h1[data-test-404-header]").len(), 1);
        assert_eq!(select("[data-test-missing]").len(), 0);
        assert_eq!(select("input[name=q]").len(), 1);
        assert_eq!(select("input[name='q'][type=\"text\"]").len(), 1);
        assert_eq!(select("input[name=other]").len(), 0);
    }

    #[test]
    fn matches_ids_classes_and_combinators() {
        assert_eq!(select("#content .row").len(), 2);
        assert_eq!(select("section.card.wide h1").len(), 1);
        assert_eq!(select("main > ul > li > a").len(), 2);
        assert_eq!(select("main > a").len(), 0);
        assert_eq!(select("[data-test-404-search-form] input").len(), 1);
        assert_eq!(select("h1, a").len(), 3);
        assert_eq!(select("*").len(), 10);
    }

    #[test]
    fn rejects_unsupported_syntax() {
        for source in ["a:hover", "", "[data-x", "a ~ b", "[x^=y]", "h1,"] {
            assert!(
                matches!(
                    Selector::parse(source),
                    Err(BrowserError::UnsupportedSelector { .. })
                ),
                "{source} should be rejected"
            );
        }
    }
}
