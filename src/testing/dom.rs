// src/testing/dom.rs
//! Minimal HTML document model for the simulated browser. Forgiving about
//! structure, strict only about unterminated markup.

use crate::testing::error::{BrowserError, BrowserResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub enum NodeKind {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Element {
    pub tag_name: String,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag_name.as_str())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attr(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element(element) = &mut self.nodes[id.0].kind {
            match element.attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => element.attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Element descendants of `id` in document order, `id` excluded.
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.element(node).is_some() {
                out.push(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub fn closest(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.tag_name(node) == Some(tag) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Text content with runs of whitespace collapsed to single spaces.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut raw = String::new();
        self.collect_text(id, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(element) if matches!(element.tag_name.as_str(), "script" | "style") => {}
            _ => {
                for child in self.children(id) {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    pub fn parse(html: &str) -> BrowserResult<Self> {
        let mut dom = Self::new();
        let mut stack = vec![dom.root()];
        let bytes = html.as_bytes();
        let mut i = 0usize;

        while i < bytes.len() {
            if starts_with_at(bytes, i, b"<!--") {
                let end = find_subslice(bytes, i + 4, b"-->")
                    .ok_or_else(|| BrowserError::HtmlParse("unclosed HTML comment".into()))?;
                i = end + 3;
                continue;
            }

            if bytes[i] == b'<' && starts_with_at(bytes, i, b"</") {
                let (tag, next) = parse_end_tag(html, i)?;
                i = next;
                if stack.iter().skip(1).any(|n| dom.tag_name(*n) == Some(tag.as_str())) {
                    while stack.len() > 1 {
                        let top = stack.pop();
                        if top.and_then(|n| dom.tag_name(n)) == Some(tag.as_str()) {
                            break;
                        }
                    }
                }
                continue;
            }

            if bytes[i] == b'<' && starts_with_at(bytes, i, b"<!") {
                let end = find_subslice(bytes, i, b">")
                    .ok_or_else(|| BrowserError::HtmlParse("unclosed declaration".into()))?;
                i = end + 1;
                continue;
            }

            if bytes[i] == b'<' && bytes.get(i + 1).is_some_and(|b| b.is_ascii_alphabetic()) {
                let (tag, attrs, self_closing, next) = parse_start_tag(html, i)?;
                i = next;
                let parent = *stack
                    .last()
                    .ok_or_else(|| BrowserError::HtmlParse("missing parent element".into()))?;
                let node = dom.push(
                    parent,
                    NodeKind::Element(Element {
                        tag_name: tag.clone(),
                        attrs,
                    }),
                );

                if matches!(tag.as_str(), "script" | "style" | "textarea") && !self_closing {
                    let close = find_end_tag(bytes, i, tag.as_bytes())
                        .ok_or_else(|| BrowserError::HtmlParse(format!("unclosed <{tag}>")))?;
                    if let Some(raw) = html.get(i..close).filter(|raw| !raw.is_empty()) {
                        let text = if tag == "textarea" {
                            decode_entities(raw)
                        } else {
                            raw.to_string()
                        };
                        dom.push(node, NodeKind::Text(text));
                    }
                    let (_, after_end) = parse_end_tag(html, close)?;
                    i = after_end;
                    continue;
                }

                if !self_closing && !is_void_tag(&tag) {
                    stack.push(node);
                }
                continue;
            }

            let end = find_subslice(bytes, i + 1, b"<").unwrap_or(bytes.len());
            if let Some(raw) = html.get(i..end) {
                let parent = *stack
                    .last()
                    .ok_or_else(|| BrowserError::HtmlParse("missing parent element".into()))?;
                dom.push(parent, NodeKind::Text(decode_entities(raw)));
            }
            i = end;
        }

        Ok(dom)
    }
}

fn parse_start_tag(
    html: &str,
    at: usize,
) -> BrowserResult<(String, Vec<(String, String)>, bool, usize)> {
    let bytes = html.as_bytes();
    let mut i = at + 1;
    let name_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = html[name_start..i].to_ascii_lowercase();
    let mut attrs: Vec<(String, String)> = Vec::new();

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i) {
            None => return Err(BrowserError::HtmlParse(format!("unclosed <{tag}> tag"))),
            Some(b'>') => return Ok((tag, attrs, false, i + 1)),
            Some(b'/') if bytes.get(i + 1) == Some(&b'>') => return Ok((tag, attrs, true, i + 2)),
            Some(b'/') => {
                i += 1;
                continue;
            }
            Some(_) => {}
        }

        let attr_start = i;
        while i < bytes.len() && is_attr_name_char(bytes[i]) {
            i += 1;
        }
        if i == attr_start {
            return Err(BrowserError::HtmlParse(format!(
                "unexpected character in <{tag}> at byte {i}"
            )));
        }
        let name = html[attr_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut value = String::new();
        if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    let close = find_subslice(bytes, i + 1, &[quote]).ok_or_else(|| {
                        BrowserError::HtmlParse(format!("unclosed attribute `{name}`"))
                    })?;
                    value = decode_entities(&html[i + 1..close]);
                    i = close + 1;
                }
                Some(_) => {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = decode_entities(&html[value_start..i]);
                }
                None => return Err(BrowserError::HtmlParse(format!("unclosed <{tag}> tag"))),
            }
        }

        if !attrs.iter().any(|(k, _)| *k == name) {
            attrs.push((name, value));
        }
    }
}

fn parse_end_tag(html: &str, at: usize) -> BrowserResult<(String, usize)> {
    let bytes = html.as_bytes();
    let end = find_subslice(bytes, at, b">")
        .ok_or_else(|| BrowserError::HtmlParse("unclosed end tag".into()))?;
    let tag = html[at + 2..end].trim().to_ascii_lowercase();
    Ok((tag, end + 1))
}

fn find_end_tag(bytes: &[u8], from: usize, tag: &[u8]) -> Option<usize> {
    let mut i = from;
    while let Some(pos) = find_subslice(bytes, i, b"</") {
        let name_start = pos + 2;
        let name_end = name_start + tag.len();
        if name_end <= bytes.len() && bytes[name_start..name_end].eq_ignore_ascii_case(tag) {
            return Some(pos);
        }
        i = pos + 2;
    }
    None
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').filter(|end| *end <= 10).and_then(|end| {
            let entity = &rest[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
                }
                _ if entity.starts_with('#') => {
                    entity[1..].parse::<u32>().ok().and_then(char::from_u32)
                }
                _ => None,
            };
            ch.map(|c| (c, end))
        });
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn is_attr_name_char(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'' | b'<')
}

fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn starts_with_at(bytes: &[u8], at: usize, needle: &[u8]) -> bool {
    at + needle.len() <= bytes.len() && &bytes[at..at + needle.len()] == needle
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(dom: &Document, tag: &str) -> NodeId {
        dom.descendant_elements(dom.root())
            .into_iter()
            .find(|n| dom.tag_name(*n) == Some(tag))
            .unwrap()
    }

    #[test]
    fn parses_nested_elements_and_attributes() {
        let dom = Document::parse(
            r#"<!DOCTYPE html><!-- c --><form action="/search" data-test-form><input name=q disabled><button>Go &amp; find</button></form>"#,
        )
        .unwrap();

        let form = first(&dom, "form");
        assert_eq!(dom.attr(form, "action"), Some("/search"));
        assert_eq!(dom.attr(form, "data-test-form"), Some(""));

        let input = first(&dom, "input");
        assert_eq!(dom.parent(input), Some(form));
        assert_eq!(dom.attr(input, "name"), Some("q"));
        assert!(dom.children(input).is_empty());

        let button = first(&dom, "button");
        assert_eq!(dom.text_content(button), "Go & find");
        assert_eq!(dom.closest(button, "form"), Some(form));
    }

    #[test]
    fn text_content_collapses_whitespace_and_skips_scripts() {
        let dom = Document::parse("<p>\n  Hello\n  <b>world</b> <script>var x = '<p>';</script></p>").unwrap();
        let p = first(&dom, "p");
        assert_eq!(dom.text_content(p), "Hello world");
    }

    #[test]
    fn numeric_entities_and_unknown_entities() {
        assert_eq!(decode_entities("&#39;a&#x41;&bogus;"), "'aA&bogus;");
        assert_eq!(decode_entities("a & b"), "a & b");
    }

    #[test]
    fn stray_end_tags_are_ignored() {
        let dom = Document::parse("<div><span>x</em></span></div><p>y</p>").unwrap();
        let p = first(&dom, "p");
        assert_eq!(dom.parent(p), Some(dom.root()));
    }

    #[test]
    fn unterminated_markup_is_an_error() {
        assert!(matches!(
            Document::parse("<div class=\"x"),
            Err(BrowserError::HtmlParse(_))
        ));
        assert!(matches!(
            Document::parse("<!-- open"),
            Err(BrowserError::HtmlParse(_))
        ));
    }
}
