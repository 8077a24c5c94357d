// src/testing/browser.rs
use crate::application::ports::StoragePort;
use crate::presentation::http::state::WindowStorage;
use crate::testing::dom::{Document, NodeId};
use crate::testing::error::{BrowserError, BrowserResult};
use crate::testing::selector::Selector;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use std::sync::Arc;
use tower::ServiceExt;

const BLANK: &str = "about:blank";

enum Click {
    Follow(String),
    Submit(NodeId, NodeId),
    Nothing,
}

fn is_submit_button(tag: &str, kind: Option<&str>) -> bool {
    match tag {
        "button" => matches!(kind, None | Some("submit")),
        "input" => kind == Some("submit"),
        _ => false,
    }
}

struct LoadedPage {
    url: String,
    status: StatusCode,
    document: Document,
}

/// Simulated browser window driving the application router in process.
///
/// Every request carries the window's storage, the way a real front-end reads
/// `localStorage` before deciding whether a user is logged in. Pages of any
/// status render; a 404 is a page like any other.
pub struct Browser {
    router: Router,
    storage: Arc<StoragePort>,
    page: Option<LoadedPage>,
    history: Vec<String>,
}

impl Browser {
    pub fn new(router: Router, storage: Arc<StoragePort>) -> Self {
        Self {
            router,
            storage,
            page: None,
            history: Vec::new(),
        }
    }

    pub fn storage(&self) -> Arc<StoragePort> {
        Arc::clone(&self.storage)
    }

    pub async fn visit(&mut self, url: &str) -> BrowserResult<()> {
        let url = self.resolve(url);
        tracing::debug!(%url, "visiting");

        let request = Request::builder()
            .method(Method::GET)
            .uri(url.as_str())
            .extension(WindowStorage(Arc::clone(&self.storage)))
            .body(Body::empty())
            .map_err(|e| BrowserError::Request(e.to_string()))?;

        let response = match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| BrowserError::Body(e.to_string()))?;
        let html = String::from_utf8_lossy(&bytes);
        let document = Document::parse(&html)?;

        tracing::debug!(%url, status = status.as_u16(), "page loaded");
        self.history.push(url.clone());
        self.page = Some(LoadedPage {
            url,
            status,
            document,
        });
        Ok(())
    }

    /// Path and query of the loaded page, `about:blank` before any visit.
    pub fn current_url(&self) -> &str {
        self.page.as_ref().map_or(BLANK, |p| p.url.as_str())
    }

    pub fn current_path(&self) -> &str {
        let url = self.current_url();
        url.split_once('?').map_or(url, |(path, _)| path)
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.page.as_ref().map(|p| p.status)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn document(&self) -> BrowserResult<&Document> {
        self.page
            .as_ref()
            .map(|p| &p.document)
            .ok_or(BrowserError::NoPageLoaded)
    }

    pub fn find_all(&self, selector: &str) -> BrowserResult<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(selector.query_all(self.document()?))
    }

    pub fn find(&self, selector: &str) -> BrowserResult<NodeId> {
        self.find_all(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| BrowserError::SelectorNotFound(selector.to_string()))
    }

    pub fn exists(&self, selector: &str) -> BrowserResult<bool> {
        Ok(!self.find_all(selector)?.is_empty())
    }

    pub fn count(&self, selector: &str) -> BrowserResult<usize> {
        Ok(self.find_all(selector)?.len())
    }

    pub fn text(&self, selector: &str) -> BrowserResult<String> {
        let node = self.find(selector)?;
        Ok(self.document()?.text_content(node))
    }

    /// Current value of a form control.
    pub fn value(&self, selector: &str) -> BrowserResult<String> {
        let node = self.find(selector)?;
        let dom = self.document()?;
        match dom.tag_name(node) {
            Some("input") => Ok(dom.attr(node, "value").unwrap_or_default().to_string()),
            Some("textarea") => Ok(dom
                .attr(node, "value")
                .map(str::to_string)
                .unwrap_or_else(|| dom.text_content(node))),
            other => Err(BrowserError::TypeMismatch {
                selector: selector.to_string(),
                expected: "an input or textarea",
                actual: other.unwrap_or_default().to_string(),
            }),
        }
    }

    /// Replaces the value of a text control, like a user typing into it.
    pub fn fill_in(&mut self, selector: &str, value: &str) -> BrowserResult<()> {
        let node = self.find(selector)?;
        let page = self.page.as_mut().ok_or(BrowserError::NoPageLoaded)?;
        let dom = &mut page.document;

        let fillable = match dom.tag_name(node) {
            Some("textarea") => true,
            Some("input") => !matches!(
                dom.attr(node, "type").unwrap_or("text"),
                "submit" | "button" | "reset" | "image" | "checkbox" | "radio" | "file" | "hidden"
            ),
            _ => false,
        };
        if !fillable {
            return Err(BrowserError::TypeMismatch {
                selector: selector.to_string(),
                expected: "a text input or textarea",
                actual: dom.tag_name(node).unwrap_or_default().to_string(),
            });
        }

        dom.set_attr(node, "value", value);
        tracing::debug!(selector, value, "filled in");
        Ok(())
    }

    /// Dispatches `submit` or `click` at the first element `selector` matches.
    pub async fn trigger_event(&mut self, selector: &str, event: &str) -> BrowserResult<()> {
        match event {
            "submit" => {
                let node = self.find(selector)?;
                let dom = self.document()?;
                let form = dom.closest(node, "form").ok_or_else(|| BrowserError::TypeMismatch {
                    selector: selector.to_string(),
                    expected: "a form or an element inside one",
                    actual: dom.tag_name(node).unwrap_or_default().to_string(),
                })?;
                self.submit(form, None).await
            }
            "click" => self.click(selector).await,
            other => Err(BrowserError::UnsupportedEvent(other.to_string())),
        }
    }

    /// Follows a link or presses a submit button.
    pub async fn click(&mut self, selector: &str) -> BrowserResult<()> {
        let node = self.find(selector)?;
        let dom = self.document()?;
        let tag = dom.tag_name(node).unwrap_or_default().to_string();

        let action = match tag.as_str() {
            "a" => match dom.attr(node, "href") {
                Some(href) => Click::Follow(href.to_string()),
                None => Click::Nothing,
            },
            "button" | "input" if is_submit_button(&tag, dom.attr(node, "type")) => {
                match dom.closest(node, "form") {
                    Some(form) => Click::Submit(form, node),
                    None => Click::Nothing,
                }
            }
            _ => {
                return Err(BrowserError::TypeMismatch {
                    selector: selector.to_string(),
                    expected: "a link or submit button",
                    actual: tag.clone(),
                });
            }
        };

        match action {
            Click::Follow(href) => self.visit(&href).await,
            Click::Submit(form, button) => self.submit(form, Some(button)).await,
            Click::Nothing => Ok(()),
        }
    }

    pub fn assert_exists(&self, selector: &str) -> BrowserResult<()> {
        let count = self.count(selector)?;
        if count == 0 {
            return Err(BrowserError::AssertionFailed {
                selector: selector.to_string(),
                expected: "at least one element".into(),
                actual: "none".into(),
            });
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> BrowserResult<()> {
        let actual = self.value(selector)?;
        if actual != expected {
            return Err(BrowserError::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("value {expected:?}"),
                actual: format!("{actual:?}"),
            });
        }
        Ok(())
    }

    /// Compares whitespace-normalized text content.
    pub fn assert_text(&self, selector: &str, expected: &str) -> BrowserResult<()> {
        let actual = self.text(selector)?;
        let expected = expected.split_whitespace().collect::<Vec<_>>().join(" ");
        if actual != expected {
            return Err(BrowserError::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("text {expected:?}"),
                actual: format!("{actual:?}"),
            });
        }
        Ok(())
    }

    async fn submit(&mut self, form: NodeId, submitter: Option<NodeId>) -> BrowserResult<()> {
        let dom = self.document()?;

        let method = dom.attr(form, "method").unwrap_or("get").to_ascii_lowercase();
        if method != "get" {
            return Err(BrowserError::UnsupportedFormMethod(method));
        }

        let mut fields: Vec<(String, String)> = Vec::new();
        for node in dom.descendant_elements(form) {
            let Some(name) = dom.attr(node, "name").filter(|n| !n.is_empty()) else {
                continue;
            };
            if dom.attr(node, "disabled").is_some() {
                continue;
            }
            let value = match dom.tag_name(node) {
                Some("input") => match dom.attr(node, "type").unwrap_or("text") {
                    "submit" | "button" | "reset" | "image" | "file" => continue,
                    "checkbox" | "radio" if dom.attr(node, "checked").is_none() => continue,
                    "checkbox" | "radio" => dom.attr(node, "value").unwrap_or("on").to_string(),
                    _ => dom.attr(node, "value").unwrap_or_default().to_string(),
                },
                Some("textarea") => dom
                    .attr(node, "value")
                    .map(str::to_string)
                    .unwrap_or_else(|| dom.text_content(node)),
                _ => continue,
            };
            fields.push((name.to_string(), value));
        }
        if let Some(button) = submitter {
            if let Some(name) = dom.attr(button, "name").filter(|n| !n.is_empty()) {
                fields.push((
                    name.to_string(),
                    dom.attr(button, "value").unwrap_or_default().to_string(),
                ));
            }
        }

        let action = match dom.attr(form, "action").filter(|a| !a.is_empty()) {
            Some(action) => action.split_once('?').map_or(action, |(path, _)| path).to_string(),
            None => self.current_path().to_string(),
        };
        let query = serde_urlencoded::to_string(&fields)
            .map_err(|e| BrowserError::Request(e.to_string()))?;

        tracing::debug!(%action, %query, "submitting form");
        self.visit(&format!("{action}?{query}")).await
    }

    fn resolve(&self, url: &str) -> String {
        let url = url.split_once('#').map_or(url, |(before, _)| before);
        if url.starts_with('/') {
            return url.to_string();
        }
        if let Some(rest) = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
        {
            return rest.find('/').map_or_else(|| "/".to_string(), |i| rest[i..].to_string());
        }

        let current = if self.page.is_some() {
            self.current_path()
        } else {
            "/"
        };
        if url.is_empty() {
            return self.current_url_or_root();
        }
        if url.starts_with('?') {
            return format!("{current}{url}");
        }
        let dir = current.rsplit_once('/').map_or("", |(dir, _)| dir);
        format!("{dir}/{url}")
    }

    fn current_url_or_root(&self) -> String {
        match &self.page {
            Some(page) => page.url.clone(),
            None => "/".to_string(),
        }
    }
}
