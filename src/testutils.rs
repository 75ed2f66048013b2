//! shared test collaborators: a recording fetcher, a tiny markup parser and a recording script executor

use crate::features::fetch::request::{FetchMethod, FetchRequest};
use crate::features::fetch::response::{BufferedResponse, FetchResponse};
use crate::features::fetch::{FetchResult, Fetcher};
use crate::jsutils::modules::ScriptExecutor;
use crate::jsutils::ScriptError;
use crate::loaders::inline::INLINE_MODULE_PREFIX;
use crate::markup::{Document, MarkupParser, NodeId};
use crate::resolver::ModuleUrl;
use crate::values::Exports;
use base64::Engine;
use futures::future::BoxFuture;
use futures::FutureExt;
use log::LevelFilter;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

lazy_static! {
    static ref TEST_LOGGING: bool = init_logging();
}

fn init_logging() -> bool {
    simple_logging::log_to_file("es_module_loader.log", LevelFilter::max()).is_ok()
}

pub fn init_test_logging() {
    let _ = *TEST_LOGGING;
}

struct MockResource {
    status: u16,
    content_type: Option<String>,
    body: String,
}

#[derive(Default)]
struct MockFetcherInner {
    resources: HashMap<String, MockResource>,
    log: Mutex<Vec<(FetchMethod, String)>>,
    accepted: Mutex<Vec<Option<String>>>,
}

/// serves canned resources and records every request, unknown urls get a 404
#[derive(Clone, Default)]
pub struct MockFetcher {
    inner: Arc<MockFetcherInner>,
}

impl MockFetcher {
    pub fn new() -> Self {
        init_test_logging();
        Self::default()
    }

    /// add a resource, only valid before the fetcher is cloned
    pub fn resource(mut self, url: &str, status: u16, content_type: Option<&str>, body: &str) -> Self {
        Arc::get_mut(&mut self.inner)
            .expect("resources must be added before the fetcher is shared")
            .resources
            .insert(
                url.to_string(),
                MockResource {
                    status,
                    content_type: content_type.map(|s| s.to_string()),
                    body: body.to_string(),
                },
            );
        self
    }

    pub fn requests(&self) -> Vec<(FetchMethod, String)> {
        self.inner.log.lock().unwrap().clone()
    }

    /// the Accept header of every request, in request order
    pub fn accepted(&self) -> Vec<Option<String>> {
        self.inner.accepted.lock().unwrap().clone()
    }

    pub fn count(&self, method: FetchMethod) -> usize {
        self.requests().iter().filter(|(m, _)| *m == method).count()
    }

    pub fn count_for(&self, method: FetchMethod, url: &str) -> usize {
        self.requests()
            .iter()
            .filter(|(m, u)| *m == method && u == url)
            .count()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, request: FetchRequest) -> BoxFuture<'static, FetchResult> {
        let url = request.get_url().to_string();
        self.inner
            .log
            .lock()
            .unwrap()
            .push((request.get_method(), url.clone()));
        self.inner
            .accepted
            .lock()
            .unwrap()
            .push(request.get_header("accept").first().cloned());
        let response: Box<dyn FetchResponse> = match self.inner.resources.get(&url) {
            Some(res) => {
                let mut response = BufferedResponse::new(res.status);
                if let Some(ct) = &res.content_type {
                    response = response.header("Content-Type", ct);
                }
                if request.get_method() == FetchMethod::Get {
                    response = response.body(res.body.clone());
                }
                Box::new(response)
            }
            None => Box::new(BufferedResponse::new(404)),
        };
        async move {
            // give other tasks a chance to run, like a real network would
            tokio::task::yield_now().await;
            Ok(response)
        }
        .boxed()
    }
}

type ExecutorHandler = Box<dyn Fn(&str) -> Result<Exports, ScriptError> + Send + Sync>;

struct RecordingExecutorInner {
    handler: ExecutorHandler,
    calls: Mutex<Vec<String>>,
}

/// an executor which hands the (decoded) source of every import to a handler and records it
#[derive(Clone)]
pub struct RecordingExecutor {
    inner: Arc<RecordingExecutorInner>,
}

impl RecordingExecutor {
    pub fn new<H>(handler: H) -> Self
    where
        H: Fn(&str) -> Result<Exports, ScriptError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(RecordingExecutorInner {
                handler: Box::new(handler),
                calls: Mutex::new(vec![]),
            }),
        }
    }

    /// the recorded imports, inline modules are recorded as their decoded source
    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.lock().unwrap().clone()
    }
}

/// the source of a data: url created for an inline module
pub fn decode_inline_source(specifier: &str) -> Option<String> {
    let b64 = specifier.strip_prefix(INLINE_MODULE_PREFIX)?;
    let bytes = base64::engine::general_purpose::STANDARD.decode(b64).ok()?;
    String::from_utf8(bytes).ok()
}

impl ScriptExecutor for RecordingExecutor {
    fn import_module(&self, specifier: &str) -> BoxFuture<'static, Result<Exports, ScriptError>> {
        let source = decode_inline_source(specifier).unwrap_or_else(|| specifier.to_string());
        self.inner.calls.lock().unwrap().push(source.clone());
        let res = (self.inner.handler)(source.as_str());
        async move {
            tokio::task::yield_now().await;
            res
        }
        .boxed()
    }
}

const VOID_ELEMENTS: [&str; 7] = ["base", "br", "hr", "img", "input", "link", "meta"];

/// a forgiving little markup parser, good enough for the fixtures in the tests
pub struct TestMarkupParser {}

impl MarkupParser for TestMarkupParser {
    fn parse(&self, text: &str, _url: &ModuleUrl) -> Document {
        parse_markup(text)
    }
}

pub fn parse_markup(text: &str) -> Document {
    let mut doc = Document::new();
    // (tag name, node children are appended to)
    let mut stack: Vec<(String, NodeId)> = vec![(String::new(), doc.root())];
    let mut rest = text;

    while !rest.is_empty() {
        let insertion = stack.last().map(|s| s.1).unwrap_or_else(|| doc.root());
        if let Some(after) = rest.strip_prefix("<!--") {
            let end = after.find("-->").unwrap_or(after.len());
            let comment = doc.create_comment(&after[..end]);
            doc.append_child(insertion, comment);
            rest = after.get(end + 3..).unwrap_or("");
        } else if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').unwrap_or(after.len());
            let name = after[..end].trim().to_ascii_lowercase();
            if let Some(idx) = stack.iter().rposition(|(n, _)| *n == name) {
                if idx > 0 {
                    stack.truncate(idx);
                }
            }
            rest = after.get(end + 1..).unwrap_or("");
        } else if rest.starts_with('<')
            && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
        {
            let end = rest.find('>').unwrap_or(rest.len());
            let mut tag = rest[1..end].trim();
            let self_closing = tag.ends_with('/');
            if self_closing {
                tag = tag[..tag.len() - 1].trim_end();
            }
            rest = rest.get(end + 1..).unwrap_or("");

            let name_end = tag.find(char::is_whitespace).unwrap_or(tag.len());
            let name = tag[..name_end].to_ascii_lowercase();
            let element = doc.create_element(&name);
            for (attr, value) in parse_attributes(&tag[name_end..]) {
                doc.set_attribute(element, &attr, &value);
            }
            doc.append_child(insertion, element);

            if name == "script" || name == "style" {
                let close = format!("</{name}>");
                let raw_end = rest.find(close.as_str()).unwrap_or(rest.len());
                if raw_end > 0 {
                    let text = doc.create_text(&rest[..raw_end]);
                    doc.append_child(element, text);
                }
                rest = rest.get(raw_end + close.len()..).unwrap_or("");
            } else if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
                let target = doc.template_contents(element).unwrap_or(element);
                stack.push((name, target));
            }
        } else {
            let end = rest
                .char_indices()
                .skip(1)
                .find(|(_, c)| *c == '<')
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            let text = doc.create_text(&rest[..end]);
            doc.append_child(insertion, text);
            rest = &rest[end..];
        }
    }
    doc
}

fn parse_attributes(mut s: &str) -> Vec<(String, String)> {
    let mut res = vec![];
    loop {
        s = s.trim_start();
        if s.is_empty() {
            return res;
        }
        let name_end = s
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(s.len());
        let name = s[..name_end].to_string();
        s = s[name_end..].trim_start();
        if let Some(after) = s.strip_prefix('=') {
            let after = after.trim_start();
            let (value, remaining) = match after.chars().next() {
                Some(q) if q == '"' || q == '\'' => {
                    let close = after[1..].find(q).map(|i| i + 1).unwrap_or(after.len());
                    (&after[1..close], after.get(close + 1..).unwrap_or(""))
                }
                _ => {
                    let end = after.find(char::is_whitespace).unwrap_or(after.len());
                    (&after[..end], &after[end..])
                }
            };
            res.push((name, value.to_string()));
            s = remaining;
        } else {
            res.push((name, String::new()));
        }
    }
}

#[cfg(test)]
pub mod tests {
    use crate::testutils::parse_markup;

    #[test]
    fn test_parse_markup() {
        let doc = parse_markup(
            "<html><head><link rel=stylesheet href='a.css'></head><body><p class=\"x\">hi <b>there</b></p>\
             <template><img src=\"t.png\"/></template><script type=\"module\">if (a < b) {}</script><!-- c --></body></html>",
        );
        let root = doc.root();
        let link = doc.elements_by_tag(root, "link")[0];
        assert_eq!(doc.get_attribute(link, "rel"), Some("stylesheet"));
        assert_eq!(doc.get_attribute(link, "href"), Some("a.css"));
        let p = doc.elements_by_tag(root, "p")[0];
        assert_eq!(doc.text_content(p), "hi there");
        assert!(doc.elements_by_tag(root, "img").is_empty());
        let template = doc.elements_by_tag(root, "template")[0];
        let contents = doc.template_contents(template).unwrap();
        assert_eq!(doc.elements_by_tag(contents, "img").len(), 1);
        let script = doc.elements_by_tag(root, "script")[0];
        assert_eq!(doc.text_content(script), "if (a < b) {}");
        let body = doc.elements_by_tag(root, "body")[0];
        assert_eq!(doc.children(body).len(), 4);
    }
}
