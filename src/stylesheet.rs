use crate::resolver::ModuleUrl;
use std::sync::{Arc, RwLock};

/// a constructed stylesheet
///
/// attaching it to a rendering root is up to the host, this only keeps the css text and the url it came from
#[derive(Clone, Debug)]
pub struct StyleSheet {
    href: ModuleUrl,
    css: Arc<RwLock<String>>,
}

impl StyleSheet {
    pub fn new(href: ModuleUrl) -> Self {
        Self {
            href,
            css: Arc::new(RwLock::new(String::new())),
        }
    }

    /// construct a stylesheet from css text, like `new CSSStyleSheet()` followed by `replaceSync(css)`
    pub fn from_css(href: ModuleUrl, css: &str) -> Self {
        let sheet = Self::new(href);
        sheet.replace_sync(css);
        sheet
    }

    /// replace the text of this sheet, all clones see the new text
    pub fn replace_sync(&self, css: &str) {
        let mut text = self.css.write().unwrap_or_else(|e| e.into_inner());
        text.clear();
        text.push_str(css);
    }

    pub fn css_text(&self) -> String {
        self.css.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn href(&self) -> &ModuleUrl {
        &self.href
    }

    pub fn ptr_eq(&self, other: &StyleSheet) -> bool {
        Arc::ptr_eq(&self.css, &other.css)
    }
}
