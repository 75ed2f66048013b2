//! specifier rewriting
//!
//! code extracted from a markup module is executed from a `data:` url, so relative import specifiers in it would
//! resolve against nothing useful. Before execution every relative specifier is rewritten to an absolute url
//! based on the url of the markup module. The same is done for the reference bearing attributes of the markup itself.
//!
//! The scan is a best effort textual scan, not a parse. Anything that can not be matched or resolved is left as is,
//! rewriting never fails.

use crate::jsutils::{Script, ScriptError, ScriptPreProcessor};
use crate::markup::{Document, NodeId};
use crate::resolver::ModuleUrl;
use regex::Regex;

/// the attributes which are rewritten in markup modules
pub const REFERENCE_ATTRIBUTES: [&str; 2] = ["src", "href"];

lazy_static! {
    /// import x from "y", export * from "y", import "y"
    static ref STATIC_SPECIFIER: Regex =
        Regex::new(r#"(?:^|[^.\w$])(?:import|from)\s*(?:"([^"\r\n]*)"|'([^'\r\n]*)')"#)
            .expect("invalid static specifier regex");
    /// import("y")
    static ref DYNAMIC_SPECIFIER: Regex = Regex::new(
        r#"(?:^|[^.\w$])import\s*\(\s*(?:"([^"\r\n]*)"|'([^'\r\n]*)'|`([^`$\r\n]*)`)\s*\)"#
    )
    .expect("invalid dynamic specifier regex");
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpecifierForm {
    /// a quoted string bound to an `import` or `from` keyword
    Static,
    /// the sole string argument of an `import()` call
    Dynamic,
}

impl SpecifierForm {
    fn regex(&self) -> &'static Regex {
        match self {
            SpecifierForm::Static => &STATIC_SPECIFIER,
            SpecifierForm::Dynamic => &DYNAMIC_SPECIFIER,
        }
    }
}

/// a located specifier, position is the byte offset of the first char inside the quotes
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RewriteMatch {
    pub specifier: String,
    pub position: usize,
    pub form: SpecifierForm,
}

impl RewriteMatch {
    pub fn end(&self) -> usize {
        self.position + self.specifier.len()
    }
}

/// find the first specifier of the given form which starts at or after from
pub fn find_specifier(text: &str, form: SpecifierForm, from: usize) -> Option<RewriteMatch> {
    if from > text.len() {
        return None;
    }
    let caps = form.regex().captures_at(text, from)?;
    let specifier = caps.iter().skip(1).flatten().next()?;
    Some(RewriteMatch {
        specifier: specifier.as_str().to_string(),
        position: specifier.start(),
        form,
    })
}

/// all specifiers of both forms, ordered by position
pub fn scan_specifiers(text: &str) -> Vec<RewriteMatch> {
    let mut res = vec![];
    for form in [SpecifierForm::Static, SpecifierForm::Dynamic] {
        let mut pos = 0;
        while let Some(m) = find_specifier(text, form, pos) {
            pos = m.end();
            res.push(m);
        }
    }
    res.sort_by_key(|m| m.position);
    res
}

/// resolve a single specifier, None means it should be left as is
///
/// only relative references (`./`, `../`, `/` and `//`) are resolved, bare specifiers are left for the
/// host to map and absolute urls are already fine
pub fn resolve_specifier(specifier: &str, base: &ModuleUrl) -> Option<String> {
    if !(specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/'))
    {
        return None;
    }
    match base.join(specifier) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            log::debug!("leaving specifier {} as is: {}", specifier, e);
            None
        }
    }
}

/// rewrite all relative import specifiers in code to absolute urls relative to base
pub fn rewrite_specifiers(code: &str, base: &ModuleUrl) -> String {
    let mut buffer = String::with_capacity(code.len());
    // everything before copied is already in buffer
    let mut copied = 0;
    for m in scan_specifiers(code) {
        if m.position < copied {
            continue;
        }
        if let Some(resolved) = resolve_specifier(&m.specifier, base) {
            log::trace!("rewriting specifier {} to {}", m.specifier, resolved);
            buffer.push_str(&code[copied..m.position]);
            buffer.push_str(resolved.as_str());
            copied = m.end();
        }
    }
    buffer.push_str(&code[copied..]);
    buffer
}

/// rewrites import specifiers of scripts relative to the script path
pub struct SpecifierRewriter {}

impl ScriptPreProcessor for SpecifierRewriter {
    fn process(&self, script: &mut Script) -> Result<(), ScriptError> {
        match ModuleUrl::parse(script.get_path()) {
            Ok(base) => {
                let code = rewrite_specifiers(script.get_code(), &base);
                script.set_code(code);
            }
            Err(e) => {
                log::debug!("not rewriting specifiers of {:?}: {}", script, e);
            }
        }
        Ok(())
    }
}

/// rewrite all reference bearing attributes in scope and, depth first, in nested template contents
pub fn resolve_markup_references(document: &mut Document, scope: NodeId, base: &ModuleUrl) {
    for attr in REFERENCE_ATTRIBUTES {
        for element in document.elements_with_attribute(scope, attr) {
            let resolved = match document.get_attribute(element, attr) {
                // an empty reference would resolve to the module itself
                Some(value) if value.trim().is_empty() => continue,
                Some(value) => match base.join(value.trim()) {
                    Ok(url) => url.to_string(),
                    Err(e) => {
                        log::warn!("could not resolve {}=\"{}\": {}", attr, value, e);
                        continue;
                    }
                },
                None => continue,
            };
            document.set_attribute(element, attr, resolved.as_str());
        }
    }
    for template in document.elements_by_tag(scope, "template") {
        if let Some(contents) = document.template_contents(template) {
            resolve_markup_references(document, contents, base);
        }
    }
}
