use crate::dispatcher::ContentKind;
use crate::features::fetch::request::FetchMethod;
use crate::features::fetch::response::read_text;
use crate::features::fetch::fetch_checked;
use crate::loaders::inline::execute_inline_script;
use crate::loaders::{ContentLoader, LoaderContext};
use crate::markup::{Document, DocumentHandle, NodeId};
use crate::moduleerror::ModuleError;
use crate::resolver::ModuleUrl;
use crate::rewriter::resolve_markup_references;
use crate::values::{Exports, ModuleValue, DEFAULT_EXPORT};
use futures::future::BoxFuture;
use futures::FutureExt;

/// an embedded script element of a markup module
struct EmbeddedScript {
    node: NodeId,
    src: Option<String>,
    code: String,
}

/// loads text/html modules
///
/// the fetched markup is parsed, its references are made absolute and its module scripts are executed in document
/// order, the merged exports of those scripts are the exports of the module
pub struct MarkupLoader {}

impl MarkupLoader {
    /// make the document self contained, every reference attribute is resolved and a base element is added
    fn prepare(context: &LoaderContext, document: &mut Document, url: &ModuleUrl) {
        let root = document.root();
        resolve_markup_references(document, root, url);
        if context.config.inject_base_element {
            let head = document.head();
            let base = document.create_element("base");
            document.set_attribute(base, "href", url.as_str());
            document.prepend_child(head, base);
        }
    }

    /// find all executable elements, fails when any of them is not a module script
    fn collect_scripts(
        document: &Document,
        url: &ModuleUrl,
    ) -> Result<Vec<EmbeddedScript>, ModuleError> {
        let mut scripts = vec![];
        for node in document.elements_by_tag(document.root(), "script") {
            let script_type = document.get_attribute(node, "type").unwrap_or("");
            if !script_type.trim().eq_ignore_ascii_case("module") {
                return Err(ModuleError::UnsupportedInlineScript {
                    url: url.to_string(),
                    script_type: script_type.to_string(),
                });
            }
            scripts.push(EmbeddedScript {
                node,
                src: document
                    .get_attribute(node, "src")
                    .filter(|src| !src.trim().is_empty())
                    .map(|src| src.to_string()),
                code: document.text_content(node),
            });
        }
        Ok(scripts)
    }

    async fn load_markup(context: &LoaderContext, url: &ModuleUrl) -> Result<Exports, ModuleError> {
        let mut response = fetch_checked(
            context.fetcher.as_ref(),
            url,
            FetchMethod::Get,
            ContentKind::Markup.mime(),
        )
        .await?;
        let text = read_text(response.as_mut());

        let mut document = context.markup_parser.parse(text.as_str(), url);
        Self::prepare(context, &mut document, url);
        let scripts = Self::collect_scripts(&document, url)?;
        log::trace!("markup module {} has {} module scripts", url, scripts.len());

        let handle = DocumentHandle::new(document);
        let mut exports = Exports::new();
        for script in scripts {
            let script_exports = match &script.src {
                Some(src) => context
                    .script_executor
                    .import_module(src.as_str())
                    .await
                    .map_err(ModuleError::Execution)?,
                None => execute_inline_script(context, script.code.as_str(), &handle, url).await?,
            };
            exports.merge(script_exports);
            handle.with_mut(|doc| doc.remove(script.node));
        }

        if exports.is_empty() {
            exports.insert(DEFAULT_EXPORT, ModuleValue::Document(handle));
        }
        Ok(exports)
    }
}

impl ContentLoader for MarkupLoader {
    fn kind(&self) -> ContentKind {
        ContentKind::Markup
    }

    fn load<'a>(
        &'a self,
        context: &'a LoaderContext,
        url: &'a ModuleUrl,
    ) -> BoxFuture<'a, Result<Exports, ModuleError>> {
        Self::load_markup(context, url).boxed()
    }
}
