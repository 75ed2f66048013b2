//! the content type specific loaders
//!
//! every loader turns a module url into an [Exports] mapping, which of the three is used is decided by
//! [probe](../dispatcher/fn.probe.html)

use crate::config::LoaderConfig;
use crate::dispatcher::{probe, ContentKind};
use crate::features::fetch::Fetcher;
use crate::jsutils::modules::ScriptExecutor;
use crate::jsutils::ScriptPreProcessor;
use crate::loaders::markup::MarkupLoader;
use crate::loaders::script::ScriptLoader;
use crate::loaders::stylesheet::StyleSheetLoader;
use crate::markup::MarkupParser;
use crate::moduleerror::ModuleError;
use crate::registry::VirtualDocumentRegistry;
use crate::resolver::ModuleUrl;
use crate::values::Exports;
use futures::future::BoxFuture;
use std::sync::Arc;

pub mod inline;
pub mod markup;
pub mod script;
pub mod stylesheet;

/// the host collaborators and settings every load needs
pub struct LoaderContext {
    pub(crate) fetcher: Arc<dyn Fetcher>,
    pub(crate) markup_parser: Arc<dyn MarkupParser>,
    pub(crate) script_executor: Arc<dyn ScriptExecutor>,
    pub(crate) registry: Arc<VirtualDocumentRegistry>,
    pub(crate) script_pre_processors: Vec<Box<dyn ScriptPreProcessor + Send + Sync>>,
    pub(crate) config: LoaderConfig,
}

impl LoaderContext {
    pub fn get_config(&self) -> &LoaderConfig {
        &self.config
    }
    pub fn get_registry(&self) -> &Arc<VirtualDocumentRegistry> {
        &self.registry
    }
}

pub trait ContentLoader: Send + Sync {
    /// the kind of module this loader loads
    fn kind(&self) -> ContentKind;
    /// fetch and instantiate a module
    fn load<'a>(
        &'a self,
        context: &'a LoaderContext,
        url: &'a ModuleUrl,
    ) -> BoxFuture<'a, Result<Exports, ModuleError>>;
}

static SCRIPT_LOADER: ScriptLoader = ScriptLoader {};
static STYLESHEET_LOADER: StyleSheetLoader = StyleSheetLoader {};
static MARKUP_LOADER: MarkupLoader = MarkupLoader {};

/// select the loader for a kind of module
pub fn loader_for(kind: ContentKind) -> &'static dyn ContentLoader {
    match kind {
        ContentKind::Script => &SCRIPT_LOADER,
        ContentKind::StyleSheet => &STYLESHEET_LOADER,
        ContentKind::Markup => &MARKUP_LOADER,
    }
}

/// run a loader for a module of the given kind, fails with UnsupportedType when the loader does not load that kind
pub async fn load_with(
    loader: &dyn ContentLoader,
    kind: ContentKind,
    context: &LoaderContext,
    url: &ModuleUrl,
) -> Result<Exports, ModuleError> {
    if loader.kind() != kind {
        return Err(ModuleError::UnsupportedType {
            expected: loader.kind(),
            actual: kind,
        });
    }
    loader.load(context, url).await
}

/// probe the module type and run the matching loader
pub(crate) async fn load_module(
    context: &LoaderContext,
    url: &ModuleUrl,
) -> Result<Exports, ModuleError> {
    log::debug!("loading module {}", url);
    let kind = probe(context.fetcher.as_ref(), url).await?;
    let res = load_with(loader_for(kind), kind, context, url).await;
    match &res {
        Ok(exports) => log::debug!("loaded {} module {} with {} exports", kind, url, exports.len()),
        Err(e) => log::debug!("loading {} module {} failed: {}", kind, url, e),
    }
    res
}

#[cfg(test)]
pub mod tests {
    use crate::config::LoaderConfig;
    use crate::dispatcher::ContentKind;
    use crate::jsutils::ScriptPreProcessor;
    use crate::loaders::{load_module, load_with, loader_for, LoaderContext};
    use crate::moduleerror::ModuleError;
    use crate::registry::VirtualDocumentRegistry;
    use crate::resolver::ModuleUrl;
    use crate::rewriter::SpecifierRewriter;
    use crate::testutils::{MockFetcher, RecordingExecutor, TestMarkupParser};
    use crate::values::Exports;
    use std::sync::Arc;

    pub fn test_context(fetcher: &MockFetcher, executor: &RecordingExecutor) -> LoaderContext {
        test_context_with_config(fetcher, executor, LoaderConfig::default())
    }

    pub fn test_context_with_config(
        fetcher: &MockFetcher,
        executor: &RecordingExecutor,
        config: LoaderConfig,
    ) -> LoaderContext {
        let rewriter: Box<dyn ScriptPreProcessor + Send + Sync> = Box::new(SpecifierRewriter {});
        LoaderContext {
            fetcher: Arc::new(fetcher.clone()),
            markup_parser: Arc::new(TestMarkupParser {}),
            script_executor: Arc::new(executor.clone()),
            registry: Arc::new(VirtualDocumentRegistry::new()),
            script_pre_processors: vec![rewriter],
            config,
        }
    }

    #[tokio::test]
    async fn test_loader_kind_mismatch() {
        let fetcher = MockFetcher::new();
        let executor = RecordingExecutor::new(|_| Ok(Exports::new()));
        let context = test_context(&fetcher, &executor);
        let url = ModuleUrl::parse("https://h/a.css").ok().unwrap();

        let res = load_with(
            loader_for(ContentKind::StyleSheet),
            ContentKind::Markup,
            &context,
            &url,
        )
        .await;
        match res {
            Err(ModuleError::UnsupportedType { expected, actual }) => {
                assert_eq!(expected, ContentKind::StyleSheet);
                assert_eq!(actual, ContentKind::Markup);
            }
            _ => panic!("expected UnsupportedType"),
        }
        // nothing was fetched
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_type_fetches_no_body() {
        let fetcher =
            MockFetcher::new().resource("https://h/readme.txt", 200, Some("text/plain"), "hi");
        let executor = RecordingExecutor::new(|_| Ok(Exports::new()));
        let context = test_context(&fetcher, &executor);
        let url = ModuleUrl::parse("https://h/readme.txt").ok().unwrap();

        let res = load_module(&context, &url).await;
        assert!(matches!(res, Err(ModuleError::UnknownModuleType { .. })));
        assert_eq!(fetcher.requests().len(), 1);
        assert!(executor.calls().is_empty());
    }
}
