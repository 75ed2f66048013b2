//! contains the ModuleLoaderBuilder which may be used to instantiate a new ModuleLoaderFacade

use crate::config::LoaderConfig;
use crate::facades::ModuleLoaderFacade;
use crate::features::fetch::request::FetchRequest;
use crate::features::fetch::{FetchResult, Fetcher, ProviderFetcher};
use crate::jsutils::modules::ScriptExecutor;
use crate::jsutils::ScriptPreProcessor;
use crate::loaders::LoaderContext;
use crate::markup::MarkupParser;
use crate::moduleerror::ModuleError;
use crate::registry::VirtualDocumentRegistry;
use crate::resolver::ModuleUrl;
use crate::rewriter::SpecifierRewriter;
use std::sync::Arc;

/// the ModuleLoaderBuilder is used to init a ModuleLoaderFacade
///
/// a fetcher, a markup parser and a script executor are required
/// # Example
/// ```rust
/// use es_module_loader::builder::ModuleLoaderBuilder;
/// use es_module_loader::features::fetch::request::FetchRequest;
/// use es_module_loader::features::fetch::response::BufferedResponse;
/// use es_module_loader::features::fetch::FetchResult;
/// use es_module_loader::jsutils::ScriptError;
/// use es_module_loader::markup::Document;
/// use es_module_loader::resolver::ModuleUrl;
/// use es_module_loader::values::Exports;
/// let loader = ModuleLoaderBuilder::new()
///     .fetch_response_provider(|_req: &FetchRequest| -> FetchResult {
///         Ok(Box::new(BufferedResponse::new(404)))
///     })
///     .markup_parser(|_text: &str, _url: &ModuleUrl| Document::new())
///     .script_executor(|_specifier: &str| -> Result<Exports, ScriptError> { Ok(Exports::new()) })
///     .build()
///     .ok()
///     .expect("could not build loader");
/// assert_eq!(loader.cached_count(), 0);
/// ```
pub struct ModuleLoaderBuilder {
    pub(crate) fetcher: Option<Arc<dyn Fetcher>>,
    pub(crate) markup_parser: Option<Arc<dyn MarkupParser>>,
    pub(crate) script_executor: Option<Arc<dyn ScriptExecutor>>,
    pub(crate) registry: Option<Arc<VirtualDocumentRegistry>>,
    pub(crate) script_pre_processors: Vec<Box<dyn ScriptPreProcessor + Send + Sync>>,
    pub(crate) config: LoaderConfig,
}

impl ModuleLoaderBuilder {
    /// build a ModuleLoaderFacade
    pub fn build(self) -> Result<ModuleLoaderFacade, ModuleError> {
        let fetcher = self
            .fetcher
            .ok_or_else(|| ModuleError::Config("no fetcher was set".to_string()))?;
        let markup_parser = self
            .markup_parser
            .ok_or_else(|| ModuleError::Config("no markup parser was set".to_string()))?;
        let script_executor = self
            .script_executor
            .ok_or_else(|| ModuleError::Config("no script executor was set".to_string()))?;

        let document_base = match self.config.document_base.as_deref() {
            Some(base) => Some(ModuleUrl::parse(base).map_err(|e| {
                ModuleError::Config(format!("documentBase is not an absolute url: {e}"))
            })?),
            None => None,
        };

        // relative specifiers must be made absolute before any other processor sees the code
        let mut script_pre_processors: Vec<Box<dyn ScriptPreProcessor + Send + Sync>> =
            vec![Box::new(SpecifierRewriter {})];
        script_pre_processors.extend(self.script_pre_processors);

        let context = LoaderContext {
            fetcher,
            markup_parser,
            script_executor,
            registry: self
                .registry
                .unwrap_or_else(|| Arc::new(VirtualDocumentRegistry::new())),
            script_pre_processors,
            config: self.config,
        };
        log::debug!(
            "building ModuleLoaderFacade with document base {:?}",
            document_base
        );
        Ok(ModuleLoaderFacade::new(context, document_base))
    }

    /// init a new ModuleLoaderBuilder
    pub fn new() -> Self {
        Self {
            fetcher: None,
            markup_parser: None,
            script_executor: None,
            registry: None,
            script_pre_processors: vec![],
            config: LoaderConfig::default(),
        }
    }

    /// set the Fetcher used for all network retrieval
    pub fn fetcher<F: Fetcher + 'static>(mut self, fetcher: F) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    /// use a blocking closure as Fetcher, it will be called in a helper thread
    /// # Example
    /// ```rust
    /// use es_module_loader::builder::ModuleLoaderBuilder;
    /// use es_module_loader::features::fetch::request::FetchRequest;
    /// use es_module_loader::features::fetch::response::BufferedResponse;
    /// use es_module_loader::features::fetch::FetchResult;
    /// let builder = ModuleLoaderBuilder::new()
    ///     .fetch_response_provider(|req: &FetchRequest| -> FetchResult {
    ///         let body = std::fs::read(req.get_url().as_url().path()).unwrap_or_default();
    ///         Ok(Box::new(BufferedResponse::new(200).header("Content-Type", "text/css").body(body)))
    ///     });
    /// ```
    pub fn fetch_response_provider<P>(self, provider: P) -> Self
    where
        P: Fn(&FetchRequest) -> FetchResult + Send + Sync + 'static,
    {
        self.fetcher(ProviderFetcher::new(provider))
    }

    pub fn markup_parser<P: MarkupParser + 'static>(mut self, parser: P) -> Self {
        self.markup_parser = Some(Arc::new(parser));
        self
    }

    /// set the primitive which imports script modules, both by url and as inline data: urls
    pub fn script_executor<E: ScriptExecutor + 'static>(mut self, executor: E) -> Self {
        self.script_executor = Some(Arc::new(executor));
        self
    }

    /// share a registry with the host, by default every loader gets its own
    pub fn document_registry(mut self, registry: Arc<VirtualDocumentRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// add a ScriptPreProcessor which will be called for all inline scripts after their specifiers were rewritten
    pub fn script_pre_processor<S: ScriptPreProcessor + Send + Sync + 'static>(
        mut self,
        processor: S,
    ) -> Self {
        self.script_pre_processors.push(Box::new(processor));
        self
    }

    /// replace all settings, this also replaces a document base set earlier
    pub fn config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// set the location of the host document
    pub fn document_base(mut self, base: &str) -> Self {
        self.config.document_base = Some(base.to_string());
        self
    }
}

impl Default for ModuleLoaderBuilder {
    fn default() -> Self {
        ModuleLoaderBuilder::new()
    }
}
