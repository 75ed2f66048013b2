//! contains the ModuleLoaderFacade

use crate::builder::ModuleLoaderBuilder;
use crate::cache::{LoadCache, LoadState};
use crate::config::{LoaderConfig, UseOptions};
use crate::loaders::{load_module, LoaderContext};
use crate::moduleerror::ModuleError;
use crate::registry::VirtualDocumentRegistry;
use crate::resolver::{resolve, resolve_str, ModuleUrl};
use crate::values::{Exports, Imported};
use std::future::Future;
use std::sync::Arc;

pub struct ModuleLoaderFacadeInner {
    context: Arc<LoaderContext>,
    cache: Arc<LoadCache>,
    document_base: Option<ModuleUrl>,
}

impl Drop for ModuleLoaderFacadeInner {
    fn drop(&mut self) {
        log::trace!(
            "> ModuleLoaderFacade::drop with {} cached modules",
            self.cache.len()
        );
    }
}

/// ModuleLoaderFacade is the main public struct of this crate, it loads and caches modules.
/// You can construct a new ModuleLoaderFacade by using the [ModuleLoaderBuilder] struct.
///
/// Clones share their cache and document registry, a loader may be used from any thread.
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
///         Ok(Box::new(BufferedResponse::new(200).header("Content-Type", "text/css").body("p {}")))
///     })
///     .markup_parser(|_text: &str, _url: &ModuleUrl| Document::new())
///     .script_executor(|_specifier: &str| -> Result<Exports, ScriptError> { Ok(Exports::new()) })
///     .document_base("https://example.com/app/index.html")
///     .build()
///     .ok()
///     .expect("could not build loader");
/// let url = loader.resolve("./theme.css", None).ok().unwrap();
/// assert_eq!(url.as_str(), "https://example.com/app/theme.css");
/// ```
#[derive(Clone)]
pub struct ModuleLoaderFacade {
    inner: Arc<ModuleLoaderFacadeInner>,
}

impl ModuleLoaderFacade {
    pub(crate) fn new(context: LoaderContext, document_base: Option<ModuleUrl>) -> Self {
        Self {
            inner: Arc::new(ModuleLoaderFacadeInner {
                context: Arc::new(context),
                cache: Arc::new(LoadCache::new()),
                document_base,
            }),
        }
    }

    pub fn builder() -> ModuleLoaderBuilder {
        ModuleLoaderBuilder::new()
    }

    /// resolve a reference against base or, when no base is passed, against the configured document base
    pub fn resolve(&self, reference: &str, base: Option<&str>) -> Result<ModuleUrl, ModuleError> {
        match base {
            Some(base) => resolve_str(reference, Some(base)),
            None => resolve(reference, self.inner.document_base.as_ref()),
        }
    }

    /// load a module and get its Exports, or its default export when that is preferred
    ///
    /// the reference is resolved and the load is registered in the cache when this method is called, before the
    /// returned future is polled
    /// # Example
    /// ```dontrun
    /// let imported = loader.use_module("./widgets/button.html", UseOptions::default()).await?;
    /// let document = imported.as_value().and_then(ModuleValue::as_document);
    /// ```
    pub fn use_module(
        &self,
        reference: &str,
        options: UseOptions,
    ) -> impl Future<Output = Result<Imported, ModuleError>> + Send + 'static {
        let prefer_default = options.default;
        let load = self
            .resolve(reference, options.base.as_deref())
            .map(|url| self.load(&url));
        async move {
            let exports = load?.await?;
            Ok(exports.into_imported(prefer_default))
        }
    }

    /// load an already resolved module
    pub fn use_url(
        &self,
        url: &ModuleUrl,
        prefer_default: bool,
    ) -> impl Future<Output = Result<Imported, ModuleError>> + Send + 'static {
        let load = self.load(url);
        async move {
            let exports = load.await?;
            Ok(exports.into_imported(prefer_default))
        }
    }

    /// get the cached load of a url or start a new one
    pub fn load(
        &self,
        url: &ModuleUrl,
    ) -> impl Future<Output = Result<Exports, ModuleError>> + Send + 'static {
        let context = self.inner.context.clone();
        let load_url = url.clone();
        self.inner.cache.get_or_start(url, move || async move {
            load_module(context.as_ref(), &load_url).await
        })
    }

    /// the state of the cached load of a url, None if there is no entry
    pub fn load_state(&self, url: &ModuleUrl) -> Option<LoadState> {
        self.inner.cache.state(url)
    }

    pub fn cached_count(&self) -> usize {
        self.inner.cache.len()
    }

    /// the registry through which inline scripts reach their documents, the host exposes this to executed code
    pub fn document_registry(&self) -> &Arc<VirtualDocumentRegistry> {
        self.inner.context.get_registry()
    }

    pub fn config(&self) -> &LoaderConfig {
        self.inner.context.get_config()
    }
}
