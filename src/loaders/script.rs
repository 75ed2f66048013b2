use crate::dispatcher::ContentKind;
use crate::loaders::{ContentLoader, LoaderContext};
use crate::moduleerror::ModuleError;
use crate::resolver::ModuleUrl;
use crate::values::Exports;
use futures::future::BoxFuture;
use futures::FutureExt;

/// script modules are imported by url, the execution primitive fetches them and resolves their imports itself
pub struct ScriptLoader {}

impl ContentLoader for ScriptLoader {
    fn kind(&self) -> ContentKind {
        ContentKind::Script
    }

    fn load<'a>(
        &'a self,
        context: &'a LoaderContext,
        url: &'a ModuleUrl,
    ) -> BoxFuture<'a, Result<Exports, ModuleError>> {
        async move {
            context
                .script_executor
                .import_module(url.as_str())
                .await
                .map_err(ModuleError::Execution)
        }
        .boxed()
    }
}
