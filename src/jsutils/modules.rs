use crate::jsutils::ScriptError;
use crate::values::Exports;
use futures::future::BoxFuture;

/// the code execution primitive of the host
///
/// `specifier` is either a network url (script modules are imported directly) or a self contained
/// `data:text/javascript;base64,...` url produced for inline scripts of markup modules.
/// The returned future resolves to the module namespace of the evaluated module; anything the
/// executed code throws should be returned as a ScriptError, it is passed to the caller unmodified
pub trait ScriptExecutor: Send + Sync {
    fn import_module(&self, specifier: &str) -> BoxFuture<'static, Result<Exports, ScriptError>>;
}

impl<F> ScriptExecutor for F
where
    F: Fn(&str) -> Result<Exports, ScriptError> + Send + Sync,
{
    fn import_module(&self, specifier: &str) -> BoxFuture<'static, Result<Exports, ScriptError>> {
        let res = self(specifier);
        Box::pin(futures::future::ready(res))
    }
}
