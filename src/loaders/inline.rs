//! execution of the inline module scripts of markup modules
//!
//! the script text is rewritten, prefixed with two statements which give it its document and its url and then
//! imported from a self contained `data:` url

use crate::jsutils::Script;
use crate::loaders::LoaderContext;
use crate::markup::DocumentHandle;
use crate::moduleerror::ModuleError;
use crate::registry::{EncodedUrl, VirtualDocumentRegistry};
use crate::resolver::ModuleUrl;
use crate::values::Exports;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const INLINE_MODULE_PREFIX: &str = "data:text/javascript;base64,";

/// keeps a document registered while its script runs
struct Registration<'a> {
    registry: &'a VirtualDocumentRegistry,
    key: EncodedUrl,
    document: DocumentHandle,
    retain: bool,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        if !self.retain {
            self.registry.unregister(&self.key, &self.document);
        }
        self.registry.release_if_empty();
    }
}

/// the source which is actually executed for an inline script
pub fn inline_module_source(registry_global: &str, key: &EncodedUrl, code: &str) -> String {
    format!(
        "import.meta.document = globalThis.{registry_global}.get(\"{key}\");\nimport.meta.url = decodeURI(\"{key}\");\n{code}"
    )
}

/// the data: url an inline module is imported from
pub fn inline_module_specifier(source: &str) -> String {
    format!("{}{}", INLINE_MODULE_PREFIX, STANDARD.encode(source))
}

/// execute the code of an inline module script of the markup module at url
///
/// whatever the executed code throws is returned unmodified as ModuleError::Execution
pub async fn execute_inline_script(
    context: &LoaderContext,
    code: &str,
    document: &DocumentHandle,
    url: &ModuleUrl,
) -> Result<Exports, ModuleError> {
    let registration = Registration {
        registry: context.registry.as_ref(),
        key: context.registry.register(url, document.clone()),
        document: document.clone(),
        retain: context.config.retain_inline_documents,
    };

    let mut script = Script::new(url.as_str(), code);
    for pre_processor in &context.script_pre_processors {
        pre_processor.process(&mut script)?;
    }

    let source = inline_module_source(
        context.config.document_registry_global.as_str(),
        &registration.key,
        script.get_code(),
    );
    log::trace!("executing inline module of {}", url);
    let res = context
        .script_executor
        .import_module(inline_module_specifier(source.as_str()).as_str())
        .await;
    drop(registration);
    res.map_err(ModuleError::Execution)
}
