//! settings of a loader and the per call options of use_module

use serde::{Deserialize, Serialize};

pub const DEFAULT_REGISTRY_GLOBAL: &str = "__moduleDocuments";

/// settings of a [ModuleLoaderFacade](../facades/struct.ModuleLoaderFacade.html)
/// # Example
/// ```rust
/// use es_module_loader::config::LoaderConfig;
/// let config = LoaderConfig::from_json(r#"{"documentBase": "https://example.com/index.html"}"#).ok().unwrap();
/// assert_eq!(config.document_base.as_deref(), Some("https://example.com/index.html"));
/// assert!(config.inject_base_element);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    /// the location of the host document, used as base when a call does not pass one
    pub document_base: Option<String>,
    /// the global name under which the host exposes the VirtualDocumentRegistry to executed code
    pub document_registry_global: String,
    /// add a base element pointing at the module url to markup modules
    pub inject_base_element: bool,
    /// keep documents registered after their inline script ran
    pub retain_inline_documents: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            document_base: None,
            document_registry_global: DEFAULT_REGISTRY_GLOBAL.to_string(),
            inject_base_element: true,
            retain_inline_documents: false,
        }
    }
}

impl LoaderConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// options of a single use_module call
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UseOptions {
    /// resolve the reference against this instead of the document base
    pub base: Option<String>,
    /// return the default export instead of the whole mapping when there is one
    pub default: bool,
}

impl Default for UseOptions {
    fn default() -> Self {
        Self {
            base: None,
            default: true,
        }
    }
}

impl UseOptions {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn base(mut self, base: &str) -> Self {
        self.base = Some(base.to_string());
        self
    }
    pub fn prefer_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }
}
