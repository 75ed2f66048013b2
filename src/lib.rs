//! # es_module_loader
//! This crate loads "modules" of three content types (script, stylesheet and markup) by URL
//! and hands back their exports.
//!
//! It is made up of two main parts:
//! * the loading engine
//!   url resolution, a single-flight cache of loads keyed by resolved url, content type dispatch and the
//!   specifier rewriting which makes relative references inside fetched text absolute
//! * collaborator traits
//!   the network ([Fetcher](features/fetch/trait.Fetcher.html)), the markup parser ([MarkupParser](markup/trait.MarkupParser.html))
//!   and the code execution primitive ([ScriptExecutor](jsutils/modules/trait.ScriptExecutor.html)) are provided by the host
//!
//! ## Noteworthy structs
//!
//! | Struct | Purpose |
//! | --- | --- |
//! | [ModuleLoaderBuilder](builder/struct.ModuleLoaderBuilder.html) | the 'starting point' |
//! | [ModuleLoaderFacade](facades/struct.ModuleLoaderFacade.html) | thread safe handle which loads and caches modules |
//! | [Exports](values/struct.Exports.html) | the named values a module makes available |
//! | [VirtualDocumentRegistry](registry/struct.VirtualDocumentRegistry.html) | gives inline scripts access to their markup document |
//!
//! ## Loading a module
//!
//! ```dontrun
//! use es_module_loader::builder::ModuleLoaderBuilder;
//! use es_module_loader::config::UseOptions;
//! let loader = ModuleLoaderBuilder::new()
//!     .fetcher(my_fetcher)
//!     .markup_parser(my_parser)
//!     .script_executor(my_executor)
//!     .document_base("https://example.com/index.html")
//!     .build()?;
//! let imported = loader.use_module("./widgets/button.html", UseOptions::default()).await?;
//! ```
//!
//! Concurrent calls for the same resolved url share one load, a successful load is memoized for the
//! lifetime of the facade and a failed load is evicted so a later call may retry it.

#[macro_use]
extern crate lazy_static;

/// build an [Exports](values/struct.Exports.html) mapping
/// # Example
/// ```rust
/// use es_module_loader::exports;
/// let exports = exports! { "default" => "hello", "answer" => 42 };
/// assert_eq!(exports.len(), 2);
/// ```
#[macro_export]
macro_rules! exports {
    ( $( $name:expr => $value:expr ),* $(,)? ) => {
        {
            let mut temp_exports = $crate::values::Exports::new();
            $(
                temp_exports.insert($name, $crate::values::ModuleValue::from($value));
            )*
            temp_exports
        }
    };
}

pub mod builder;
pub mod cache;
pub mod config;
pub mod dispatcher;
pub mod facades;
pub mod features;
pub mod jsutils;
pub mod loaders;
pub mod markup;
pub mod moduleerror;
pub mod registry;
pub mod resolver;
pub mod rewriter;
pub mod stylesheet;
#[cfg(test)]
pub(crate) mod testutils;
pub mod utils;
pub mod values;
