//! url resolution, every reference is turned into a canonical ModuleUrl before it is used as a cache key

use crate::moduleerror::ModuleError;
use std::fmt::{Display, Formatter};
use url::Url;

/// an absolute, canonicalized module identifier
///
/// two references which denote the same resource resolve to an identical ModuleUrl
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ModuleUrl {
    url: Url,
}

impl ModuleUrl {
    /// parse an absolute url
    pub fn parse(absolute: &str) -> Result<Self, ModuleError> {
        resolve(absolute, None)
    }
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
    pub fn as_url(&self) -> &Url {
        &self.url
    }
    /// resolve a reference relative to this url
    pub fn join(&self, reference: &str) -> Result<ModuleUrl, ModuleError> {
        resolve(reference, Some(self))
    }
}

impl Display for ModuleUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Url> for ModuleUrl {
    fn from(url: Url) -> Self {
        Self { url }
    }
}

/// resolve a possibly relative reference against a base
///
/// without a base the reference must be absolute
pub fn resolve(reference: &str, base: Option<&ModuleUrl>) -> Result<ModuleUrl, ModuleError> {
    let res = match base {
        Some(base) => base.url.join(reference),
        None => Url::parse(reference),
    };
    match res {
        Ok(url) => {
            log::trace!("resolved {} against {:?} to {}", reference, base, url);
            Ok(ModuleUrl { url })
        }
        Err(e) => Err(ModuleError::invalid_reference(reference, e)),
    }
}

/// resolve a reference against a base which is itself given as a string
pub fn resolve_str(reference: &str, base: Option<&str>) -> Result<ModuleUrl, ModuleError> {
    match base {
        Some(base) => {
            let base = ModuleUrl::parse(base)?;
            resolve(reference, Some(&base))
        }
        None => resolve(reference, None),
    }
}
