//! the error type shared by every stage of a module load

use crate::dispatcher::ContentKind;
use crate::jsutils::ScriptError;
use std::fmt::{Error, Formatter};

/// everything that can abort a module load
///
/// errors are Clone because a single failed load is reported to every caller which was awaiting it
#[derive(Debug, Clone)]
pub enum ModuleError {
    /// a reference (or the base it was resolved against) could not be turned into an absolute url
    InvalidReference { reference: String, reason: String },
    /// the resource was retrieved but the status was not a success status
    Fetch { url: String, status: u16 },
    /// the fetch primitive itself failed, no status is available
    Network { url: String, message: String },
    /// the declared content type was missing or is not one we can load
    UnknownModuleType { url: String, mime: Option<String> },
    /// a content loader was handed a module of a kind it does not load
    UnsupportedType {
        expected: ContentKind,
        actual: ContentKind,
    },
    /// a markup module contained an embedded script which is not of the module kind
    UnsupportedInlineScript { url: String, script_type: String },
    /// error thrown by executed code, passed through unmodified
    Execution(ScriptError),
    /// the loader was built with missing or invalid settings
    Config(String),
}

impl ModuleError {
    pub fn invalid_reference(reference: &str, reason: impl ToString) -> Self {
        ModuleError::InvalidReference {
            reference: reference.to_string(),
            reason: reason.to_string(),
        }
    }

    /// the name of the error class, these mirror the error names a script host would see
    pub fn get_name(&self) -> &str {
        match self {
            ModuleError::InvalidReference { .. } => "InvalidReference",
            ModuleError::Fetch { .. } => "FetchError",
            ModuleError::Network { .. } => "NetworkError",
            ModuleError::UnknownModuleType { .. } => "UnknownModuleType",
            ModuleError::UnsupportedType { .. } => "TypeError",
            ModuleError::UnsupportedInlineScript { .. } => "UnsupportedInlineScript",
            ModuleError::Execution(e) => e.get_name(),
            ModuleError::Config(_) => "ConfigError",
        }
    }

    /// the http status for FetchErrors
    pub fn get_status(&self) -> Option<u16> {
        match self {
            ModuleError::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModuleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            ModuleError::InvalidReference { reference, reason } => {
                write!(f, "InvalidReference: {reference} ({reason})")
            }
            ModuleError::Fetch { url, status } => {
                write!(f, "FetchError: failed to fetch module {url}: {status}")
            }
            ModuleError::Network { url, message } => {
                write!(f, "NetworkError: failed to fetch module {url}: {message}")
            }
            ModuleError::UnknownModuleType { url, mime } => match mime {
                Some(mime) => write!(f, "UnknownModuleType: invalid MIME type {mime} for {url}"),
                None => write!(f, "UnknownModuleType: failed to fetch module type for {url}"),
            },
            ModuleError::UnsupportedType { expected, actual } => {
                write!(f, "TypeError: {expected} loader can not load a {actual} module")
            }
            ModuleError::UnsupportedInlineScript { url, script_type } => write!(
                f,
                "UnsupportedInlineScript: only module-type inline scripts are allowed in markup modules, {url} contains a script of type '{script_type}'"
            ),
            ModuleError::Execution(e) => write!(f, "{e}"),
            ModuleError::Config(msg) => write!(f, "ConfigError: {msg}"),
        }
    }
}

impl std::error::Error for ModuleError {}

impl From<ScriptError> for ModuleError {
    fn from(e: ScriptError) -> Self {
        ModuleError::Execution(e)
    }
}
