//! the virtual document registry
//!
//! inline scripts of a markup module are executed from a `data:` url, the execution primitive only takes source text
//! so the parsed document can not be passed as a parameter. Instead the document is registered here under the
//! (url encoded) module url and the generated source looks it up by that key. The host makes [VirtualDocumentRegistry::lookup]
//! available to executed code under the global name configured in [LoaderConfig](../config/struct.LoaderConfig.html).
//!
//! The map itself is created on the first registration and dropped again as soon as it is empty.
//!
//! Two loads of the same module may overlap (loaders sharing a registry), so a key holds every document registered
//! under it. A lookup sees the most recent one and unregistering only removes the caller's own document.

use crate::markup::DocumentHandle;
use crate::resolver::ModuleUrl;
use crate::utils::debug_mutex::DebugMutex;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// the chars encodeURI leaves alone
const URI_RESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// a url which is safe to embed in a double quoted string literal of generated source
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct EncodedUrl(String);

impl EncodedUrl {
    pub fn encode(url: &ModuleUrl) -> Self {
        EncodedUrl(utf8_percent_encode(url.as_str(), URI_RESERVED).to_string())
    }
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
    /// the decoded url, this is what decodeURI does in the generated source
    pub fn decode(&self) -> String {
        percent_decode_str(self.0.as_str())
            .decode_utf8_lossy()
            .to_string()
    }
}

impl Display for EncodedUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct VirtualDocumentRegistry {
    documents: DebugMutex<Option<HashMap<EncodedUrl, Vec<DocumentHandle>>>>,
}

impl Default for VirtualDocumentRegistry {
    fn default() -> Self {
        VirtualDocumentRegistry::new()
    }
}

impl VirtualDocumentRegistry {
    pub fn new() -> Self {
        Self {
            documents: DebugMutex::new(None, "virtual_document_registry"),
        }
    }

    /// register a document for a module url and return the key the generated source should use
    pub fn register(&self, url: &ModuleUrl, document: DocumentHandle) -> EncodedUrl {
        let key = EncodedUrl::encode(url);
        log::trace!("registering virtual document {}", key);
        let documents = &mut *self.documents.lock("register");
        documents
            .get_or_insert_with(HashMap::new)
            .entry(key.clone())
            .or_default()
            .push(document);
        key
    }

    /// find a document by the encoded url it was registered under
    pub fn lookup(&self, encoded_url: &str) -> Option<DocumentHandle> {
        let documents = &*self.documents.lock("lookup");
        documents
            .as_ref()
            .and_then(|map| map.get(&EncodedUrl(encoded_url.to_string())))
            .and_then(|stack| stack.last())
            .cloned()
    }

    /// remove a single registration of document, other documents registered under the same key stay
    pub fn unregister(&self, key: &EncodedUrl, document: &DocumentHandle) -> bool {
        log::trace!("unregistering virtual document {}", key);
        let documents = &mut *self.documents.lock("unregister");
        let map = match documents.as_mut() {
            Some(map) => map,
            None => return false,
        };
        let stack = match map.get_mut(key) {
            Some(stack) => stack,
            None => return false,
        };
        let removed = match stack.iter().rposition(|d| d.ptr_eq(document)) {
            Some(idx) => {
                stack.remove(idx);
                true
            }
            None => false,
        };
        if stack.is_empty() {
            map.remove(key);
        }
        removed
    }

    /// drop the map if nothing is registered anymore, returns true if the registry is (now) released
    pub fn release_if_empty(&self) -> bool {
        let documents = &mut *self.documents.lock("release_if_empty");
        let empty = documents.as_ref().map(|map| map.is_empty()).unwrap_or(true);
        if empty && documents.is_some() {
            log::trace!("releasing empty virtual document registry");
            *documents = None;
        }
        empty
    }

    /// clear all registrations, the map is released on the next release_if_empty
    pub fn clear(&self) {
        let documents = &mut *self.documents.lock("clear");
        if let Some(map) = documents.as_mut() {
            map.clear();
        }
    }

    /// see if the map currently exists
    pub fn is_active(&self) -> bool {
        self.documents.lock("is_active").is_some()
    }

    pub fn len(&self) -> usize {
        self.documents
            .lock("len")
            .as_ref()
            .map(|map| map.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
