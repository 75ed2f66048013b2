//! the values modules export

use crate::markup::DocumentHandle;
use crate::stylesheet::StyleSheet;
use std::any::Any;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

pub const DEFAULT_EXPORT: &str = "default";

/// a single exported value
#[derive(Clone)]
pub enum ModuleValue {
    /// the parsed document of a markup module
    Document(DocumentHandle),
    /// the constructed stylesheet of a stylesheet module
    StyleSheet(StyleSheet),
    /// plain data exported by a script
    Json(serde_json::Value),
    /// anything else an executor wants to hand out, functions, classes, engine references...
    Native(Arc<dyn Any + Send + Sync>),
}

impl ModuleValue {
    pub fn as_document(&self) -> Option<&DocumentHandle> {
        match self {
            ModuleValue::Document(d) => Some(d),
            _ => None,
        }
    }
    pub fn as_style_sheet(&self) -> Option<&StyleSheet> {
        match self {
            ModuleValue::StyleSheet(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ModuleValue::Json(v) => Some(v),
            _ => None,
        }
    }
    pub fn as_native<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            ModuleValue::Native(n) => n.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl Debug for ModuleValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleValue::Document(d) => write!(f, "Document({d:?})"),
            ModuleValue::StyleSheet(s) => write!(f, "StyleSheet({})", s.href()),
            ModuleValue::Json(v) => write!(f, "Json({v})"),
            ModuleValue::Native(_) => f.write_str("Native"),
        }
    }
}

impl From<DocumentHandle> for ModuleValue {
    fn from(d: DocumentHandle) -> Self {
        ModuleValue::Document(d)
    }
}

impl From<StyleSheet> for ModuleValue {
    fn from(s: StyleSheet) -> Self {
        ModuleValue::StyleSheet(s)
    }
}

impl From<serde_json::Value> for ModuleValue {
    fn from(v: serde_json::Value) -> Self {
        ModuleValue::Json(v)
    }
}

impl From<&str> for ModuleValue {
    fn from(s: &str) -> Self {
        ModuleValue::Json(serde_json::Value::from(s))
    }
}

impl From<String> for ModuleValue {
    fn from(s: String) -> Self {
        ModuleValue::Json(serde_json::Value::from(s))
    }
}

impl From<i32> for ModuleValue {
    fn from(i: i32) -> Self {
        ModuleValue::Json(serde_json::Value::from(i))
    }
}

impl From<f64> for ModuleValue {
    fn from(f: f64) -> Self {
        ModuleValue::Json(serde_json::Value::from(f))
    }
}

impl From<bool> for ModuleValue {
    fn from(b: bool) -> Self {
        ModuleValue::Json(serde_json::Value::from(b))
    }
}

/// the named values of a module
#[derive(Clone, Default, Debug)]
pub struct Exports {
    values: HashMap<String, ModuleValue>,
}

impl Exports {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// a mapping with only a default export
    pub fn with_default(value: ModuleValue) -> Self {
        let mut exports = Self::new();
        exports.insert(DEFAULT_EXPORT, value);
        exports
    }

    pub fn insert<N: Into<String>>(&mut self, name: N, value: ModuleValue) -> Option<ModuleValue> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&ModuleValue> {
        self.values.get(name)
    }

    pub fn default_value(&self) -> Option<&ModuleValue> {
        self.get(DEFAULT_EXPORT)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.values.keys().map(|k| k.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ModuleValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// copy all values of other into this mapping, on collision the value of other wins
    pub fn merge(&mut self, other: Exports) {
        self.values.extend(other.values);
    }

    /// what a caller receives, the default export if one is preferred and present, the whole mapping otherwise
    pub fn into_imported(self, prefer_default: bool) -> Imported {
        if prefer_default && self.contains_key(DEFAULT_EXPORT) {
            let mut values = self.values;
            match values.remove(DEFAULT_EXPORT) {
                Some(value) => Imported::Value(value),
                None => Imported::Namespace(Exports { values }),
            }
        } else {
            Imported::Namespace(self)
        }
    }
}

impl FromIterator<(String, ModuleValue)> for Exports {
    fn from_iter<T: IntoIterator<Item = (String, ModuleValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// the result of a use_module call
#[derive(Clone, Debug)]
pub enum Imported {
    Namespace(Exports),
    Value(ModuleValue),
}

impl Imported {
    pub fn as_namespace(&self) -> Option<&Exports> {
        match self {
            Imported::Namespace(e) => Some(e),
            _ => None,
        }
    }
    pub fn as_value(&self) -> Option<&ModuleValue> {
        match self {
            Imported::Value(v) => Some(v),
            _ => None,
        }
    }
}
