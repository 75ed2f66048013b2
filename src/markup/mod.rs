//! a small arena based document tree
//!
//! The markup parser is provided by the host through the [MarkupParser] trait, it produces a [Document]
//! which the markup loader then rewrites, queries and finally exports.
//!
//! Like in a browser, the contents of a `<template>` element are not children of that element but live in a
//! separate fragment which is only reachable through [Document::template_contents], queries never descend into it.

use crate::resolver::ModuleUrl;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use string_cache::DefaultAtom as Atom;

/// the markup parsing primitive of the host
pub trait MarkupParser: Send + Sync {
    /// parse a fetched markup body into a document, like a browser parser this does not fail
    fn parse(&self, text: &str, url: &ModuleUrl) -> Document;
}

impl<F> MarkupParser for F
where
    F: Fn(&str, &ModuleUrl) -> Document + Send + Sync,
{
    fn parse(&self, text: &str, url: &ModuleUrl) -> Document {
        self(text, url)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
pub struct Attribute {
    pub name: Atom,
    pub value: String,
}

#[derive(Clone, Debug)]
pub struct Element {
    name: Atom,
    attrs: Vec<Attribute>,
    template_contents: Option<NodeId>,
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn attributes(&self) -> &[Attribute] {
        self.attrs.as_slice()
    }
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| &*a.name == name)
            .map(|a| a.value.as_str())
    }
    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }
}

#[derive(Clone, Debug)]
pub enum NodeData {
    Document,
    Fragment,
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: vec![],
                data: NodeData::Document,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn new_node(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node {
            parent: None,
            children: vec![],
            data,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// create a detached element, template elements get their (empty) content fragment
    pub fn create_element(&mut self, name: &str) -> NodeId {
        let name = Atom::from(name.to_ascii_lowercase());
        let template_contents = if &*name == "template" {
            Some(self.new_node(NodeData::Fragment))
        } else {
            None
        };
        self.new_node(NodeData::Element(Element {
            name,
            attrs: vec![],
            template_contents,
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.new_node(NodeData::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.new_node(NodeData::Comment(text.to_string()))
    }

    pub fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0].data
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes[node.0].data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node.0].data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes[node.0].children.as_slice()
    }

    /// the inert content fragment of a template element
    pub fn template_contents(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).and_then(|e| e.template_contents)
    }

    /// detach a node from its parent, the node stays valid and may be inserted again
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.remove(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.remove(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(0, child);
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|e| e.get_attribute(name))
    }

    /// set (or add) an attribute, this is a no-op for non element nodes
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let name = Atom::from(name.to_ascii_lowercase());
        if let Some(element) = self.element_mut(node) {
            match element.attrs.iter().position(|a| a.name == name) {
                Some(idx) => element.attrs[idx].value = value.to_string(),
                None => element.attrs.push(Attribute {
                    name,
                    value: value.to_string(),
                }),
            }
        }
    }

    /// all descendants of scope in document order, not including scope itself or any template contents
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut res = vec![];
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            res.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        res
    }

    /// querySelectorAll(tag)
    pub fn elements_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_ascii_lowercase();
        self.descendants(scope)
            .into_iter()
            .filter(|n| matches!(self.element(*n), Some(e) if e.name() == tag))
            .collect()
    }

    /// querySelectorAll([attr])
    pub fn elements_with_attribute(&self, scope: NodeId, attr: &str) -> Vec<NodeId> {
        let attr = attr.to_ascii_lowercase();
        self.descendants(scope)
            .into_iter()
            .filter(|n| matches!(self.element(*n), Some(e) if e.has_attribute(attr.as_str())))
            .collect()
    }

    /// the concatenated text of all text descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let mut res = String::new();
        if let NodeData::Text(t) = self.data(node) {
            res.push_str(t);
        }
        for n in self.descendants(node) {
            if let NodeData::Text(t) = self.data(n) {
                res.push_str(t);
            }
        }
        res
    }

    /// the head element, created (under the html element when there is one) if the document has none
    pub fn head(&mut self) -> NodeId {
        if let Some(head) = self.elements_by_tag(self.root(), "head").first() {
            return *head;
        }
        let parent = self
            .elements_by_tag(self.root(), "html")
            .first()
            .copied()
            .unwrap_or_else(|| self.root());
        let head = self.create_element("head");
        self.prepend_child(parent, head);
        head
    }
}

/// a shareable reference to a parsed document
///
/// this is the value a markup module exports by default and what inline scripts find in the registry
#[derive(Clone)]
pub struct DocumentHandle {
    inner: Arc<Mutex<Document>>,
}

impl DocumentHandle {
    pub fn new(document: Document) -> Self {
        Self {
            inner: Arc::new(Mutex::new(document)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// read from the document
    pub fn with<R, C: FnOnce(&Document) -> R>(&self, consumer: C) -> R {
        let guard = self.lock();
        consumer(&*guard)
    }

    /// mutate the document
    pub fn with_mut<R, C: FnOnce(&mut Document) -> R>(&self, consumer: C) -> R {
        let mut guard = self.lock();
        consumer(&mut *guard)
    }

    /// see if two handles refer to the same document
    pub fn ptr_eq(&self, other: &DocumentHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Debug for DocumentHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentHandle({:p})", Arc::as_ptr(&self.inner))
    }
}
