//! An in-memory document tree.
//!
//! Only what script injection needs is modelled: element nesting, the script properties GTM
//! cares about and a single `load` listener per script.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::dom::element::{Element, LoadListener, ScriptElement};
use crate::dom::Document;
use crate::error::{invalid_parent_element, GtmResult};

pub(crate) type NodeRef = Rc<RefCell<MemoryNode>>;

const DOCUMENT_NODE: &str = "#document";
const TEXT_NODE: &str = "#text";

/// HTML void elements, which never have children.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

pub(crate) fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS.contains(&tag_name.to_ascii_lowercase().as_str())
}

pub(crate) struct MemoryNode {
    tag_name: String,
    text: Option<String>,
    /// The `#document` node that created this node; the root points at itself.
    owner: Weak<RefCell<MemoryNode>>,
    parent: Weak<RefCell<MemoryNode>>,
    children: Vec<NodeRef>,
    script: Option<ScriptState>,
}

#[derive(Default)]
pub(crate) struct ScriptState {
    pub(crate) src: String,
    pub(crate) is_async: bool,
    pub(crate) defer: bool,
    pub(crate) nonce: String,
    pub(crate) script_type: String,
    pub(crate) load_listener: Option<LoadListener>,
}

impl MemoryNode {
    fn element(tag_name: &str, owner: Weak<RefCell<MemoryNode>>) -> NodeRef {
        Rc::new(RefCell::new(MemoryNode {
            tag_name: tag_name.to_ascii_lowercase(),
            text: None,
            owner,
            parent: Weak::new(),
            children: Vec::new(),
            script: None,
        }))
    }

    fn text(text: &str, owner: Weak<RefCell<MemoryNode>>) -> NodeRef {
        Rc::new(RefCell::new(MemoryNode {
            tag_name: TEXT_NODE.to_string(),
            text: Some(text.to_string()),
            owner,
            parent: Weak::new(),
            children: Vec::new(),
            script: None,
        }))
    }

    fn script(owner: Weak<RefCell<MemoryNode>>) -> NodeRef {
        let node = Self::element("script", owner);
        node.borrow_mut().script = Some(ScriptState::default());
        node
    }

    pub(crate) fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub(crate) fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn accepts_children(&self) -> bool {
        self.text.is_none() && !is_void_element(&self.tag_name)
    }

    pub(crate) fn parent(&self) -> Option<NodeRef> {
        self.parent.upgrade()
    }

    pub(crate) fn script_state(&self) -> Option<&ScriptState> {
        self.script.as_ref()
    }

    pub(crate) fn script_state_mut(&mut self) -> Option<&mut ScriptState> {
        self.script.as_mut()
    }
}

/// Moves `child` under `parent`, detaching it from its previous parent first.
pub(crate) fn append_child(parent: &NodeRef, child: &NodeRef) -> GtmResult<()> {
    if !parent.borrow().accepts_children() {
        return Err(invalid_parent_element(format!(
            "parentElement must be a DOM element (<{}> cannot contain children)",
            parent.borrow().tag_name
        )));
    }
    if !Weak::ptr_eq(&parent.borrow().owner, &child.borrow().owner) {
        return Err(invalid_parent_element(
            "parentElement must be a DOM element of the document the script was created in",
        ));
    }
    if is_inclusive_ancestor(child, parent) {
        return Err(invalid_parent_element(
            "parentElement must not be the script itself or one of its descendants",
        ));
    }

    let previous = child.borrow().parent();
    if let Some(previous) = previous {
        previous
            .borrow_mut()
            .children
            .retain(|sibling| !Rc::ptr_eq(sibling, child));
    }
    child.borrow_mut().parent = Rc::downgrade(parent);
    parent.borrow_mut().children.push(child.clone());
    Ok(())
}

fn is_inclusive_ancestor(candidate: &NodeRef, node: &NodeRef) -> bool {
    let mut current = Some(node.clone());
    while let Some(next) = current {
        if Rc::ptr_eq(&next, candidate) {
            return true;
        }
        current = next.borrow().parent();
    }
    false
}

/// Whether the node is attached to a document tree.
pub(crate) fn is_connected(node: &NodeRef) -> bool {
    let mut current = node.clone();
    loop {
        let parent = current.borrow().parent();
        match parent {
            Some(parent) => current = parent,
            None => return current.borrow().tag_name == DOCUMENT_NODE,
        }
    }
}

/// Script descendants of `node` in document order.
pub(crate) fn descendant_scripts(node: &NodeRef) -> Vec<NodeRef> {
    let mut scripts = Vec::new();
    collect_scripts(node, &mut scripts);
    scripts
}

fn collect_scripts(node: &NodeRef, out: &mut Vec<NodeRef>) {
    for child in node.borrow().children.iter() {
        if child.borrow().script.is_some() {
            out.push(child.clone());
        }
        collect_scripts(child, out);
    }
}

fn find_child(node: &NodeRef, tag_name: &str) -> Option<NodeRef> {
    node.borrow()
        .children
        .iter()
        .find(|child| child.borrow().tag_name == tag_name)
        .cloned()
}

/// An in-memory stand-in for `window.document`.
///
/// A fresh document contains `<html>` with an empty `<head>` and `<body>`.
pub struct MemoryDocument {
    root: NodeRef,
    html: NodeRef,
}

impl MemoryDocument {
    pub fn new() -> Self {
        let document = Self::empty();
        for tag_name in ["head", "body"] {
            // Both nodes are fresh elements under <html>, appending cannot fail.
            let node = MemoryNode::element(tag_name, document.owner());
            let _ = append_child(&document.html, &node);
        }
        document
    }

    /// A document whose `<html>` element has neither `<head>` nor `<body>`.
    pub fn empty() -> Self {
        let root = MemoryNode::element(DOCUMENT_NODE, Weak::new());
        root.borrow_mut().owner = Rc::downgrade(&root);
        let html = MemoryNode::element("html", Rc::downgrade(&root));
        html.borrow_mut().parent = Rc::downgrade(&root);
        root.borrow_mut().children.push(html.clone());
        Self { root, html }
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> Element {
        Element::from_memory(self.html.clone())
    }

    pub fn create_element(&self, tag_name: &str) -> Element {
        let node = if tag_name.eq_ignore_ascii_case("script") {
            MemoryNode::script(self.owner())
        } else {
            MemoryNode::element(tag_name, self.owner())
        };
        Element::from_memory(node)
    }

    pub fn create_text_node(&self, text: &str) -> Element {
        Element::from_memory(MemoryNode::text(text, self.owner()))
    }

    /// Empties `<head>` and `<body>`, detaching every script the document contained.
    pub fn reset(&self) {
        for element in [self.head(), self.body()].into_iter().flatten() {
            if let Some(node) = element.memory_node() {
                let children = std::mem::take(&mut node.borrow_mut().children);
                for child in children {
                    child.borrow_mut().parent = Weak::new();
                }
            }
        }
    }

    fn owner(&self) -> Weak<RefCell<MemoryNode>> {
        Rc::downgrade(&self.root)
    }

    fn html_child(&self, tag_name: &str) -> Option<Element> {
        find_child(&self.html, tag_name).map(Element::from_memory)
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn create_script(&self) -> GtmResult<ScriptElement> {
        Ok(ScriptElement::from_memory(MemoryNode::script(self.owner())))
    }

    fn head(&self) -> Option<Element> {
        self.html_child("head")
    }

    fn body(&self) -> Option<Element> {
        self.html_child("body")
    }

    fn scripts(&self) -> Vec<ScriptElement> {
        descendant_scripts(&self.root)
            .into_iter()
            .map(ScriptElement::from_memory)
            .collect()
    }
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("scripts", &self.scripts().len())
            .finish()
    }
}
