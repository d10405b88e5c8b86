use std::fmt;
use std::rc::Rc;

use crate::dom::memory::{self, NodeRef};
use crate::error::GtmResult;

/// One-shot `load` listener. It is dropped after it runs, so it fires at most once.
pub type LoadListener = Box<dyn FnOnce(&ScriptElement)>;

/// Handle to an element that can act as an insertion point.
#[derive(Clone)]
pub struct Element {
    backend: ElementBackend,
}

#[derive(Clone)]
enum ElementBackend {
    Memory(NodeRef),
    #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
    Web(web_sys::Element),
}

impl Element {
    pub(crate) fn from_memory(node: NodeRef) -> Self {
        Self {
            backend: ElementBackend::Memory(node),
        }
    }

    pub(crate) fn memory_node(&self) -> Option<&NodeRef> {
        match &self.backend {
            ElementBackend::Memory(node) => Some(node),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ElementBackend::Web(_) => None,
        }
    }

    /// Lower-case tag name; `#text` for text nodes.
    pub fn tag_name(&self) -> String {
        match &self.backend {
            ElementBackend::Memory(node) => node.borrow().tag_name().to_string(),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ElementBackend::Web(element) => element.tag_name().to_ascii_lowercase(),
        }
    }

    /// Text of a text node, `None` for elements.
    pub fn text_content(&self) -> Option<String> {
        match &self.backend {
            ElementBackend::Memory(node) => node.borrow().text_content().map(str::to_string),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ElementBackend::Web(element) => element.text_content(),
        }
    }

    /// Whether a script can be appended to this node. Void elements and text nodes cannot.
    pub fn can_accept_children(&self) -> bool {
        match &self.backend {
            ElementBackend::Memory(node) => node.borrow().accepts_children(),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ElementBackend::Web(element) => !memory::is_void_element(&element.tag_name()),
        }
    }

    /// Appends `script` as the last child of this element.
    pub fn append_child(&self, script: &ScriptElement) -> GtmResult<()> {
        match (&self.backend, &script.backend) {
            (ElementBackend::Memory(parent), ScriptBackend::Memory(child)) => {
                memory::append_child(parent, child)
            }
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            (ElementBackend::Web(parent), ScriptBackend::Web(child)) => {
                if !self.can_accept_children() {
                    return Err(crate::error::invalid_parent_element(format!(
                        "parentElement must be a DOM element (<{}> cannot contain children)",
                        self.tag_name()
                    )));
                }
                super::web::append_child(parent, child)
            }
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            _ => Err(foreign_node_error()),
        }
    }

    /// Appends another element as the last child of this element.
    pub fn append_element(&self, child: &Element) -> GtmResult<()> {
        match (&self.backend, &child.backend) {
            (ElementBackend::Memory(parent), ElementBackend::Memory(node)) => {
                memory::append_child(parent, node)
            }
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            (ElementBackend::Web(parent), ElementBackend::Web(node)) => {
                super::web::append_child(parent, node)
            }
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            _ => Err(foreign_node_error()),
        }
    }

    pub fn child_count(&self) -> usize {
        match &self.backend {
            ElementBackend::Memory(node) => node.borrow().child_count(),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ElementBackend::Web(element) => element.child_nodes().length() as usize,
        }
    }

    /// Script descendants in document order.
    pub fn scripts(&self) -> Vec<ScriptElement> {
        match &self.backend {
            ElementBackend::Memory(node) => memory::descendant_scripts(node)
                .into_iter()
                .map(ScriptElement::from_memory)
                .collect(),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ElementBackend::Web(element) => {
                super::web::scripts_in(&element.get_elements_by_tag_name("script"))
            }
        }
    }

    /// Returns `true` when both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Element) -> bool {
        match (&self.backend, &other.backend) {
            (ElementBackend::Memory(a), ElementBackend::Memory(b)) => Rc::ptr_eq(a, b),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            (ElementBackend::Web(a), ElementBackend::Web(b)) => js_sys::Object::is(a, b),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            _ => false,
        }
    }
}

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
impl From<web_sys::Element> for Element {
    fn from(element: web_sys::Element) -> Self {
        Self {
            backend: ElementBackend::Web(element),
        }
    }
}

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
fn foreign_node_error() -> crate::error::GtmError {
    crate::error::invalid_parent_element(
        "parentElement must be a DOM element of the same document kind",
    )
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag_name", &self.tag_name())
            .finish()
    }
}

/// Handle to a `<script>` node.
///
/// Clones share the node, so a handle kept by [`GtmSupport`](crate::support::GtmSupport) sees
/// every change made through the document and vice versa.
#[derive(Clone)]
pub struct ScriptElement {
    backend: ScriptBackend,
}

#[derive(Clone)]
enum ScriptBackend {
    Memory(NodeRef),
    #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
    Web(web_sys::HtmlScriptElement),
}

macro_rules! memory_script {
    ($node:expr, |$state:ident| $read:expr) => {{
        let node = $node.borrow();
        let $state = node
            .script_state()
            .expect("memory script handles always carry script state");
        $read
    }};
}

macro_rules! memory_script_mut {
    ($node:expr, |$state:ident| $write:expr) => {{
        let mut node = $node.borrow_mut();
        let $state = node
            .script_state_mut()
            .expect("memory script handles always carry script state");
        $write
    }};
}

impl ScriptElement {
    pub(crate) fn from_memory(node: NodeRef) -> Self {
        Self {
            backend: ScriptBackend::Memory(node),
        }
    }

    pub fn is_async(&self) -> bool {
        match &self.backend {
            ScriptBackend::Memory(node) => memory_script!(node, |state| state.is_async),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => script.async_(),
        }
    }

    pub fn set_async(&self, value: bool) {
        match &self.backend {
            ScriptBackend::Memory(node) => memory_script_mut!(node, |state| state.is_async = value),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => script.set_async(value),
        }
    }

    pub fn defer(&self) -> bool {
        match &self.backend {
            ScriptBackend::Memory(node) => memory_script!(node, |state| state.defer),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => script.defer(),
        }
    }

    pub fn set_defer(&self, value: bool) {
        match &self.backend {
            ScriptBackend::Memory(node) => memory_script_mut!(node, |state| state.defer = value),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => script.set_defer(value),
        }
    }

    /// The `nonce`, empty when unset.
    pub fn nonce(&self) -> String {
        match &self.backend {
            ScriptBackend::Memory(node) => memory_script!(node, |state| state.nonce.clone()),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => script.nonce(),
        }
    }

    pub fn set_nonce(&self, nonce: &str) {
        match &self.backend {
            ScriptBackend::Memory(node) => {
                memory_script_mut!(node, |state| state.nonce = nonce.to_string())
            }
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => script.set_nonce(nonce),
        }
    }

    /// The MIME `type`, empty when unset.
    pub fn script_type(&self) -> String {
        match &self.backend {
            ScriptBackend::Memory(node) => memory_script!(node, |state| state.script_type.clone()),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => script.type_(),
        }
    }

    pub fn set_script_type(&self, script_type: &str) {
        match &self.backend {
            ScriptBackend::Memory(node) => {
                memory_script_mut!(node, |state| state.script_type = script_type.to_string())
            }
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => script.set_type(script_type),
        }
    }

    /// The `src`, empty when unset.
    pub fn src(&self) -> String {
        match &self.backend {
            ScriptBackend::Memory(node) => memory_script!(node, |state| state.src.clone()),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => script.src(),
        }
    }

    pub fn set_src(&self, src: &str) {
        match &self.backend {
            ScriptBackend::Memory(node) => {
                memory_script_mut!(node, |state| state.src = src.to_string())
            }
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => script.set_src(src),
        }
    }

    /// Whether the script is attached to a document.
    pub fn is_connected(&self) -> bool {
        match &self.backend {
            ScriptBackend::Memory(node) => memory::is_connected(node),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => script.is_connected(),
        }
    }

    pub fn parent_element(&self) -> Option<Element> {
        match &self.backend {
            ScriptBackend::Memory(node) => node.borrow().parent().map(Element::from_memory),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => script.parent_element().map(Element::from),
        }
    }

    /// Installs the `load` listener, replacing any previous one.
    pub fn set_load_listener(&self, listener: LoadListener) {
        match &self.backend {
            ScriptBackend::Memory(node) => {
                memory_script_mut!(node, |state| state.load_listener = Some(listener))
            }
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => super::web::set_load_listener(script, self, listener),
        }
    }

    pub fn has_load_listener(&self) -> bool {
        match &self.backend {
            ScriptBackend::Memory(node) => {
                memory_script!(node, |state| state.load_listener.is_some())
            }
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => script.onload().is_some(),
        }
    }

    /// Fires the `load` event. Returns `true` when a listener ran.
    ///
    /// The in-memory document never loads anything by itself; hosts call this once the
    /// resource is available.
    pub fn dispatch_load(&self) -> bool {
        match &self.backend {
            ScriptBackend::Memory(node) => {
                let listener = memory_script_mut!(node, |state| state.load_listener.take());
                match listener {
                    Some(listener) => {
                        listener(self);
                        true
                    }
                    None => false,
                }
            }
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            ScriptBackend::Web(script) => super::web::dispatch_load(script),
        }
    }

    /// Returns `true` when both handles refer to the same node.
    pub fn ptr_eq(&self, other: &ScriptElement) -> bool {
        match (&self.backend, &other.backend) {
            (ScriptBackend::Memory(a), ScriptBackend::Memory(b)) => Rc::ptr_eq(a, b),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            (ScriptBackend::Web(a), ScriptBackend::Web(b)) => js_sys::Object::is(a, b),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            _ => false,
        }
    }
}

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
impl From<web_sys::HtmlScriptElement> for ScriptElement {
    fn from(script: web_sys::HtmlScriptElement) -> Self {
        Self {
            backend: ScriptBackend::Web(script),
        }
    }
}

impl PartialEq for ScriptElement {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ScriptElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptElement")
            .field("src", &self.src())
            .field("async", &self.is_async())
            .field("defer", &self.defer())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::dom::{Document, MemoryDocument};

    #[test]
    fn properties_default_to_empty() {
        let document = MemoryDocument::new();
        let script = document.create_script().unwrap();
        assert_eq!(script.src(), "");
        assert_eq!(script.nonce(), "");
        assert_eq!(script.script_type(), "");
        assert!(!script.is_async());
        assert!(!script.defer());
        assert!(!script.is_connected());
    }

    #[test]
    fn load_listener_runs_once() {
        let document = MemoryDocument::new();
        let script = document.create_script().unwrap();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let expected = script.clone();
        script.set_load_listener(Box::new(move |loaded| {
            assert_eq!(loaded, &expected);
            counter.set(counter.get() + 1);
        }));

        assert!(script.has_load_listener());
        assert!(script.dispatch_load());
        assert!(!script.dispatch_load());
        assert!(!script.has_load_listener());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn clones_share_the_node() {
        let document = MemoryDocument::new();
        let script = document.create_script().unwrap();
        let other = script.clone();
        other.set_src("https://example.com/a.js");
        assert_eq!(script.src(), "https://example.com/a.js");
        assert_eq!(script, other);
        assert_ne!(script, document.create_script().unwrap());
    }
}
