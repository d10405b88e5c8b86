//! The `dataLayer` event queue and the global scope it lives on.
//!
//! A [`DataLayer`] is a shared handle: clones refer to the same underlying sequence, which is
//! append-only. On the web the handle wraps the JS array stored at `window[name]`, so records
//! pushed from Rust are visible to the GTM runtime and vice versa.

mod object;
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
mod web;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub use object::DataLayerObject;
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub use web::WindowScope;

use crate::constants::DEFAULT_DATA_LAYER_NAME;

#[derive(Clone)]
pub struct DataLayer {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Memory(Rc<RefCell<Vec<DataLayerObject>>>),
    #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
    Web(js_sys::Array),
}

impl DataLayer {
    /// Creates a detached, empty in-memory queue.
    pub fn new() -> Self {
        Self {
            backend: Backend::Memory(Rc::new(RefCell::new(Vec::new()))),
        }
    }

    #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
    pub(crate) fn from_js_array(array: js_sys::Array) -> Self {
        Self {
            backend: Backend::Web(array),
        }
    }

    /// Appends a record to the end of the queue.
    pub fn push(&self, record: DataLayerObject) {
        match &self.backend {
            Backend::Memory(records) => records.borrow_mut().push(record),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            Backend::Web(array) => web::push(array, &record),
        }
    }

    pub fn len(&self) -> usize {
        match &self.backend {
            Backend::Memory(records) => records.borrow().len(),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            Backend::Web(array) => array.length() as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the current records in insertion order.
    ///
    /// Entries pushed by foreign code that are not plain objects are skipped on the web.
    pub fn snapshot(&self) -> Vec<DataLayerObject> {
        match &self.backend {
            Backend::Memory(records) => records.borrow().clone(),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            Backend::Web(array) => web::snapshot(array),
        }
    }

    pub fn last(&self) -> Option<DataLayerObject> {
        match &self.backend {
            Backend::Memory(records) => records.borrow().last().cloned(),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            Backend::Web(_) => self.snapshot().pop(),
        }
    }

    /// Returns `true` when both handles refer to the same underlying queue.
    pub fn ptr_eq(&self, other: &DataLayer) -> bool {
        match (&self.backend, &other.backend) {
            (Backend::Memory(a), Backend::Memory(b)) => Rc::ptr_eq(a, b),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            (Backend::Web(a), Backend::Web(b)) => js_sys::Object::is(a, b),
            #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
            _ => false,
        }
    }
}

impl Default for DataLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DataLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataLayer")
            .field("len", &self.len())
            .finish()
    }
}

/// The host global object holding named event queues (`window` in a browser).
pub trait GlobalScope {
    /// Looks up the queue stored under `name` without creating it.
    fn data_layer(&self, name: &str) -> Option<DataLayer>;

    /// Returns the queue stored under `name`, creating and storing an empty one first if needed.
    /// An existing queue is never replaced.
    fn get_or_initialize_data_layer(&self, name: &str) -> DataLayer;
}

/// Ensures that the data layer is defined on `scope` and returns it.
///
/// `name` defaults to `dataLayer`.
pub fn get_or_initialize_data_layer(scope: &dyn GlobalScope, name: Option<&str>) -> DataLayer {
    scope.get_or_initialize_data_layer(name.unwrap_or(DEFAULT_DATA_LAYER_NAME))
}

/// In-memory global scope used off the web and in tests.
#[derive(Default)]
pub struct MemoryGlobalScope {
    layers: RefCell<HashMap<String, DataLayer>>,
}

impl MemoryGlobalScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of every queue created so far, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.layers.borrow().keys().cloned().collect();
        names.sort();
        names
    }
}

impl GlobalScope for MemoryGlobalScope {
    fn data_layer(&self, name: &str) -> Option<DataLayer> {
        self.layers.borrow().get(name).cloned()
    }

    fn get_or_initialize_data_layer(&self, name: &str) -> DataLayer {
        self.layers
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}

impl fmt::Debug for MemoryGlobalScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryGlobalScope")
            .field("names", &self.names())
            .finish()
    }
}
