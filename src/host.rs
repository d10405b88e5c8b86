//! The environment scripts are injected into: a document plus the global scope holding the
//! event queues.

use std::fmt;
use std::rc::Rc;

use crate::data_layer::{GlobalScope, MemoryGlobalScope};
use crate::dom::{Document, MemoryDocument};

#[derive(Clone)]
pub struct Host {
    document: Rc<dyn Document>,
    global: Rc<dyn GlobalScope>,
}

impl Host {
    pub fn new(document: Rc<dyn Document>, global: Rc<dyn GlobalScope>) -> Self {
        Self { document, global }
    }

    /// A fresh in-memory document and global scope.
    pub fn memory() -> Self {
        Self::new(
            Rc::new(MemoryDocument::new()),
            Rc::new(MemoryGlobalScope::new()),
        )
    }

    /// The browser `window` and its `document`, when running in a page.
    #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
    pub fn web() -> Option<Self> {
        let document = crate::dom::WebDocument::current()?;
        let global = crate::data_layer::WindowScope::current()?;
        Some(Self::new(Rc::new(document), Rc::new(global)))
    }

    /// The host of the current runtime: the page on `wasm32` with `wasm-web`, none elsewhere.
    pub fn detect() -> Option<Self> {
        #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
        {
            Self::web()
        }

        #[cfg(not(all(feature = "wasm-web", target_arch = "wasm32")))]
        {
            None
        }
    }

    pub fn document(&self) -> &dyn Document {
        self.document.as_ref()
    }

    pub fn global(&self) -> &dyn GlobalScope {
        self.global.as_ref()
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("scripts", &self.document.scripts().len())
            .finish()
    }
}
