//! Document abstraction used for script injection.
//!
//! [`MemoryDocument`] works everywhere; [`WebDocument`] drives the real DOM when the crate is
//! built with `wasm-web` for `wasm32`.

mod element;
mod memory;
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
mod web;

pub use element::{Element, LoadListener, ScriptElement};
pub use memory::MemoryDocument;
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub use web::WebDocument;

use crate::error::GtmResult;

/// The document scripts are created in and appended to.
pub trait Document {
    /// Creates a detached `<script>` element.
    fn create_script(&self) -> GtmResult<ScriptElement>;

    fn head(&self) -> Option<Element>;

    fn body(&self) -> Option<Element>;

    /// Every `<script>` element in the document, in document order.
    fn scripts(&self) -> Vec<ScriptElement>;
}
