use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCollection, HtmlScriptElement, Node};

use crate::dom::element::{Element, LoadListener, ScriptElement};
use crate::dom::Document;
use crate::error::{internal_error, invalid_parent_element, GtmResult};

/// The browser `window.document`.
#[derive(Clone, Debug)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// Binds to `window.document`, if the global scope has one.
    pub fn current() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
    }
}

impl Document for WebDocument {
    fn create_script(&self) -> GtmResult<ScriptElement> {
        let script = self
            .document
            .create_element("script")
            .map_err(|err| internal_error(format!("Failed to create script: {}", js_message(err))))?
            .dyn_into::<HtmlScriptElement>()
            .map_err(|_| internal_error("Script element has wrong type"))?;
        Ok(ScriptElement::from(script))
    }

    fn head(&self) -> Option<Element> {
        self.document
            .head()
            .map(|head| Element::from(web_sys::Element::from(head)))
    }

    fn body(&self) -> Option<Element> {
        self.document
            .body()
            .map(|body| Element::from(web_sys::Element::from(body)))
    }

    fn scripts(&self) -> Vec<ScriptElement> {
        scripts_in(&self.document.get_elements_by_tag_name("script"))
    }
}

pub(crate) fn scripts_in(collection: &HtmlCollection) -> Vec<ScriptElement> {
    (0..collection.length())
        .filter_map(|index| collection.item(index))
        .filter_map(|element| element.dyn_into::<HtmlScriptElement>().ok())
        .map(ScriptElement::from)
        .collect()
}

pub(crate) fn append_child(parent: &web_sys::Element, child: &Node) -> GtmResult<()> {
    if let (Some(parent_document), Some(child_document)) =
        (parent.owner_document(), child.owner_document())
    {
        if !js_sys::Object::is(&parent_document, &child_document) {
            return Err(invalid_parent_element(
                "parentElement must be a DOM element of the document the script was created in",
            ));
        }
    }
    parent.append_child(child).map(|_| ()).map_err(|err| {
        invalid_parent_element(format!(
            "parentElement must be a DOM element: {}",
            js_message(err)
        ))
    })
}

/// Wires `listener` as `onload`. The handler clears `onload` after running so it fires once.
pub(crate) fn set_load_listener(
    script: &HtmlScriptElement,
    handle: &ScriptElement,
    listener: LoadListener,
) {
    let target = script.clone();
    let handle = handle.clone();
    let callback = Closure::once_into_js(move || {
        listener(&handle);
        target.set_onload(None);
    });
    script.set_onload(Some(callback.unchecked_ref()));
}

pub(crate) fn dispatch_load(script: &HtmlScriptElement) -> bool {
    let had_listener = script.onload().is_some();
    match web_sys::Event::new("load") {
        Ok(event) => {
            let _ = script.dispatch_event(&event);
            had_listener
        }
        Err(err) => {
            log::warn!("failed to create load event: {}", js_message(err));
            false
        }
    }
}

fn js_message(value: JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        String::from(error.message())
    } else if let Some(string) = value.as_string() {
        string
    } else {
        format!("{value:?}")
    }
}
