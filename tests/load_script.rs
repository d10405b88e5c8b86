use std::cell::RefCell;
use std::rc::Rc;

use gtm_support::data_layer::{GlobalScope, MemoryGlobalScope};
use gtm_support::dom::{Document, MemoryDocument, ScriptElement};
use gtm_support::error::GtmErrorCode;
use gtm_support::{has_script, load_script, GtmQueryParams, Host, LoadScriptOptions};
use serde_json::Value;

struct Page {
    document: Rc<MemoryDocument>,
    global: Rc<MemoryGlobalScope>,
    host: Host,
}

fn page() -> Page {
    let document = Rc::new(MemoryDocument::new());
    let global = Rc::new(MemoryGlobalScope::new());
    let host = Host::new(document.clone(), global.clone());
    Page {
        document,
        global,
        host,
    }
}

fn assert_start_event(page: &Page, data_layer_name: &str) {
    let layer = page
        .host
        .global()
        .data_layer(data_layer_name)
        .expect("data layer is initialized");
    let start = layer
        .snapshot()
        .into_iter()
        .find(|record| record.event() == Some("gtm.js"))
        .expect("gtm.js event is pushed");
    assert!(matches!(start.get("gtm.start"), Some(Value::Number(_))));
}

struct ScriptChecks<'a> {
    src: &'a str,
    is_async: bool,
    defer: bool,
    nonce: &'a str,
    script_type: &'a str,
}

fn assert_single_script(page: &Page, script: &ScriptElement, checks: ScriptChecks<'_>) {
    let scripts = page.document.scripts();
    assert_eq!(scripts.len(), 1);
    assert_eq!(&scripts[0], script);
    assert_eq!(script.src(), checks.src);
    assert_eq!(script.is_async(), checks.is_async);
    assert_eq!(script.defer(), checks.defer);
    assert_eq!(script.nonce(), checks.nonce);
    assert_eq!(script.script_type(), checks.script_type);
}

const DEMO_SRC: &str = "https://www.googletagmanager.com/gtm.js?id=GTM-DEMO&l=dataLayer";

#[test]
fn loads_async_by_default() {
    let page = page();
    assert!(page.host.global().data_layer("dataLayer").is_none());
    assert!(page.document.scripts().is_empty());

    let script = load_script(&page.host, "GTM-DEMO", &LoadScriptOptions::new()).unwrap();

    assert_start_event(&page, "dataLayer");
    assert_single_script(
        &page,
        &script,
        ScriptChecks {
            src: DEMO_SRC,
            is_async: true,
            defer: false,
            nonce: "",
            script_type: "",
        },
    );
}

#[test]
fn compatibility_adds_defer_to_async() {
    let page = page();
    let options = LoadScriptOptions::new().with_compatibility(true);
    let script = load_script(&page.host, "GTM-DEMO", &options).unwrap();

    assert_start_event(&page, "dataLayer");
    assert_single_script(
        &page,
        &script,
        ScriptChecks {
            src: DEMO_SRC,
            is_async: true,
            defer: true,
            nonce: "",
            script_type: "",
        },
    );
}

#[test]
fn defer_replaces_async() {
    for compatibility in [false, true] {
        let page = page();
        let options = LoadScriptOptions::new()
            .with_defer(true)
            .with_compatibility(compatibility);
        let script = load_script(&page.host, "GTM-DEMO", &options).unwrap();

        assert_single_script(
            &page,
            &script,
            ScriptChecks {
                src: DEMO_SRC,
                is_async: false,
                defer: true,
                nonce: "",
                script_type: "",
            },
        );
    }
}

#[test]
fn sets_nonce_and_custom_data_layer() {
    let page = page();
    let options = LoadScriptOptions::new()
        .with_nonce("test")
        .with_data_layer_name("dataLayerDemo");
    let script = load_script(&page.host, "GTM-DEMO", &options).unwrap();

    assert_start_event(&page, "dataLayerDemo");
    assert!(page.global.data_layer("dataLayer").is_none());
    assert_single_script(
        &page,
        &script,
        ScriptChecks {
            src: "https://www.googletagmanager.com/gtm.js?id=GTM-DEMO&l=dataLayerDemo",
            is_async: true,
            defer: false,
            nonce: "test",
            script_type: "",
        },
    );
}

#[test]
fn sets_script_type() {
    let page = page();
    let options = LoadScriptOptions::new().with_script_type("text/test");
    let script = load_script(&page.host, "GTM-DEMO", &options).unwrap();

    assert_single_script(
        &page,
        &script,
        ScriptChecks {
            src: DEMO_SRC,
            is_async: true,
            defer: false,
            nonce: "",
            script_type: "text/test",
        },
    );
}

#[test]
fn appends_query_params() {
    let page = page();
    let options = LoadScriptOptions::new()
        .with_query_params(GtmQueryParams::new("auth", "preview", "cookies_win"));
    let script = load_script(&page.host, "GTM-DEMO", &options).unwrap();

    assert_eq!(
        script.src(),
        "https://www.googletagmanager.com/gtm.js?id=GTM-DEMO&l=dataLayer\
         &gtm_auth=auth&gtm_preview=preview&gtm_cookies_win=cookies_win"
    );
}

#[test]
fn appends_to_given_parent() {
    let page = page();
    let head = page.document.head().unwrap();
    let options = LoadScriptOptions::new().with_parent_element(head.clone());
    let script = load_script(&page.host, "GTM-DEMO", &options).unwrap();

    assert_eq!(page.document.scripts().len(), 1);
    assert_eq!(page.document.body().unwrap().child_count(), 0);
    assert_eq!(head.scripts(), vec![script.clone()]);
    assert_eq!(script.parent_element(), Some(head));
}

#[test]
fn rejects_parent_without_children() {
    let page = page();
    let image = page.document.create_element("img");
    page.document.body().unwrap().append_element(&image).unwrap();

    let options = LoadScriptOptions::new().with_parent_element(image);
    let err = load_script(&page.host, "GTM-DEMO", &options).unwrap_err();
    assert_eq!(err.code, GtmErrorCode::InvalidParentElement);
    assert!(page.document.scripts().is_empty());
}

#[test]
fn rejects_parent_from_another_document() {
    let page = page();
    let other = MemoryDocument::new();
    let options = LoadScriptOptions::new().with_parent_element(other.body().unwrap());

    let err = load_script(&page.host, "GTM-DEMO", &options).unwrap_err();
    assert_eq!(err.code, GtmErrorCode::InvalidParentElement);
    assert!(other.scripts().is_empty());
    assert!(!has_script(&page.host, None));
}

#[test]
fn rejects_document_without_body() {
    let host = Host::new(
        Rc::new(MemoryDocument::empty()),
        Rc::new(MemoryGlobalScope::new()),
    );
    let err = load_script(&host, "GTM-DEMO", &LoadScriptOptions::new()).unwrap_err();
    assert_eq!(err.code, GtmErrorCode::InvalidParentElement);
}

#[test]
fn uses_custom_source() {
    let page = page();
    let options = LoadScriptOptions::new().with_source("https://analytics.example.com/gtm.js");
    let script = load_script(&page.host, "GTM-DEMO", &options).unwrap();

    assert_start_event(&page, "dataLayer");
    assert_eq!(
        script.src(),
        "https://analytics.example.com/gtm.js?id=GTM-DEMO&l=dataLayer"
    );
}

#[test]
fn empty_id_only_initializes_data_layer() {
    let page = page();
    let script = load_script(&page.host, "", &LoadScriptOptions::new()).unwrap();

    assert_start_event(&page, "dataLayer");
    assert!(page.document.scripts().is_empty());
    assert!(!script.is_connected());
    assert_eq!(script.src(), "");
}

#[test]
fn on_ready_runs_once_after_load() {
    let page = page();
    let calls: Rc<RefCell<Vec<(String, ScriptElement)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = calls.clone();
    let options = LoadScriptOptions::new().with_on_ready(move |ready| {
        sink.borrow_mut().push((ready.id.clone(), ready.script.clone()));
    });

    let script = load_script(&page.host, "GTM-DEMO", &options).unwrap();
    assert!(calls.borrow().is_empty());

    assert!(page.document.scripts()[0].dispatch_load());
    assert!(!script.dispatch_load());

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "GTM-DEMO");
    assert_eq!(calls[0].1, script);
}

fn append_script(page: &Page, src: &str) {
    let script = page.document.create_script().unwrap();
    script.set_src(src);
    page.document.body().unwrap().append_child(&script).unwrap();
}

#[test]
fn has_script_finds_default_source() {
    let page = page();
    append_script(&page, "https://www.googletagmanager.com/gtm.js");
    assert!(has_script(&page.host, None));
}

#[test]
fn has_script_without_scripts() {
    let page = page();
    assert!(!has_script(&page.host, None));
}

#[test]
fn has_script_ignores_other_sources() {
    let page = page();
    append_script(&page, "https://www.google-analytics.com/analytics.js");
    assert!(!has_script(&page.host, None));
}

#[test]
fn has_script_finds_custom_source() {
    let page = page();
    append_script(&page, "https://analytics.example.com/gtm.js");
    assert!(has_script(
        &page.host,
        Some("https://analytics.example.com/gtm.js")
    ));
}

#[test]
fn has_script_among_several() {
    let page = page();
    append_script(&page, "https://www.google-analytics.com/analytics.js");
    append_script(&page, "https://www.googletagmanager.com/gtm.js");
    assert!(has_script(&page.host, None));
}
