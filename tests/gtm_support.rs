use std::rc::Rc;

use gtm_support::data_layer::MemoryGlobalScope;
use gtm_support::dom::{Document, MemoryDocument};
use gtm_support::{
    ContainerIds, DataLayerObject, GtmSupport, GtmSupportOptions, Host, TrackEventOptions,
};
use serde_json::{json, Value};

fn memory_host() -> (Rc<MemoryDocument>, Host) {
    let document = Rc::new(MemoryDocument::new());
    let host = Host::new(document.clone(), Rc::new(MemoryGlobalScope::new()));
    (document, host)
}

fn data_layer_values(gtm: &GtmSupport) -> Vec<Value> {
    gtm.data_layer()
        .map(|layer| layer.snapshot().iter().map(DataLayerObject::to_value).collect())
        .unwrap_or_default()
}

#[test]
fn applies_default_options() {
    let (_, host) = memory_host();
    let gtm = GtmSupport::with_host(GtmSupportOptions::new("GTM-DEMO"), host).unwrap();
    let options = gtm.options();
    assert!(options.enabled);
    assert!(!options.debug);
    assert!(options.load_script);
    assert!(!options.defer);
    assert!(!options.compatibility);
    assert_eq!(options.data_layer_name, "dataLayer");
}

#[test]
fn accepts_every_id_shape() {
    let (_, host) = memory_host();
    let gtm = GtmSupport::with_host(
        GtmSupportOptions::from_json(r#"{"id": [{"id": "GTM-DEMO1"}, {"id": "GTM-DEMO2"}]}"#)
            .unwrap(),
        host,
    )
    .unwrap();
    match gtm.id() {
        ContainerIds::Containers(containers) => {
            let ids: Vec<&str> = containers.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, ["GTM-DEMO1", "GTM-DEMO2"]);
        }
        other => panic!("unexpected id shape: {other:?}"),
    }
}

#[test]
fn browser_context_check_is_overridable() {
    let (_, host) = memory_host();
    let mut gtm = GtmSupport::with_host(GtmSupportOptions::new("GTM-DEMO"), host).unwrap();
    assert!(gtm.is_in_browser_context());
    gtm.set_browser_context_check(|| false);
    assert!(!gtm.is_in_browser_context());
    assert!(gtm.data_layer().is_none());
}

#[test]
fn enable_loads_scripts_into_document() {
    let (document, host) = memory_host();
    let mut gtm = GtmSupport::with_host(
        GtmSupportOptions::new(["GTM-DEMO1", "GTM-DEMO2"]).with_defer(true),
        host,
    )
    .unwrap();
    gtm.enable(true, None).unwrap();

    let scripts = document.scripts();
    assert_eq!(scripts.len(), 2);
    assert_eq!(scripts, gtm.script_elements());
    assert!(scripts.iter().all(|script| script.defer() && !script.is_async()));
    assert_eq!(
        scripts[0].src().replace("GTM-DEMO1", "GTM-DEMO2"),
        scripts[1].src()
    );

    let starts = data_layer_values(&gtm)
        .into_iter()
        .filter(|record| record["event"] == json!("gtm.js"))
        .count();
    assert_eq!(starts, 2);
}

#[test]
fn enable_skips_when_script_already_present() {
    let (document, host) = memory_host();
    let existing = document.create_script().unwrap();
    existing.set_src("https://www.googletagmanager.com/gtm.js?id=GTM-OTHER");
    document.body().unwrap().append_child(&existing).unwrap();

    let mut gtm = GtmSupport::with_host(GtmSupportOptions::new("GTM-DEMO"), host).unwrap();
    gtm.enable(true, None).unwrap();
    assert!(gtm.script_elements().is_empty());
    assert_eq!(document.scripts().len(), 1);

    gtm.enable(true, Some("https://sgtm.example.com/gtm.js")).unwrap();
    assert_eq!(gtm.script_elements().len(), 1);
    assert_eq!(
        gtm.script_elements()[0].src(),
        "https://www.googletagmanager.com/gtm.js?id=GTM-DEMO&l=dataLayer"
    );
}

#[test]
fn tracks_view() {
    let (_, host) = memory_host();
    let gtm = GtmSupport::with_host(GtmSupportOptions::new("GTM-DEMO"), host).unwrap();
    gtm.track_view(
        "ScreenName",
        "Path",
        Some(DataLayerObject::new().with("section", "docs")),
    );
    assert_eq!(
        data_layer_values(&gtm),
        vec![json!({
            "section": "docs",
            "event": "content-view",
            "content-name": "Path",
            "content-view-name": "ScreenName"
        })]
    );
}

#[test]
fn tracks_default_event() {
    let (_, host) = memory_host();
    let gtm = GtmSupport::with_host(GtmSupportOptions::new("GTM-DEMO"), host).unwrap();
    gtm.track_event(TrackEventOptions::default());
    assert_eq!(
        data_layer_values(&gtm),
        vec![json!({
            "event": "interaction",
            "target": null,
            "action": null,
            "target-properties": null,
            "value": null,
            "interaction-type": false
        })]
    );
}

#[test]
fn disabled_instance_leaves_queue_untouched() {
    let (_, host) = memory_host();
    let mut gtm = GtmSupport::with_host(GtmSupportOptions::new("GTM-DEMO"), host.clone()).unwrap();
    gtm.enable(false, None).unwrap();
    gtm.track_view("ScreenName", "Path", None);
    gtm.track_event(TrackEventOptions::new().with_event("click"));
    gtm.push(DataLayerObject::event_named("custom"));
    assert!(host.global().data_layer("dataLayer").is_none());

    gtm.enable(true, None).unwrap();
    gtm.push(DataLayerObject::event_named("custom"));
    let events: Vec<Value> = data_layer_values(&gtm)
        .into_iter()
        .map(|record| record["event"].clone())
        .collect();
    assert_eq!(events, vec![json!("gtm.js"), json!("custom")]);
}

#[test]
fn instances_share_the_named_queue() {
    let (_, host) = memory_host();
    let first = GtmSupport::with_host(GtmSupportOptions::new("GTM-ONE"), host.clone()).unwrap();
    let second = GtmSupport::with_host(GtmSupportOptions::new("G-TWO"), host).unwrap();
    first.push(DataLayerObject::event_named("a"));
    second.push(DataLayerObject::event_named("b"));
    assert!(first
        .data_layer()
        .unwrap()
        .ptr_eq(&second.data_layer().unwrap()));
    assert_eq!(data_layer_values(&first).len(), 2);
}
