//! Enables GTM on an in-memory page and tracks a view, an interaction and a custom push.

use gtm_support::logger::{set_log_level, LogLevel};
use gtm_support::{DataLayerObject, GtmSupport, GtmSupportOptions, Host, TrackEventOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    set_log_level(LogLevel::Info);

    let options = match GtmSupportOptions::from_env()? {
        Some(options) => options,
        None => GtmSupportOptions::new("GTM-DEMO").with_debug(true),
    };
    let mut gtm = GtmSupport::with_host(options, Host::memory())?;
    gtm.enable(true, None)?;

    for script in gtm.script_elements() {
        println!("Injected {}", script.src());
    }

    gtm.track_view("Home", "/", None);
    gtm.track_event(
        TrackEventOptions::new()
            .with_category("navigation")
            .with_action("open-menu")
            .with_label("header")
            .with_value(1),
    );
    gtm.push(DataLayerObject::event_named("signup").with("plan", "pro"));

    if let Some(layer) = gtm.data_layer() {
        println!("dataLayer now holds {} records:", layer.len());
        for record in layer.snapshot() {
            println!("  {}", record.to_value());
        }
    }

    Ok(())
}
