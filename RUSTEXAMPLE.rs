use std::error::Error;

use gtm_support::{GtmQueryParams, GtmSupport, GtmSupportOptions, TrackEventOptions};

fn main() -> Result<(), Box<dyn Error>> {
    // TODO: Replace the placeholder container id with the one from your GTM workspace.
    let options = GtmSupportOptions::new("GTM-XXXXXXX")
        .with_query_params(GtmQueryParams::new("your-auth", "env-1", "x"))
        .with_debug(cfg!(debug_assertions));

    // Binds `window` and `document` when built for wasm32 with the `wasm-web` feature.
    let mut gtm = GtmSupport::new(options)?;
    if !gtm.is_in_browser_context() {
        println!("Not running in a page; GTM calls are no-ops.");
    }

    gtm.enable(true, None)?;
    gtm.track_view("Checkout", "/checkout", None);
    gtm.track_event(
        TrackEventOptions::new()
            .with_event("purchase")
            .with_category("checkout")
            .with_value(42.5)
            .with_field("currency", "EUR"),
    );

    Ok(())
}
