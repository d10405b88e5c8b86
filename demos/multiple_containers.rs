//! Loads two containers, one of them from a preview environment, through a server-side GTM
//! endpoint.

use gtm_support::{GtmIdContainer, GtmQueryParams, GtmSupport, GtmSupportOptions, Host};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = GtmSupportOptions::new(vec![
        GtmIdContainer::new("GTM-MAIN"),
        GtmIdContainer::new("GTM-PREVIEW")
            .with_query_params(GtmQueryParams::new("preview-auth", "env-5", "x")),
    ])
    .with_source("https://sgtm.example.com/gtm.js")
    .with_data_layer_name("gtmQueue")
    .with_compatibility(true);

    let mut gtm = GtmSupport::with_host(options, Host::memory())?;
    gtm.enable(true, Some("https://sgtm.example.com/gtm.js"))?;

    for script in gtm.script_elements() {
        println!(
            "{} (async: {}, defer: {})",
            script.src(),
            script.is_async(),
            script.defer()
        );
    }

    // A second enable finds the injected scripts and does nothing.
    gtm.enable(true, Some("https://sgtm.example.com/gtm.js"))?;
    println!("{} scripts after re-enabling", gtm.script_elements().len());

    Ok(())
}
