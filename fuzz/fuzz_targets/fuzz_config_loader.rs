#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = kiosk_config::load_toml(data) {
        if cfg.validate().is_ok() {
            let ranges = kiosk_core::ranges_from_config(&cfg.parcels);
            for w in [0.0, 0.05, 0.1, 1.0, 9.99, 10.0, 1e6] {
                let _ = kiosk_core::size_for_weight(&ranges, w);
            }
        }
    }
});
