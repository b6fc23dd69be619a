//! Fuzz target: postcard `SystemConfig` decoding
//!
//! Exercises the flash-storage decoder with arbitrary bytes, verifying:
//! - No panics on malformed input
//! - Any config that decodes and validates builds a controller
//! - A validated config survives an encode/decode cycle unchanged
//!
//! cargo fuzz run fuzz_config_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use pluo::app::service::ZoneController;
use pluo::config::SystemConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = postcard::from_bytes::<SystemConfig>(data) else {
        return;
    };
    if config.validate().is_err() {
        return;
    }

    let controller = ZoneController::from_config(&config).expect("validated config must build");
    assert_eq!(controller.len(), config.zones.len());

    let bytes = postcard::to_allocvec(&config).expect("encode");
    let again: SystemConfig = postcard::from_bytes(&bytes).expect("decode");
    assert_eq!(again, config);
});
