#![no_main]

use libfuzzer_sys::fuzz_target;
use vaul_widgets::drawer::{
    DEFAULT_CLOSE_THRESHOLD, DEFAULT_VELOCITY_THRESHOLD, DrawerAttribute, DrawerAttributes,
};

fuzz_target!(|input: (String, Option<String>, Option<String>)| {
    let (name, value, other) = input;

    if let Some(attribute) = DrawerAttribute::decode(&name, value.as_deref()) {
        assert_eq!(attribute.name(), name);
    }

    let attrs = DrawerAttributes::decode(|key| match key {
        "velocity-threshold" | "direction" => value.clone(),
        _ => other.clone(),
    });
    assert!(attrs.velocity_threshold.is_finite() && attrs.velocity_threshold > 0.0);
    assert!(attrs.close_threshold > 0.0 && attrs.close_threshold <= 1.0);
    if value.is_none() {
        assert_eq!(attrs.velocity_threshold, DEFAULT_VELOCITY_THRESHOLD);
    }
    if other.is_none() {
        assert_eq!(attrs.close_threshold, DEFAULT_CLOSE_THRESHOLD);
    }
});
