#![no_main]

use fluidic::{Namespaces, Preprocessor};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let mut namespaces = Namespaces::new();
    let preprocessor = Preprocessor::new();
    let masked = preprocessor.mask_literals(data);
    assert_eq!(masked.matches('\n').count(), data.matches('\n').count());
    if let Ok(output) = preprocessor.preprocess(data, &mut namespaces) {
        assert_eq!(output, masked);
    }
});
