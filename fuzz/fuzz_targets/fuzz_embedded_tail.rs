//! Fuzz target: embedded identity trailer parser
//!
//! Feeds arbitrary bytes to `parse_image_tail` and `parse_image`.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - A successful parse always yields a complete bundle
//! - A tail without the marker is always rejected
//!
//! cargo fuzz run fuzz_embedded_tail

#![no_main]

use hoppyshare::config::MARKER;
use hoppyshare::error::ProvisionError;
use hoppyshare::provision::embedded::{find_marker, parse_image, parse_image_tail};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    match parse_image_tail(data) {
        Ok(bundle) => {
            assert!(bundle.is_complete(), "parser returned a partial bundle");
            assert!(find_marker(data).is_some());
        }
        Err(ProvisionError::MarkerNotFound { .. }) => {
            assert!(find_marker(data).is_none());
        }
        Err(_) => {}
    }

    // Same bytes behind a marker: must still never panic.
    let mut image = Vec::with_capacity(MARKER.len() + data.len());
    image.extend_from_slice(MARKER);
    image.extend_from_slice(data);
    let _ = parse_image(&image);
});
