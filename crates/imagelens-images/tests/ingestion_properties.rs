//! Property-based tests for classification and normalization.

use imagelens_images::normalizer::{check_size, scaled_dimensions};
use imagelens_images::source::{is_inline_data, is_url};
use imagelens_images::*;
use proptest::prelude::*;

proptest! {
    /// Classification picks exactly one variant and agrees with the predicates.
    #[test]
    fn prop_classification_is_exclusive(source in ".{0,80}") {
        let classified = ImageSource::classify(&source);
        let expected = if is_url(&source) {
            SourceKind::Url
        } else if is_inline_data(&source) {
            SourceKind::Base64
        } else {
            SourceKind::File
        };
        prop_assert_eq!(classified.kind(), expected);
    }

    /// Absolute http(s) URLs with a host always classify as URLs.
    #[test]
    fn prop_http_urls_classify_as_url(
        scheme in prop_oneof![Just("http"), Just("https")],
        host in "[a-z]{1,12}\\.(com|org|net)",
        path in "[a-z0-9/]{0,20}",
    ) {
        let source = format!("{scheme}://{host}/{path}");
        prop_assert_eq!(ImageSource::classify(&source).kind(), SourceKind::Url);
    }

    /// Data-URL prefixed strings classify as inline data regardless of payload.
    #[test]
    fn prop_data_urls_classify_as_inline(payload in "[ -~]{0,40}") {
        let source = format!("data:image/png;base64,{payload}");
        prop_assert_eq!(ImageSource::classify(&source).kind(), SourceKind::Base64);
    }

    /// Payloads over the limit always fail the size check.
    #[test]
    fn prop_oversized_payloads_rejected(max_mb in 0.001f64..2.0, extra in 1usize..4096) {
        let len = (max_mb * 1024.0 * 1024.0).ceil() as usize + extra;
        let result = check_size(len, max_mb);
        let is_too_large = matches!(result, Err(ImageError::TooLarge { .. }));
        prop_assert!(is_too_large);
    }

    /// Downscaling pins the larger side to the limit and keeps the aspect ratio.
    #[test]
    fn prop_resize_preserves_aspect(width in 1u32..20_000, height in 1u32..20_000) {
        match scaled_dimensions(width, height, MAX_DIMENSION) {
            None => prop_assert!(width <= MAX_DIMENSION && height <= MAX_DIMENSION),
            Some((w, h)) => {
                prop_assert!(width > MAX_DIMENSION || height > MAX_DIMENSION);
                prop_assert_eq!(w.max(h), MAX_DIMENSION);
                prop_assert!(w >= 1 && h >= 1);

                // The shorter side is the exact proportional value, rounded
                let (long, short, out_short) = if width >= height {
                    (width, height, h)
                } else {
                    (height, width, w)
                };
                let exact = short as f64 * MAX_DIMENSION as f64 / long as f64;
                prop_assert!((out_short as f64 - exact).abs() <= 0.5 || out_short == 1);
            }
        }
    }
}
