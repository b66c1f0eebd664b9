//! Property tests for the cache-busting rewriter.

use proptest::prelude::*;

use prospector_deploy::domain::services::rewrite_html;

fn asset_name() -> impl Strategy<Value = String> {
    let stem = proptest::string::string_regex("[a-z0-9_/-]{1,12}").unwrap();
    let ext = prop_oneof![
        Just("css"),
        Just("js"),
        Just("png"),
        Just("jpg"),
        Just("gif"),
        Just("webp"),
    ];
    (stem, ext).prop_map(|(stem, ext)| format!("{stem}.{ext}"))
}

fn reference(name: &str) -> String {
    if name.ends_with(".css") {
        format!(r#"<link href="{name}">"#)
    } else {
        format!(r#"<img src="{name}">"#)
    }
}

fn token() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[0-9]{1,14}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: rewriting never panics on arbitrary input.
    #[test]
    fn property_rewrite_never_panics(html in ".*", token in ".*") {
        let _ = rewrite_html(&html, &token);
    }

    /// PROPERTY: rewriting twice with the same token changes nothing more.
    #[test]
    fn property_rewrite_is_idempotent(
        names in proptest::collection::vec(asset_name(), 0..6),
        token in token(),
    ) {
        let html: String = names.iter().map(|n| reference(n)).collect();
        let once = rewrite_html(&html, &token).into_owned();
        let twice = rewrite_html(&once, &token).into_owned();
        prop_assert_eq!(once, twice);
    }

    /// PROPERTY: a new token replaces the old one instead of stacking.
    #[test]
    fn property_new_token_replaces_old(
        name in asset_name(),
        first in token(),
        second in token(),
    ) {
        let html = reference(&name);
        let first_pass = rewrite_html(&html, &first).into_owned();
        let second_pass = rewrite_html(&first_pass, &second).into_owned();

        prop_assert_eq!(second_pass.matches("?v=").count(), 1);
        let expected = format!("{}?v={}\"", name, second);
        prop_assert!(second_pass.contains(&expected));
    }

    /// PROPERTY: documents without matching asset references are returned as-is.
    #[test]
    fn property_plain_text_untouched(text in "[A-Za-z0-9 <>/=.]{0,80}", token in token()) {
        let out = rewrite_html(&text, &token);
        prop_assert_eq!(out.as_ref(), text.as_str());
    }
}
