//! Property-based tests for DOI normalization.

use proptest::prelude::*;

use doi_bibtex_mcp::doi::normalize;

/// Registrant prefixes like `10.1234` or `10.1000.5`.
fn arb_prefix() -> impl Strategy<Value = String> {
    ("[0-9]{1,4}", prop::collection::vec("[0-9]{1,5}", 1..3))
        .prop_map(|(head, rest)| format!("{head}.{}", rest.join(".")))
}

/// Suffixes without whitespace or percent signs, so URL decoding is a no-op.
fn arb_suffix() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._;()<>:/-]{1,40}".prop_filter("no dot path segments", |suffix| {
        !suffix.split('/').any(|segment| segment == "." || segment == "..")
    })
}

fn arb_doi() -> impl Strategy<Value = String> {
    (arb_prefix(), arb_suffix()).prop_map(|(prefix, suffix)| format!("{prefix}/{suffix}"))
}

proptest! {
    /// Canonical DOIs normalize to themselves.
    #[test]
    fn canonical_is_fixed_point(doi in arb_doi()) {
        prop_assert_eq!(normalize(&doi).unwrap(), doi);
    }

    /// Normalization is idempotent across all accepted forms.
    #[test]
    fn normalize_idempotent(
        doi in arb_doi(),
        form in 0usize..4,
        pad in "[ \t]{0,3}",
    ) {
        let input = match form {
            0 => doi.clone(),
            1 => format!("doi:{doi}"),
            2 => format!("https://doi.org/{doi}"),
            _ => format!("http://dx.doi.org/{doi}"),
        };
        let input = format!("{pad}{input}{pad}");

        let once = normalize(&input).unwrap();
        prop_assert_eq!(&once, &doi);
        prop_assert_eq!(normalize(&once).unwrap(), once);
    }

    /// Strings without a slash are never DOIs.
    #[test]
    fn no_slash_rejected(input in "[^/]{0,40}") {
        let err = normalize(&input).unwrap_err();
        prop_assert_eq!(err.category(), "invalid-doi");
    }

    /// Accepted DOIs never carry dot path segments or control characters.
    #[test]
    fn accepted_doi_is_path_safe(input in any::<String>()) {
        if let Ok(doi) = normalize(&input) {
            prop_assert!(!doi.split('/').any(|segment| segment == "." || segment == ".."));
            prop_assert!(!doi.chars().any(char::is_control));
        }
    }

    /// Normalization never panics on arbitrary input.
    #[test]
    fn arbitrary_input_never_panics(input in any::<String>()) {
        let _ = normalize(&input);
    }
}
