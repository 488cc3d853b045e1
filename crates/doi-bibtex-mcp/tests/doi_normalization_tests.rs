//! DOI normalization tests.
//!
//! Covers every accepted input form and the rejection of non-DOIs.

use doi_bibtex_mcp::doi::{Doi, normalize};
use doi_bibtex_mcp::error::ConvertError;

// =============================================================================
// Accepted Forms
// =============================================================================

#[test]
fn test_bare_doi_unchanged() {
    assert_eq!(normalize("10.1038/nature12373").unwrap(), "10.1038/nature12373");
}

#[test]
fn test_three_canonical_forms_agree() {
    let forms = ["10.1234/x", "doi:10.1234/x", "https://doi.org/10.1234/x"];

    for form in forms {
        assert_eq!(normalize(form).unwrap(), "10.1234/x", "form: {form}");
    }
}

#[test]
fn test_resolver_url_variants() {
    let forms = [
        "https://doi.org/10.1234/x",
        "http://doi.org/10.1234/x",
        "https://dx.doi.org/10.1234/x",
        "http://dx.doi.org/10.1234/x",
        "doi.org/10.1234/x",
        "dx.doi.org/10.1234/x",
        "HTTPS://DOI.ORG/10.1234/x",
    ];

    for form in forms {
        assert_eq!(normalize(form).unwrap(), "10.1234/x", "form: {form}");
    }
}

#[test]
fn test_doi_tag_any_case() {
    for form in ["doi:10.1234/x", "DOI:10.1234/x", "Doi:10.1234/x", "doi: 10.1234/x"] {
        assert_eq!(normalize(form).unwrap(), "10.1234/x", "form: {form}");
    }
}

#[test]
fn test_url_then_doi_tag() {
    assert_eq!(normalize("https://doi.org/doi:10.1234/x").unwrap(), "10.1234/x");
}

#[test]
fn test_surrounding_whitespace_stripped() {
    assert_eq!(normalize("  \t10.1234/x\n").unwrap(), "10.1234/x");
    assert_eq!(normalize("\n https://doi.org/10.1234/x  ").unwrap(), "10.1234/x");
}

#[test]
fn test_multi_segment_registrant() {
    assert_eq!(normalize("10.1000.10/abc").unwrap(), "10.1000.10/abc");
}

#[test]
fn test_suffix_may_contain_slashes_and_punctuation() {
    let doi = "10.1002/(SICI)1097-4636(199807)41:1<1::AID-JBM1>3.0.CO;2-X";
    assert_eq!(normalize(doi).unwrap(), doi);

    assert_eq!(normalize("10.1000/a/b/c").unwrap(), "10.1000/a/b/c");
}

#[test]
fn test_url_form_is_percent_decoded() {
    assert_eq!(normalize("https://doi.org/10.1000/a%2Fb").unwrap(), "10.1000/a/b");
    assert_eq!(normalize("https://doi.org/10.1000/x%3Cy%3E").unwrap(), "10.1000/x<y>");
}

#[test]
fn test_bare_form_is_literal() {
    assert_eq!(normalize("10.1000/a%2Fb").unwrap(), "10.1000/a%2Fb");
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_normalization_idempotent() {
    let inputs = [
        "10.1234/x",
        "doi:10.1038/nature12373",
        "https://dx.doi.org/10.1000/a%2Fb",
        "  DOI:10.1002/(SICI)1097-4636  ",
    ];

    for input in inputs {
        let once = normalize(input).unwrap();
        let twice = normalize(&once).unwrap();
        assert_eq!(once, twice, "input: {input}");
    }
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn test_not_a_doi_rejected() {
    let err = normalize("not-a-doi").unwrap_err();
    assert!(matches!(err, ConvertError::InvalidDoi { ref input } if input == "not-a-doi"));
}

#[test]
fn test_invalid_shapes_rejected() {
    let inputs = [
        "",
        "   ",
        "doi:",
        "https://doi.org/",
        "10.1234",
        "10.1234/",
        "/suffix",
        "10/x",
        "abc.def/x",
        "10.12a/x",
        "10.1234/x\nnext line",
        "https://example.org/10.1234/x",
        "urn:doi:10.1234/x",
    ];

    for input in inputs {
        let err = normalize(input).unwrap_err();
        assert_eq!(err.category(), "invalid-doi", "input: {input:?}");
    }
}

#[test]
fn test_dot_path_segments_rejected() {
    let inputs = [
        "10.1234/.",
        "10.1234/..",
        "10.1234/a/./b",
        "10.1234/x/../y",
        "https://doi.org/10.1234/x/%2E%2E/y",
        "doi:10.1234/x/..",
    ];

    for input in inputs {
        let err = normalize(input).unwrap_err();
        assert_eq!(err.category(), "invalid-doi", "input: {input:?}");
    }
}

#[test]
fn test_dots_inside_segments_allowed() {
    for doi in ["10.1234/a.b", "10.1234/...x", "10.1234/x../y", "10.1234/v1.0/..."] {
        assert_eq!(normalize(doi).unwrap(), doi);
    }
}

#[test]
fn test_control_characters_rejected() {
    let inputs = ["10.1234/x\ry", "10.1234/a\u{7}b", "https://doi.org/10.1234/x%0Dy", "10.1234/x\ty"];

    for input in inputs {
        let err = normalize(input).unwrap_err();
        assert_eq!(err.category(), "invalid-doi", "input: {input:?}");
        assert!(!err.to_user_message().contains('\r'));
    }
}

#[test]
fn test_invalid_message_cites_original_input() {
    let err = normalize("  https://doi.org/garbage ").unwrap_err();
    assert!(err.to_string().contains("https://doi.org/garbage"));
}

#[test]
fn test_invalid_message_snapshot() {
    let err = normalize("not-a-doi").unwrap_err();
    insta::assert_snapshot!(
        err.to_user_message(),
        @r#"Error (invalid-doi): Invalid DOI "not-a-doi": expected a DOI like '10.1234/example'"#
    );
}

#[test]
fn test_invalid_never_retryable() {
    assert!(!normalize("nope").unwrap_err().is_retryable());
}

// =============================================================================
// Doi Type
// =============================================================================

#[test]
fn test_doi_from_str() {
    let doi: Doi = "doi:10.1038/nature12373".parse().unwrap();
    assert_eq!(doi.as_str(), "10.1038/nature12373");
    assert_eq!(doi.original(), "doi:10.1038/nature12373");
    assert_eq!(doi.prefix(), "10.1038");
    assert_eq!(doi.suffix(), "nature12373");
}

#[test]
fn test_doi_equality_tracks_original() {
    let a = Doi::parse("10.1234/x").unwrap();
    let b = Doi::parse("doi:10.1234/x").unwrap();
    assert_eq!(a.as_str(), b.as_str());
    assert_ne!(a, b);
}
