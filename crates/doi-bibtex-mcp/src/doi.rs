//! DOI normalization.
//!
//! Accepts a DOI as typed by a human or pasted by an agent and reduces it to the
//! canonical `<prefix>/<suffix>` form the registry expects:
//!
//! - `10.1234/example`
//! - `doi:10.1234/example` (any case)
//! - `https://doi.org/10.1234/example`, `http://dx.doi.org/10.1234/example`
//!
//! Resolver URLs are percent-decoded; bare and `doi:` forms are taken literally.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ConvertError, ConvertResult};

static RESOLVER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:dx\.)?doi\.org/").expect("valid resolver prefix regex")
});

/// Numeric registrant code with at least one dot, then a non-empty suffix free of
/// control characters.
static DOI_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(?:\.[0-9]+)+/[^\p{Cc}]+$").expect("valid DOI shape regex")
});

const DOI_TAG: &str = "doi:";

/// A normalized DOI.
///
/// Displays as the canonical form; [`Doi::original`] keeps the trimmed input
/// so error messages can quote what the caller actually sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Doi {
    canonical: String,
    original: String,
}

impl Doi {
    /// Parse and normalize a DOI.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidDoi`] if the input is not a DOI in any accepted form.
    pub fn parse(input: &str) -> ConvertResult<Self> {
        let canonical = normalize(input)?;
        Ok(Self { canonical, original: input.trim().to_string() })
    }

    /// Canonical `<prefix>/<suffix>` form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// The trimmed input this DOI was parsed from.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Registrant prefix, e.g. `10.1038`.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.canonical.split_once('/').map_or("", |(prefix, _)| prefix)
    }

    /// Item suffix, e.g. `nature12373`. May itself contain `/`.
    #[must_use]
    pub fn suffix(&self) -> &str {
        self.canonical.split_once('/').map_or("", |(_, suffix)| suffix)
    }
}

impl fmt::Display for Doi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Doi {
    type Err = ConvertError;

    fn from_str(s: &str) -> ConvertResult<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Doi {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}

/// Normalize any accepted DOI form to its canonical string.
///
/// # Errors
///
/// Returns [`ConvertError::InvalidDoi`] citing `input` if the result does not
/// have DOI shape, or if its suffix has a `.` or `..` path segment (URL
/// resolution would collapse those, so the registry would see another DOI).
pub fn normalize(input: &str) -> ConvertResult<String> {
    let trimmed = input.trim();

    let candidate = match RESOLVER_PREFIX.find(trimmed) {
        Some(m) => urlencoding::decode(&trimmed[m.end()..])
            .map_err(|_| ConvertError::invalid_doi(input))?
            .into_owned(),
        None => trimmed.to_string(),
    };

    let candidate = strip_doi_tag(&candidate).trim();

    if DOI_SHAPE.is_match(candidate) && !has_dot_segment(candidate) {
        Ok(candidate.to_string())
    } else {
        Err(ConvertError::invalid_doi(input))
    }
}

fn has_dot_segment(doi: &str) -> bool {
    doi.split('/').any(|segment| segment == "." || segment == "..")
}

fn strip_doi_tag(s: &str) -> &str {
    match s.get(..DOI_TAG.len()) {
        Some(tag) if tag.eq_ignore_ascii_case(DOI_TAG) => &s[DOI_TAG.len()..],
        _ => s,
    }
}
