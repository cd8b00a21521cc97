//! PMC identifier normalization and metadata key detection

use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal prefix of every canonical PMC identifier
pub const PMC_PREFIX: &str = "PMC";

/// A PubMed Central identifier in canonical form (`PMC` + accession)
///
/// The only way to build one is through [`PmcId::normalize`], so every value
/// of this type is already uppercase, trimmed and prefixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PmcId(String);

impl PmcId {
    /// Canonicalize an arbitrary user-supplied identifier.
    ///
    /// Trims surrounding whitespace, uppercases, and adds the `PMC` prefix
    /// when missing. Normalizing an already canonical value is a no-op.
    pub fn normalize(input: &str) -> Self {
        let upper = input.trim().to_uppercase();
        if upper.starts_with(PMC_PREFIX) {
            Self(upper)
        } else {
            Self(format!("{}{}", PMC_PREFIX, upper))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PmcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PmcId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether the input should be treated as a PMC identifier rather than a DOI.
///
/// True when it starts with `PMC` (any case) or is made only of digits.
pub fn looks_like_pmc(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed
        .get(..PMC_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(PMC_PREFIX))
    {
        return true;
    }
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

/// What the metadata endpoint was asked about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataKey {
    /// Needs conversion through the mapping store first
    Pmc(PmcId),
    /// Forwarded to the metadata API as is
    Doi(String),
}

impl MetadataKey {
    pub fn classify(input: &str) -> Self {
        if looks_like_pmc(input) {
            MetadataKey::Pmc(PmcId::normalize(input))
        } else {
            MetadataKey::Doi(input.trim().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_variants_agree() {
        let expected = "PMC2910419";
        for input in ["2910419", "pmc2910419", "PMC2910419", "  Pmc2910419\n"] {
            assert_eq!(PmcId::normalize(input).as_str(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = PmcId::normalize(" pmc3639165 ");
        let twice = PmcId::normalize(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(PmcId::normalize("   ").as_str(), "PMC");
    }

    #[test]
    fn test_looks_like_pmc() {
        assert!(looks_like_pmc("PMC2897429"));
        assert!(looks_like_pmc("pmc2897429"));
        assert!(looks_like_pmc("2897429"));
        assert!(looks_like_pmc(" 2897429 "));
        assert!(!looks_like_pmc("10.1371/journal.pone.0012345"));
        assert!(!looks_like_pmc(""));
        assert!(!looks_like_pmc("PM"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            MetadataKey::classify("2897429"),
            MetadataKey::Pmc(PmcId::normalize("PMC2897429"))
        );
        assert_eq!(
            MetadataKey::classify(" 10.1038/nature12373 "),
            MetadataKey::Doi("10.1038/nature12373".to_string())
        );
    }

    #[test]
    fn test_serde_transparent() {
        let id = PmcId::normalize("123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"PMC123\"");
    }
}
