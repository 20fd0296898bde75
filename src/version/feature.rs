//! Parsing of `<name>-<semver>` strings into features.

use crate::types::Feature;
use regex::Regex;

/// Which shape of text a [`FeatureParser`] should expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternVariant {
    /// A `git ls-remote` line: `<sha>\trefs/tags/<name>-<semver>`
    TagRef,
    /// A bare ref as written in a module source: `<name>-<semver>`
    GenericRef,
}

/// Splits git refs and tag lines into a feature name and a version.
///
/// The version must start with a `major.minor.patch` triple; anything after
/// it (pre-release, build metadata) is kept verbatim. The name group is
/// greedy, so a name that itself contains `-<d>.<d>.<d>` is split at the
/// last such boundary: `app-1.0.0-2.0.0` yields `app-1.0.0` and `2.0.0`.
///
/// Components may have several digits, so calendar-style tags such as
/// `backup-2024.01.15` match too. Their leading zeros are not valid semver,
/// and [`latest_by_feature`](crate::version::latest_by_feature) rejects the
/// whole listing when it meets one.
///
/// Both patterns are compiled once, when the parser is built.
#[derive(Debug, Clone)]
pub struct FeatureParser {
    tag_ref: Regex,
    generic_ref: Regex,
}

impl FeatureParser {
    /// Compile the tag and ref patterns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tag_ref: Regex::new(r"refs/tags/(.*)-(\d+\.\d+\.\d+.*)").expect("Invalid regex"),
            generic_ref: Regex::new(r"(.*)-(\d+\.\d+\.\d+.*)").expect("Invalid regex"),
        }
    }

    /// Parse `text` with the given pattern variant.
    ///
    /// Returns `None` when the text carries no `<name>-<semver>` pair, which
    /// means the ref is not version-pinned.
    #[must_use]
    pub fn parse(&self, text: &str, variant: PatternVariant) -> Option<Feature> {
        let pattern = match variant {
            PatternVariant::TagRef => &self.tag_ref,
            PatternVariant::GenericRef => &self.generic_ref,
        };

        let caps = pattern.captures(text)?;
        Some(Feature {
            name: caps.get(1)?.as_str().to_string(),
            version: caps.get(2)?.as_str().to_string(),
        })
    }
}

impl Default for FeatureParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("d6602ec5194c87b0fc87103ca4d67251c76f233a\trefs/tags/feature-1.1.0", "feature", "1.1.0"; "ls-remote line")]
    #[test_case("refs/tags/network-2.10.3", "network", "2.10.3"; "multi digit components")]
    #[test_case("abc\trefs/tags/db-1.0.0-rc.1", "db", "1.0.0-rc.1"; "pre-release suffix")]
    #[test_case("abc\trefs/tags/my-feature-3.2.1", "my-feature", "3.2.1"; "dashed name")]
    fn test_parse_tag_ref(text: &str, name: &str, version: &str) {
        let parser = FeatureParser::new();
        let feature = parser.parse(text, PatternVariant::TagRef).unwrap();
        assert_eq!(feature.name, name);
        assert_eq!(feature.version, version);
    }

    #[test_case("feature-1.1.0", "feature", "1.1.0"; "plain")]
    #[test_case("v-1.10.0", "v", "1.10.0"; "two digit minor")]
    #[test_case("api-gateway-0.4.2+build.7", "api-gateway", "0.4.2+build.7"; "build metadata")]
    #[test_case("app-1.0.0-2.0.0", "app-1.0.0", "2.0.0"; "greedy name split")]
    fn test_parse_generic_ref(text: &str, name: &str, version: &str) {
        let parser = FeatureParser::new();
        let feature = parser.parse(text, PatternVariant::GenericRef).unwrap();
        assert_eq!(feature.name, name);
        assert_eq!(feature.version, version);
    }

    #[test_case("main"; "branch")]
    #[test_case("v1.0.0"; "no separator")]
    #[test_case("feature-1.0"; "two components")]
    #[test_case("d6602ec5194c87b0fc87103ca4d67251c76f233a"; "commit sha")]
    #[test_case(""; "empty")]
    fn test_parse_generic_ref_without_version(text: &str) {
        let parser = FeatureParser::new();
        assert!(parser.parse(text, PatternVariant::GenericRef).is_none());
    }

    #[test]
    fn test_tag_ref_requires_tags_namespace() {
        let parser = FeatureParser::new();
        assert!(parser
            .parse("abc\trefs/heads/feature-1.0.0", PatternVariant::TagRef)
            .is_none());
        assert!(parser
            .parse("feature-1.0.0", PatternVariant::TagRef)
            .is_none());
    }

    #[test]
    fn test_round_trip_name_and_version() {
        let parser = FeatureParser::new();
        for (name, version) in [
            ("core", "0.0.1"),
            ("eks-cluster", "12.4.0"),
            ("s3_bucket", "1.2.3-beta.2"),
        ] {
            let feature = parser
                .parse(&format!("{name}-{version}"), PatternVariant::GenericRef)
                .unwrap();
            assert_eq!(feature.to_string(), format!("{name}-{version}"));
        }
    }
}
