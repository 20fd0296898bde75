//! Latest version selection over `git ls-remote` output.

use crate::error::Result;
use crate::version::{FeatureParser, PatternVariant};
use semver::Version;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Reduce `git ls-remote --tags` output to the latest version of every
/// feature.
///
/// Lines that are not feature tags are skipped. Versions are ordered by
/// semver precedence and the winner is returned in its original text.
///
/// # Errors
///
/// Returns `VersionParse` as soon as one feature tag carries a version that
/// is not valid semver; the whole output is rejected in that case.
pub fn latest_by_feature(parser: &FeatureParser, output: &str) -> Result<HashMap<String, String>> {
    let mut latest: HashMap<String, (Version, String)> = HashMap::new();

    for line in output.lines() {
        let Some(feature) = parser.parse(line.trim_end(), PatternVariant::TagRef) else {
            continue;
        };

        let version = Version::parse(&feature.version).map_err(|source| {
            crate::err!(VersionParse {
                version: feature.version.clone(),
                source,
            })
        })?;

        match latest.entry(feature.name) {
            Entry::Occupied(mut entry) => {
                if version > entry.get().0 {
                    entry.insert((version, feature.version));
                }
            }
            Entry::Vacant(entry) => {
                entry.insert((version, feature.version));
            }
        }
    }

    Ok(latest
        .into_iter()
        .map(|(name, (_, original))| (name, original))
        .collect())
}
