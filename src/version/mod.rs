//! Feature and version handling.
//!
//! Tags and refs encode a release line ("feature") and a semantic version
//! in a single string, e.g. `network-1.2.0`. This module splits those
//! strings apart and picks the latest version of every feature.
//!
//! # Example
//!
//! ```rust
//! use drdrei::version::{FeatureParser, PatternVariant};
//!
//! let parser = FeatureParser::new();
//! let feature = parser
//!     .parse("network-1.2.0", PatternVariant::GenericRef)
//!     .unwrap();
//! assert_eq!(feature.name, "network");
//! assert_eq!(feature.version, "1.2.0");
//! ```

mod feature;
mod latest;

pub use feature::{FeatureParser, PatternVariant};
pub use latest::latest_by_feature;
