//! Region labels

use serde::{Serialize, Serializer};
use std::fmt;

/// Text used for coordinates that resolve to no region
pub const NULL_LABEL: &str = "NULL";

/// Result of resolving one coordinate against one atlas.
///
/// Ordering: named regions sort before [`RegionLabel::Null`], and named
/// regions compare by name (byte order). Frequency tables use this order to
/// break count ties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionLabel {
    Region(String),
    /// Background, unmapped label id, or outside the volume
    Null,
}

impl RegionLabel {
    pub fn region(name: impl Into<String>) -> Self {
        RegionLabel::Region(name.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RegionLabel::Null)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RegionLabel::Region(name) => name,
            RegionLabel::Null => NULL_LABEL,
        }
    }
}

impl fmt::Display for RegionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RegionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
