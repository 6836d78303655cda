use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// HL7 v2.x version identifier (MSH-12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Hl7Version {
    #[serde(rename = "2.1")]
    V2_1,
    #[serde(rename = "2.2")]
    V2_2,
    #[serde(rename = "2.3")]
    V2_3,
    #[serde(rename = "2.3.1")]
    V2_3_1,
    #[serde(rename = "2.4")]
    V2_4,
    #[serde(rename = "2.5")]
    V2_5,
    #[serde(rename = "2.5.1")]
    V2_5_1,
    #[serde(rename = "2.6")]
    V2_6,
    #[serde(rename = "2.7")]
    V2_7,
    #[serde(rename = "2.7.1")]
    V2_7_1,
    #[serde(rename = "2.8")]
    V2_8,
    #[serde(rename = "2.8.1")]
    V2_8_1,
    #[serde(rename = "2.8.2")]
    V2_8_2,
}

impl Hl7Version {
    pub const ALL: [Hl7Version; 13] = [
        Hl7Version::V2_1,
        Hl7Version::V2_2,
        Hl7Version::V2_3,
        Hl7Version::V2_3_1,
        Hl7Version::V2_4,
        Hl7Version::V2_5,
        Hl7Version::V2_5_1,
        Hl7Version::V2_6,
        Hl7Version::V2_7,
        Hl7Version::V2_7_1,
        Hl7Version::V2_8,
        Hl7Version::V2_8_1,
        Hl7Version::V2_8_2,
    ];

    /// Returns the version as written in MSH-12.
    pub fn as_str(&self) -> &'static str {
        match self {
            Hl7Version::V2_1 => "2.1",
            Hl7Version::V2_2 => "2.2",
            Hl7Version::V2_3 => "2.3",
            Hl7Version::V2_3_1 => "2.3.1",
            Hl7Version::V2_4 => "2.4",
            Hl7Version::V2_5 => "2.5",
            Hl7Version::V2_5_1 => "2.5.1",
            Hl7Version::V2_6 => "2.6",
            Hl7Version::V2_7 => "2.7",
            Hl7Version::V2_7_1 => "2.7.1",
            Hl7Version::V2_8 => "2.8",
            Hl7Version::V2_8_1 => "2.8.1",
            Hl7Version::V2_8_2 => "2.8.2",
        }
    }

    /// Returns the compact module-style name, e.g. `v251`.
    pub fn package_name(&self) -> String {
        format!("v{}", self.as_str().replace('.', ""))
    }
}

impl fmt::Display for Hl7Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hl7Version {
    type Err = String;

    /// Accepts `2.5.1`, `v251` and `251`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bare = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        Self::ALL
            .into_iter()
            .find(|version| {
                version.as_str() == bare || version.as_str().replace('.', "") == bare
            })
            .ok_or_else(|| format!("Unknown HL7 version: {s}"))
    }
}
