//! Serde shapes of the cucumber JSON report.
//!
//! A report is a top-level array of [`SourceFeature`]s. Decoding is lenient
//! the way report consumers have to be: unknown fields are ignored, and a
//! missing or `null` string or list decodes to its empty default. Only a
//! structural mismatch (e.g. a number where an object is expected) fails.

#![allow(missing_docs)]

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// One element of the top-level report array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceFeature {
    pub line: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub keyword: String,
    pub uri: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<SourceTag>,
    #[serde(deserialize_with = "null_as_default")]
    pub elements: Vec<SourceElement>,
}

/// An entry of a feature's `elements`: a background or a scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceElement {
    #[serde(deserialize_with = "timestamp::deserialize_opt")]
    pub start_timestamp: Option<NaiveDateTime>,
    pub line: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub element_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub keyword: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<SourceTag>,
    #[serde(deserialize_with = "null_as_default")]
    pub before: Vec<SourceStep>,
    #[serde(deserialize_with = "null_as_default")]
    pub steps: Vec<SourceStep>,
    #[serde(deserialize_with = "null_as_default")]
    pub after: Vec<SourceStep>,
}

impl SourceElement {
    /// Whether this element is a background (case-insensitive `type`).
    #[must_use]
    pub fn is_background(&self) -> bool {
        self.element_type.eq_ignore_ascii_case("background")
    }
}

/// A step, or a before/after hook; hooks nest recursively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceStep {
    pub embeddings: Option<Vec<SourceEmbedding>>,
    pub result: Option<SourceStepResult>,
    pub line: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "match")]
    pub step_match: Option<SourceStepMatch>,
    #[serde(deserialize_with = "null_as_default")]
    pub keyword: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rows: Vec<SourceRow>,
    pub doc_string: Option<SourceDocString>,
    #[serde(deserialize_with = "null_as_default")]
    pub before: Vec<SourceStep>,
    #[serde(deserialize_with = "null_as_default")]
    pub after: Vec<SourceStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceStepResult {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    /// Nanoseconds. Signed as written by cucumber; negatives clamp to zero
    /// on conversion.
    pub duration: i64,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceStepMatch {
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub arguments: Vec<SourceMatchArgument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceMatchArgument {
    #[serde(deserialize_with = "null_as_default")]
    pub val: String,
    pub offset: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceEmbedding {
    #[serde(deserialize_with = "null_as_default")]
    pub data: String,
    #[serde(deserialize_with = "null_as_default")]
    pub mime_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceRow {
    #[serde(deserialize_with = "null_as_default")]
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceDocString {
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceTag {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type")]
    pub tag_type: Option<String>,
    pub location: Option<SourceTagLocation>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceTagLocation {
    pub line: u32,
    pub column: u32,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `start_timestamp` parsing: `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`.
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, de::Error as _};

    const FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%S%.f"];

    pub(super) fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }

    pub(super) fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        parse(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid start_timestamp {raw:?}")))
    }
}
