//! Step nodes, step results and structural sections.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;

use crate::core::errors::{CrcError, Result};
use crate::model::ScenarioId;

// ──────────────────── step result ────────────────────

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepResult {
    Passed,
    Failed,
    Skipped,
    Pending,
    Undefined,
    /// The report status matched none of the other variants, or was absent.
    UnknownResult,
}

impl StepResult {
    /// Every variant a report status can name.
    pub const KNOWN: [Self; 5] = [
        Self::Passed,
        Self::Failed,
        Self::Skipped,
        Self::Pending,
        Self::Undefined,
    ];

    /// Case-insensitive exact match on the trimmed status text.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        Self::KNOWN
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(text))
            .unwrap_or(Self::UnknownResult)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
            Self::Pending => "PENDING",
            Self::Undefined => "UNDEFINED",
            Self::UnknownResult => "UNKNOWN_RESULT",
        }
    }

    #[must_use]
    pub const fn is_passed(self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────── step section ────────────────────

/// Which part of a scenario a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepSection {
    /// Before-scenario hook.
    BeforeScenario,
    /// After-scenario hook.
    AfterScenario,
    /// Step of the scenario's background.
    Background,
    /// Hook run before a single step.
    BeforeStep,
    /// Hook run after a single step.
    AfterStep,
    /// Step of the scenario body.
    Scenario,
}

// ──────────────────── step payloads ────────────────────

/// Argument captured by a step definition match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchArgument {
    pub val: String,
    pub offset: u32,
}

/// Step definition that matched the step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepMatch {
    pub location: String,
    pub arguments: Vec<MatchArgument>,
}

/// Attachment embedded into the report by a step.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Embedding {
    /// Base64 payload, as found in the report.
    pub data: String,
    pub mime_type: String,
    pub name: String,
}

impl Embedding {
    /// Decode the base64 payload.
    pub fn decoded_bytes(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(self.data.trim())
            .map_err(|err| CrcError::EmbeddingDecode {
                name: self.name.clone(),
                details: err.to_string(),
            })
    }

    /// Decode the payload as text; invalid UTF-8 sequences are replaced.
    pub fn data_as_string(&self) -> Result<String> {
        let bytes = self.decoded_bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

// Payloads can be screenshots; keep them out of debug output.
impl fmt::Debug for Embedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Embedding")
            .field("mime_type", &self.mime_type)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ──────────────────── step node ────────────────────

/// A converted step or hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepNode {
    /// Scenario this step belongs to.
    pub scenario: ScenarioId,
    pub section: StepSection,
    pub keyword: String,
    pub name: String,
    pub line: u32,
    pub result: StepResult,
    /// Nanoseconds; 0 when the report has no result.
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub step_match: Option<StepMatch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeddings: Vec<Embedding>,
    /// Data table rows, each an ordered list of cells.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub table_data: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    /// Nested before-step hooks.
    pub before_steps: Vec<StepNode>,
    /// Nested after-step hooks.
    pub after_steps: Vec<StepNode>,
}

impl StepNode {
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        self.result.is_passed()
    }

    #[must_use]
    pub fn has_hooks(&self) -> bool {
        !self.before_steps.is_empty() || !self.after_steps.is_empty()
    }
}
