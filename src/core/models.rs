// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

// --- Shared Enums ---

/// How hard an issue is to remediate. Drives the "critical issue" count in
/// summaries: Medium and Advanced count, Easy does not.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
pub enum Difficulty {
    Easy,
    Medium,
    Advanced,
}

/// Letter grade derived from the aggregate score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Pure step function from a clamped score to a letter grade.
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=100 => Grade::A,
            75..=89 => Grade::B,
            60..=74 => Grade::C,
            40..=59 => Grade::D,
            _ => Grade::F,
        }
    }
}

// --- Probe Result Models ---
// Every probe returns one of these records, always. Failures are carried in
// the `error` field rather than propagated across the probe boundary.

/// Outcome of the TLS certificate probe.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TlsProbeResult {
    pub valid: bool,
    pub days_remaining: Option<i64>,
    pub issuer: Option<String>,
    pub expiring_soon: bool,
    pub error: Option<String>,
}

/// Presence and raw value of a single security header.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HeaderCheck {
    pub present: bool,
    pub value: Option<String>,
}

/// The four headers the header probe inspects.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SecurityHeaders {
    pub csp: HeaderCheck,
    pub hsts: HeaderCheck,
    pub x_frame_options: HeaderCheck,
    pub x_content_type_options: HeaderCheck,
}

/// Outcome of the security header probe. `headers` is `None` whenever the
/// request itself failed, and header-based rules are skipped in that case.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HeaderProbeResult {
    pub success: bool,
    pub headers: Option<SecurityHeaders>,
    pub error: Option<String>,
}

/// Outcome of the CORS probe. Fail-open: a network failure records the error
/// and leaves `vulnerable` false.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CorsProbeResult {
    pub vulnerable: bool,
    pub allowed_origin: Option<String>,
    pub detail: String,
    pub error: Option<String>,
}

/// Outcome of the sensitive-file and admin-panel sweeps.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ExposureProbeResult {
    pub sensitive_files: Vec<String>,
    pub admin_exposed: bool,
    pub admin_paths: Vec<String>,
}

/// Outcome of the agent/MCP endpoint sweep.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AgentProbeResult {
    pub exposed: bool,
    pub paths: Vec<String>,
}

/// Outcome of the DMARC TXT lookup.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DmarcProbeResult {
    pub has_dmarc: bool,
    pub record: Option<String>,
    pub error: Option<String>,
}

/// Raw results from all six probes, kept on the report for audit display.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProbeResults {
    pub tls: TlsProbeResult,
    pub headers: HeaderProbeResult,
    pub cors: CorsProbeResult,
    pub exposure: ExposureProbeResult,
    pub agent: AgentProbeResult,
    pub dmarc: DmarcProbeResult,
}

// --- Issues & Report ---

/// A scored finding: a catalog template instantiated for one scan, with
/// optional probe-specific evidence. Immutable once appended to a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub key: String,
    pub title: String,
    pub impact: String,
    pub difficulty: Difficulty,
    pub penalty: u32,
    pub category: String,
    pub fix_title: String,
    pub fix_snippet: String,
    pub details: Option<serde_json::Value>,
}

/// The complete output of one scan. Constructed once by the orchestrator;
/// only `id` (assigned by the report store) and `summary` are filled in
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub id: Option<String>,
    pub target: String,
    pub score: u8,
    pub grade: Grade,
    pub issues: Vec<Issue>,
    pub probes: ProbeResults,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}
