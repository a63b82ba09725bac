use serde::Deserialize;

/// One Lambda function surfaced by the lister.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub runtime: String, // "python3.9", "nodejs18.x", ...
    /// Package handle for sources that need one: the fixture source stores
    /// the archive path here, the AWS source resolves a presigned URL at
    /// fetch time instead.
    #[serde(default)]
    pub package: Option<String>,
}

/// Raw deployment package bytes for one function. Lives for exactly one
/// scan; nothing is cached across functions or runs.
#[derive(Debug)]
pub struct Package {
    pub function_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No heuristic pattern matched. `python_files == 0` means the archive
    /// held nothing to inspect, which the reporter surfaces separately
    /// from "checked and clean".
    Clean { python_files: usize },
    /// At least one file matched. `matches` holds archive-internal paths,
    /// sorted, and is never empty.
    Flagged { matches: Vec<String> },
    /// The package could not be fetched or decoded.
    Failed { reason: String },
}

impl ScanOutcome {
    /// Collapse a scanner match list into an outcome. `Flagged` is only
    /// ever built from a non-empty list, so "flagged iff matches
    /// non-empty" holds by construction.
    pub fn from_matches(matches: Vec<String>, python_files: usize) -> Self {
        if matches.is_empty() {
            ScanOutcome::Clean { python_files }
        } else {
            ScanOutcome::Flagged { matches }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub function_name: String,
    pub outcome: ScanOutcome,
}

impl ScanResult {
    pub fn failed(function_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            outcome: ScanOutcome::Failed {
                reason: reason.into(),
            },
        }
    }

    /// True when the run's exit code should flip to failure because of
    /// this function: a vendored import was found or the scan itself
    /// could not complete.
    pub fn needs_attention(&self) -> bool {
        !matches!(self.outcome, ScanOutcome::Clean { .. })
    }
}
