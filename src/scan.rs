//! Heuristic detection of `botocore.vendored` imports inside a deployment
//! package.
//!
//! This is a best-effort text match over the raw source bytes, nothing
//! more: Python's import machinery allows dynamic, string-built, and
//! renamed forms that no substring heuristic will see, and this tool does
//! not try (no AST parsing, no bytecode inspection). Imports written the
//! ordinary way sit near the top of a file and match one of a small set of
//! known syntaxes, which is what the patterns below enumerate.

use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use regex::bytes::Regex;

use crate::types::{Package, ScanOutcome, ScanResult};

/// The deprecated import forms, one pattern per syntax. Case-sensitive,
/// whitespace-tolerant, matched anywhere in the file:
///
/// - `from botocore.vendored import requests` and
///   `from botocore.vendored.requests import post`
/// - `import botocore.vendored.requests` (aliased or not)
/// - `from botocore import vendored`
const DEFAULT_PATTERNS: &[&str] = &[
    r"from\s+botocore\.vendored\b",
    r"import\s+botocore\.vendored\b",
    r"from\s+botocore\s+import\s+vendored\b",
];

/// boto3/botocore ship their own `botocore.vendored` imports; those are
/// the SDK's business and not a reason to flag the function.
const SDK_PREFIXES: &[&str] = &["boto3/", "botocore/"];

#[derive(Debug)]
pub struct VendoredImportPatterns {
    regexes: Vec<Regex>,
}

impl VendoredImportPatterns {
    /// The built-in pattern set above.
    pub fn builtin() -> Result<Self> {
        Self::compile(DEFAULT_PATTERNS.iter().copied())
    }

    /// A caller-supplied set, replacing the built-ins entirely.
    pub fn custom<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        Self::compile(patterns.iter().map(|p| p.as_ref()))
    }

    fn compile<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let regexes = patterns
            .into_iter()
            .map(|p| Regex::new(p).with_context(|| format!("invalid heuristic pattern {p:?}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { regexes })
    }

    /// Does any pattern match anywhere in this file? Byte-level on
    /// purpose: Lambda packages can carry non-UTF-8 source and the match
    /// should not care.
    pub fn is_match(&self, content: &[u8]) -> bool {
        self.regexes.iter().any(|re| re.is_match(content))
    }
}

/// Scan one deployment package. Fetch and decode problems become a
/// `Failed` outcome so the caller can keep going with the next function.
pub fn scan_package(package: &Package, patterns: &VendoredImportPatterns) -> ScanResult {
    match scan_archive(&package.bytes, patterns) {
        Ok(outcome) => ScanResult {
            function_name: package.function_name.clone(),
            outcome,
        },
        Err(err) => ScanResult::failed(&package.function_name, format!("{err:#}")),
    }
}

fn scan_archive(bytes: &[u8], patterns: &VendoredImportPatterns) -> Result<ScanOutcome> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .context("deployment package is not a readable zip archive")?;

    let mut python_files = 0usize;
    let mut matches = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .with_context(|| format!("corrupt zip entry #{index}"))?;
        if !entry.is_file() {
            continue;
        }
        // Some tools write "./"-prefixed entry names; strip them so the
        // exclusion list and the report see the same relative paths.
        let path = entry.name().trim_start_matches("./").to_string();
        if !path.ends_with(".py") {
            continue;
        }
        if SDK_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
            continue;
        }
        python_files += 1;

        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .with_context(|| format!("could not read {path} from the archive"))?;
        if patterns.is_match(&content) {
            tracing::debug!(file = %path, "vendored import matched");
            matches.push(path);
        }
    }

    // The original tool prints these sorted; keep that order in the result
    // so the report is deterministic.
    matches.sort();
    Ok(ScanOutcome::from_matches(matches, python_files))
}
