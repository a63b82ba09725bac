//! Console output. The plain-text lines are a stable contract for piped
//! consumers; color and underline only appear when stdout is a terminal.

use std::io::IsTerminal;

use crate::types::{ScanOutcome, ScanResult};

const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const UNDERLINE: &str = "\x1b[4m";
const RESET: &str = "\x1b[0m";

pub struct Reporter {
    color: bool,
    scanned: usize,
    needs_attention: usize,
}

impl Reporter {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout().is_terminal())
    }

    pub fn new(color: bool) -> Self {
        Self {
            color,
            scanned: 0,
            needs_attention: 0,
        }
    }

    pub fn report(&mut self, result: &ScanResult) {
        self.scanned += 1;
        if result.needs_attention() {
            self.needs_attention += 1;
        }
        if let ScanOutcome::Clean { python_files: 0 } = result.outcome {
            tracing::warn!(
                function = %result.function_name,
                "no python files found in package"
            );
        }
        println!("{}", render(result, self.color));
    }

    pub fn all_clean(&self) -> bool {
        self.needs_attention == 0
    }

    pub fn finish(&self) {
        tracing::info!(
            scanned = self.scanned,
            needs_attention = self.needs_attention,
            "scan complete"
        );
    }
}

fn render(result: &ScanResult, color: bool) -> String {
    let name = if color {
        format!("{UNDERLINE}{}{RESET}", result.function_name)
    } else {
        result.function_name.clone()
    };
    // Brackets stay plain; only the letters inside are tinted.
    let paint = |text: &str, tint: &str| {
        if color {
            format!("{tint}{text}{RESET}")
        } else {
            text.to_string()
        }
    };
    match &result.outcome {
        ScanOutcome::Clean { .. } => {
            format!("[ {} ] No vendored imports in {name}", paint("OK", GREEN))
        }
        ScanOutcome::Flagged { matches } => {
            let mut out = format!(
                "[{}] Vendored imports detected in {name}:",
                paint("FAIL", RED)
            );
            for path in matches {
                out.push_str("\n       - ");
                out.push_str(path);
            }
            out
        }
        ScanOutcome::Failed { reason } => {
            format!("[ {}] Could not scan {name}: {reason}", paint("ERR", RED))
        }
    }
}
