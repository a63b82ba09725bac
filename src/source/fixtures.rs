//! Local stand-in for an AWS account: a `functions.json` manifest next to
//! the package archives it names. This is what the e2e tests drive, and
//! what `--fixtures` runs against, so the scan and report stages behave
//! identically offline.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use crate::source::aws::is_python_runtime;
use crate::source::FunctionSource;
use crate::types::{FunctionInfo, Package};

pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl FunctionSource for FixtureSource {
    fn name(&self) -> &'static str {
        "fixtures"
    }

    async fn list_python_functions(&self) -> Result<Vec<FunctionInfo>> {
        let manifest = self.dir.join("functions.json");
        let raw = tokio::fs::read_to_string(&manifest)
            .await
            .with_context(|| format!("could not read {}", manifest.display()))?;
        let functions: Vec<FunctionInfo> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid manifest {}", manifest.display()))?;

        // Same runtime filter as the live listing, so a manifest can carry
        // non-Python entries and see them skipped.
        Ok(functions
            .into_iter()
            .filter(|f| is_python_runtime(&f.runtime))
            .collect())
    }

    async fn fetch_package(&self, function: &FunctionInfo) -> Result<Package> {
        let Some(package) = &function.package else {
            bail!("no package file listed for {}", function.name);
        };
        let path = self.dir.join(package);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?;
        Ok(Package {
            function_name: function.name.clone(),
            bytes,
        })
    }
}
