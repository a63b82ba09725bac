use anyhow::Result;
use async_trait::async_trait;

use crate::types::{FunctionInfo, Package};

pub mod aws;
pub mod fixtures;

/// Where the functions and their packages come from. The live AWS account
/// and the local fixture tree implement the same two operations, so the
/// pipeline and the tests run the exact same code path.
#[async_trait]
pub trait FunctionSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Every function in the account with a Python runtime, in the order
    /// the listing API returned them. Failures here are fatal to the run.
    async fn list_python_functions(&self) -> Result<Vec<FunctionInfo>>;

    /// The raw deployment package for one function. Failures here are
    /// per-function; the caller keeps going.
    async fn fetch_package(&self, function: &FunctionInfo) -> Result<Package>;
}
