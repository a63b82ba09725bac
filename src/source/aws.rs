//! Live AWS source: paginated ListFunctions plus GetFunction presigned
//! package downloads. Credentials and region come from the SDK's standard
//! chain (env, shared profiles, instance role); nothing is resolved here.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_lambda::config::retry::RetryConfig;

use crate::source::FunctionSource;
use crate::types::{FunctionInfo, Package};

const CONNECT_TIMEOUT: u64 = 5;
const READ_TIMEOUT: u64 = 60;

pub struct AwsSource {
    lambda: aws_sdk_lambda::Client,
    http: reqwest::Client,
}

impl AwsSource {
    /// Build the Lambda and download clients. `region`/`profile` override
    /// the ambient chain; `endpoint_url` points the SDK at a stand-in like
    /// LocalStack.
    pub async fn connect(
        region: Option<String>,
        profile: Option<String>,
        endpoint_url: Option<String>,
    ) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let conf = loader.load().await;

        // One attempt per call. A transient blip counts as a failure for
        // this run; re-running the tool is the recovery path.
        let mut lambda_conf = aws_sdk_lambda::config::Builder::from(&conf)
            .retry_config(RetryConfig::standard().with_max_attempts(1));
        if let Some(url) = endpoint_url {
            lambda_conf = lambda_conf.endpoint_url(url);
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT))
            .timeout(Duration::from_secs(READ_TIMEOUT))
            .build()
            .context("could not build the download client")?;

        Ok(Self {
            lambda: aws_sdk_lambda::Client::from_conf(lambda_conf.build()),
            http,
        })
    }

    /// GET the presigned URL and insist on the whole archive: 2xx, a zip
    /// Content-Type, and a body as long as the server promised.
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let expected = resp.content_length();
        let body = resp.bytes().await.context("download interrupted")?;
        check_download(status, &content_type, expected, body.len())?;
        Ok(body.to_vec())
    }
}

/// Full-or-failure checks on a package download. Anything other than a 2xx
/// zip body of the promised length rejects the whole package; partial
/// content must never reach the scanner.
fn check_download(
    status: reqwest::StatusCode,
    content_type: &str,
    expected_len: Option<u64>,
    body_len: usize,
) -> Result<()> {
    if !status.is_success() {
        bail!("download failed: HTTP {status}");
    }
    if !content_type.starts_with("application/zip") {
        bail!("unrecognised Content-Type in deployment package: {content_type:?}");
    }
    if let Some(expected) = expected_len {
        if body_len as u64 != expected {
            bail!("short read: got {body_len} of {expected} bytes");
        }
    }
    Ok(())
}

/// The vendored-requests deprecation only affects Python runtimes
/// ("python3.6" through "python3.13" and whatever comes next), so
/// everything else is skipped at listing time.
pub fn is_python_runtime(runtime: &str) -> bool {
    runtime.starts_with("python")
}

#[async_trait]
impl FunctionSource for AwsSource {
    fn name(&self) -> &'static str {
        "aws"
    }

    async fn list_python_functions(&self) -> Result<Vec<FunctionInfo>> {
        let mut out = Vec::new();
        let mut pages = self.lambda.list_functions().into_paginator().send();
        while let Some(page) = pages
            .next()
            .await
            .transpose()
            .context("ListFunctions failed")?
        {
            for function in page.functions() {
                let Some(name) = function.function_name() else {
                    continue;
                };
                let Some(runtime) = function.runtime() else {
                    // Container-image functions carry no runtime string and
                    // no downloadable zip.
                    tracing::debug!(function = name, "skipping: no runtime");
                    continue;
                };
                if !is_python_runtime(runtime.as_str()) {
                    tracing::debug!(
                        function = name,
                        runtime = runtime.as_str(),
                        "skipping: not a python runtime"
                    );
                    continue;
                }
                out.push(FunctionInfo {
                    name: name.to_string(),
                    runtime: runtime.as_str().to_string(),
                    package: None,
                });
            }
        }
        Ok(out)
    }

    async fn fetch_package(&self, function: &FunctionInfo) -> Result<Package> {
        let resp = self
            .lambda
            .get_function()
            .function_name(&function.name)
            .send()
            .await
            .with_context(|| format!("GetFunction failed for {}", function.name))?;

        let url = resp
            .code()
            .and_then(|code| code.location())
            .ok_or_else(|| anyhow!("no code location returned for {}", function.name))?;

        let bytes = self.download(url).await.with_context(|| {
            format!("could not download the deployment package for {}", function.name)
        })?;
        tracing::debug!(function = %function.name, bytes = bytes.len(), "package downloaded");

        Ok(Package {
            function_name: function.name.clone(),
            bytes,
        })
    }
}
