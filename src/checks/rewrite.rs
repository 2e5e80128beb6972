//! Webserver URL rewrite probe.
//!
//! The `rewritetest/` fixture shipped next to the binary contains rewrite
//! rules for Apache (`.htaccess`) and IIS (`web.config`) that route
//! `rewritetest/test-url` to `test.php`. The probe requests the rewritten
//! URL and looks for the marker `test.php` prints.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

use crate::request::RequestContext;

/// Text `test.php` prints when the rewrite rule routed the request to it.
pub const REWRITE_MARKER: &str = "test.php queryval: testvalue";

/// Outbound HTTP GET.
pub trait HttpProbe {
    /// Fetch `url` and return the response body. Must give up after
    /// `timeout`.
    fn get(&self, url: &str, timeout: Duration) -> Result<String>;
}

/// [`HttpProbe`] backed by a blocking reqwest client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestProbe;

impl HttpProbe for ReqwestProbe {
    fn get(&self, url: &str, timeout: Duration) -> Result<String> {
        let client = Client::builder()
            .user_agent("ssreqcheck")
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let response = client
            .get(url)
            .send()
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        let body = response
            .text()
            .with_context(|| format!("Reading response from {} failed", url))?;

        if body.is_empty() {
            bail!("HTTP {} with empty body from {}", status, url);
        }
        Ok(body)
    }
}

/// URL the rewrite rules should route to `test.php`, or `None` without a
/// request to take the host from.
pub fn rewrite_test_url(request: &RequestContext) -> Option<String> {
    let host = request.host.as_deref()?;
    let dir = request.script_dir();
    let prefix = if dir.is_empty() {
        String::new()
    } else {
        format!("{}/", dir)
    };
    Some(format!(
        "http://{}/{}rewritetest/test-url?testquery=testvalue",
        host, prefix
    ))
}

/// Whether the webserver rewrites the test URL. Any failure, including a
/// missing request, is `false`.
pub fn probe_url_rewrite_support(
    probe: &dyn HttpProbe,
    request: &RequestContext,
    timeout: Duration,
) -> bool {
    let Some(url) = rewrite_test_url(request) else {
        tracing::debug!("No request context, skipping rewrite probe");
        return false;
    };

    match probe.get(&url, timeout) {
        Ok(body) => {
            let found = body.contains(REWRITE_MARKER);
            tracing::debug!("Rewrite probe {}: marker found = {}", url, found);
            found
        }
        Err(e) => {
            tracing::debug!("Rewrite probe {} failed: {:#}", url, e);
            false
        }
    }
}
