//! HTTP access for the update check.
//!
//! Timeouts are always set and bodies are size-limited, so a slow or hostile
//! server can delay a commit by a bounded amount at most.

use anyhow::{bail, Context, Result};
use reqwest::blocking::{Client, Response};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::time::Duration;

pub(crate) const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
pub(crate) const HTTP_REQUEST_TIMEOUT_SECS: u64 = 60; // connection + transfer

/// Largest install script accepted.
pub(crate) const MAX_SCRIPT_SIZE: u64 = 1024 * 1024;

pub(crate) fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
        .user_agent(concat!("githooks/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}

pub(crate) fn validate_response_status(response: &Response, context: &str) -> Result<()> {
    if !response.status().is_success() {
        let status = response.status();
        bail!(
            "{}: HTTP {} - {}",
            context,
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        );
    }
    Ok(())
}

/// Read at most `max_size` bytes, rejecting a larger declared or actual body.
pub(crate) fn read_with_limit<R: Read>(
    mut reader: R,
    declared_len: Option<u64>,
    max_size: u64,
    context: &str,
) -> Result<Vec<u8>> {
    if let Some(len) = declared_len {
        if len > max_size {
            bail!(
                "{context}: Content-Length {len} bytes exceeds maximum allowed size of {max_size} bytes"
            );
        }
    }

    let mut bytes = Vec::new();
    let mut total_read: u64 = 0;
    let mut buffer = [0u8; 8192];
    loop {
        let n = reader
            .read(&mut buffer)
            .context("Failed to read response body")?;
        if n == 0 {
            break;
        }
        total_read += n as u64;
        if total_read > max_size {
            bail!("{context}: Download size exceeds maximum allowed size of {max_size} bytes");
        }
        bytes.extend_from_slice(&buffer[..n]);
    }
    Ok(bytes)
}

pub(crate) fn download_text_with_limit(
    response: Response,
    max_size: u64,
    context: &str,
) -> Result<String> {
    let declared = response.content_length();
    let bytes = read_with_limit(response, declared, max_size, context)?;
    String::from_utf8(bytes).context("Response contains invalid UTF-8")
}

/// Fetch `url` as text.
pub(crate) fn fetch_text(url: &str) -> Result<String> {
    let client = create_http_client()?;
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to fetch {url}"))?;
    validate_response_status(&response, "Failed to fetch install script")?;
    download_text_with_limit(response, MAX_SCRIPT_SIZE, "Install script download")
}

pub(crate) fn compute_sha256_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
