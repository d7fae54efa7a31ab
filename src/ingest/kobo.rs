//! KoboToolbox Data API Client
//!
//! Retrieves survey-form submissions from a KoboToolbox server. Submissions
//! for a form (an "asset" in Kobo terms) are served as JSON under a
//! `results` key, one nested object per respondent.
//!
//! API documentation: https://support.kobotoolbox.org/api.html
//! Data endpoint: GET {base}/assets/{asset_uid}/data.json
//!
//! The dashboard performs exactly one fetch per session. There is no
//! pagination, retry, or rate-limit handling here — on failure the caller
//! aborts and a process restart re-fetches everything.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::model::KoboError;

/// Per-request timeout for the single data fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Kobo API Response Structures
// ============================================================================

/// Submission listing response.
///
/// `results` entries are kept as raw JSON values: the set of fields varies
/// per form and per respondent, so the shape is only fixed downstream by
/// the normalizer.
#[derive(Debug, Deserialize)]
pub struct KoboDataResponse {
    /// Total number of submissions the server holds for this form.
    pub count: u64,
    pub results: Vec<Value>,
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Build a blocking HTTP client suitable for the one-shot fetch.
pub fn build_client() -> Result<reqwest::blocking::Client, KoboError> {
    reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| KoboError::Transport(e.to_string()))
}

/// Fetch the full set of submissions currently available for the form.
///
/// # Parameters
/// - `client`: HTTP client
/// - `config`: resolved credentials and endpoint
///
/// # Returns
/// Raw submission objects in server order, or a typed error:
/// [`KoboError::Auth`] on 401/403, [`KoboError::Http`] on any other non-2xx
/// status, [`KoboError::Transport`]/[`KoboError::Parse`] otherwise.
pub fn fetch_submissions(
    client: &reqwest::blocking::Client,
    config: &Config,
) -> Result<Vec<Value>, KoboError> {
    let url = submissions_url(&config.base_url, &config.form_id);

    let response = client
        .get(&url)
        .header("Authorization", format!("Token {}", config.api_token))
        .header("Accept", "application/json")
        .send()
        .map_err(|e| KoboError::Transport(e.to_string()))?;

    let status = response.status();
    if status.as_u16() == 401 || status.as_u16() == 403 {
        return Err(KoboError::Auth(status.as_u16()));
    }
    if !status.is_success() {
        return Err(KoboError::Http(status.as_u16()));
    }

    let body: KoboDataResponse = response
        .json()
        .map_err(|e| KoboError::Parse(e.to_string()))?;

    info!(
        form_id = %config.form_id,
        fetched = body.results.len(),
        reported = body.count,
        "fetched submissions"
    );

    Ok(body.results)
}

/// Submission listing URL for a form asset.
fn submissions_url(base_url: &str, form_id: &str) -> String {
    format!("{}/assets/{}/data.json", base_url, form_id)
}

// ============================================================================
// Tests
// ============================================================================
