//! Clients for the external rates API.
//!
//! Two endpoints with deliberately different failure policies: the
//! base-rate fetch is absorbed into a fixed fallback so APR computation
//! is never blocked by the rates service being down, while a failed
//! risk-score fetch propagates because an APR derived without a real
//! risk score would be meaningless.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MortgageError;
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Base rate substituted whenever the rates API is unavailable, in
/// whole percentage points.
pub const FALLBACK_BASE_RATE: i64 = 5;

/// Deadline for a blocking fetch before the fallback policy applies.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Base rate
// ---------------------------------------------------------------------------

/// Source of the market base rate.
pub trait RateSource {
    /// Current base rate in whole percentage points.
    fn fetch_base_rate(&self) -> MortgageResult<i64>;
}

/// Fixed rate, for offline runs and tests.
pub struct FixedRateSource(pub i64);

impl RateSource for FixedRateSource {
    fn fetch_base_rate(&self) -> MortgageResult<i64> {
        Ok(self.0)
    }
}

#[derive(Debug, Deserialize)]
struct BaseRateResponse {
    #[serde(rename = "baseApr")]
    base_apr: i64,
}

/// HTTP client for `GET /api/getbaseapr`.
pub struct HttpRateSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpRateSource {
    pub fn new(base_url: impl Into<String>) -> MortgageResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| upstream("rates", e))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

impl RateSource for HttpRateSource {
    fn fetch_base_rate(&self) -> MortgageResult<i64> {
        let url = format!("{}/api/getbaseapr", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| upstream("rates", e))?;

        if !response.status().is_success() {
            return Err(MortgageError::UpstreamUnavailable {
                service: "rates".into(),
                reason: format!("status {}", response.status()),
            });
        }

        // A payload without `baseApr` fails deserialization and lands
        // in the same fallback bucket as a transport error.
        let body: BaseRateResponse = response.json().map_err(|e| upstream("rates", e))?;
        debug!(base_rate = body.base_apr, "base rate fetched");
        Ok(body.base_apr)
    }
}

/// Resolve the base rate under the availability-over-accuracy policy:
/// any upstream failure is absorbed, logged at `warn`, and replaced
/// with [`FALLBACK_BASE_RATE`]. The returned string, when present, is
/// the warning for the caller's computation envelope.
pub fn resolve_base_rate(source: &dyn RateSource) -> (i64, Option<String>) {
    match source.fetch_base_rate() {
        Ok(rate) => (rate, None),
        Err(e) => {
            warn!(
                error = %e,
                fallback = FALLBACK_BASE_RATE,
                "base rate fetch failed, using fallback"
            );
            (
                FALLBACK_BASE_RATE,
                Some(format!(
                    "Base rate unavailable ({e}); fell back to {FALLBACK_BASE_RATE}"
                )),
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Risk score
// ---------------------------------------------------------------------------

/// External risk-scoring provider. Failures are fatal to the caller.
pub trait RiskScoreProvider {
    fn fetch_risk_score(&self, ssn: &str) -> MortgageResult<i32>;
}

#[derive(Debug, Serialize)]
struct RiskScoreRequest<'a> {
    ssn: &'a str,
}

#[derive(Debug, Deserialize)]
struct RiskScoreResponse {
    #[serde(rename = "riskScore")]
    risk_score: i32,
}

/// HTTP client for `POST /api/getriskscore`.
pub struct HttpRiskScoreProvider {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpRiskScoreProvider {
    pub fn new(base_url: impl Into<String>) -> MortgageResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| upstream("risk", e))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

impl RiskScoreProvider for HttpRiskScoreProvider {
    fn fetch_risk_score(&self, ssn: &str) -> MortgageResult<i32> {
        let url = format!("{}/api/getriskscore", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RiskScoreRequest { ssn })
            .send()
            .map_err(|e| upstream("risk", e))?;

        if !response.status().is_success() {
            return Err(MortgageError::UpstreamUnavailable {
                service: "risk".into(),
                reason: format!("status {}", response.status()),
            });
        }

        let body: RiskScoreResponse = response.json().map_err(|e| upstream("risk", e))?;
        debug!(risk_score = body.risk_score, "risk score fetched");
        Ok(body.risk_score)
    }
}

fn upstream(service: &str, e: impl std::fmt::Display) -> MortgageError {
    MortgageError::UpstreamUnavailable {
        service: service.into(),
        reason: e.to_string(),
    }
}
