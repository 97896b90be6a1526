//! Currency rate payloads.

use serde::{Deserialize, Serialize};

/// Response to `GET /currency/rate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateResponse {
    pub usd_to_kes: f64,
}
