//! Exchange-rate cache with a hardcoded fallback.

use parking_lot::Mutex;
use tracing::warn;
use tutorhub_protocol::RateResponse;

use crate::http::ApiClient;

/// Rate applied when the live rate has never been fetched successfully.
pub const FALLBACK_USD_TO_KES: f64 = 130.0;

/// Caches the USD to KES conversion rate.
pub struct CurrencyStore {
    api: ApiClient,
    rate: Mutex<Option<f64>>,
}

impl CurrencyStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            rate: Mutex::new(None),
        }
    }

    /// The last fetched rate, or the fallback when none has been fetched.
    pub fn usd_to_kes_rate(&self) -> f64 {
        (*self.rate.lock()).unwrap_or(FALLBACK_USD_TO_KES)
    }

    /// Refreshes the cached rate. Any failure resets the cache to the
    /// fallback, even if an earlier fetch had succeeded.
    pub async fn fetch_rate(&self) -> f64 {
        match self.api.get_json::<RateResponse>("/currency/rate").await {
            Ok(response) => {
                *self.rate.lock() = Some(response.usd_to_kes);
                response.usd_to_kes
            }
            Err(err) => {
                warn!(
                    target = "tutorhub.currency",
                    error = %err,
                    "rate fetch failed; resetting to fallback"
                );
                *self.rate.lock() = Some(FALLBACK_USD_TO_KES);
                FALLBACK_USD_TO_KES
            }
        }
    }
}
