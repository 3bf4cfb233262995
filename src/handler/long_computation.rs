//! Long-running computation handler

use crate::handler::Handler;
use crate::task::ParamMap;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// Seconds slept when the submission carries no usable `duration` parameter
pub const DEFAULT_DURATION_SECS: f64 = 180.0;

/// Handler that emulates a long I/O-bound operation.
///
/// Sleeps for the number of seconds given by the numeric `duration`
/// parameter (falling back to [`DEFAULT_DURATION_SECS`] when it is absent
/// or not a number) and returns a payload echoing the duration. Serves as
/// a template for real handlers exercising the long-running-task path.
pub struct LongComputationHandler;

impl LongComputationHandler {
    /// Create a new handler
    pub fn new() -> Self {
        Self
    }
}

impl Default for LongComputationHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the sleep duration from the parameter bag
pub(crate) fn duration_secs(params: &ParamMap) -> f64 {
    params
        .get("duration")
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(DEFAULT_DURATION_SECS)
}

#[async_trait]
impl Handler for LongComputationHandler {
    async fn execute(&self, params: &ParamMap) -> crate::Result<ParamMap> {
        let duration = duration_secs(params);

        // Negative, NaN or overflowing values would panic in Duration
        // construction; treat them as a zero-length sleep and still echo
        // the raw value in the payload.
        let sleep_for = Duration::try_from_secs_f64(duration.max(0.0)).unwrap_or(Duration::ZERO);

        info!("Starting long computation for {} seconds", duration);
        tokio::time::sleep(sleep_for).await;

        let mut result = ParamMap::new();
        result.insert(
            "message".to_string(),
            json!("long computation completed successfully"),
        );
        result.insert("duration".to_string(), json!(duration));
        Ok(result)
    }
}
