use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use backoff::{ExponentialBackoff, future::retry};
use tracing::warn;

use crate::config::HttpSettings;
use crate::error::TransportError;

/// Run a provider call, retrying transient failures up to `settings.max_retries` times
pub async fn retry_transient<T, F, Fut>(settings: &HttpSettings, f: F) -> Result<T, TransportError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let cur_times = AtomicUsize::new(0);
    retry(backoff_config(settings), || async {
        let times = cur_times.fetch_add(1, Ordering::AcqRel) + 1;
        if times > 1 {
            warn!("retrying provider call, attempt {}", times);
        }
        f().await
            .map_err(|err| map_to_backoff_err(err, times, settings.max_retries))
    })
    .await
}

fn map_to_backoff_err(
    err: TransportError,
    cur_times: usize,
    max_retries: usize,
) -> backoff::Error<TransportError> {
    if cur_times > max_retries || !err.is_transient() {
        backoff::Error::permanent(err)
    } else {
        backoff::Error::transient(err)
    }
}

#[inline]
fn backoff_config(settings: &HttpSettings) -> ExponentialBackoff {
    ExponentialBackoff {
        current_interval: settings.initial_backoff,
        initial_interval: settings.initial_backoff,
        max_interval: settings.max_backoff,
        max_elapsed_time: None,
        ..Default::default()
    }
}
