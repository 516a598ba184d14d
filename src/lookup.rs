use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, error, info};

use crate::transport::PlaceSearch;
use crate::translate::translate;
use crate::types::AddressResult;
use crate::zipcode;

pub const EMPTY_ZIP_MESSAGE: &str = "ZIP code cannot be null or empty";
pub const INVALID_ZIP_MESSAGE: &str = "Invalid ZIP code format";

/// Validates a ZIP code, searches the place index and translates the reply
pub struct LookupService<P> {
    provider: P,
}

impl<P: PlaceSearch> LookupService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn is_valid_zip_code(&self, zip_code: &str) -> bool {
        zipcode::is_valid_zip_code(zip_code)
    }

    /// Look up addresses for `zip_code`.
    ///
    /// Always returns a result; failures are reported through its status and
    /// error message.
    pub async fn lookup(&self, zip_code: &str) -> AddressResult {
        info!("looking up address for ZIP code [{}]", zip_code);

        if zip_code.trim().is_empty() {
            error!("ZIP code is empty");
            return AddressResult::error(EMPTY_ZIP_MESSAGE);
        }

        let outcome = AssertUnwindSafe(self.validate_and_search(zip_code))
            .catch_unwind()
            .await;

        match outcome {
            Ok(result) => result,
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                error!("unexpected failure looking up [{}]: {}", zip_code, reason);
                AddressResult::error(format!("Unexpected error during lookup: {}", reason))
            }
        }
    }

    async fn validate_and_search(&self, zip_code: &str) -> AddressResult {
        if !self.is_valid_zip_code(zip_code) {
            error!("invalid ZIP code format: [{}]", zip_code);
            return AddressResult::error(INVALID_ZIP_MESSAGE);
        }

        let response = match self.provider.search(zip_code).await {
            Ok(response) => response,
            Err(e) => {
                error!("error calling AWS Location Service: {:?}", e);
                return AddressResult::error(format!("Error calling AWS Location Service: {}", e));
            }
        };
        debug!("received place index response for [{}]", zip_code);

        translate(&response, zip_code, self.provider.coordinate_strategy())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
