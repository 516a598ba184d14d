pub mod config;
pub mod error;
pub mod health;
pub mod lookup;
pub mod retry;
pub mod server;
pub mod translate;
pub mod transport;
pub mod types;
pub mod ui;
pub mod zipcode;

pub use config::{LocationConfig, TransportKind};
pub use error::{ConfigError, TransportError};
pub use lookup::LookupService;
pub use translate::{CoordinateStrategy, translate};
pub use transport::{PlaceSearch, Transport};
pub use types::{AddressResult, LookupStatus, Place, ProviderResponse};
pub use zipcode::is_valid_zip_code;
