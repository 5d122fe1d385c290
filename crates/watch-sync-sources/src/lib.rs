pub mod error;
pub mod traits;
pub mod trakt;

pub use error::SourceError;
pub use traits::CatalogApi;
pub use trakt::TraktClient;
