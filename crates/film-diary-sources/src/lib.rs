pub mod error;
pub mod gateway;
pub mod traits;

pub use error::CatalogError;
pub use gateway::HttpCatalogClient;
pub use traits::CatalogClient;
