pub mod catalog;
pub mod conversion;
pub mod health;
mod util;

pub use catalog::HttpCatalogClient;
pub use conversion::HttpConversionClient;
