mod catalog;
mod config;
mod error;
mod http;

pub use catalog::Catalog;
pub use config::{PortalSettings, ProxySettings, Settings, TmdbSettings};
pub use error::CatalogError;
pub use http::{build_http_client, egress_ip};

pub type Result<T> = std::result::Result<T, CatalogError>;
