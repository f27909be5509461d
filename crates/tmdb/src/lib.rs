mod client;
mod error;
pub mod models;

pub use client::TmdbClient;
pub use error::TmdbError;

pub type Result<T> = std::result::Result<T, TmdbError>;
