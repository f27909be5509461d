mod keys;
mod store;

pub use keys::{detail_key, season_key, DETAIL_TTL, POPULAR_KEY, POPULAR_TTL, SEASON_TTL};
pub use store::MemoryCache;
