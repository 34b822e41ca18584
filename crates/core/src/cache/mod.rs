mod error;
mod keys;
mod traits;
mod ttl;

pub use error::{CacheError, Result};
pub use keys::{cache_key, KEY_SEPARATOR};
pub use traits::Cache;
pub use ttl::{ParseTtlError, Ttl, DEFAULT_TTL, MIN_TTL};
