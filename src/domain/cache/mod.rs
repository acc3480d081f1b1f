//! Cache abstractions

mod key;
mod repository;

pub use key::{normalize_text, Fingerprint};
pub use repository::{Cache, CacheExt};

#[cfg(test)]
pub use repository::mock::MockCache;
