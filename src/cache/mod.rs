//! Cache
//!
//! Este módulo contiene los sistemas de cache.

pub mod cache_config;
pub mod profile_cache;
pub mod redis_client;

pub use cache_config::CacheConfig;
pub use profile_cache::{connect_profile_store, MemoryProfileStore, ProfileStore};
pub use redis_client::RedisClient;
