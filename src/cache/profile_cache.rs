//! Cache de perfiles de usuario
//!
//! Guarda una copia del perfil autenticado (id, email, rol) para no
//! consultar la base de datos en cada request. Redis si está configurado,
//! si no un mapa en memoria con TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use super::{CacheConfig, RedisClient};
use crate::models::auth::UserProfile;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserProfile>>;
    async fn put(&self, profile: &UserProfile) -> Result<()>;
    async fn evict(&self, user_id: Uuid) -> Result<()>;
    fn backend(&self) -> &'static str;
}

pub struct RedisProfileStore {
    redis: RedisClient,
}

impl RedisProfileStore {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl ProfileStore for RedisProfileStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let key = self.redis.profile_key(&user_id.to_string());
        self.redis.get(&key).await
    }

    async fn put(&self, profile: &UserProfile) -> Result<()> {
        let key = self.redis.profile_key(&profile.id.to_string());
        self.redis.set(&key, profile, self.redis.default_ttl()).await
    }

    async fn evict(&self, user_id: Uuid) -> Result<()> {
        let key = self.redis.profile_key(&user_id.to_string());
        self.redis.delete(&key).await
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

pub struct MemoryProfileStore {
    entries: RwLock<HashMap<Uuid, (UserProfile, Instant)>>,
    ttl: Duration,
}

impl MemoryProfileStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&user_id)
            .filter(|(_, stored_at)| stored_at.elapsed() < self.ttl)
            .map(|(profile, _)| profile.clone()))
    }

    async fn put(&self, profile: &UserProfile) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, stored_at)| stored_at.elapsed() < self.ttl);
        entries.insert(profile.id, (profile.clone(), Instant::now()));
        Ok(())
    }

    async fn evict(&self, user_id: Uuid) -> Result<()> {
        self.entries.write().await.remove(&user_id);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Elegir el store: Redis si está configurado y responde, memoria si no
pub async fn connect_profile_store(
    config: Option<CacheConfig>,
    fallback_ttl: u64,
) -> Arc<dyn ProfileStore> {
    if let Some(config) = config {
        match RedisClient::new(config).await {
            Ok(redis) => return Arc::new(RedisProfileStore::new(redis)),
            Err(e) => warn!("⚠️ Redis no disponible ({}), usando cache en memoria", e),
        }
    } else {
        info!("💾 REDIS_URL no configurado, usando cache de perfiles en memoria");
    }

    Arc::new(MemoryProfileStore::new(Duration::from_secs(fallback_ttl)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::UserRole;

    fn profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            email: "driver@fleet.test".into(),
            role: UserRole::Driver,
        }
    }

    #[tokio::test]
    async fn test_memory_store_put_get_evict() {
        let store = MemoryProfileStore::new(Duration::from_secs(60));
        let profile = profile();

        assert_eq!(store.get(profile.id).await.unwrap(), None);

        store.put(&profile).await.unwrap();
        assert_eq!(store.get(profile.id).await.unwrap(), Some(profile.clone()));

        store.evict(profile.id).await.unwrap();
        assert_eq!(store.get(profile.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_expires_entries() {
        let store = MemoryProfileStore::new(Duration::from_millis(0));
        let profile = profile();

        store.put(&profile).await.unwrap();
        assert_eq!(store.get(profile.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_connect_without_redis_uses_memory() {
        let store = connect_profile_store(None, 60).await;
        assert_eq!(store.backend(), "memory");
        let profile = profile();
        store.put(&profile).await.unwrap();
        assert_eq!(store.get(profile.id).await.unwrap(), Some(profile));
    }
}
