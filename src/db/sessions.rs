use redis::{AsyncCommands, Client};
use uuid::Uuid;

use crate::error::AppResult;

/// Creates a Redis client for the session store
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Session storage capability keyed by server-issued token
///
/// A token in the store implies a previously successful authentication.
/// Injected into handlers as a trait object so the web layer is testable
/// without a live Redis.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Issues a fresh token bound to the account id
    async fn create(&self, account_id: Uuid) -> AppResult<String>;

    /// Resolves a token to the owning account id, `None` when stale or unknown
    async fn get(&self, token: &str) -> AppResult<Option<Uuid>>;

    /// Destroys a session unconditionally; clearing an unknown token is a no-op
    async fn clear(&self, token: &str) -> AppResult<()>;
}

/// Redis-backed session store with per-session TTL
#[derive(Clone)]
pub struct RedisSessionStore {
    redis_client: Client,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(redis_client: Client, ttl_secs: u64) -> Self {
        Self {
            redis_client,
            ttl_secs,
        }
    }

    fn key(token: &str) -> String {
        format!("session:{}", token)
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, account_id: Uuid) -> AppResult<String> {
        let token = Uuid::new_v4().simple().to_string();
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn
            .set_ex(Self::key(&token), account_id.to_string(), self.ttl_secs)
            .await?;
        Ok(token)
    }

    async fn get(&self, token: &str) -> AppResult<Option<Uuid>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn.get(Self::key(token)).await?;
        Ok(stored.and_then(|s| Uuid::parse_str(&s).ok()))
    }

    async fn clear(&self, token: &str) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(Self::key(token)).await?;
        Ok(())
    }
}
