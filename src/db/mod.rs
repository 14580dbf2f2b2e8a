pub mod accounts;
pub mod postgres;
pub mod sessions;

pub use accounts::{AccountStore, PgAccountStore};
pub use postgres::create_pool;
pub use sessions::{create_redis_client, RedisSessionStore, SessionStore};
