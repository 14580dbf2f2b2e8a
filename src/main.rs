use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use pantry_api::{
    config::Config,
    corpus,
    db::{create_pool, create_redis_client, PgAccountStore, RedisSessionStore},
    routes::create_router,
    services::{HttpTtsProvider, Matcher, Narrator},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    // Corpus and index are built once; read-only for the process lifetime.
    let recipes = corpus::load_corpus(&config.corpus_path)?;
    let matcher = Arc::new(Matcher::new(recipes));
    tracing::info!(corpus_size = matcher.corpus_size(), "Recipe corpus loaded");

    let pool = create_pool(&config.database_url).await?;
    let redis_client = create_redis_client(&config.redis_url)?;

    let accounts = Arc::new(PgAccountStore::new(pool));
    let sessions = Arc::new(RedisSessionStore::new(
        redis_client,
        config.session_ttl_secs,
    ));
    let narrator = Narrator::new(
        Arc::new(HttpTtsProvider::new(config.tts_api_url.clone())),
        config.narration_dir.clone().into(),
    );

    let state = AppState::new(matcher, accounts, sessions, narrator);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
