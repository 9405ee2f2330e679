mod config;
mod db;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::auth::JwtKeys;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid server configuration");

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("database init failed");

    // Initialize LLM client (non-fatal: consultation disabled if config missing).
    let llm: Option<Arc<dyn llm::LlmGenerate>> = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured, consultation disabled");
            None
        }
    };

    let jwt = JwtKeys::new(&config.jwt_secret, config.jwt_ttl_secs);
    let state = state::AppState::new(pool, llm, jwt);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "menuchat listening");
    axum::serve(listener, app).await.expect("server failed");
}
