use tokio::net::TcpListener;
use tracing::info;
use url_digest::{
    config::Config,
    api::routes::create_router,
    telemetry::init_tracing,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;
    init_tracing();

    let server_addr = config.server_addr;
    if config.groq_api_key.is_none() {
        info!("GROQ_API_KEY not set; requests must supply their own key");
    }

    let app_state = AppState::from_config(config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!(%server_addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
