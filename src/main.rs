use actix_web::HttpServer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use weather_chat_dashboard::{AppConfig, AppServices, TextProvider, create_app};

/// Initialize the global subscriber; `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    if json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}

fn warn_on_missing_credentials(config: &AppConfig) {
    if !config.weather.has_credentials() {
        warn!("OPENWEATHER_API_KEY is not set; weather lookups will be rejected by the provider");
    }
    let text = &config.text_generation;
    if text.provider != TextProvider::Mock && text.api_key.is_none() {
        warn!(
            provider = text.provider.as_str(),
            "Text generation API key is not set; summaries will show an error message"
        );
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    warn_on_missing_credentials(&config);

    let services = AppServices::from_config(&config).map_err(std::io::Error::other)?;

    info!(
        bind_address = %config.server.bind_address,
        text_provider = config.text_generation.provider.as_str(),
        model = %config.text_generation.model,
        session_ttl_seconds = config.server.session_ttl_seconds,
        "Starting weather dashboard"
    );

    let bind_address = config.server.bind_address.clone();
    HttpServer::new(move || create_app(&config, services.clone()))
        .bind(bind_address)?
        .run()
        .await
}
