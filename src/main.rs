#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_web::{
    middleware::{from_fn, Logger},
    web, App, HttpServer,
};
use sessiongate::{
    handlers::{current_user, health, whoami, with_auth},
    session::attach_bearer_session,
    settings::GateSettings,
    ValidationConfig, VERSION,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = GateSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    start_server(settings).await
}

/// Start the server
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(settings: GateSettings) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    let config = settings.validation_config();
    print_startup_info(&bind_address, &config);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .wrap(from_fn(attach_bearer_session))
            .wrap(Logger::default())
            .configure(|cfg| configure_services(cfg, &config))
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn configure_services(cfg: &mut web::ServiceConfig, config: &ValidationConfig) {
    cfg.route("/ping", web::get().to(health))
        .route("/api/me", web::get().to(with_auth(current_user, Some(config.clone()))))
        .route("/api/whoami", web::get().to(whoami));
}

fn print_startup_info(bind_address: &str, config: &ValidationConfig) {
    println!("Starting session gate v{VERSION} on http://{bind_address}");
    println!();
    println!("Validation policy:");
    println!("  require_user_id:   {}", config.require_user_id);
    println!("  require_email:     {}", config.require_email);
    println!("  log_errors:        {}", config.log_errors);
    if config.custom_scopes.is_empty() {
        println!("  required scopes:   (none)");
    } else {
        println!("  required scopes:   {}", config.custom_scopes.join(" "));
    }
    if let Some(audience) = &config.expected_audience {
        println!("  expected audience: {audience}");
    }
    println!();
    println!("Endpoints:");
    println!("  GET  /ping        - Health check");
    println!("  GET  /api/me      - Current user (wrapped handler)");
    println!("  GET  /api/whoami  - Current user (extractor)");
}
