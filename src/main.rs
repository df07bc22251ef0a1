//! # Credit Shop Web Application
//!
//! Entry point for the credit shop: package picker, payment form and the payment
//! endpoint that grants the credits through the game server.
//! Configures SSL, middleware, cryptographic keys, and route handling.
#![recursion_limit = "256"]

pub mod api;
pub mod config;
pub mod consts;
pub mod front;
pub mod metric;
pub mod models;
pub mod services;
pub mod shop;
pub mod utils;

use anyhow::Context;
use csrf::AesGcmCsrfProtection;
use envconfig::Envconfig;
use logfire::config::{MetricsOptions, SendToLogfire};
use ntex::web;
use ntex_cors::Cors;
use ntex_session::CookieSession;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};
use std::sync::Arc;

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::AppConfig::init_from_env().context("failed to load app config")?;

    // Initialize logging and metrics, nothing leaves the process without a token
    let mut logfire_config = logfire::configure()
        .install_panic_handler()
        .with_metrics(Some(MetricsOptions::default()))
        .send_to_logfire(SendToLogfire::IfTokenPresent);
    if let Some(token) = &app_config.logfire_token {
        logfire_config = logfire_config.with_token(token);
    }
    let shutdown_handler = logfire_config.finish()?;

    // Keys derived with Argon2 from the configured password and salt
    let csrf_key = utils::build_configured_csrf_key(
        app_config.csrf_pass.as_deref(),
        app_config.csrf_salt.as_deref(),
    )?;
    let session_key = utils::build_random_csrf_key()?;

    let payment_processor = Arc::new(api::payment::PaymentProcessor::new(
        consts::CREDIT_PACKAGES.to_vec(),
        create_game_server(&app_config)?,
        app_config.timezone()?,
    ));

    configure_and_run_server(app_config, csrf_key, session_key, payment_processor).await?;

    shutdown_handler.shutdown()?;

    Ok(())
}

/// Real game server client when `GAME_SERVER_URL` is set, the simulated one otherwise
fn create_game_server(
    app_config: &config::AppConfig,
) -> anyhow::Result<services::ImplGameServerService> {
    match &app_config.game_server_url {
        Some(url) => Ok(Box::new(services::game_server::GameServerClient::new(
            url,
            &app_config.game_server_api_key,
        )?)),
        None => {
            logfire::warn!("GAME_SERVER_URL not set, credit grants are simulated");
            Ok(Box::new(services::game_server::SimulatedGameServer))
        }
    }
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor(
    app_config: &config::AppConfig,
) -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Creates the state of one worker
fn create_app_state(
    app_config: &config::AppConfig,
    csrf_key: [u8; 32],
    payment_processor: Arc<api::payment::PaymentProcessor>,
    submissions: front::submission::InFlightSubmissions,
    timezone: chrono_tz::Tz,
) -> front::AppState {
    let payment_gateway: services::ImplPaymentGateway = match &app_config.payment_endpoint_url {
        Some(endpoint) => Box::new(services::payment_gateway::HttpPaymentGateway::new(
            utils::REQUEST_CLIENT.clone(),
            endpoint.as_str(),
        )),
        None => Box::new(services::payment_gateway::LocalPaymentGateway::new(
            payment_processor.clone(),
        )),
    };

    front::AppState {
        csrf_protec: AesGcmCsrfProtection::from_key(csrf_key),
        catalog: consts::CREDIT_PACKAGES.to_vec(),
        payment_processor,
        payment_gateway,
        submissions,
        timezone,
    }
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(
    app_config: config::AppConfig,
    csrf_key: [u8; 32],
    session_key: [u8; 32],
    payment_processor: Arc<api::payment::PaymentProcessor>,
) -> anyhow::Result<()> {
    let server_addr = ("0.0.0.0", app_config.web_server_port);
    let timezone = app_config.timezone()?;
    let submissions = front::submission::InFlightSubmissions::default();
    let base_url = app_config.base_url();
    let ssl_acceptor = if app_config.is_prod() {
        Some(setup_ssl_acceptor(&app_config)?)
    } else {
        None
    };

    let server = web::server(move || {
        web::App::new()
            .wrap(
                Cors::new()
                    .allowed_methods(vec!["GET", "HEAD", "POST", "OPTIONS"])
                    .allowed_origin(&app_config.base_url())
                    .finish(),
            )
            .wrap(
                CookieSession::private(&session_key)
                    .secure(app_config.is_prod())
                    .domain(app_config.web_server_host.to_string())
                    .max_age(consts::MAX_AGE_COOKIES)
                    .name(consts::SESSION_COOKIE_NAME),
            )
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(create_app_state(
                &app_config,
                csrf_key,
                payment_processor.clone(),
                submissions.clone(),
                timezone,
            ))
            .configure(front::routes::credit_shop)
            .configure(front::routes::payment)
            .configure(front::routes::payment_api)
            .service((
                ntex_files::Files::new("/static", "web/static/"),
                front::server::index,
            ))
            .default_service(web::route().to(front::server::serve_not_found))
    });

    let bound_server = match ssl_acceptor {
        Some(ssl_acceptor) => server.bind_openssl(server_addr, ssl_acceptor)?,
        None => server.bind(server_addr)?,
    };

    logfire::info!(
        "credit shop listening on {base_url}",
        base_url = base_url
    );

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
