mod config;
mod conversation;
mod error;
mod model;
mod notify;
mod web;

use std::sync::Arc;

use actix_files as fs;
use actix_web::{web::Data, App, HttpServer};
use anyhow::Context as _;
use dotenv::dotenv;
use log::{info, warn};
use tera::Tera;

use config::{Config, SiteConfig};
use conversation::Responder;
use model::{ChatModel, GeminiModel};
use notify::mail::{MailComposer, RelayRoute};
use notify::relay::{Relay, SmtpRelay};
use notify::Dispatcher;
use web::routes;

// App state structure
struct AppState {
    tera: Tera,
    site: SiteConfig,
    responder: Responder,
    dispatcher: Dispatcher,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting site backend");

    let config = Config::from_env().context("invalid configuration")?;

    let model: Option<Arc<dyn ChatModel>> = match config.model {
        Some(model_config) => Some(Arc::new(GeminiModel::new(model_config)) as Arc<dyn ChatModel>),
        None => {
            warn!("GEMINI_API_KEY not set; chat will answer with the contact redirect");
            None
        }
    };

    let relay = match &config.relay {
        Some(relay_config) => {
            let relay: Arc<dyn Relay> =
                Arc::new(SmtpRelay::new(relay_config).context("failed to set up SMTP relay")?);
            let route = RelayRoute {
                sender: relay_config.username.clone(),
                operator: relay_config.operator_address.clone(),
            };
            Some((relay, route))
        }
        None => {
            warn!("SMTP not configured; contact submissions will only be logged");
            None
        }
    };

    // Initialize template engine
    let mut tera = Tera::new("templates/**/*").context("template parsing error")?;
    tera.autoescape_on(vec![".html"]);

    let composer =
        MailComposer::new(config.site.clone()).context("email template parsing error")?;

    // Create app state
    let app_state = Data::new(AppState {
        tera,
        site: config.site,
        responder: Responder::new(model),
        dispatcher: Dispatcher::new(relay, composer),
    });

    info!("Listening on {}:{}", config.host, config.port);

    // Start web server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
            .service(fs::Files::new("/static", "./static"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
