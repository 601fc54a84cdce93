use actix_web::web;
use log::warn;

use crate::error::{ApiError, ValidationError};
use crate::web::handlers;

/// Body parse failures answer with the endpoint's own validation message.
fn json_config(on_error: ValidationError) -> web::JsonConfig {
    web::JsonConfig::default().error_handler(move |err, _req| {
        warn!("Rejected request body: {}", err);
        actix_web::Error::from(ApiError::Validation(on_error.clone()))
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::resource("/chat")
                    .app_data(json_config(ValidationError::MissingMessages))
                    .route(web::post().to(handlers::chat)),
            )
            .service(
                web::resource("/contact")
                    .app_data(json_config(ValidationError::MissingFields))
                    .route(web::post().to(handlers::contact)),
            ),
    )
    .route("/", web::get().to(handlers::index))
    .route("/health", web::get().to(handlers::health_check));
}
