//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::AppSettings;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use thiserror::Error;

use storefront::Trace;
#[cfg(debug_assertions)]
use storefront::doc::ApiDoc;
use storefront::inbound::http::auth::login;
use storefront::inbound::http::health::{HealthState, live, ready};
use storefront::inbound::http::products::{
    create_product, delete_product, get_product, like_product, list_products, update_product,
    upload_product_image,
};
use storefront::inbound::http::state::HttpState;
use storefront::inbound::http::users::create_user;
use storefront::inbound::http::validation::json_error_handler;
use storefront::outbound::persistence::DbPool;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use state_builders::build_http_state;

/// Failures while assembling the server from settings.
#[derive(Debug, Error)]
pub enum StartupError {
    /// A setting without a usable default was not supplied.
    #[error("missing required setting `{0}`")]
    MissingSetting(&'static str),
    /// An adapter rejected its configuration.
    #[error("failed to configure component: {0}")]
    Component(String),
}

impl From<StartupError> for std::io::Error {
    fn from(value: StartupError) -> Self {
        std::io::Error::other(value.to_string())
    }
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(create_user)
        .service(login)
        .service(list_products)
        .service(get_product)
        .service(create_product)
        .service(update_product)
        .service(delete_product)
        .service(like_product)
        .service(upload_product_image)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP server from settings and a ready database pool.
///
/// # Errors
///
/// Returns [`std::io::Error`] when services cannot be configured or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    settings: &AppSettings,
    pool: &DbPool,
) -> std::io::Result<Server> {
    let http_state = build_http_state(settings, pool)?;
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(settings.bind_addr())?
        .run();

    health_state.mark_ready();
    Ok(server)
}
