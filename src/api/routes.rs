// API route configuration

use crate::api::handlers;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Liveness
        .route("/health", web::get().to(handlers::health_check))
        .route("/", web::get().to(handlers::health_check))
        // Storefront API consumed by the web front-end
        .service(
            web::scope("/api")
                .route("/storefront", web::get().to(handlers::get_storefront))
                .route("/checkout", web::post().to(handlers::create_checkout))
                .route(
                    "/sellauth-health",
                    web::get().to(handlers::sellauth_health),
                )
                .route("/reviews", web::get().to(handlers::get_reviews)),
        );
}
