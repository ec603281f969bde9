use actix_web::web;

pub mod health;
pub mod realms;

/// Register every route. `main.rs` and the route tests share this so both
/// exercise the same paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Realm-scoped command surface: /api/realms/**
    cfg.service(web::scope("/api/realms").configure(realms::configure_routes));
}
