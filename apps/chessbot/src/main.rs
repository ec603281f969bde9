use actix_web::{web, App, HttpServer};
use chessbot::config::bot::BotConfig;
use chessbot::infra::state::build_state;
use chessbot::middleware::{RequestTrace, StructuredLogger};
use chessbot::routes;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, systemd EnvironmentFile, or an exported shell).
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Loads the snapshot; a corrupt or locked one aborts startup.
    let app_state = match build_state().with_config(config.clone()).build().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    app_state
        .persistence
        .spawn_periodic(app_state.registry.clone(), config.snapshot_interval);

    info!(
        addr = %config.bind_addr(),
        bot = %config.bot_user_id,
        snapshot = %config.snapshot_path.display(),
        "Starting chessbot"
    );

    let data = web::Data::new(app_state.clone());
    let server = HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    // Resolves after SIGINT/SIGTERM once in-flight requests drain.
    let served = server.await;

    if let Err(e) = app_state.persistence.shutdown(&app_state.registry).await {
        error!(error = %e, "Final snapshot failed");
        eprintln!("❌ Final snapshot failed: {e}");
        std::process::exit(1);
    }
    served
}
