// restoration-server/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use restoration_server::web::configure_app_routes;
use restoration_server::{telemetry, AppConfig, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();
  telemetry::init_tracing()?;

  tracing::info!("Starting restoration order server...");

  let config = AppConfig::from_env().context("configuration error")?;
  let server_address = config.bind_address();
  let app_state = AppState::from_config(config)
    .await
    .context("failed to prepare storage directories")?;
  let app_data = actix_data::Data::new(app_state);

  tracing::info!("Binding server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(app_data.clone())
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("could not bind {}", server_address))?
  .run()
  .await?;

  tracing::info!("Server stopped.");
  Ok(())
}
