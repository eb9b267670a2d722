//! Storefront entry-point: loads settings, prepares the database and serves
//! the REST API.

mod server;

use std::ffi::OsString;
use std::path::PathBuf;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, StartupError, create_server};
use storefront::inbound::http::health::HealthState;
use storefront::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

fn load_settings() -> std::io::Result<AppSettings> {
    let args: Vec<OsString> = std::env::args_os().collect();
    AppSettings::load_from_iter(args)
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))
}

/// Describe a `.env` load failure worth reporting; a missing file is not one.
fn dotenv_failure(result: &Result<PathBuf, dotenvy::Error>) -> Option<String> {
    match result {
        Err(error) if !error.not_found() => Some(error.to_string()),
        _ => None,
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Loaded before the subscriber so `RUST_LOG` may come from `.env`.
    let dotenv = dotenvy::dotenv();

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    if let Some(error) = dotenv_failure(&dotenv) {
        warn!(%error, "failed to read .env file");
    }

    let settings = load_settings()?;
    let database_url = settings
        .database_url
        .clone()
        .ok_or(StartupError::MissingSetting("database_url"))?;

    if settings.auto_migrate {
        let applied = run_pending_migrations(&database_url)
            .await
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        info!(applied, "schema synchronised");
    }

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.db_pool_size()))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, &settings, &pool)?;
    info!(bind_addr = settings.bind_addr(), "storefront listening");
    server.await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_env_file_is_not_reported() {
        let missing = dotenvy::from_filename("definitely-missing.env");
        assert!(dotenv_failure(&missing).is_none());
    }

    #[rstest]
    fn loaded_env_file_is_not_reported() {
        assert!(dotenv_failure(&Ok(PathBuf::from(".env"))).is_none());
    }

    #[rstest]
    fn malformed_env_file_is_reported() {
        let parse_error = dotenvy::from_read(&b"not a valid line\n"[..]).map(|()| PathBuf::new());
        let message = dotenv_failure(&parse_error).expect("parse errors are reported");
        assert!(!message.is_empty());
    }
}
