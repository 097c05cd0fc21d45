//! Storefront entry-point: loads settings, prepares storage and serves the API.

mod server;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, create_server};
use storefront::inbound::http::health::HealthState;
use storefront::inbound::http::session_config::{BuildMode, SessionSettings};
use storefront::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let session = load_session_settings(BuildMode::current())?;
    let bind_addr = settings.bind_addr()?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    );
    if let Some(pool) = connect_database(&settings).await? {
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await
}

fn load_session_settings(mode: BuildMode) -> std::io::Result<SessionSettings> {
    SessionSettings::from_env(&DefaultEnv::new(), mode)
        .map_err(|e| std::io::Error::other(format!("invalid session configuration: {e}")))
}

async fn connect_database(settings: &ServerSettings) -> std::io::Result<Option<DbPool>> {
    let Some(database_url) = settings.database_url.as_deref() else {
        return Ok(None);
    };
    if !settings.skip_migrations {
        run_pending_migrations(database_url)
            .await
            .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
    }
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.db_pool_size()))
        .await
        .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))?;
    Ok(Some(pool))
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Option<actix_web_prom::PrometheusMetrics> {
    match PrometheusMetricsBuilder::new("storefront")
        .endpoint("/metrics")
        .build()
    {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "failed to configure Prometheus metrics; continuing without them");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::SameSite;
    use env_lock::lock_env;
    use rstest::rstest;

    #[rstest]
    fn process_environment_yields_debug_session_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing_key = dir.path().join("absent_key");
        let _guard = lock_env([
            (
                "SESSION_KEY_FILE",
                Some(missing_key.to_string_lossy().into_owned()),
            ),
            ("SESSION_COOKIE_SECURE", None::<String>),
            ("SESSION_SAMESITE", None::<String>),
            ("SESSION_ALLOW_EPHEMERAL", None::<String>),
        ]);

        let settings = load_session_settings(BuildMode::Debug).expect("debug settings");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    fn process_environment_is_strict_in_release() {
        let _guard = lock_env([
            ("SESSION_KEY_FILE", None::<String>),
            ("SESSION_COOKIE_SECURE", None::<String>),
            ("SESSION_SAMESITE", None::<String>),
            ("SESSION_ALLOW_EPHEMERAL", None::<String>),
        ]);

        let err = load_session_settings(BuildMode::Release)
            .err()
            .expect("missing toggles are rejected");
        assert!(err.to_string().contains("SESSION_COOKIE_SECURE"));
    }
}
