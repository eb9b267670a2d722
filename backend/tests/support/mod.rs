//! Shared PostgreSQL setup for repository integration tests.
//!
//! `STOREFRONT_TEST_DATABASE_URL` points the suites at an existing database
//! (CI uses this). Without it, each test binary provisions one database on
//! the shared embedded cluster from `pg-embed-setup-unpriv`. Rows are keyed
//! by fresh UUIDs so tests share that database without truncating.

use pg_embedded_setup_unpriv::ClusterHandle;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use storefront::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use tokio::sync::OnceCell;
use uuid::Uuid;

const DATABASE_URL_VAR: &str = "STOREFRONT_TEST_DATABASE_URL";
const SKIP_CLUSTER_VAR: &str = "SKIP_TEST_CLUSTER";
const CLUSTER_RETRIES: usize = 5;
const CLUSTER_RETRY_DELAY: std::time::Duration = std::time::Duration::from_millis(500);

static DATABASE: OnceCell<Result<String, String>> = OnceCell::const_new();

/// Connection URL for an externally managed test database, if configured.
pub fn database_url() -> Option<String> {
    std::env::var(DATABASE_URL_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Whether `SKIP_TEST_CLUSTER` is set to a truthy value.
fn should_skip_cluster() -> bool {
    std::env::var(SKIP_CLUSTER_VAR)
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Keep the cluster password stable so a data directory reused by a later
/// test binary still accepts connections.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs inside the one-time initialiser before the cluster
        // library reads its environment.
        unsafe {
            std::env::set_var("PG_PASSWORD", "storefront_embedded_test");
        }
    }
}

fn cluster() -> Result<&'static ClusterHandle, String> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= CLUSTER_RETRIES => return Err(format!("{error:?}")),
            Err(_) => {
                std::thread::sleep(CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Create a fresh database on the embedded cluster and return its URL.
fn provision_embedded_database() -> Result<String, String> {
    let cluster = cluster()?;
    let name = format!("storefront_test_{}", Uuid::new_v4().simple());
    cluster
        .create_database(name.as_str())
        .map_err(|err| format!("create database: {err:?}"))?;
    Ok(cluster.connection().database_url(&name))
}

async fn resolve_database() -> Result<String, String> {
    let url = match database_url() {
        Some(url) => url,
        None => tokio::task::spawn_blocking(provision_embedded_database)
            .await
            .map_err(|err| format!("cluster bootstrap task failed: {err}"))??,
    };
    run_pending_migrations(&url)
        .await
        .map_err(|err| format!("migration failed: {err}"))?;
    Ok(url)
}

/// Migrate once per test binary, then hand out a small pool.
///
/// Returns `None` with a skip marker only when the embedded cluster cannot
/// start and `SKIP_TEST_CLUSTER` is truthy; any other setup failure panics
/// so a broken database never passes silently.
pub async fn test_pool() -> Option<DbPool> {
    let url = match DATABASE.get_or_init(resolve_database).await {
        Ok(url) => url.clone(),
        Err(reason) if should_skip_cluster() => {
            eprintln!("SKIP-TEST-CLUSTER: {reason}");
            return None;
        }
        Err(reason) => {
            panic!("test database setup failed: {reason}. Set {SKIP_CLUSTER_VAR}=1 to skip.")
        }
    };
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(2))
        .await
        .expect("test database pool");
    Some(pool)
}

/// Short unique suffix for usernames, emails and categories.
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
