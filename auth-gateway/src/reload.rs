use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use common_auth::{AuthorizerRegistry, EnvSecretSource, SecretSource};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::config::GateFile;

/// Rebuild the authorizer from `path` and swap it in.
///
/// A file that fails to load or validate leaves the current authorizer serving.
pub fn reload_once(
    state: &AppState,
    path: &Path,
    registry: &AuthorizerRegistry,
    secrets: &dyn SecretSource,
) -> bool {
    match GateFile::load(path).and_then(|file| file.build(registry, secrets)) {
        Ok(next) => {
            state.authorizer.replace(next);
            state.metrics.record_reload(true);
            info!(path = %path.display(), "authorizer configuration reloaded");
            true
        }
        Err(err) => {
            state.metrics.record_reload(false);
            warn!(
                error = %format!("{err:#}"),
                path = %path.display(),
                "authorizer reload failed; keeping previous configuration"
            );
            false
        }
    }
}

pub fn spawn_config_reload(
    state: AppState,
    path: PathBuf,
    registry: Arc<AuthorizerRegistry>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; startup already loaded the file.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            reload_once(&state, &path, &registry, &EnvSecretSource);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use common_auth::{Authorize, AuthResult, SharedAuthorizer};
    use common_observability::GateMetrics;
    use std::collections::HashMap;
    use std::fs;

    struct AllowAll;

    impl Authorize for AllowAll {
        fn evaluate(&self, _headers: &HeaderMap) -> AuthResult<()> {
            Ok(())
        }
    }

    fn state() -> AppState {
        AppState::new(
            SharedAuthorizer::new(Arc::new(AllowAll)),
            Arc::new(GateMetrics::new().unwrap()),
        )
    }

    fn write_config(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{name}-{}.toml", std::process::id()));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn valid_file_replaces_authorizer() {
        let state = state();
        let path = write_config(
            "gate-reload-valid",
            r#"
            [authorizer.config]
            algorithm = "HS256"
            issuers = [{ iss = "svc-a", secret_env_path = "SVC_A_SECRET" }]
            "#,
        );
        let env = HashMap::from([("SVC_A_SECRET".to_string(), "s3cr3t".to_string())]);

        assert!(reload_once(&state, &path, &AuthorizerRegistry::with_defaults(), &env));
        // The JWT authorizer refuses a request without credentials.
        assert!(!state.authorizer.authorize(&HeaderMap::new()).admitted);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn invalid_file_keeps_previous_authorizer() {
        let state = state();
        let path = write_config(
            "gate-reload-invalid",
            r#"
            [authorizer.config]
            algorithm = "RS256"
            issuers = [{ iss = "svc-a", secret_env_path = "SVC_A_SECRET" }]
            "#,
        );
        let env = HashMap::from([("SVC_A_SECRET".to_string(), "s3cr3t".to_string())]);

        assert!(!reload_once(&state, &path, &AuthorizerRegistry::with_defaults(), &env));
        assert!(state.authorizer.authorize(&HeaderMap::new()).admitted);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_a_failed_reload() {
        let state = state();
        let path = PathBuf::from("/nonexistent/gate.toml");
        assert!(!reload_once(
            &state,
            &path,
            &AuthorizerRegistry::with_defaults(),
            &HashMap::<String, String>::new()
        ));
    }
}
