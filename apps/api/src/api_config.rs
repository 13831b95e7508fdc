use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use qms_core::AppError;
use tracing_subscriber::EnvFilter;

/// Backend receiving saved role permission sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceBackend {
    /// Log the save and keep nothing.
    Log,
    /// Keep the last saved set per role in memory.
    Memory,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub persistence: PersistenceBackend,
    pub seed_demo_roles: bool,
    pub audit_subject: String,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = match lookup("API_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            None => 3001,
        };
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let persistence = match lookup("QMS_PERSISTENCE")
            .unwrap_or_else(|| "log".to_owned())
            .trim()
        {
            "log" => PersistenceBackend::Log,
            "memory" => PersistenceBackend::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "QMS_PERSISTENCE must be either 'log' or 'memory', got '{other}'"
                )));
            }
        };

        let seed_demo_roles = lookup("QMS_SEED_DEMO_ROLES")
            .unwrap_or_else(|| "true".to_owned())
            .eq_ignore_ascii_case("true");

        let audit_subject = lookup("QMS_AUDIT_SUBJECT")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "qms-admin".to_owned());

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            persistence,
            seed_demo_roles,
            audit_subject,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let ip = IpAddr::from_str(self.api_host.as_str())
            .map_err(|error| AppError::Validation(format!("invalid API_HOST: {error}")))?;

        Ok(SocketAddr::from((ip, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use qms_core::AppError;

    use super::{ApiConfig, PersistenceBackend};

    fn load(values: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let values: HashMap<String, String> = values
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = load(&[]).unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_port, 3001);
        assert_eq!(config.persistence, PersistenceBackend::Log);
        assert!(config.seed_demo_roles);
        assert_eq!(config.audit_subject, "qms-admin");
        assert!(config.socket_address().is_ok());
    }

    #[test]
    fn unknown_persistence_backend_is_rejected() {
        let result = load(&[("QMS_PERSISTENCE", "postgres")]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let result = load(&[("API_PORT", "http")]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn memory_backend_and_seed_toggle_are_read() {
        let config = load(&[("QMS_PERSISTENCE", "memory"), ("QMS_SEED_DEMO_ROLES", "false")])
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.persistence, PersistenceBackend::Memory);
        assert!(!config.seed_demo_roles);
    }

    #[test]
    fn invalid_host_fails_socket_address() {
        let config = load(&[("API_HOST", "localhost:80")]).unwrap_or_else(|_| unreachable!());
        assert!(config.socket_address().is_err());
    }
}
