use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub credentials: CredentialsConfig,
    pub transport: TransportConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsConfig {
    /// Base URL of the credential-issuing service
    pub endpoint: String,
    /// Unset means requests may hang indefinitely
    pub request_timeout_secs: Option<u64>,
}

impl CredentialsConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize)]
pub struct TransportConfig {
    pub app_id: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[service]
name = "loqa-call"

[service.http]
bind = "127.0.0.1"
port = 8090

[credentials]
endpoint = "http://localhost:3000/api"

[transport]
app_id = "demo-app"
"#;

    #[test]
    fn test_load_toml_config() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let path = file.path().to_str().unwrap();
        let cfg = Config::load(path).unwrap();

        assert_eq!(cfg.service.name, "loqa-call");
        assert_eq!(cfg.service.http.port, 8090);
        assert_eq!(cfg.credentials.endpoint, "http://localhost:3000/api");
        assert_eq!(cfg.credentials.request_timeout(), None);
        assert_eq!(cfg.transport.app_id, "demo-app");
    }

    #[test]
    fn test_request_timeout() {
        let credentials = CredentialsConfig {
            endpoint: "http://localhost".to_string(),
            request_timeout_secs: Some(5),
        };
        assert_eq!(credentials.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(Config::load("/nonexistent/loqa-call").is_err());
    }
}
