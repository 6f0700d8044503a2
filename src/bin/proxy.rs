use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use serde::Deserialize;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use upn_proxy::drivers::http::HttpConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        help = "Proxy config path file",
        env = "PROXY_CONFIG",
        default_value = "proxy.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = Config::new(&cli.config)?;

    let level = if config.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter)
        .init();

    let secrets = Secrets::from_file(&config.secrets_path)?;
    info!(path = %config.secrets_path.display(), "secrets loaded");

    upn_proxy::drivers::http::server(Settings { config, secrets }.into()).await
}

#[derive(Debug, Clone, Deserialize)]
struct Config {
    addr: String,
    secrets_path: PathBuf,
    upstream_url: String,
    upstream_timeout_secs: Option<u64>,
    debug: bool,
}
impl Config {
    pub fn new(path: &str) -> Result<Self> {
        Self::with_env(path, None)
    }

    /// `env` replaces the process environment when given.
    fn with_env(path: &str, env: Option<config::Map<String, String>>) -> Result<Self> {
        let config = config::Config::builder()
            .set_default("addr", "0.0.0.0:5000")?
            .set_default("secrets_path", "secrets.txt")?
            .set_default(
                "upstream_url",
                "https://your-domain.atlassian.net/rest/api/3/user",
            )?
            .set_default("debug", true)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("proxy")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }
}

#[derive(Clone, Deserialize)]
struct Secrets {
    #[serde(rename = "JIRAACCOUNT")]
    jira_account: String,
    #[serde(rename = "JIRAAPIKEY")]
    jira_api_key: String,
    #[serde(rename = "LOCALACCOUNT")]
    local_account: String,
    #[serde(rename = "LOCALAPIKEY")]
    local_api_key: String,
}
impl Secrets {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading secrets file {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("parsing secrets file {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("jira_account", &self.jira_account)
            .field("local_account", &self.local_account)
            .finish_non_exhaustive()
    }
}

struct Settings {
    config: Config,
    secrets: Secrets,
}

impl From<Settings> for HttpConfig {
    fn from(value: Settings) -> Self {
        let Settings { config, secrets } = value;

        Self {
            addr: config.addr,
            upstream_url: config.upstream_url,
            upstream_account: secrets.jira_account,
            upstream_api_key: secrets.jira_api_key,
            upstream_timeout: config.upstream_timeout_secs.map(Duration::from_secs),
            local_account: secrets.local_account,
            local_api_key: secrets.local_api_key,
            debug: config.debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRETS: &str = r#"{
        "JIRAACCOUNT": "svc-upn@example.com",
        "JIRAAPIKEY": "jira-token",
        "LOCALACCOUNT": "upn-reader",
        "LOCALAPIKEY": "local-api-key"
    }"#;

    #[test]
    fn it_should_parse_secrets() {
        let secrets = Secrets::parse(SECRETS).unwrap();

        assert_eq!(secrets.jira_account, "svc-upn@example.com");
        assert_eq!(secrets.jira_api_key, "jira-token");
        assert_eq!(secrets.local_account, "upn-reader");
        assert_eq!(secrets.local_api_key, "local-api-key");
    }

    #[test]
    fn it_should_fail_when_a_secret_is_missing() {
        let result = Secrets::parse(r#"{"JIRAACCOUNT":"a","JIRAAPIKEY":"b","LOCALACCOUNT":"c"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn it_should_fail_when_secrets_are_not_json() {
        assert!(Secrets::parse("JIRAACCOUNT=a").is_err());
    }

    #[test]
    fn it_should_fail_when_secrets_file_is_missing() {
        let result = Secrets::from_file(Path::new("/nonexistent/secrets.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn it_should_not_leak_api_keys_on_debug() {
        let output = format!("{:?}", Secrets::parse(SECRETS).unwrap());

        assert!(!output.contains("jira-token"));
        assert!(!output.contains("local-api-key"));
    }

    #[test]
    fn it_should_load_defaults_without_config_file() {
        let config =
            Config::with_env("nonexistent-proxy-config", Some(Default::default())).unwrap();

        assert_eq!(config.addr, "0.0.0.0:5000");
        assert_eq!(config.secrets_path, PathBuf::from("secrets.txt"));
        assert_eq!(
            config.upstream_url,
            "https://your-domain.atlassian.net/rest/api/3/user"
        );
        assert!(config.upstream_timeout_secs.is_none());
        assert!(config.debug);
    }

    #[test]
    fn it_should_override_defaults_from_env() {
        let env = config::Map::from([
            ("PROXY_ADDR".to_string(), "127.0.0.1:8080".to_string()),
            (
                "PROXY_UPSTREAM_URL".to_string(),
                "http://jira.local/rest/api/3/user".to_string(),
            ),
            ("PROXY_UPSTREAM_TIMEOUT_SECS".to_string(), "5".to_string()),
            ("PROXY_DEBUG".to_string(), "false".to_string()),
            ("PROXY_SECRETS_PATH".to_string(), "/etc/s.json".to_string()),
            ("OTHER_DEBUG".to_string(), "true".to_string()),
        ]);

        let config = Config::with_env("nonexistent-proxy-config", Some(env)).unwrap();

        assert_eq!(config.addr, "127.0.0.1:8080");
        assert_eq!(config.upstream_url, "http://jira.local/rest/api/3/user");
        assert_eq!(config.upstream_timeout_secs, Some(5));
        assert_eq!(config.secrets_path, PathBuf::from("/etc/s.json"));
        assert!(!config.debug);
    }

    #[test]
    fn it_should_build_http_config() {
        let config = Config {
            addr: "127.0.0.1:8080".into(),
            secrets_path: "secrets.txt".into(),
            upstream_url: "http://jira.local/rest/api/3/user".into(),
            upstream_timeout_secs: Some(10),
            debug: false,
        };
        let secrets = Secrets::parse(SECRETS).unwrap();

        let http_config: HttpConfig = Settings { config, secrets }.into();

        assert_eq!(http_config.addr, "127.0.0.1:8080");
        assert_eq!(http_config.upstream_account, "svc-upn@example.com");
        assert_eq!(http_config.local_api_key, "local-api-key");
        assert_eq!(http_config.upstream_timeout, Some(Duration::from_secs(10)));
        assert!(!http_config.debug);
    }
}
