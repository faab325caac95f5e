// Configuration module entry point
// Layers defaults, config file, environment and command line into one immutable Config

mod cli;
mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use cli::Cli;
pub use state::AppState;
pub use types::Config;

use types::{
    DEFAULT_ACCESS_LOG_FORMAT, DEFAULT_EXTENSION, DEFAULT_HEADER_READ_TIMEOUT, DEFAULT_HOST,
    DEFAULT_PORT,
};

/// Config file looked up in the working directory when `--config` is absent
const DEFAULT_CONFIG_NAME: &str = "hicstream";
const ENV_PREFIX: &str = "HICSTREAM";

impl Config {
    /// Load configuration, lowest to highest priority:
    /// defaults, config file, `HICSTREAM_*` environment, command line.
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        Self::load_with_env(cli, None)
    }

    /// Load with an explicit environment map in place of the process
    /// environment (`None` reads the real one).
    fn load_with_env(
        cli: &Cli,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let file = match &cli.config {
            Some(path) => config::File::from(path.as_path()).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let mut builder = config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("serve.directory", ".")?
            .set_default("serve.extensions", vec![DEFAULT_EXTENSION])?
            .set_default("serve.allow_dirlist", false)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", DEFAULT_ACCESS_LOG_FORMAT)?
            .set_default("performance.keep_alive", true)?
            .set_default(
                "performance.header_read_timeout",
                i64::try_from(DEFAULT_HEADER_READ_TIMEOUT).unwrap_or(i64::MAX),
            )?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("serve.extensions")
                    .try_parsing(true)
                    .source(env),
            );

        builder = builder
            .set_override_option("server.host", cli.host.clone())?
            .set_override_option("server.port", cli.port.map(i64::from))?
            .set_override_option(
                "server.workers",
                cli.workers.and_then(|w| i64::try_from(w).ok()),
            )?
            .set_override_option(
                "serve.directory",
                cli.directory
                    .as_ref()
                    .map(|d| d.to_string_lossy().into_owned()),
            )?
            .set_override_option("serve.extensions", cli.extensions.clone())?;

        if cli.allow_dirlist {
            builder = builder.set_override("serve.allow_dirlist", true)?;
        }
        if cli.quiet {
            builder = builder.set_override("logging.access_log", false)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn load(cli: &Cli) -> Result<Config, config::ConfigError> {
        Config::load_with_env(cli, Some(config::Map::new()))
    }

    fn empty_config_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hicstream.toml");
        std::fs::write(&path, "").unwrap();
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let (_dir, path) = empty_config_file();
        let cli = Cli {
            config: Some(path),
            ..Cli::default()
        };
        let cfg = load(&cli).unwrap();
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        assert_eq!(cfg.server.host, DEFAULT_HOST);
        assert_eq!(cfg.serve.extensions, vec![DEFAULT_EXTENSION.to_string()]);
        assert!(!cfg.serve.allow_dirlist);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8020);
    }

    #[test]
    fn test_file_then_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9100

[serve]
extensions = [".hic", ".mcool"]
allow_dirlist = true

[performance]
max_connections = 64
"#,
        )
        .unwrap();

        let cli = Cli {
            config: Some(path.clone()),
            ..Cli::default()
        };
        let cfg = load(&cli).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert!(cfg.serve.allow_dirlist);
        assert_eq!(cfg.serve.extensions.len(), 2);
        assert_eq!(cfg.performance.max_connections, Some(64));

        let cli = Cli {
            config: Some(path),
            port: Some(9200),
            extensions: Some(vec!["*".to_string()]),
            quiet: true,
            ..Cli::default()
        };
        let cfg = load(&cli).unwrap();
        assert_eq!(cfg.server.port, 9200);
        assert_eq!(cfg.serve.extensions, vec!["*".to_string()]);
        assert!(!cfg.logging.access_log);
        assert!(types::AllowedExtensions::from_config(&cfg.serve.extensions).allows_all());
    }

    #[test]
    fn test_missing_explicit_config_file_is_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/hicstream.toml")),
            ..Cli::default()
        };
        assert!(load(&cli).is_err());
    }

    #[test]
    fn test_environment_layer() {
        let (_dir, path) = empty_config_file();
        let env = config::Map::from([
            ("HICSTREAM_SERVER__PORT".to_string(), "9300".to_string()),
            ("HICSTREAM_SERVE__EXTENSIONS".to_string(), ".hic,.mcool".to_string()),
            ("HICSTREAM_SERVE__ALLOW_DIRLIST".to_string(), "true".to_string()),
            ("OTHER_SERVER__PORT".to_string(), "1".to_string()),
        ]);

        let cli = Cli {
            config: Some(path.clone()),
            ..Cli::default()
        };
        let cfg = Config::load_with_env(&cli, Some(env.clone())).unwrap();
        assert_eq!(cfg.server.port, 9300);
        assert_eq!(
            cfg.serve.extensions,
            vec![".hic".to_string(), ".mcool".to_string()]
        );
        assert!(cfg.serve.allow_dirlist);

        // command line still wins over the environment
        let cli = Cli {
            config: Some(path),
            port: Some(9400),
            ..Cli::default()
        };
        let cfg = Config::load_with_env(&cli, Some(env)).unwrap();
        assert_eq!(cfg.server.port, 9400);
    }
}
