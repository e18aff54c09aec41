use std::{env, fmt, fs, io, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadFailed(#[source] io::Error),
    #[error("failed to write config: {0}")]
    WriteFailed(#[source] io::Error),
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
    #[error("no config directory available, set XDG_CONFIG_HOME or HOME")]
    ConfigPathUnavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub node: Node,
    pub probe: Probe,
    pub http: Http,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub lightning_dir: path::PathBuf,
    pub rpc_file: path::PathBuf,
}

/// Kept as strings so bad values fall back to defaults instead of
/// failing the whole file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    pub frequency: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Http {
    pub bind: String,
    pub port: u16,
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/sitzprobe/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("sitzprobe/config.toml"))
}

/// lightningd's default mainnet directory
fn default_lightning_dir() -> path::PathBuf {
    env::home_dir().unwrap_or_default().join(".lightning/bitcoin")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node: Node { lightning_dir: default_lightning_dir(), rpc_file: "lightning-rpc".into() },
            probe: Probe {
                frequency: sitzprobe::config::DEFAULT_INTERVAL_MINUTES.to_string(),
                amount: sitzprobe::config::DEFAULT_AMOUNT_MSAT.to_string(),
            },
            http: Http { bind: "127.0.0.1".into(), port: 8080 },
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Internal Configuration State:")?;
        write_title_1(f, "Node")?;
        write_1(f, "Lightning Directory", &self.node.lightning_dir.display())?;
        write_1(f, "RPC File", &self.node.rpc_file.display())?;
        write_title_1(f, "Probe")?;
        write_1(f, "Frequency (min)", &self.probe.frequency)?;
        write_1(f, "Amount (msat)", &self.probe.amount)?;
        write_title_1(f, "HTTP")?;
        write_1(f, "Bind Address", &self.http.bind)?;
        write_1(f, "Port", &self.http.port)?;

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/sitzprobe/config.toml
    ///  or the specified path, with the name config.toml if one does not exist
    ///
    /// ```rust,ignore
    /// let cfg = config::Config::from_config(None::<&path::Path>)?;
    /// println!("{}", cfg);
    /// ```
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path).map_err(ConfigError::ReadFailed)?;
            Ok(toml::from_str(raw_string.as_str())?)
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), ConfigError> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::WriteFailed)?;
        }

        fs::write(path, config_str).map_err(ConfigError::WriteFailed)
    }

    /// Command line values win over the file
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.lightning_dir {
            self.node.lightning_dir = dir.clone();
        }
        if let Some(file) = &cli.rpc_file {
            self.node.rpc_file = file.clone();
        }
        if let Some(frequency) = &cli.frequency {
            self.probe.frequency = frequency.clone();
        }
        if let Some(amount) = &cli.amount {
            self.probe.amount = amount.clone();
        }
        if let Some(bind) = &cli.bind {
            self.http.bind = bind.clone();
        }
        if let Some(port) = cli.port {
            self.http.port = port;
        }
    }

    pub fn probe_config(&self) -> sitzprobe::ProbeConfig {
        sitzprobe::ProbeConfig::from_options(
            Some(self.probe.frequency.as_str()),
            Some(self.probe.amount.as_str()),
        )
    }

    pub fn rpc_socket(&self) -> path::PathBuf {
        self.node.lightning_dir.join(&self.node.rpc_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let config = Config::from_config(Some(&path)).unwrap();

        assert_eq!(config, Config::default());
        assert!(path.exists());
        assert_eq!(Config::from_config(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_extension_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        Config::from_config(Some(dir.path().join("sitzprobe"))).unwrap();

        assert!(dir.path().join("sitzprobe.toml").exists());
    }

    #[test]
    fn test_invalid_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "node = 5").unwrap();

        assert!(matches!(Config::from_config(Some(&path)), Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = Config::default();
        let cli = Cli {
            rpc_file: Some("/tmp/lightning-rpc".into()),
            frequency: Some("5".to_string()),
            port: Some(9000),
            ..Cli::default()
        };

        config.apply_cli(&cli);

        assert_eq!(config.rpc_socket(), path::PathBuf::from("/tmp/lightning-rpc"));
        assert_eq!(config.probe_config().interval_minutes, 5);
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.bind, "127.0.0.1");
    }

    #[test]
    fn test_bad_probe_values_fall_back() {
        let mut config = Config::default();
        config.probe.frequency = "abc".to_string();

        assert_eq!(
            config.probe_config().interval_minutes,
            sitzprobe::config::DEFAULT_INTERVAL_MINUTES
        );
    }

    #[test]
    fn test_display_lists_sections() {
        let text = Config::default().to_string();

        assert!(text.contains("Node"));
        assert!(text.contains("RPC File: lightning-rpc"));
        assert!(text.contains("Port: 8080"));
    }
}
