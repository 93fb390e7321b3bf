use feature_extractor::PipelineConfig;
use feature_extractor::config::ValidationError;
use serde::Deserialize;
use std::fs::File;
use std::path::PathBuf;

#[derive(Deserialize, Debug, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
    #[serde(default = "default_metrics_prefix")]
    pub prefix: String,
}

fn default_metrics_prefix() -> String {
    "featurize".into()
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct LoggingConfig {
    pub sentry_dsn: Option<String>,
    /// Used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct CommonConfig {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

/// ua-parser regex definitions used to decode client signatures.
#[derive(Deserialize, Debug, PartialEq)]
pub struct IdentityConfig {
    pub regexes_path: PathBuf,
}

#[derive(Clone, Copy, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// `{"converted": .., "winning_prices": [..], "req": {..}}` per line
    #[default]
    Observation,
    /// One bare request per line
    Request,
}

#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct InputConfig {
    #[serde(default)]
    pub format: InputFormat,
}

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(flatten)]
    pub common: CommonConfig,
    #[serde(default)]
    pub extractor: PipelineConfig,
    pub identity: Option<IdentityConfig>,
    #[serde(default)]
    pub input: InputConfig,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(metrics) = &self.common.metrics
            && metrics.statsd_port == 0
        {
            return Err(ConfigError::InvalidStatsdPort);
        }

        self.extractor.validate()?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid extractor config: {0}")]
    Invalid(#[from] ValidationError),
    #[error("statsd port cannot be 0")]
    InvalidStatsdPort,
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_extractor::CollisionPolicy;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn full_config() {
        let yaml = r#"
            metrics:
                statsd_host: 127.0.0.1
                statsd_port: 8125
            logging:
                sentry_dsn: https://public@sentry.example.com/1
            extractor:
                namespaces: [device, imp]
                collision_policy: error
            identity:
                regexes_path: /etc/uap/regexes.yaml
            input:
                format: request
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");
        assert!(config.validate().is_ok());

        let metrics = config.common.metrics.expect("metrics config");
        assert_eq!(metrics.statsd_port, 8125);
        assert_eq!(metrics.prefix, "featurize");

        let logging = config.common.logging.expect("logging config");
        assert_eq!(logging.level, "info");
        assert!(logging.sentry_dsn.is_some());

        assert_eq!(config.extractor.namespaces, vec!["device", "imp"]);
        assert_eq!(config.extractor.collision_policy, CollisionPolicy::Error);
        assert_eq!(config.extractor.signature_key, "ua");
        assert_eq!(
            config.identity.expect("identity config").regexes_path,
            PathBuf::from("/etc/uap/regexes.yaml")
        );
        assert_eq!(config.input.format, InputFormat::Request);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let tmp = write_tmp_file("{}");
        let config = Config::from_file(tmp.path()).expect("load config");

        assert!(config.validate().is_ok());
        assert_eq!(config.common, CommonConfig::default());
        assert_eq!(config.extractor, PipelineConfig::default());
        assert!(config.identity.is_none());
        assert_eq!(config.input.format, InputFormat::Observation);
    }

    #[test]
    fn invalid_configs() {
        let tmp = write_tmp_file("extractor:\n    namespaces: []\n");
        let config = Config::from_file(tmp.path()).expect("load config");
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Invalid(ValidationError::NoNamespaces)
        ));

        let tmp = write_tmp_file("metrics:\n    statsd_host: localhost\n    statsd_port: 0\n");
        let config = Config::from_file(tmp.path()).expect("load config");
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::InvalidStatsdPort
        ));

        let tmp = write_tmp_file("input:\n    format: csv\n");
        assert!(matches!(
            Config::from_file(tmp.path()).unwrap_err(),
            ConfigError::ParseError(_)
        ));

        assert!(matches!(
            Config::from_file(std::path::Path::new("/nonexistent/featurize.yaml")).unwrap_err(),
            ConfigError::LoadError(_)
        ));
    }
}
