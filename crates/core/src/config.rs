use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub data: DataConfig,
    pub analytics: AnalyticsConfig,
    pub logging: LoggingConfig,
}

/// Location of the five source tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub orders_file: String,
    pub order_lines_file: String,
    pub products_file: String,
    pub aisles_file: String,
    pub departments_file: String,
}

/// Default result sizes used when a caller does not pass an explicit limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub leaderboard_limit: usize,
    pub similar_limit: usize,
    pub recommendation_limit: usize,
    pub per_department_cap: usize,
    pub trending_limit: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            analytics: AnalyticsConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            orders_file: "orders_sampled.csv".to_string(),
            order_lines_file: "order_products__prior_sampled.csv".to_string(),
            products_file: "products.csv".to_string(),
            aisles_file: "aisles.csv".to_string(),
            departments_file: "departments.csv".to_string(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            leaderboard_limit: 10,
            similar_limit: 10,
            recommendation_limit: 10,
            per_department_cap: 3,
            trending_limit: 5,
        }
    }
}

impl DataConfig {
    pub fn orders_path(&self) -> PathBuf {
        self.dir.join(&self.orders_file)
    }

    pub fn order_lines_path(&self) -> PathBuf {
        self.dir.join(&self.order_lines_file)
    }

    pub fn products_path(&self) -> PathBuf {
        self.dir.join(&self.products_file)
    }

    pub fn aisles_path(&self) -> PathBuf {
        self.dir.join(&self.aisles_file)
    }

    pub fn departments_path(&self) -> PathBuf {
        self.dir.join(&self.departments_file)
    }

    /// Same file names rooted at another directory.
    pub fn with_dir(&self, dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), ..self.clone() }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("shelfscope.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(data) = patch.data {
            if let Some(dir) = data.dir {
                self.data.dir = dir;
            }
            if let Some(orders_file) = data.orders_file {
                self.data.orders_file = orders_file;
            }
            if let Some(order_lines_file) = data.order_lines_file {
                self.data.order_lines_file = order_lines_file;
            }
            if let Some(products_file) = data.products_file {
                self.data.products_file = products_file;
            }
            if let Some(aisles_file) = data.aisles_file {
                self.data.aisles_file = aisles_file;
            }
            if let Some(departments_file) = data.departments_file {
                self.data.departments_file = departments_file;
            }
        }

        if let Some(analytics) = patch.analytics {
            if let Some(limit) = analytics.leaderboard_limit {
                self.analytics.leaderboard_limit = limit;
            }
            if let Some(limit) = analytics.similar_limit {
                self.analytics.similar_limit = limit;
            }
            if let Some(limit) = analytics.recommendation_limit {
                self.analytics.recommendation_limit = limit;
            }
            if let Some(cap) = analytics.per_department_cap {
                self.analytics.per_department_cap = cap;
            }
            if let Some(limit) = analytics.trending_limit {
                self.analytics.trending_limit = limit;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHELFSCOPE_DATA_DIR") {
            self.data.dir = PathBuf::from(value);
        }
        if let Some(value) = read_env("SHELFSCOPE_DATA_ORDERS_FILE") {
            self.data.orders_file = value;
        }
        if let Some(value) = read_env("SHELFSCOPE_DATA_ORDER_LINES_FILE") {
            self.data.order_lines_file = value;
        }
        if let Some(value) = read_env("SHELFSCOPE_DATA_PRODUCTS_FILE") {
            self.data.products_file = value;
        }
        if let Some(value) = read_env("SHELFSCOPE_DATA_AISLES_FILE") {
            self.data.aisles_file = value;
        }
        if let Some(value) = read_env("SHELFSCOPE_DATA_DEPARTMENTS_FILE") {
            self.data.departments_file = value;
        }

        if let Some(value) = read_env("SHELFSCOPE_ANALYTICS_LEADERBOARD_LIMIT") {
            self.analytics.leaderboard_limit =
                parse_usize("SHELFSCOPE_ANALYTICS_LEADERBOARD_LIMIT", &value)?;
        }
        if let Some(value) = read_env("SHELFSCOPE_ANALYTICS_SIMILAR_LIMIT") {
            self.analytics.similar_limit =
                parse_usize("SHELFSCOPE_ANALYTICS_SIMILAR_LIMIT", &value)?;
        }
        if let Some(value) = read_env("SHELFSCOPE_ANALYTICS_RECOMMENDATION_LIMIT") {
            self.analytics.recommendation_limit =
                parse_usize("SHELFSCOPE_ANALYTICS_RECOMMENDATION_LIMIT", &value)?;
        }
        if let Some(value) = read_env("SHELFSCOPE_ANALYTICS_PER_DEPARTMENT_CAP") {
            self.analytics.per_department_cap =
                parse_usize("SHELFSCOPE_ANALYTICS_PER_DEPARTMENT_CAP", &value)?;
        }
        if let Some(value) = read_env("SHELFSCOPE_ANALYTICS_TRENDING_LIMIT") {
            self.analytics.trending_limit =
                parse_usize("SHELFSCOPE_ANALYTICS_TRENDING_LIMIT", &value)?;
        }

        let log_level =
            read_env("SHELFSCOPE_LOGGING_LEVEL").or_else(|| read_env("SHELFSCOPE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SHELFSCOPE_LOGGING_FORMAT").or_else(|| read_env("SHELFSCOPE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(data_dir) = overrides.data_dir {
            self.data.dir = data_dir;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_data(&self.data)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Config file that [`AppConfig::load`] would read for `explicit_path`.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("shelfscope.toml"), PathBuf::from("config/shelfscope.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_data(data: &DataConfig) -> Result<(), ConfigError> {
    if data.dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("data.dir must not be empty".to_string()));
    }

    let files = [
        ("data.orders_file", &data.orders_file),
        ("data.order_lines_file", &data.order_lines_file),
        ("data.products_file", &data.products_file),
        ("data.aisles_file", &data.aisles_file),
        ("data.departments_file", &data.departments_file),
    ];
    for (key, value) in files {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{key} must not be empty")));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    data: Option<DataPatch>,
    analytics: Option<AnalyticsPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DataPatch {
    dir: Option<PathBuf>,
    orders_file: Option<String>,
    order_lines_file: Option<String>,
    products_file: Option<String>,
    aisles_file: Option<String>,
    departments_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyticsPatch {
    leaderboard_limit: Option<usize>,
    similar_limit: Option<usize>,
    recommendation_limit: Option<usize>,
    per_department_cap: Option<usize>,
    trending_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
