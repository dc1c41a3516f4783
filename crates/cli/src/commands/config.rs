use std::env;
use std::fs;
use std::path::Path;

use shelfscope_core::config::{resolve_config_path, AppConfig};
use toml::Value;

use crate::commands::CommandContext;

/// `(key path, env var)` for every reported setting.
const FIELDS: &[(&str, &str)] = &[
    ("data.dir", "SHELFSCOPE_DATA_DIR"),
    ("data.orders_file", "SHELFSCOPE_DATA_ORDERS_FILE"),
    ("data.order_lines_file", "SHELFSCOPE_DATA_ORDER_LINES_FILE"),
    ("data.products_file", "SHELFSCOPE_DATA_PRODUCTS_FILE"),
    ("data.aisles_file", "SHELFSCOPE_DATA_AISLES_FILE"),
    ("data.departments_file", "SHELFSCOPE_DATA_DEPARTMENTS_FILE"),
    ("analytics.leaderboard_limit", "SHELFSCOPE_ANALYTICS_LEADERBOARD_LIMIT"),
    ("analytics.similar_limit", "SHELFSCOPE_ANALYTICS_SIMILAR_LIMIT"),
    ("analytics.recommendation_limit", "SHELFSCOPE_ANALYTICS_RECOMMENDATION_LIMIT"),
    ("analytics.per_department_cap", "SHELFSCOPE_ANALYTICS_PER_DEPARTMENT_CAP"),
    ("analytics.trending_limit", "SHELFSCOPE_ANALYTICS_TRENDING_LIMIT"),
    ("logging.level", "SHELFSCOPE_LOGGING_LEVEL"),
    ("logging.format", "SHELFSCOPE_LOGGING_FORMAT"),
];

pub fn run(context: &CommandContext) -> String {
    let config = match AppConfig::load(context.options.clone()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(context.options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];
    for (key_path, env_key) in FIELDS {
        let source = if has_flag_override(context, key_path) {
            "flag".to_string()
        } else {
            field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
        };
        lines.push(render_line(key_path, &field_value(&config, key_path), source));
    }

    lines.join("\n")
}

fn field_value(config: &AppConfig, key_path: &str) -> String {
    match key_path {
        "data.dir" => config.data.dir.display().to_string(),
        "data.orders_file" => config.data.orders_file.clone(),
        "data.order_lines_file" => config.data.order_lines_file.clone(),
        "data.products_file" => config.data.products_file.clone(),
        "data.aisles_file" => config.data.aisles_file.clone(),
        "data.departments_file" => config.data.departments_file.clone(),
        "analytics.leaderboard_limit" => config.analytics.leaderboard_limit.to_string(),
        "analytics.similar_limit" => config.analytics.similar_limit.to_string(),
        "analytics.recommendation_limit" => config.analytics.recommendation_limit.to_string(),
        "analytics.per_department_cap" => config.analytics.per_department_cap.to_string(),
        "analytics.trending_limit" => config.analytics.trending_limit.to_string(),
        "logging.level" => config.logging.level.clone(),
        "logging.format" => format!("{:?}", config.logging.format),
        _ => "<unknown>".to_string(),
    }
}

fn has_flag_override(context: &CommandContext, key_path: &str) -> bool {
    let overrides = &context.options.overrides;
    match key_path {
        "data.dir" => overrides.data_dir.is_some(),
        "logging.level" => overrides.log_level.is_some(),
        "logging.format" => overrides.log_format.is_some(),
        _ => false,
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }
    if key_path.starts_with("logging.") {
        let alias = env_key.replace("_LOGGING_", "_LOG_");
        if env::var_os(&alias).is_some() {
            return format!("env ({alias})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::contains_path;

    #[test]
    fn nested_key_paths_are_resolved() {
        let doc: Value = "[analytics]\ntrending_limit = 8\n".parse().expect("toml");

        assert!(contains_path(&doc, "analytics.trending_limit"));
        assert!(!contains_path(&doc, "analytics.similar_limit"));
        assert!(!contains_path(&doc, "data.dir"));
    }
}
