use std::env;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use shelfscope_cli::commands::{
    config, departments, diversify, doctor, seed, similar, top, trending, CommandContext,
};
use shelfscope_core::config::{ConfigOverrides, LoadOptions};
use tempfile::TempDir;

#[test]
fn seed_writes_dataset_and_reports_counts() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let result = seed::run(&context_for(dir.path()), None);
        assert_eq!(result.exit_code, 0, "expected seed success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("266 order lines"));
        assert!(dir.path().join("products.csv").exists());
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let context = context_for(dir.path());

        let first = parse_payload(&seed::run(&context, None).output);
        let second = parse_payload(&seed::run(&context, None).output);
        assert_eq!(first["status"], "ok");
        assert_eq!(first["message"], second["message"]);
    });
}

#[test]
fn trending_lists_top_products_as_json() {
    with_env(&[], || {
        let (_dir, context) = seeded_context();
        let result = trending::run(&context, Some(3), true, false);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let products = payload["products"].as_array().cloned().unwrap_or_default();
        assert_eq!(products.len(), 3);
        assert_eq!(products[0]["product_name"], "Banana");
        assert_eq!(products[0]["order_count"], 40);
        assert_eq!(products[0]["department"], "produce");
        assert_eq!(products[0]["competition"], "low");
    });
}

#[test]
fn trending_uses_configured_default_limit_and_draws_chart() {
    with_env(&[("SHELFSCOPE_ANALYTICS_TRENDING_LIMIT", "2")], || {
        let (_dir, context) = seeded_context();
        let result = trending::run(&context, None, false, true);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.starts_with("Top 2 products across the marketplace"));
        assert!(result.output.contains("Banana"));
        assert!(result.output.contains(&"#".repeat(40)));
    });
}

#[test]
fn top_returns_empty_for_unknown_department() {
    with_env(&[], || {
        let (_dir, context) = seeded_context();

        let result = top::run(&context, "Nonexistent", None, true);
        assert_eq!(result.exit_code, 0);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["products"].as_array().map(Vec::len), Some(0));

        let result = top::run(&context, "dairy eggs", Some(2), true);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["products"][0]["product_name"], "Whole Milk");
        assert_eq!(payload["products"].as_array().map(Vec::len), Some(2));
    });
}

#[test]
fn similar_distinguishes_not_found_from_matches() {
    with_env(&[], || {
        let (_dir, context) = seeded_context();

        let found = parse_payload(&similar::run(&context, "banana", Some(2), true).output);
        assert_eq!(found["status"], "ok");
        assert_eq!(found["products"][0]["product_name"], "Organic Banana");

        let missing = similar::run(&context, "Durian", None, true);
        assert_eq!(missing.exit_code, 0);
        let payload = parse_payload(&missing.output);
        assert_eq!(payload["status"], "not_found");

        let human = similar::run(&context, "Durian", None, false);
        assert!(human.output.contains("was not found"));
    });
}

#[test]
fn diversify_excludes_owned_departments() {
    with_env(&[], || {
        let (_dir, context) = seeded_context();
        let result = diversify::run(&context, " Whole Milk , ", Some(10), Some(2), true);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["owned_products"][0], "Whole Milk");
        let rows = payload["recommendations"].as_array().cloned().unwrap_or_default();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|row| row["department"] != "dairy eggs"));
        let produce = rows.iter().filter(|row| row["department"] == "produce").count();
        assert!(produce <= 2);
    });
}

#[test]
fn departments_are_sorted() {
    with_env(&[], || {
        let (_dir, context) = seeded_context();
        let result = departments::run(&context, false);
        assert_eq!(result.output, "bakery\nbeverages\ndairy eggs\nproduce\nsnacks");
    });
}

#[test]
fn missing_data_reports_unavailable_for_every_analytic_command() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let context = context_for(&dir.path().join("nowhere"));

        let results = [
            trending::run(&context, None, true, false),
            top::run(&context, "produce", None, true),
            similar::run(&context, "Banana", None, true),
            diversify::run(&context, "Whole Milk", None, None, true),
        ];
        for result in results {
            assert_eq!(result.exit_code, 3, "expected data unavailable exit code");
            let payload = parse_payload(&result.output);
            assert_eq!(payload["status"], "error");
            assert_eq!(payload["error_class"], "data_unavailable");
            assert_eq!(payload["correlation_id"], context.correlation_id.as_str());
        }
    });
}

#[test]
fn invalid_config_fails_before_loading_data() {
    with_env(&[], || {
        let (_dir, context) = seeded_context();
        env::set_var("SHELFSCOPE_LOGGING_LEVEL", "verbose");
        let result = similar::run(&context, "Banana", None, true);
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn doctor_reports_load_status() {
    with_env(&[], || {
        let (_dir, context) = seeded_context();
        let healthy = doctor::run(&context, true);
        assert_eq!(healthy.exit_code, 0);
        let payload = parse_payload(&healthy.output);
        assert_eq!(payload["overall_status"], "pass");
        assert_eq!(payload["snapshot"]["products"], 14);

        let dir = TempDir::new().expect("tempdir");
        let broken = doctor::run(&context_for(&dir.path().join("nowhere")), false);
        assert_eq!(broken.exit_code, 1);
        assert!(broken.output.contains("- [fail] data_load"));
    });
}

#[test]
fn config_attributes_sources() {
    with_env(&[("SHELFSCOPE_ANALYTICS_TRENDING_LIMIT", "7")], || {
        let dir = TempDir::new().expect("tempdir");
        let output = config::run(&context_for(dir.path()));

        assert!(output.contains("- analytics.trending_limit = 7 (source: env (SHELFSCOPE_ANALYTICS_TRENDING_LIMIT))"));
        assert!(output.contains("(source: flag)"));
        assert!(output.contains("- analytics.similar_limit = 10 (source: default)"));
    });
}

fn context_for(dir: &Path) -> CommandContext {
    CommandContext::new(LoadOptions {
        overrides: ConfigOverrides { data_dir: Some(dir.to_path_buf()), ..ConfigOverrides::default() },
        ..LoadOptions::default()
    })
}

fn seeded_context() -> (TempDir, CommandContext) {
    let dir = TempDir::new().expect("tempdir");
    let context = context_for(dir.path());
    let result = seed::run(&context, None);
    assert_eq!(result.exit_code, 0, "seeding should succeed: {}", result.output);
    (dir, context)
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "SHELFSCOPE_DATA_DIR",
        "SHELFSCOPE_DATA_ORDERS_FILE",
        "SHELFSCOPE_DATA_ORDER_LINES_FILE",
        "SHELFSCOPE_DATA_PRODUCTS_FILE",
        "SHELFSCOPE_DATA_AISLES_FILE",
        "SHELFSCOPE_DATA_DEPARTMENTS_FILE",
        "SHELFSCOPE_ANALYTICS_LEADERBOARD_LIMIT",
        "SHELFSCOPE_ANALYTICS_SIMILAR_LIMIT",
        "SHELFSCOPE_ANALYTICS_RECOMMENDATION_LIMIT",
        "SHELFSCOPE_ANALYTICS_PER_DEPARTMENT_CAP",
        "SHELFSCOPE_ANALYTICS_TRENDING_LIMIT",
        "SHELFSCOPE_LOGGING_LEVEL",
        "SHELFSCOPE_LOGGING_FORMAT",
        "SHELFSCOPE_LOG_LEVEL",
        "SHELFSCOPE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
