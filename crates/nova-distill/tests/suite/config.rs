use nova_distill::{ConfigError, ConversionOptions, DistillConfig, LoggingConfig};
use pretty_assertions::assert_eq;

use super::method_source;

#[test]
fn toml_sections_are_parsed() {
    let config = DistillConfig::from_toml_str(
        r#"
[logging]
level = "debug"
json = true

[conversion]
verify_ranges = false
"#,
    )
    .expect("config");

    assert_eq!(
        config,
        DistillConfig {
            logging: LoggingConfig {
                level: "debug".to_owned(),
                json: true,
            },
            conversion: ConversionOptions { verify_ranges: false },
        }
    );
}

#[test]
fn missing_keys_fall_back_to_defaults() {
    let config = DistillConfig::from_toml_str("[logging]\njson = true\n").expect("config");
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.json);
    assert!(config.conversion.verify_ranges);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = DistillConfig::from_toml_str("[conversion]\nverify = true\n").unwrap_err();
    let ConfigError::Toml(message) = &err else {
        panic!("expected toml error, got {err:?}");
    };
    assert!(message.contains("verify"), "{message}");
}

#[test]
fn config_is_loaded_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("distill.toml");
    std::fs::write(&path, "[conversion]\nverify_ranges = false\n").expect("write config");

    let config = DistillConfig::load(&path).expect("load");
    assert!(!config.conversion.verify_ranges);
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");
    let err = DistillConfig::load(&path).unwrap_err();
    let ConfigError::Io { path: reported, source } = &err else {
        panic!("expected io error, got {err:?}");
    };
    assert_eq!(reported, &path.display().to_string());
    assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn unverified_conversion_produces_the_same_tree() {
    let source = method_source("for (int i = 0; i < n; i++) { total += i; } return total;");
    let checked = nova_distill::distill_method(&source, "method").expect("verified");
    let config = DistillConfig {
        conversion: ConversionOptions { verify_ranges: false },
        ..DistillConfig::default()
    };
    let unchecked = nova_distill::distill_method_with(&source, "method", &config).expect("unverified");
    assert_eq!(checked, unchecked);
}

#[test]
fn tracing_is_installed_once() {
    let config = LoggingConfig {
        level: "nova.distill=trace".to_owned(),
        json: false,
    };
    nova_distill::init_tracing(&config);
    assert!(!nova_distill::init_tracing(&config));

    // Conversion still works with every event enabled.
    let source = method_source("if (a) { b(); }");
    let tree = nova_distill::distill_method(&source, "method").expect("distill");
    assert_eq!(tree.tree_string(), "method { a { a { b(); } } }");
}
