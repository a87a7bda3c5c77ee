use tis_core::logging::TracingConfig;

#[test]
fn tracing_config_defaults_fill_missing_fields() {
    let config: TracingConfig = serde_json::from_str(r#"{"directives":"tis_sample=trace"}"#)
        .expect("deserialize");
    assert_eq!(config.directives.as_deref(), Some("tis_sample=trace"));
    assert_eq!(config.default_directive, "info");
    assert!(config.include_targets);
    assert!(config.ansi);
}
