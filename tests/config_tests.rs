//! Tests for loading CMS exports and resolver settings from disk
//!
//! These tests verify:
//! - Option exports load from files and skip malformed entries
//! - Settings files drive the resolver's visibility mode
//! - Broken files surface as errors instead of partial data

use std::io::Write;
use tempfile::NamedTempFile;

use storefront_resolver::{
    load_options_from_file, ResolverError, Resolver, ResolverSettings, SelectionState,
    VisibilityMode,
};

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const NESTED_EXPORT: &str = r#"[
    {"id": 1, "label": "Package", "fieldType": "select",
     "options": [{"value": "panel"}, {"value": "single"}]},
    {"id": 2, "label": "Panel", "fieldType": "select", "parentOptionId": {"id": 1},
     "showWhenParentValue": "panel", "options": [{"value": "full", "additionalPrice": "2500"}]},
    {"id": 3, "label": "Notes", "fieldType": "textarea", "parentOptionId": 2,
     "showWhenParentValue": "full"},
    {"id": 4, "label": "Broken", "fieldType": "slider"},
    {"label": "No id", "fieldType": "text"}
]"#;

#[test]
fn test_load_export_from_file() {
    let file = write_temp(NESTED_EXPORT);
    let options = load_options_from_file(file.path()).unwrap();
    let ids: Vec<&str> = options.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(options[1].parent_option_id.as_deref(), Some("1"));
    assert_eq!(options[1].choices[0].additional_price, 2500);
}

#[test]
fn test_load_export_missing_file() {
    let result = load_options_from_file("/nonexistent/export.json");
    assert!(matches!(result, Err(ResolverError::Io(_))));
}

#[test]
fn test_load_export_broken_json() {
    let file = write_temp("[{\"id\": ");
    let result = load_options_from_file(file.path());
    assert!(matches!(result, Err(ResolverError::Json(_))));
}

#[test]
fn test_settings_file_switches_visibility_mode() {
    let export = write_temp(NESTED_EXPORT);
    let settings_file = write_temp(r#"{"visibility_mode": "ancestor_chain"}"#);

    let settings = ResolverSettings::load_from_file(settings_file.path()).unwrap();
    assert_eq!(settings.visibility_mode, VisibilityMode::AncestorChain);

    let options = load_options_from_file(export.path()).unwrap();
    let direct = Resolver::new(options.clone(), ResolverSettings::default());
    let chain = Resolver::new(options, settings);

    // Panel holds a stale value while the package is "single"
    let mut selections = SelectionState::new();
    selections.set("1", "single");
    selections.set("2", "full");

    assert!(direct.is_visible("3", &selections));
    assert!(!chain.is_visible("3", &selections));
}

#[test]
fn test_settings_roundtrip_through_file() {
    let file = NamedTempFile::new().unwrap();
    let settings = ResolverSettings {
        visibility_mode: VisibilityMode::AncestorChain,
        default_unit_label: "per test".to_string(),
    };
    settings.save_to_file(file.path()).unwrap();

    let loaded = ResolverSettings::load_from_file(file.path()).unwrap();
    assert_eq!(loaded, settings);
}
