//! Content domain: tests for RON and JSON loading.

use std::path::Path;

use super::*;
use crate::levels::LevelCatalog;
use crate::player::{AnimationSheet, MovementTuning};

// -----------------------------------------------------------------------------
// RON
// -----------------------------------------------------------------------------

#[test]
fn test_partial_tuning_keeps_defaults_for_missing_fields() {
    let tuning: MovementTuning = parse_ron("movement.ron", "(move_speed: 12.0)").unwrap();

    assert_eq!(tuning.move_speed, 12.0);
    assert_eq!(tuning.jump_speed, MovementTuning::default().jump_speed);
    assert_eq!(tuning.coyote_time, 0.15);
}

#[test]
fn test_parse_error_names_the_file() {
    let err = parse_ron::<MovementTuning>("movement.ron", "(move_speed: )").unwrap_err();

    assert_eq!(err.file, "movement.ron");
    assert!(err.message.starts_with("Parse error"));
    assert!(err.to_string().starts_with("Failed to load movement.ron"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_ron_file::<MovementTuning>(Path::new("does/not/exist.ron")).unwrap_err();
    assert!(err.message.starts_with("IO error"));
}

#[test]
fn test_or_default_falls_back_on_error() {
    let tuning = or_default(load_ron_file::<MovementTuning>(Path::new("missing.ron")));
    assert_eq!(tuning.move_speed, MovementTuning::default().move_speed);
}

#[test]
fn test_shipped_data_files_parse() {
    let base = Path::new(env!("CARGO_MANIFEST_DIR"));

    let tuning: MovementTuning = load_ron_file(&base.join(DATA_DIR).join("movement.ron")).unwrap();
    assert!(tuning.jump_speed > 0.0);

    let catalog: LevelCatalog = load_ron_file(&base.join(DATA_DIR).join("levels.ron")).unwrap();
    assert!(!catalog.levels.is_empty());
    assert!(catalog.validate().is_empty(), "{:?}", catalog.validate());

    let sheet: AnimationSheet =
        load_json_file(&base.join(PLAYER_SHEET)).unwrap();
    assert_eq!(sheet.frame_size, 24);
}

// -----------------------------------------------------------------------------
// JSON
// -----------------------------------------------------------------------------

#[test]
fn test_sheet_json_overrides_sequences() {
    let json = r#"{ "frame_size": 16, "walk": [4, 5, 6, 7] }"#;
    let sheet: AnimationSheet = parse_json("player_sheet.json", json).unwrap();

    assert_eq!(sheet.frame_size, 16);
    assert_eq!(sheet.walk, vec![4, 5, 6, 7]);
    assert_eq!(sheet.idle, vec![0, 1, 2]);
}

#[test]
fn test_bad_json_reports_parse_error() {
    let err = parse_json::<AnimationSheet>("player_sheet.json", "{ frame_size: }").unwrap_err();
    assert!(err.message.starts_with("Parse error"));
}
