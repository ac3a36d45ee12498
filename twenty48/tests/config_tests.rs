use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use twenty48::config::{ConfigStore, DEFAULT_WINNING_VALUE};
use twenty48::{GameConfig, MoveCheck};

fn unique_temp_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir()
        .join(format!("twenty48_config_{tag}_{nanos}"))
        .join("config.json")
}

#[test]
fn store_save_then_load_roundtrips() {
    let path = unique_temp_path("roundtrip");
    let store = ConfigStore::new(&path);
    let config = GameConfig {
        width: 5,
        winning_value: 512,
        four_probability: 0.25,
        move_check: MoveCheck::EmptyOrMerge,
        ..GameConfig::default()
    };

    store.save(&config).expect("save config");
    assert_eq!(store.load(), config);

    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[test]
fn missing_file_loads_defaults() {
    let store = ConfigStore::new(unique_temp_path("missing"));
    assert_eq!(store.load(), GameConfig::default());
}

#[test]
fn malformed_file_falls_back_to_defaults() {
    let path = unique_temp_path("malformed");
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).expect("create temp dir");
    }
    fs::write(&path, "{ width: nope").expect("write malformed config");

    assert_eq!(ConfigStore::new(&path).load().winning_value, DEFAULT_WINNING_VALUE);
    assert!(GameConfig::load_json_file(&path).is_err());

    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[test]
fn loaded_config_is_sanitized() {
    let path = unique_temp_path("sanitize");
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).expect("create temp dir");
    }
    fs::write(&path, r#"{"width":0,"four_probability":-3.0}"#).expect("write config");

    let config = GameConfig::load_json_file(&path).expect("load config");
    assert_eq!(config.width, 2);
    assert_eq!(config.four_probability, 0.0);

    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}
