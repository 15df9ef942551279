use narwhal_core::config::parse_env_bool;
use narwhal_core::{LayoutOptions, NarwhalConfig, RankDir};
use serde_json::json;

#[test]
fn config_dotted_paths_and_numeric_strings() {
    let cfg = NarwhalConfig::from_value(json!({
        "camera": {"maxZoom": 3, "minZoom": "0.25", "autoResize": false},
        "layout": {"rankDirection": "LEFT_TO_RIGHT"}
    }));
    assert_eq!(cfg.get_f64("camera.maxZoom"), Some(3.0));
    assert_eq!(cfg.get_f64("camera.minZoom"), Some(0.25));
    assert_eq!(cfg.get_bool("camera.autoResize"), Some(false));
    assert_eq!(cfg.get_f64("camera.missing"), None);
    assert_eq!(cfg.get_str("layout.rankDirection.deeper"), None);
}

#[test]
fn config_set_value_and_deep_merge() {
    let mut cfg = NarwhalConfig::default();
    cfg.set_value("paths.curveLength", json!(30));
    cfg.set_value("paths.smoothLength", json!(4));
    cfg.deep_merge(&json!({"paths": {"curveLength": 12}, "layout": {"nodeSep": 5}}));
    assert_eq!(cfg.get_f64("paths.curveLength"), Some(12.0));
    assert_eq!(cfg.get_f64("paths.smoothLength"), Some(4.0));
    assert_eq!(cfg.get_f64("layout.nodeSep"), Some(5.0));
}

#[test]
fn config_rejects_non_object_root() {
    assert!(NarwhalConfig::from_json_str("[1, 2]").is_err());
    assert!(NarwhalConfig::from_json_str("{\"layout\": {}}").is_ok());
}

#[test]
fn layout_options_resolve_from_config() {
    let cfg = NarwhalConfig::from_value(json!({
        "layout": {"rankDirection": "rl", "rankSep": 80}
    }));
    let opts = LayoutOptions::from_config(&cfg).unwrap();
    assert_eq!(opts.rank_direction, RankDir::RL);
    assert_eq!(opts.rank_sep, 80.0);
    assert_eq!(opts.node_sep, 50.0);

    let bad = NarwhalConfig::from_value(json!({"layout": {"rankDirection": "diagonal"}}));
    assert!(LayoutOptions::from_config(&bad).is_err());
}

#[test]
fn env_bool_parsing() {
    for v in ["", "0", "false", "No", " off "] {
        assert!(!parse_env_bool(v), "{v:?}");
    }
    for v in ["1", "true", "yes", "on"] {
        assert!(parse_env_bool(v), "{v:?}");
    }
}
