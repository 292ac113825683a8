// tests/config_rules.rs
use std::{env, fs};

use listing_price_atlas::config::{load_rules_default, load_rules_from, NormalizeRules};

const ENV_PATH: &str = "NORMALIZE_RULES_PATH";

#[test]
fn explicit_toml_and_json_paths_load() {
    let tmp = tempfile::tempdir().unwrap();

    let toml_p = tmp.path().join("rules.toml");
    fs::write(&toml_p, "strip_tokens = [\"$\"]\nexclude_phrases = [\"POA\"]\n").unwrap();
    let toml_rules = load_rules_from(&toml_p).unwrap();
    assert_eq!(toml_rules.strip_tokens, vec!["$".to_string()]);
    assert!(toml_rules.is_excluded("POA"));

    let json_p = tmp.path().join("rules.json");
    fs::write(&json_p, r#"{"strip_tokens": ["£"], "exclude_phrases": []}"#).unwrap();
    let json_rules = load_rules_from(&json_p).unwrap();
    assert_eq!(json_rules.strip_tokens, vec!["£".to_string()]);
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD in a temp dir so a real config/ in the repo can't
    // interfere.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    env::remove_var(ENV_PATH);

    // No files in the temp CWD: built-in defaults.
    let v = load_rules_default().unwrap();
    assert_eq!(v, NormalizeRules::default());

    // config/normalize.toml fallback.
    fs::create_dir_all(tmp.path().join("config")).unwrap();
    fs::write(
        tmp.path().join("config/normalize.toml"),
        "strip_tokens = [\"#\"]\n",
    )
    .unwrap();
    let v2 = load_rules_default().unwrap();
    assert_eq!(v2.strip_tokens, vec!["#".to_string()]);

    // Env var takes precedence.
    let p_json = tmp.path().join("override.json");
    fs::write(&p_json, r#"{"strip_tokens": ["@"], "exclude_phrases": []}"#).unwrap();
    env::set_var(ENV_PATH, p_json.display().to_string());
    let v3 = load_rules_default().unwrap();
    assert_eq!(v3.strip_tokens, vec!["@".to_string()]);
    env::remove_var(ENV_PATH);

    // Restore CWD.
    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn env_pointing_nowhere_is_an_error() {
    env::set_var(ENV_PATH, "/definitely/not/here.toml");
    assert!(load_rules_default().is_err());
    env::remove_var(ENV_PATH);
}
