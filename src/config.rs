// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "NORMALIZE_RULES_PATH";

/// Declarative normalization rule table: substrings stripped from the
/// raw price before parsing, and phrases that exclude a record outright.
/// A new noisy symbol is a config entry, not a new cleaning step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeRules {
    /// Substrings removed from the raw price (after HTML-entity
    /// decoding): non-breaking space, currency symbol, thousands comma.
    pub strip_tokens: Vec<String>,
    /// Phrases marking a listing as "price on request"; such records are
    /// excluded entirely, not zeroed.
    pub exclude_phrases: Vec<String>,
}

impl Default for NormalizeRules {
    fn default() -> Self {
        Self {
            strip_tokens: vec!["\u{a0}".to_string(), "€".to_string(), ",".to_string()],
            exclude_phrases: vec!["Preço sob consulta".to_string()],
        }
    }
}

impl NormalizeRules {
    /// True when the raw price carries any exclude phrase.
    pub fn is_excluded(&self, raw_price: &str) -> bool {
        self.exclude_phrases
            .iter()
            .any(|p| !p.is_empty() && raw_price.contains(p.as_str()))
    }
}

/// Load rules from an explicit path. Supports TOML or JSON formats.
pub fn load_rules_from(path: &Path) -> Result<NormalizeRules> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading normalize rules from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_rules(&content, ext.as_str())
}

/// Load rules using env var + fallbacks:
/// 1) $NORMALIZE_RULES_PATH
/// 2) config/normalize.toml
/// 3) config/normalize.json
/// 4) built-in defaults
pub fn load_rules_default() -> Result<NormalizeRules> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_rules_from(&pb);
        } else {
            return Err(anyhow!("NORMALIZE_RULES_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/normalize.toml");
    if toml_p.exists() {
        return load_rules_from(&toml_p);
    }
    let json_p = PathBuf::from("config/normalize.json");
    if json_p.exists() {
        return load_rules_from(&json_p);
    }
    Ok(NormalizeRules::default())
}

fn parse_rules(s: &str, hint_ext: &str) -> Result<NormalizeRules> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("strip_tokens =");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    // Fallback: also try TOML if not attempted
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported normalize rules format"))
}

fn parse_toml(s: &str) -> Result<NormalizeRules> {
    Ok(toml::from_str(s)?)
}

fn parse_json(s: &str) -> Result<NormalizeRules> {
    Ok(serde_json::from_str(s)?)
}
