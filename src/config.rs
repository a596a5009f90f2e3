//! Loading service configuration from TOML and the question bank from JSON.
//!
//! See `AppConfig` for the expected schema. Every field has a default, so an
//! empty file (or no file at all) is a valid configuration.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Question, Tier};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// JSON array of question records. Built-in seeds are used when unset.
  pub question_bank_path: Option<PathBuf>,
  pub results_dir: PathBuf,
  /// Ordered skill queue each candidate goes through.
  pub skills: Vec<String>,
  pub default_tier: Tier,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      question_bank_path: None,
      results_dir: PathBuf::from("results"),
      skills: ["html", "css", "javascript", "react", "github"].map(String::from).to_vec(),
      default_tier: Tier::Middle,
    }
  }
}

/// Attempt to load `AppConfig` from ASSESSMENT_CONFIG_PATH. Falls back to defaults on any error.
pub fn load_app_config_from_env() -> AppConfig {
  let Ok(path) = std::env::var("ASSESSMENT_CONFIG_PATH") else {
    info!(target: "skill_leveler", "ASSESSMENT_CONFIG_PATH not set; using default config");
    return AppConfig::default();
  };
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "skill_leveler", %path, "Loaded config (TOML)");
        cfg
      }
      Err(e) => {
        error!(target: "skill_leveler", %path, error = %e, "Failed to parse TOML config");
        AppConfig::default()
      }
    },
    Err(e) => {
      error!(target: "skill_leveler", %path, error = %e, "Failed to read TOML config file");
      AppConfig::default()
    }
  }
}

/// Read the question bank file. On IO error or a malformed top-level array returns None.
///
/// Records are decoded one by one; a record that does not decode is skipped
/// with an error log and the rest of the bank is kept.
pub fn load_question_bank(cfg: &AppConfig) -> Option<Vec<Question>> {
  let path = cfg.question_bank_path.as_ref()?;
  let raw = match std::fs::read_to_string(path) {
    Ok(s) => s,
    Err(e) => {
      error!(target: "skill_leveler", path = %path.display(), error = %e, "Failed to read question bank");
      return None;
    }
  };
  let items = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
    Ok(items) => items,
    Err(e) => {
      error!(target: "skill_leveler", path = %path.display(), error = %e, "Failed to parse question bank");
      return None;
    }
  };
  let total = items.len();
  let qs: Vec<Question> = items
    .into_iter()
    .enumerate()
    .filter_map(|(pos, item)| match serde_json::from_value::<Question>(item) {
      Ok(q) => Some(q),
      Err(e) => {
        error!(target: "skill_leveler", path = %path.display(), pos, error = %e, "Skipping bank item: malformed record");
        None
      }
    })
    .collect();
  info!(target: "skill_leveler", path = %path.display(), count = qs.len(), skipped = total - qs.len(), "Loaded question bank");
  Some(qs)
}
