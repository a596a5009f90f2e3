//! Result artifact and local JSON persistence.
//!
//! Writes are best effort: callers log failures and never roll back session
//! state because of them.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::domain::AnswerRecord;
use crate::util::sanitize_account;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
  pub account: String,
  pub skill: String,
  pub final_result: String,
  pub failed: bool,
  pub answer_history: Vec<AnswerRecord>,
  pub datetime: DateTime<Utc>,
}

/// `{account}_{skill}_{YYYYmmdd_HHMMSS}.json`, timestamp in local time.
pub fn result_file_name(account: &str, skill: &str, at: DateTime<Utc>) -> String {
  let stamp = at.with_timezone(&Local).format("%Y%m%d_%H%M%S");
  format!("{}_{}_{}.json", sanitize_account(account), sanitize_account(skill), stamp)
}

/// Upper bound on `_N` suffixes tried when names collide.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Write `result` as pretty JSON into `dir` (created if missing).
///
/// Never overwrites: an existing file with the same name gets a `_N` suffix.
#[instrument(level = "info", skip(result), fields(account = %result.account, skill = %result.skill))]
pub async fn save_result(dir: &Path, result: &AssessmentResult) -> std::io::Result<PathBuf> {
  tokio::fs::create_dir_all(dir).await?;
  let body = serde_json::to_string_pretty(result)?;
  let name = result_file_name(&result.account, &result.skill, result.datetime);
  let stem = name.trim_end_matches(".json");

  for attempt in 0..MAX_NAME_ATTEMPTS {
    let path = match attempt {
      0 => dir.join(&name),
      n => dir.join(format!("{stem}_{n}.json")),
    };
    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
      Ok(f) => f,
      Err(e) if e.kind() == ErrorKind::AlreadyExists => {
        debug!(target: "skill_leveler", path = %path.display(), "Result file exists; trying next name");
        continue;
      }
      Err(e) => return Err(e),
    };
    file.write_all(body.as_bytes()).await?;
    file.flush().await?;
    info!(target: "skill_leveler", path = %path.display(), "Result saved");
    return Ok(path);
  }
  Err(std::io::Error::new(
    ErrorKind::AlreadyExists,
    format!("no free result file name for {name} after {MAX_NAME_ATTEMPTS} attempts"),
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::QuestionId;

  fn sample() -> AssessmentResult {
    AssessmentResult {
      account: " Ana Lima ".into(),
      skill: "css".into(),
      final_result: "LEVELJ3".into(),
      failed: false,
      answer_history: vec![AnswerRecord {
        question_id: QuestionId("12".into()),
        selected_index: 1,
        is_correct: true,
      }],
      datetime: Utc::now(),
    }
  }

  #[test]
  fn file_name_uses_clean_account() {
    let name = result_file_name("  Ana Lima ", "CSS", Utc::now());
    assert!(name.starts_with("ana_lima_css_"), "{name}");
    assert!(name.ends_with(".json"));
    // ana_lima_css_ + YYYYmmdd_HHMMSS + .json
    assert_eq!(name.len(), "ana_lima_css_".len() + 15 + ".json".len());
  }

  #[tokio::test]
  async fn save_writes_readable_json() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("results");
    let result = sample();
    let path = save_result(&target, &result).await.unwrap();
    assert!(path.starts_with(&target));
    let raw = std::fs::read_to_string(&path).unwrap();
    let back: AssessmentResult = serde_json::from_str(&raw).unwrap();
    assert_eq!(back, result);
    assert!(raw.contains("\"final_result\": \"LEVELJ3\""));
  }

  #[tokio::test]
  async fn same_second_results_never_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let html = AssessmentResult { skill: "html".into(), ..sample() };
    let css = AssessmentResult { skill: "css".into(), datetime: html.datetime, ..sample() };

    let a = save_result(dir.path(), &html).await.unwrap();
    let b = save_result(dir.path(), &css).await.unwrap();
    assert_ne!(a, b);

    // Same account, skill and second: suffixed, not replaced.
    let c = save_result(dir.path(), &html).await.unwrap();
    assert_ne!(a, c);
    assert!(c.to_string_lossy().ends_with("_1.json"), "{}", c.display());

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    let back: AssessmentResult = serde_json::from_str(&std::fs::read_to_string(&b).unwrap()).unwrap();
    assert_eq!(back.skill, "css");
  }
}
