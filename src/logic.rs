//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Starting a candidacy and issuing its first question
//!   - Submitting answers (and saving results when a skill finishes)
//!   - Moving to the next skill, reading state and summaries
//!
//! Locks are held only around in-memory mutation; result files are written
//! after the lock is released and their failure never touches session state.

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::campaign::Candidacy;
use crate::domain::Tier;
use crate::error::AssessmentError;
use crate::protocol::{assessment_out, summary_out, AnswerOut, AssessmentOut, SummaryOut};
use crate::results::{save_result, AssessmentResult};
use crate::state::AppState;

fn resolve_tier(state: &AppState, tier: Option<&str>) -> Result<Tier, AssessmentError> {
  match tier {
    Some(name) if !name.trim().is_empty() => name.parse(),
    _ => Ok(state.config.default_tier),
  }
}

fn not_found(id: Uuid) -> AssessmentError {
  AssessmentError::NotFound(format!("unknown assessment {id}"))
}

/// Persist a finished skill's result. Failures are logged and never touch session state.
async fn save_or_log(state: &AppState, id: Uuid, result: &AssessmentResult) {
  if let Err(e) = save_result(&state.config.results_dir, result).await {
    error!(target: "skill_leveler", %id, error = %e, "Failed to save result locally");
  }
}

/// Draw a question if none is pending and the session is still running.
fn ensure_question(c: &mut Candidacy) {
  let session = c.session_mut();
  if session.is_finished() || session.pending_question().is_some() {
    return;
  }
  if session.next_question(&mut rand::thread_rng()).is_none() {
    warn!(target: "assessment", id = %c.id(), skill = %c.session().skill(), node = %c.session().current_node(), "No question available; candidacy stalled");
  }
}

#[instrument(level = "info", skip(state, account), fields(account_len = account.len()))]
pub async fn start_assessment(state: &AppState, account: &str, tier: Option<&str>) -> Result<AssessmentOut, AssessmentError> {
  let tier = resolve_tier(state, tier)?;
  let mut candidacy = Candidacy::start(account, tier, &state.config.skills, &state.catalog)?;
  ensure_question(&mut candidacy);
  let out = assessment_out(&candidacy);
  state.candidacies.write().await.insert(candidacy.id(), candidacy);
  Ok(out)
}

/// Current state; re-draws a question if the last attempt found none.
#[instrument(level = "debug", skip(state))]
pub async fn get_assessment(state: &AppState, id: Uuid) -> Result<AssessmentOut, AssessmentError> {
  let mut map = state.candidacies.write().await;
  let c = map.get_mut(&id).ok_or_else(|| not_found(id))?;
  ensure_question(c);
  Ok(assessment_out(c))
}

#[instrument(level = "info", skip(state))]
pub async fn submit_answer(state: &AppState, id: Uuid, selected_index: usize) -> Result<AnswerOut, AssessmentError> {
  let (out, to_save) = {
    let mut map = state.candidacies.write().await;
    let c = map.get_mut(&id).ok_or_else(|| not_found(id))?;
    let outcome = c.session_mut().submit_answer(selected_index)?;
    ensure_question(c);
    let to_save = c.take_unrecorded_result();
    let out = AnswerOut {
      correct: outcome.last_answer.as_ref().is_some_and(|a| a.is_correct),
      finished: outcome.finished,
      final_label: outcome.final_label,
      failed: outcome.failed,
      last_answer: outcome.last_answer,
      assessment: assessment_out(c),
    };
    (out, to_save)
  };

  info!(target: "assessment", %id, correct = out.correct, finished = out.finished, "Answer evaluated");

  if let Some(result) = to_save {
    save_or_log(state, id, &result).await;
  }
  Ok(out)
}

#[instrument(level = "info", skip(state))]
pub async fn next_skill(state: &AppState, id: Uuid, tier: Option<&str>) -> Result<AssessmentOut, AssessmentError> {
  let (out, to_save) = {
    let mut map = state.candidacies.write().await;
    let c = map.get_mut(&id).ok_or_else(|| not_found(id))?;
    // A missing or blank tier keeps the previous skill's starting tier.
    let tier = match tier {
      Some(name) if !name.trim().is_empty() => name.parse::<Tier>()?,
      _ => c.session().starting_tier(),
    };
    let step = c.advance(tier, &state.catalog)?;
    if step.started {
      ensure_question(c);
    }
    (assessment_out(c), step.unsaved)
  };

  if let Some(result) = to_save {
    save_or_log(state, id, &result).await;
  }
  Ok(out)
}

#[instrument(level = "debug", skip(state))]
pub async fn get_summary(state: &AppState, id: Uuid) -> Result<SummaryOut, AssessmentError> {
  let map = state.candidacies.read().await;
  let c = map.get(&id).ok_or_else(|| not_found(id))?;
  Ok(summary_out(c))
}
