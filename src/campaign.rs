//! A candidate going through the configured skill queue, one session per skill.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::bank::QuestionCatalog;
use crate::domain::Tier;
use crate::error::AssessmentError;
use crate::results::AssessmentResult;
use crate::session::AssessmentSession;

/// Final outcome of one skill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkillResult {
  pub skill: String,
  pub final_result: String,
  pub failed: bool,
}

/// What `Candidacy::advance` did.
#[derive(Debug)]
pub struct Advanced {
  /// A new session was opened; `false` once the queue is exhausted.
  pub started: bool,
  /// Result of the finished skill if nobody had taken it yet. Still needs saving.
  pub unsaved: Option<AssessmentResult>,
}

#[derive(Debug)]
pub struct Candidacy {
  id: Uuid,
  account: String,
  queue: VecDeque<String>,
  session: AssessmentSession,
  results: Vec<SkillResult>,
  /// Whether the current session's result has been handed out for saving.
  recorded: bool,
  completed: bool,
}

impl Candidacy {
  /// Open a candidacy and the session for the first skill.
  pub fn start(account: &str, tier: Tier, skills: &[String], catalog: &QuestionCatalog) -> Result<Self, AssessmentError> {
    let account = account.trim();
    if account.is_empty() {
      return Err(AssessmentError::InvalidInput("account must not be empty".into()));
    }
    let mut queue: VecDeque<String> = skills.iter().cloned().collect();
    let first = queue
      .pop_front()
      .ok_or_else(|| AssessmentError::InvalidInput("no skills configured".into()))?;
    let session = AssessmentSession::create(first.clone(), tier, catalog.index_or_empty(&first));
    let id = Uuid::new_v4();
    info!(target: "assessment", %id, %account, skill = %first, %tier, "Candidacy started");
    Ok(Self {
      id,
      account: account.to_string(),
      queue,
      session,
      results: Vec::new(),
      recorded: false,
      completed: false,
    })
  }

  pub fn id(&self) -> Uuid { self.id }
  pub fn account(&self) -> &str { &self.account }
  pub fn session(&self) -> &AssessmentSession { &self.session }
  pub fn session_mut(&mut self) -> &mut AssessmentSession { &mut self.session }
  pub fn remaining_skills(&self) -> impl Iterator<Item = &str> { self.queue.iter().map(String::as_str) }
  pub fn results(&self) -> &[SkillResult] { &self.results }

  /// All skills finished and the candidate moved past the last one.
  pub fn is_completed(&self) -> bool { self.completed }

  /// Result artifact of the current session, handed out once after it finishes.
  pub fn take_unrecorded_result(&mut self) -> Option<AssessmentResult> {
    if self.recorded {
      return None;
    }
    let result = self.session.to_result(&self.account)?;
    self.recorded = true;
    self.results.push(SkillResult {
      skill: result.skill.clone(),
      final_result: result.final_result.clone(),
      failed: result.failed,
    });
    Some(result)
  }

  /// Move on to the next skill.
  pub fn advance(&mut self, tier: Tier, catalog: &QuestionCatalog) -> Result<Advanced, AssessmentError> {
    if !self.session.is_finished() {
      return Err(AssessmentError::InvalidState(format!(
        "skill '{}' is still in progress",
        self.session.skill()
      )));
    }
    // The finished skill goes into the summary even if nobody took it yet.
    let unsaved = self.take_unrecorded_result();

    let started = match self.queue.pop_front() {
      Some(skill) => {
        info!(target: "assessment", id = %self.id, %skill, %tier, "Next skill");
        self.session = AssessmentSession::create(skill.clone(), tier, catalog.index_or_empty(&skill));
        self.recorded = false;
        true
      }
      None => {
        self.completed = true;
        info!(target: "assessment", id = %self.id, skills = self.results.len(), "Candidacy completed");
        false
      }
    };
    Ok(Advanced { started, unsaved })
  }
}
