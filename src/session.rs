//! One candidate's run through the decision tree for one skill.
//!
//! Lifecycle: `create` puts the cursor on the mid node of the starting tier,
//! `next_question` draws a question for the current node, `submit_answer`
//! records the answer and moves the cursor. Once an outcome is recorded the
//! session no longer accepts answers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::bank::QuestionIndex;
use crate::domain::{AnswerRecord, NodeCode, Question, Tier};
use crate::error::AssessmentError;
use crate::results::AssessmentResult;
use crate::tree::{Outcome, PathState, Step, MAX_QUESTIONS};

/// A question as shown to the candidate: options in display order.
#[derive(Clone, Debug, Serialize)]
pub struct PresentedQuestion {
  pub node: NodeCode,
  pub question: Question,
}

/// What the caller learns after each submitted answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
  pub finished: bool,
  pub final_label: Option<String>,
  pub failed: bool,
  pub last_answer: Option<AnswerRecord>,
}

#[derive(Debug)]
pub struct AssessmentSession {
  skill: String,
  index: Arc<QuestionIndex>,
  /// Cursor; its variant also fixes the starting tier.
  path: PathState,
  presented: Vec<PresentedQuestion>,
  answers: Vec<AnswerRecord>,
  pending: bool,
  outcome: Option<Outcome>,
  completed_at: Option<DateTime<Utc>>,
}

impl AssessmentSession {
  pub fn create(skill: impl Into<String>, tier: Tier, index: Arc<QuestionIndex>) -> Self {
    Self {
      skill: skill.into(),
      index,
      path: PathState::start(tier),
      presented: Vec::new(),
      answers: Vec::new(),
      pending: false,
      outcome: None,
      completed_at: None,
    }
  }

  pub fn skill(&self) -> &str { &self.skill }
  pub fn starting_tier(&self) -> Tier { self.path.starting_tier() }
  pub fn answers(&self) -> &[AnswerRecord] { &self.answers }
  pub fn is_finished(&self) -> bool { self.outcome.is_some() }
  pub fn outcome(&self) -> Option<Outcome> { self.outcome }

  /// Node the cursor is on (tier + level).
  pub fn current_node(&self) -> NodeCode {
    self.path.code()
  }

  /// Question awaiting an answer, if any.
  pub fn pending_question(&self) -> Option<&PresentedQuestion> {
    if self.pending { self.presented.last() } else { None }
  }

  /// Draw a question for the current node with its options shuffled.
  ///
  /// Returns `None` when the session is finished or the bank has nothing for
  /// the node. While a question is pending the same question is returned.
  #[instrument(level = "debug", skip(self, rng), fields(skill = %self.skill, node = %self.path.code()))]
  pub fn next_question<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<PresentedQuestion> {
    if self.is_finished() {
      return None;
    }
    if let Some(p) = self.pending_question() {
      return Some(p.clone());
    }

    let node = self.path.code();
    let Some(source) = self.index.lookup(node.tier, node.level, rng) else {
      warn!(target: "assessment", skill = %self.skill, %node, "No question available for node");
      return None;
    };

    let mut question = (*source).clone();
    question.options.shuffle(rng);
    let presented = PresentedQuestion { node, question };
    self.presented.push(presented.clone());
    self.pending = true;
    debug!(target: "assessment", %node, id = %presented.question.id, "Question issued");
    Some(presented)
  }

  /// Record the answer to the pending question and move the cursor.
  ///
  /// Fails without touching the session when it is finished, when no question
  /// is pending, or when `selected_index` is out of range.
  #[instrument(level = "debug", skip(self), fields(skill = %self.skill, node = %self.path.code()))]
  pub fn submit_answer(&mut self, selected_index: usize) -> Result<SubmitOutcome, AssessmentError> {
    if self.is_finished() {
      return Err(AssessmentError::InvalidState("assessment already finished".into()));
    }
    let question = match self.pending_question() {
      Some(p) => &p.question,
      None => return Err(AssessmentError::InvalidState("no pending question".into())),
    };
    let option = question.options.get(selected_index).ok_or_else(|| {
      AssessmentError::DataIntegrity(format!(
        "selected option {} out of range for question {} ({} options)",
        selected_index,
        question.id,
        question.options.len()
      ))
    })?;

    let record = AnswerRecord {
      question_id: question.id.clone(),
      selected_index,
      is_correct: option.is_answer_key,
    };
    self.answers.push(record.clone());
    self.pending = false;
    debug_assert!(self.answers.len() <= MAX_QUESTIONS);

    match self.path.advance(record.is_correct) {
      Step::Ask(next) => {
        debug!(target: "assessment", from = %self.path.code(), to = %next.code(), correct = record.is_correct, "Cursor moved");
        self.path = next;
      }
      Step::Finish(outcome) => self.finish(outcome),
    }

    Ok(SubmitOutcome {
      finished: self.is_finished(),
      final_label: self.outcome.map(|o| o.label()),
      failed: self.outcome.is_some_and(|o| o.failed),
      last_answer: Some(record),
    })
  }

  fn finish(&mut self, outcome: Outcome) {
    self.outcome = Some(outcome);
    self.completed_at = Some(Utc::now());
    info!(
      target: "assessment",
      skill = %self.skill,
      start = %self.starting_tier(),
      label = %outcome.label(),
      failed = outcome.failed,
      answers = self.answers.len(),
      "Assessment finished"
    );
  }

  /// Result artifact for a finished session.
  pub fn to_result(&self, account: &str) -> Option<AssessmentResult> {
    let outcome = self.outcome?;
    Some(AssessmentResult {
      account: account.to_string(),
      skill: self.skill.clone(),
      final_result: outcome.label(),
      failed: outcome.failed,
      answer_history: self.answers.clone(),
      datetime: self.completed_at.unwrap_or_else(Utc::now),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{AnswerOption, QuestionId};
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  /// Full 4x5 grid, four options per question, first option correct.
  fn full_index() -> Arc<QuestionIndex> {
    let mut qs = Vec::new();
    for tier in Tier::ALL {
      for level in 1..=5u8 {
        qs.push(Question {
          id: QuestionId(format!("{}{}", tier.code(), level)),
          tier,
          level,
          skill: None,
          prompt: "pick the key".into(),
          options: (0..4)
            .map(|i| AnswerOption { description: format!("opt{i}"), is_answer_key: i == 0 })
            .collect(),
        });
      }
    }
    Arc::new(QuestionIndex::build(qs))
  }

  fn correct_index(p: &PresentedQuestion) -> usize {
    p.question.options.iter().position(|o| o.is_answer_key).unwrap()
  }

  fn wrong_index(p: &PresentedQuestion) -> usize {
    p.question.options.iter().position(|o| !o.is_answer_key).unwrap()
  }

  /// Drive a session with 'C'/'I' answers and return the last outcome.
  fn run(tier: Tier, answers: &str, rng: &mut StdRng) -> (AssessmentSession, SubmitOutcome) {
    let mut s = AssessmentSession::create("general", tier, full_index());
    let mut last = None;
    for a in answers.chars() {
      let p = s.next_question(rng).expect("question for node");
      let idx = if a == 'C' { correct_index(&p) } else { wrong_index(&p) };
      last = Some(s.submit_answer(idx).unwrap());
    }
    (s, last.unwrap())
  }

  #[test]
  fn starts_on_mid_node() {
    let s = AssessmentSession::create("general", Tier::Junior, full_index());
    assert_eq!(s.current_node(), NodeCode::new(Tier::Junior, 3));
    assert_eq!(s.starting_tier(), Tier::Junior);
    assert!(!s.is_finished());
  }

  #[test]
  fn question_matches_current_node() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut s = AssessmentSession::create("general", Tier::Middle, full_index());
    let p = s.next_question(&mut rng).unwrap();
    assert_eq!(p.node.to_string(), "M3");
    assert_eq!(p.question.id.0, "M3");
  }

  #[test]
  fn shuffled_correct_option_is_always_correct() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
      let mut s = AssessmentSession::create("general", Tier::Middle, full_index());
      let p = s.next_question(&mut rng).unwrap();
      let out = s.submit_answer(correct_index(&p)).unwrap();
      assert!(out.last_answer.unwrap().is_correct);
    }
  }

  #[test]
  fn pending_question_is_reissued() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut s = AssessmentSession::create("general", Tier::Senior, full_index());
    let a = s.next_question(&mut rng).unwrap();
    let b = s.next_question(&mut rng).unwrap();
    assert_eq!(a.question, b.question);
    assert_eq!(s.presented.len(), 1);
  }

  #[test]
  fn scenarios_through_session() {
    let mut rng = StdRng::seed_from_u64(11);

    let (s, out) = run(Tier::Fresher, "II", &mut rng);
    assert_eq!((out.final_label.as_deref(), out.failed), (Some("LEVELF0"), true));
    assert_eq!(s.answers().len(), 2);

    let (_, out) = run(Tier::Senior, "IIII", &mut rng);
    assert_eq!((out.final_label.as_deref(), out.failed), (Some("LEVELM0"), true));

    let (_, out) = run(Tier::Junior, "CII", &mut rng);
    assert_eq!((out.final_label.as_deref(), out.failed), (Some("LEVELJ3"), false));

    let (_, out) = run(Tier::Middle, "CII", &mut rng);
    assert_eq!(out.final_label.as_deref(), Some("LEVELM3"));

    let (s, out) = run(Tier::Middle, "III", &mut rng);
    assert!(!out.finished);
    assert_eq!(s.current_node().to_string(), "J1");

    let (s, out) = run(Tier::Middle, "CC", &mut rng);
    assert!(!out.finished);
    assert_eq!(s.current_node().to_string(), "S3");
  }

  #[test]
  fn finished_session_rejects_answers_and_stays_put() {
    let mut rng = StdRng::seed_from_u64(5);
    let (mut s, out) = run(Tier::Senior, "CC", &mut rng);
    assert!(out.finished);
    assert!(s.next_question(&mut rng).is_none());
    let before = s.answers().to_vec();
    assert!(matches!(s.submit_answer(0), Err(AssessmentError::InvalidState(_))));
    assert_eq!(s.answers(), &before[..]);
    assert_eq!(s.outcome().unwrap().label(), "LEVELS5");

    let result = s.to_result("ana").unwrap();
    assert_eq!(result.final_result, "LEVELS5");
    assert_eq!(result.answer_history.len(), 2);
  }

  #[test]
  fn answer_without_pending_question_is_rejected() {
    let mut s = AssessmentSession::create("general", Tier::Middle, full_index());
    assert!(matches!(s.submit_answer(0), Err(AssessmentError::InvalidState(_))));
    assert!(s.answers().is_empty());
    assert!(s.to_result("ana").is_none());
  }

  #[test]
  fn out_of_range_index_keeps_question_pending() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut s = AssessmentSession::create("general", Tier::Middle, full_index());
    s.next_question(&mut rng).unwrap();
    assert!(matches!(s.submit_answer(4), Err(AssessmentError::DataIntegrity(_))));
    assert!(s.answers().is_empty());
    assert!(s.pending_question().is_some());
    s.submit_answer(0).unwrap();
    assert_eq!(s.answers().len(), 1);
  }

  #[test]
  fn missing_slot_yields_no_question() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut s = AssessmentSession::create("general", Tier::Middle, Arc::new(QuestionIndex::default()));
    assert!(s.next_question(&mut rng).is_none());
    assert!(s.pending_question().is_none());
    assert!(!s.is_finished());
  }
}
