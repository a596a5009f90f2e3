//! Question bank: grouping by (tier, level), random lookup, and per-skill catalog.
//!
//! Indexes are built once at startup and are read-only afterwards, so they are
//! shared between candidates behind an `Arc` without locking.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{error, info, warn};

use crate::domain::{Question, Tier};

/// Composite lookup key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
  pub tier: Tier,
  pub level: u8,
}

/// Questions of a single skill grouped by (tier, level).
#[derive(Debug, Default)]
pub struct QuestionIndex {
  slots: HashMap<SlotKey, Vec<Arc<Question>>>,
}

impl QuestionIndex {
  /// Group questions by slot. Records failing `Question::validate` are skipped.
  pub fn build(questions: impl IntoIterator<Item = Question>) -> Self {
    let mut slots: HashMap<SlotKey, Vec<Arc<Question>>> = HashMap::new();
    for q in questions {
      if let Err(e) = q.validate() {
        error!(target: "assessment", id = %q.id, error = %e, "Skipping bank item");
        continue;
      }
      let key = SlotKey { tier: q.tier, level: q.level };
      slots.entry(key).or_default().push(Arc::new(q));
    }
    Self { slots }
  }

  /// Uniformly random question for the slot, or `None` if the slot is empty.
  pub fn lookup<R: Rng + ?Sized>(&self, tier: Tier, level: u8, rng: &mut R) -> Option<Arc<Question>> {
    self
      .slots
      .get(&SlotKey { tier, level })
      .and_then(|group| group.choose(rng))
      .cloned()
  }

  pub fn len(&self) -> usize {
    self.slots.values().map(Vec::len).sum()
  }

  /// Slots of the 4x5 grid that have no question.
  pub fn missing_slots(&self) -> Vec<SlotKey> {
    Tier::ALL
      .into_iter()
      .flat_map(|tier| (1..=5).map(move |level| SlotKey { tier, level }))
      .filter(|k| self.slots.get(k).map_or(true, Vec::is_empty))
      .collect()
  }
}

/// Short code for a tier name + level, e.g. ("junior", 2) -> "J2".
/// Unknown tier names map to "?".
pub fn format_label(tier: &str, level: u8) -> String {
  match tier.parse::<Tier>() {
    Ok(t) => format!("{}{}", t.code(), level),
    Err(_) => format!("?{level}"),
  }
}

/// One index per skill.
#[derive(Debug, Default)]
pub struct QuestionCatalog {
  by_skill: BTreeMap<String, Arc<QuestionIndex>>,
}

impl QuestionCatalog {
  pub fn build(questions: Vec<Question>) -> Self {
    let mut grouped: BTreeMap<String, Vec<Question>> = BTreeMap::new();
    for q in questions {
      grouped.entry(q.skill_or_default().to_string()).or_default().push(q);
    }
    let by_skill = grouped
      .into_iter()
      .map(|(skill, qs)| (skill, Arc::new(QuestionIndex::build(qs))))
      .collect();
    Self { by_skill }
  }

  pub fn index(&self, skill: &str) -> Option<Arc<QuestionIndex>> {
    self.by_skill.get(skill).cloned()
  }

  /// Index for `skill`, or an empty one (every lookup yields `None`).
  pub fn index_or_empty(&self, skill: &str) -> Arc<QuestionIndex> {
    self.index(skill).unwrap_or_else(|| {
      warn!(target: "assessment", %skill, "Skill has no questions in the bank");
      Arc::new(QuestionIndex::default())
    })
  }

  pub fn skills(&self) -> impl Iterator<Item = &str> {
    self.by_skill.keys().map(String::as_str)
  }

  /// Startup inventory log, one line per skill.
  pub fn log_inventory(&self) {
    for (skill, idx) in &self.by_skill {
      let missing = idx.missing_slots();
      if missing.is_empty() {
        info!(target: "assessment", %skill, questions = idx.len(), "Question inventory");
      } else {
        let codes: Vec<String> =
          missing.iter().map(|k| format!("{}{}", k.tier.code(), k.level)).collect();
        warn!(target: "assessment", %skill, questions = idx.len(), missing = %codes.join(","), "Question inventory has gaps");
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{AnswerOption, QuestionId};
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn q(id: &str, skill: Option<&str>, tier: Tier, level: u8) -> Question {
    Question {
      id: QuestionId(id.into()),
      tier,
      level,
      skill: skill.map(Into::into),
      prompt: format!("prompt {id}"),
      options: vec![
        AnswerOption { description: "yes".into(), is_answer_key: true },
        AnswerOption { description: "no".into(), is_answer_key: false },
      ],
    }
  }

  #[test]
  fn lookup_picks_from_matching_group() {
    let idx = QuestionIndex::build(vec![
      q("a", None, Tier::Junior, 2),
      q("b", None, Tier::Junior, 2),
      q("c", None, Tier::Junior, 3),
    ]);
    let mut rng = StdRng::seed_from_u64(7);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
      let got = idx.lookup(Tier::Junior, 2, &mut rng).unwrap();
      assert_eq!((got.tier, got.level), (Tier::Junior, 2));
      seen.insert(got.id.0.clone());
    }
    assert_eq!(seen.len(), 2, "both questions of the slot should come up");
  }

  #[test]
  fn empty_slot_yields_none() {
    let idx = QuestionIndex::build(vec![q("a", None, Tier::Middle, 3)]);
    let mut rng = StdRng::seed_from_u64(1);
    assert!(idx.lookup(Tier::Senior, 3, &mut rng).is_none());
    assert_eq!(idx.missing_slots().len(), 19);
  }

  #[test]
  fn invalid_questions_are_skipped() {
    let mut bad = q("bad", None, Tier::Middle, 3);
    bad.options[1].is_answer_key = true;
    let idx = QuestionIndex::build(vec![bad, q("ok", None, Tier::Middle, 3)]);
    assert_eq!(idx.len(), 1);
  }

  #[test]
  fn format_label_codes() {
    assert_eq!(format_label("junior", 2), "J2");
    assert_eq!(format_label("senior", 5), "S5");
    assert_eq!(format_label("intern", 1), "?1");
  }

  #[test]
  fn catalog_splits_by_skill() {
    let cat = QuestionCatalog::build(vec![
      q("1", Some("css"), Tier::Fresher, 3),
      q("2", Some("html"), Tier::Fresher, 3),
      q("3", None, Tier::Fresher, 3),
    ]);
    let skills: Vec<&str> = cat.skills().collect();
    assert_eq!(skills, vec!["css", "general", "html"]);
    assert_eq!(cat.index("css").unwrap().len(), 1);
    assert!(cat.index("react").is_none());
  }
}
