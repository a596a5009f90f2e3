//! Domain models: seniority tiers, tree node codes, questions and answer records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AssessmentError;

/// Skill used for questions that carry no skill tag.
pub const DEFAULT_SKILL: &str = "general";

/// Seniority tier. Ordered: fresher < junior < middle < senior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
  Fresher,
  Junior,
  Middle,
  Senior,
}

impl Tier {
  pub const ALL: [Tier; 4] = [Tier::Fresher, Tier::Junior, Tier::Middle, Tier::Senior];

  /// Single-letter code used in node names and labels ("F", "J", "M", "S").
  pub fn code(self) -> char {
    match self {
      Tier::Fresher => 'F',
      Tier::Junior => 'J',
      Tier::Middle => 'M',
      Tier::Senior => 'S',
    }
  }

  #[allow(dead_code)]
  pub fn from_code(code: char) -> Option<Tier> {
    Tier::ALL.into_iter().find(|t| t.code() == code.to_ascii_uppercase())
  }

  pub fn name(self) -> &'static str {
    match self {
      Tier::Fresher => "fresher",
      Tier::Junior => "junior",
      Tier::Middle => "middle",
      Tier::Senior => "senior",
    }
  }

  /// Next tier up, `None` for the top tier.
  #[allow(dead_code)]
  pub fn up(self) -> Option<Tier> {
    match self {
      Tier::Fresher => Some(Tier::Junior),
      Tier::Junior => Some(Tier::Middle),
      Tier::Middle => Some(Tier::Senior),
      Tier::Senior => None,
    }
  }

  /// Next tier down, `None` for the bottom tier.
  #[allow(dead_code)]
  pub fn down(self) -> Option<Tier> {
    match self {
      Tier::Fresher => None,
      Tier::Junior => Some(Tier::Fresher),
      Tier::Middle => Some(Tier::Junior),
      Tier::Senior => Some(Tier::Middle),
    }
  }
}

impl fmt::Display for Tier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for Tier {
  type Err = AssessmentError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_ascii_lowercase();
    Tier::ALL
      .into_iter()
      .find(|t| t.name() == wanted)
      .ok_or_else(|| AssessmentError::InvalidInput(format!("unknown tier '{s}'")))
  }
}

/// A point in the decision tree: tier + level (0 only appears on failed terminals).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeCode {
  pub tier: Tier,
  pub level: u8,
}

impl NodeCode {
  pub const fn new(tier: Tier, level: u8) -> Self {
    Self { tier, level }
  }

  /// Terminal label, e.g. "LEVELJ2".
  pub fn label(&self) -> String {
    format!("LEVEL{self}")
  }
}

impl fmt::Display for NodeCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", self.tier.code(), self.level)
  }
}

impl Serialize for NodeCode {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// Question identifiers arrive either as numbers or strings in bank files.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl<'de> Deserialize<'de> for QuestionId {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
      Text(String),
      Number(i64),
    }
    Ok(match Raw::deserialize(deserializer)? {
      Raw::Text(s) => QuestionId(s),
      Raw::Number(n) => QuestionId(n.to_string()),
    })
  }
}

impl fmt::Display for QuestionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
  pub description: String,
  #[serde(rename = "isAnswerKey", default)]
  pub is_answer_key: bool,
}

/// Immutable question record as found in the bank file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub id: QuestionId,
  #[serde(rename = "seniority")]
  pub tier: Tier,
  pub level: u8,
  #[serde(default)]
  pub skill: Option<String>,
  #[serde(rename = "question")]
  pub prompt: String,
  pub options: Vec<AnswerOption>,
}

impl Question {
  /// Skill this question is filed under.
  pub fn skill_or_default(&self) -> &str {
    self.skill.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or(DEFAULT_SKILL)
  }

  /// Load-time integrity check: level in 1..=5 and exactly one correct option.
  pub fn validate(&self) -> Result<(), AssessmentError> {
    if !(1..=5).contains(&self.level) {
      return Err(AssessmentError::DataIntegrity(format!(
        "question {} has level {} outside 1..=5",
        self.id, self.level
      )));
    }
    let keys = self.options.iter().filter(|o| o.is_answer_key).count();
    if keys != 1 {
      return Err(AssessmentError::DataIntegrity(format!(
        "question {} has {} correct options (expected exactly one)",
        self.id, keys
      )));
    }
    Ok(())
  }
}

/// One submitted answer. Appended to the session history, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
  pub question_id: QuestionId,
  pub selected_index: usize,
  pub is_correct: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tier_names_and_codes_round_trip() {
    for t in Tier::ALL {
      assert_eq!(t.name().parse::<Tier>().unwrap(), t);
      assert_eq!(Tier::from_code(t.code()), Some(t));
    }
    assert_eq!(" Senior ".parse::<Tier>().unwrap(), Tier::Senior);
    assert!(matches!("lead".parse::<Tier>(), Err(AssessmentError::InvalidInput(_))));
    assert_eq!(Tier::from_code('x'), None);
  }

  #[test]
  fn tier_adjacency() {
    assert_eq!(Tier::Fresher.down(), None);
    assert_eq!(Tier::Senior.up(), None);
    assert_eq!(Tier::Junior.up(), Some(Tier::Middle));
    assert_eq!(Tier::Middle.down(), Some(Tier::Junior));
    assert!(Tier::Fresher < Tier::Junior && Tier::Middle < Tier::Senior);
  }

  #[test]
  fn node_code_label() {
    let n = NodeCode::new(Tier::Junior, 2);
    assert_eq!(n.to_string(), "J2");
    assert_eq!(n.label(), "LEVELJ2");
  }

  #[test]
  fn question_parses_bank_shape() {
    let raw = r##"{
      "id": 17, "skill": "css", "seniority": "junior", "level": 4,
      "question": "Which selector has the highest specificity?",
      "options": [
        {"description": "#id", "isAnswerKey": true},
        {"description": ".class", "isAnswerKey": false},
        {"description": "div"}
      ]
    }"##;
    let q: Question = serde_json::from_str(raw).unwrap();
    assert_eq!(q.id, QuestionId("17".into()));
    assert_eq!(q.tier, Tier::Junior);
    assert_eq!(q.skill_or_default(), "css");
    assert!(!q.options[2].is_answer_key);
    q.validate().unwrap();
  }

  #[test]
  fn validate_rejects_bad_keys_and_levels() {
    let mut q = Question {
      id: QuestionId("q".into()),
      tier: Tier::Middle,
      level: 3,
      skill: None,
      prompt: "?".into(),
      options: vec![
        AnswerOption { description: "a".into(), is_answer_key: true },
        AnswerOption { description: "b".into(), is_answer_key: true },
      ],
    };
    assert!(matches!(q.validate(), Err(AssessmentError::DataIntegrity(_))));
    q.options[1].is_answer_key = false;
    q.validate().unwrap();
    q.level = 6;
    assert!(q.validate().is_err());
    assert_eq!(q.skill_or_default(), DEFAULT_SKILL);
  }
}
