//! The leveling decision tree.
//!
//! Each starting tier has its own hand-authored table. The tables share a shape
//! (mid → high/low split, escalate from high, descend from low) but runs are
//! capped at five questions, so the points where a second tier crossing is cut
//! short differ per table. They are written out literally below; do not try to
//! derive them from a recursive rule.
//!
//! A node is named by tier initial + level ("M3"). Level 0 only shows up in
//! failed terminals.

use serde::Serialize;

use crate::domain::{NodeCode, Tier};

/// Upper bound on questions in one run. Every table terminates within it.
pub const MAX_QUESTIONS: usize = 5;

/// Terminal result of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Outcome {
  pub node: NodeCode,
  pub failed: bool,
}

impl Outcome {
  pub fn label(&self) -> String {
    self.node.label()
  }
}

/// Result of feeding one answer into a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step<N> {
  /// Ask another question at this node.
  Ask(N),
  Finish(Outcome),
}

impl<N> Step<N> {
  fn map<M>(self, f: impl FnOnce(N) -> M) -> Step<M> {
    match self {
      Step::Ask(n) => Step::Ask(f(n)),
      Step::Finish(o) => Step::Finish(o),
    }
  }
}

fn finish<N>(tier: Tier, level: u8) -> Step<N> {
  Step::Finish(Outcome { node: NodeCode::new(tier, level), failed: false })
}

fn fail<N>(tier: Tier) -> Step<N> {
  Step::Finish(Outcome { node: NodeCode::new(tier, 0), failed: true })
}

/// Nodes reachable from a fresher start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FresherPath { F3, F5, F1, F4, F2, J3, J5, J1, J4, J2 }

impl FresherPath {
  fn code(self) -> NodeCode {
    use FresherPath::*;
    match self {
      F3 => NodeCode::new(Tier::Fresher, 3),
      F5 => NodeCode::new(Tier::Fresher, 5),
      F1 => NodeCode::new(Tier::Fresher, 1),
      F4 => NodeCode::new(Tier::Fresher, 4),
      F2 => NodeCode::new(Tier::Fresher, 2),
      J3 => NodeCode::new(Tier::Junior, 3),
      J5 => NodeCode::new(Tier::Junior, 5),
      J1 => NodeCode::new(Tier::Junior, 1),
      J4 => NodeCode::new(Tier::Junior, 4),
      J2 => NodeCode::new(Tier::Junior, 2),
    }
  }

  fn advance(self, correct: bool) -> Step<Self> {
    use FresherPath::*;
    use Tier::{Fresher, Junior};
    match (self, correct) {
      (F3, true) => Step::Ask(F5),
      (F3, false) => Step::Ask(F1),
      (F5, true) => Step::Ask(J3),
      (F5, false) => Step::Ask(F4),
      (F1, true) => Step::Ask(F2),
      (F1, false) => fail(Fresher),
      (F4, true) => finish(Fresher, 4),
      (F4, false) => finish(Fresher, 3),
      (F2, true) => finish(Fresher, 2),
      (F2, false) => finish(Fresher, 1),
      (J3, true) => Step::Ask(J5),
      (J3, false) => Step::Ask(J1),
      (J5, true) => finish(Junior, 5),
      (J5, false) => Step::Ask(J4),
      (J1, true) => Step::Ask(J2),
      (J1, false) => finish(Fresher, 5),
      (J4, true) => finish(Junior, 4),
      (J4, false) => finish(Junior, 3),
      (J2, true) => finish(Junior, 2),
      (J2, false) => finish(Junior, 1),
    }
  }
}

/// Nodes reachable from a junior start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JuniorPath { J3, J5, J1, J2, J4, M3, F3, M5, M1, F5, F1, M4, M2, F4, F2 }

impl JuniorPath {
  fn code(self) -> NodeCode {
    use JuniorPath::*;
    match self {
      J3 => NodeCode::new(Tier::Junior, 3),
      J5 => NodeCode::new(Tier::Junior, 5),
      J1 => NodeCode::new(Tier::Junior, 1),
      J2 => NodeCode::new(Tier::Junior, 2),
      J4 => NodeCode::new(Tier::Junior, 4),
      M3 => NodeCode::new(Tier::Middle, 3),
      M5 => NodeCode::new(Tier::Middle, 5),
      M1 => NodeCode::new(Tier::Middle, 1),
      M4 => NodeCode::new(Tier::Middle, 4),
      M2 => NodeCode::new(Tier::Middle, 2),
      F3 => NodeCode::new(Tier::Fresher, 3),
      F5 => NodeCode::new(Tier::Fresher, 5),
      F1 => NodeCode::new(Tier::Fresher, 1),
      F4 => NodeCode::new(Tier::Fresher, 4),
      F2 => NodeCode::new(Tier::Fresher, 2),
    }
  }

  fn advance(self, correct: bool) -> Step<Self> {
    use JuniorPath::*;
    use Tier::{Fresher, Junior, Middle};
    match (self, correct) {
      (J3, true) => Step::Ask(J5),
      (J3, false) => Step::Ask(J1),
      (J5, true) => Step::Ask(M3),
      (J5, false) => Step::Ask(J4),
      (J1, true) => Step::Ask(J2),
      (J1, false) => Step::Ask(F3),
      (J2, true) => finish(Junior, 2),
      (J2, false) => finish(Junior, 1),
      (J4, true) => finish(Junior, 4),
      (J4, false) => finish(Junior, 3),
      (M3, true) => Step::Ask(M5),
      (M3, false) => Step::Ask(M1),
      (F3, true) => Step::Ask(F5),
      (F3, false) => Step::Ask(F1),
      (M5, true) => finish(Middle, 5),
      (M5, false) => Step::Ask(M4),
      (M1, true) => Step::Ask(M2),
      (M1, false) => finish(Junior, 5),
      (F5, true) => finish(Fresher, 5),
      (F5, false) => Step::Ask(F4),
      (F1, true) => Step::Ask(F2),
      (F1, false) => fail(Fresher),
      (M4, true) => finish(Middle, 4),
      (M4, false) => finish(Middle, 3),
      (M2, true) => finish(Middle, 2),
      (M2, false) => finish(Middle, 1),
      (F4, true) => finish(Fresher, 4),
      (F4, false) => finish(Fresher, 3),
      (F2, true) => finish(Fresher, 2),
      (F2, false) => finish(Fresher, 1),
    }
  }
}

/// Nodes reachable from a middle start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MiddlePath { M3, M5, M1, M2, M4, S3, J3, S5, S1, J5, J1, S4, S2, J4, J2 }

impl MiddlePath {
  fn code(self) -> NodeCode {
    use MiddlePath::*;
    match self {
      M3 => NodeCode::new(Tier::Middle, 3),
      M5 => NodeCode::new(Tier::Middle, 5),
      M1 => NodeCode::new(Tier::Middle, 1),
      M2 => NodeCode::new(Tier::Middle, 2),
      M4 => NodeCode::new(Tier::Middle, 4),
      S3 => NodeCode::new(Tier::Senior, 3),
      S5 => NodeCode::new(Tier::Senior, 5),
      S1 => NodeCode::new(Tier::Senior, 1),
      S4 => NodeCode::new(Tier::Senior, 4),
      S2 => NodeCode::new(Tier::Senior, 2),
      J3 => NodeCode::new(Tier::Junior, 3),
      J5 => NodeCode::new(Tier::Junior, 5),
      J1 => NodeCode::new(Tier::Junior, 1),
      J4 => NodeCode::new(Tier::Junior, 4),
      J2 => NodeCode::new(Tier::Junior, 2),
    }
  }

  fn advance(self, correct: bool) -> Step<Self> {
    use MiddlePath::*;
    use Tier::{Junior, Middle, Senior};
    match (self, correct) {
      (M3, true) => Step::Ask(M5),
      (M3, false) => Step::Ask(M1),
      (M5, true) => Step::Ask(S3),
      (M5, false) => Step::Ask(M4),
      (M1, true) => Step::Ask(M2),
      (M1, false) => Step::Ask(J3),
      (M2, true) => finish(Middle, 2),
      (M2, false) => finish(Middle, 1),
      (M4, true) => finish(Middle, 4),
      (M4, false) => finish(Middle, 3),
      (S3, true) => Step::Ask(S5),
      (S3, false) => Step::Ask(S1),
      (J3, true) => Step::Ask(J5),
      (J3, false) => Step::Ask(J1),
      (S5, true) => finish(Senior, 5),
      (S5, false) => Step::Ask(S4),
      (S1, true) => Step::Ask(S2),
      (S1, false) => finish(Middle, 5),
      (J5, true) => finish(Junior, 5),
      (J5, false) => Step::Ask(J4),
      (J1, true) => Step::Ask(J2),
      (J1, false) => fail(Junior),
      (S4, true) => finish(Senior, 4),
      (S4, false) => finish(Senior, 3),
      (S2, true) => finish(Senior, 2),
      (S2, false) => finish(Senior, 1),
      (J4, true) => finish(Junior, 4),
      (J4, false) => finish(Junior, 3),
      (J2, true) => finish(Junior, 2),
      (J2, false) => finish(Junior, 1),
    }
  }
}

/// Nodes reachable from a senior start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeniorPath { S3, S5, S1, S4, S2, M3, M5, M1, M4, M2 }

impl SeniorPath {
  fn code(self) -> NodeCode {
    use SeniorPath::*;
    match self {
      S3 => NodeCode::new(Tier::Senior, 3),
      S5 => NodeCode::new(Tier::Senior, 5),
      S1 => NodeCode::new(Tier::Senior, 1),
      S4 => NodeCode::new(Tier::Senior, 4),
      S2 => NodeCode::new(Tier::Senior, 2),
      M3 => NodeCode::new(Tier::Middle, 3),
      M5 => NodeCode::new(Tier::Middle, 5),
      M1 => NodeCode::new(Tier::Middle, 1),
      M4 => NodeCode::new(Tier::Middle, 4),
      M2 => NodeCode::new(Tier::Middle, 2),
    }
  }

  fn advance(self, correct: bool) -> Step<Self> {
    use SeniorPath::*;
    use Tier::{Middle, Senior};
    match (self, correct) {
      (S3, true) => Step::Ask(S5),
      (S3, false) => Step::Ask(S1),
      (S5, true) => finish(Senior, 5),
      (S5, false) => Step::Ask(S4),
      (S1, true) => Step::Ask(S2),
      (S1, false) => Step::Ask(M3),
      (S4, true) => finish(Senior, 4),
      (S4, false) => finish(Senior, 3),
      (S2, true) => finish(Senior, 2),
      (S2, false) => finish(Senior, 1),
      (M3, true) => Step::Ask(M5),
      (M3, false) => Step::Ask(M1),
      (M5, true) => finish(Middle, 5),
      (M5, false) => Step::Ask(M4),
      (M1, true) => Step::Ask(M2),
      (M1, false) => fail(Middle),
      (M4, true) => finish(Middle, 4),
      (M4, false) => finish(Middle, 3),
      (M2, true) => finish(Middle, 2),
      (M2, false) => finish(Middle, 1),
    }
  }
}

/// Cursor into the table of the run's starting tier.
///
/// The starting tier is carried by the variant, so a cursor can never point at
/// a node that its own table does not contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathState {
  Fresher(FresherPath),
  Junior(JuniorPath),
  Middle(MiddlePath),
  Senior(SeniorPath),
}

impl PathState {
  /// Mid node of the starting tier.
  pub fn start(tier: Tier) -> Self {
    match tier {
      Tier::Fresher => PathState::Fresher(FresherPath::F3),
      Tier::Junior => PathState::Junior(JuniorPath::J3),
      Tier::Middle => PathState::Middle(MiddlePath::M3),
      Tier::Senior => PathState::Senior(SeniorPath::S3),
    }
  }

  pub fn starting_tier(&self) -> Tier {
    match self {
      PathState::Fresher(_) => Tier::Fresher,
      PathState::Junior(_) => Tier::Junior,
      PathState::Middle(_) => Tier::Middle,
      PathState::Senior(_) => Tier::Senior,
    }
  }

  pub fn code(&self) -> NodeCode {
    match *self {
      PathState::Fresher(n) => n.code(),
      PathState::Junior(n) => n.code(),
      PathState::Middle(n) => n.code(),
      PathState::Senior(n) => n.code(),
    }
  }

  /// Feed one answer into the current node.
  pub fn advance(self, correct: bool) -> Step<PathState> {
    match self {
      PathState::Fresher(n) => n.advance(correct).map(PathState::Fresher),
      PathState::Junior(n) => n.advance(correct).map(PathState::Junior),
      PathState::Middle(n) => n.advance(correct).map(PathState::Middle),
      PathState::Senior(n) => n.advance(correct).map(PathState::Senior),
    }
  }
}
