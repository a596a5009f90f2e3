//! Built-in question bank so the service is usable without a bank file.
//!
//! One question per (tier, level) slot, filed under the default skill.

use crate::domain::{AnswerOption, Question, QuestionId, Tier, DEFAULT_SKILL};

fn seed(id: &str, tier: Tier, level: u8, prompt: &str, options: [&str; 4], key: usize) -> Question {
  Question {
    id: QuestionId(id.into()),
    tier,
    level,
    skill: Some(DEFAULT_SKILL.into()),
    prompt: prompt.into(),
    options: options
      .iter()
      .enumerate()
      .map(|(i, d)| AnswerOption { description: (*d).into(), is_answer_key: i == key })
      .collect(),
  }
}

/// Minimal set of built-in questions covering every node of the tree.
pub fn seed_questions() -> Vec<Question> {
  use Tier::*;
  vec![
    seed("seed-f1", Fresher, 1, "Which command records staged changes in git?", ["git commit", "git push", "git clone", "git init"], 0),
    seed("seed-f2", Fresher, 2, "What does HTTP status 404 mean?", ["Server error", "Not found", "Redirect", "Unauthorized"], 1),
    seed("seed-f3", Fresher, 3, "Which data structure is FIFO?", ["Stack", "Tree", "Queue", "Heap"], 2),
    seed("seed-f4", Fresher, 4, "What is the time complexity of binary search?", ["O(n)", "O(n log n)", "O(1)", "O(log n)"], 3),
    seed("seed-f5", Fresher, 5, "Which SQL clause filters grouped rows?", ["HAVING", "WHERE", "ORDER BY", "LIMIT"], 0),
    seed("seed-j1", Junior, 1, "What does `git rebase` do?", ["Deletes a branch", "Replays commits onto another base", "Merges two remotes", "Tags a release"], 1),
    seed("seed-j2", Junior, 2, "Which HTTP method is idempotent?", ["POST", "PATCH", "PUT", "CONNECT"], 2),
    seed("seed-j3", Junior, 3, "What is a race condition?", ["A slow loop", "A compile error", "A memory leak", "Outcome depends on timing of concurrent operations"], 3),
    seed("seed-j4", Junior, 4, "What does an index on a database column mainly speed up?", ["Lookups", "Inserts", "Backups", "Schema migrations"], 0),
    seed("seed-j5", Junior, 5, "Which isolation level prevents dirty reads but allows non-repeatable reads?", ["Read uncommitted", "Read committed", "Serializable", "Snapshot"], 1),
    seed("seed-m1", Middle, 1, "What is the main purpose of a reverse proxy?", ["Compile code", "Encrypt disks", "Route client requests to backend servers", "Store sessions"], 2),
    seed("seed-m2", Middle, 2, "Which pattern decouples object creation from use?", ["Observer", "Adapter", "Decorator", "Factory"], 3),
    seed("seed-m3", Middle, 3, "What does CAP theorem trade off under partition?", ["Consistency vs availability", "Latency vs throughput", "CPU vs memory", "Reads vs writes"], 0),
    seed("seed-m4", Middle, 4, "What problem does a circuit breaker address?", ["Memory fragmentation", "Cascading failures from a failing dependency", "Slow compilation", "Schema drift"], 1),
    seed("seed-m5", Middle, 5, "Which technique gives exactly-once effects over an at-least-once queue?", ["Bigger batches", "Longer timeouts", "Idempotent consumers", "More partitions"], 2),
    seed("seed-s1", Senior, 1, "What is the main risk of a shared database between services?", ["Higher disk usage", "Slower queries", "More logs", "Tight coupling of schemas and deploys"], 3),
    seed("seed-s2", Senior, 2, "Which consensus algorithm elects a leader with terms?", ["Raft", "Gossip", "Two-phase commit", "Vector clocks"], 0),
    seed("seed-s3", Senior, 3, "What does a saga replace in distributed transactions?", ["Caching", "Two-phase commit", "Load balancing", "Sharding"], 1),
    seed("seed-s4", Senior, 4, "What is tail latency amplification?", ["Slow DNS", "Large payloads", "Fan-out requests waiting on the slowest backend", "GC pauses"], 2),
    seed("seed-s5", Senior, 5, "Which guarantee does linearizability add over sequential consistency?", ["Durability", "Partition tolerance", "Lower latency", "Respect for real-time ordering"], 3),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bank::QuestionIndex;

  #[test]
  fn seeds_cover_every_slot_and_validate() {
    let qs = seed_questions();
    for q in &qs {
      q.validate().unwrap();
    }
    let idx = QuestionIndex::build(qs);
    assert!(idx.missing_slots().is_empty());
    assert_eq!(idx.len(), 20);
  }
}
