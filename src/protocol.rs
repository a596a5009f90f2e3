//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank::format_label;
use crate::campaign::{Candidacy, SkillResult};
use crate::domain::{AnswerRecord, QuestionId};
use crate::error::AssessmentError;
use crate::session::PresentedQuestion;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Start {
        account: String,
        #[serde(default)]
        tier: Option<String>,
    },
    Resume {
        #[serde(rename = "assessmentId")]
        assessment_id: Uuid,
    },
    Answer {
        #[serde(rename = "assessmentId")]
        assessment_id: Uuid,
        #[serde(rename = "selectedIndex")]
        selected_index: usize,
    },
    NextSkill {
        #[serde(rename = "assessmentId")]
        assessment_id: Uuid,
        #[serde(default)]
        tier: Option<String>,
    },
    Summary {
        #[serde(rename = "assessmentId")]
        assessment_id: Uuid,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Assessment {
        assessment: AssessmentOut,
    },
    AnswerResult {
        #[serde(flatten)]
        result: AnswerOut,
    },
    Summary {
        summary: SummaryOut,
    },
    Error {
        code: String,
        message: String,
    },
}

impl From<AssessmentError> for ServerWsMessage {
    fn from(e: AssessmentError) -> Self {
        ServerWsMessage::Error { code: e.code().into(), message: e.to_string() }
    }
}

/// Question as shown to the candidate. The answer key is never sent.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionOut {
    pub id: QuestionId,
    /// Level code of the question, e.g. "M5".
    pub level: String,
    pub prompt: String,
    pub options: Vec<String>,
}

pub fn question_out(p: &PresentedQuestion) -> QuestionOut {
    QuestionOut {
        id: p.question.id.clone(),
        level: format_label(p.question.tier.name(), p.question.level),
        prompt: p.question.prompt.clone(),
        options: p.question.options.iter().map(|o| o.description.clone()).collect(),
    }
}

/// DTO used by both WS and HTTP for candidacy state.
#[derive(Debug, Serialize)]
pub struct AssessmentOut {
    pub id: Uuid,
    pub account: String,
    pub skill: String,
    pub starting_tier: String,
    pub current_level: String,
    pub answered: usize,
    pub finished: bool,
    pub final_label: Option<String>,
    pub failed: bool,
    pub remaining_skills: Vec<String>,
    pub completed: bool,
    /// Pending question; null when finished or when the bank has nothing for the node.
    pub question: Option<QuestionOut>,
}

pub fn assessment_out(c: &Candidacy) -> AssessmentOut {
    let s = c.session();
    let outcome = s.outcome();
    AssessmentOut {
        id: c.id(),
        account: c.account().to_string(),
        skill: s.skill().to_string(),
        starting_tier: s.starting_tier().to_string(),
        current_level: s.current_node().to_string(),
        answered: s.answers().len(),
        finished: s.is_finished(),
        final_label: outcome.map(|o| o.label()),
        failed: outcome.is_some_and(|o| o.failed),
        remaining_skills: c.remaining_skills().map(String::from).collect(),
        completed: c.is_completed(),
        question: s.pending_question().map(question_out),
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerOut {
    pub correct: bool,
    pub finished: bool,
    pub final_label: Option<String>,
    pub failed: bool,
    pub last_answer: Option<AnswerRecord>,
    pub assessment: AssessmentOut,
}

#[derive(Debug, Serialize)]
pub struct SummaryOut {
    pub id: Uuid,
    pub account: String,
    pub completed: bool,
    pub results: Vec<SkillResult>,
}

pub fn summary_out(c: &Candidacy) -> SummaryOut {
    SummaryOut {
        id: c.id(),
        account: c.account().to_string(),
        completed: c.is_completed(),
        results: c.results().to_vec(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct StartIn {
    pub account: String,
    #[serde(default)]
    pub tier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    #[serde(rename = "selectedIndex")]
    pub selected_index: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextSkillIn {
    #[serde(default)]
    pub tier: Option<String>,
}

#[derive(Serialize)]
pub struct SkillsOut {
    /// Configured queue, in order.
    pub skills: Vec<String>,
    /// Skills that have questions in the loaded bank.
    pub available: Vec<String>,
    pub default_tier: String,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
