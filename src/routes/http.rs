//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and errors map onto status codes in one place.

use std::sync::Arc;
use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::AssessmentError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

impl IntoResponse for AssessmentError {
  fn into_response(self) -> Response {
    let status = match &self {
      AssessmentError::InvalidInput(_) => StatusCode::BAD_REQUEST,
      AssessmentError::InvalidState(_) => StatusCode::CONFLICT,
      AssessmentError::DataIntegrity(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AssessmentError::NotFound(_) => StatusCode::NOT_FOUND,
    };
    (status, Json(ErrorOut { error: self.code().into(), message: self.to_string() })).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_skills(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(SkillsOut {
    skills: state.config.skills.clone(),
    available: state.catalog.skills().map(String::from).collect(),
    default_tier: state.config.default_tier.to_string(),
  })
}

#[instrument(level = "info", skip(state, body), fields(tier = ?body.tier))]
pub async fn http_post_start(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartIn>,
) -> Result<impl IntoResponse, AssessmentError> {
  let out = start_assessment(&state, &body.account, body.tier.as_deref()).await?;
  info!(target: "assessment", id = %out.id, skill = %out.skill, "HTTP assessment started");
  Ok((StatusCode::CREATED, Json(out)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_assessment(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<Json<AssessmentOut>, AssessmentError> {
  Ok(Json(get_assessment(&state, id).await?))
}

#[instrument(level = "info", skip(state, body), fields(selected = body.selected_index))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<AnswerOut>, AssessmentError> {
  let out = submit_answer(&state, id, body.selected_index).await?;
  info!(target: "assessment", %id, correct = out.correct, finished = out.finished, "HTTP answer evaluated");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_next_skill(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  body: Option<Json<NextSkillIn>>,
) -> Result<Json<AssessmentOut>, AssessmentError> {
  let body = body.map(|Json(b)| b).unwrap_or_default();
  Ok(Json(next_skill(&state, id, body.tier.as_deref()).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_summary(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SummaryOut>, AssessmentError> {
  Ok(Json(get_summary(&state, id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_assessment(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, AssessmentError> {
  if state.discard(id).await {
    info!(target: "assessment", %id, "HTTP assessment discarded");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(AssessmentError::NotFound(format!("unknown assessment {id}")))
  }
}
