//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.
//!
//! A connection remembers the candidacy it started; starting another one on the
//! same socket discards the previous candidacy.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;
use crate::util::trunc_for_log;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "skill_leveler", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "skill_leveler", "WebSocket connected");
  let mut owned: Option<Uuid> = None;
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "skill_leveler", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &mut owned).await
          }
          Err(e) => {
            debug!(target: "skill_leveler", payload = %trunc_for_log(&txt, 200), "WS invalid JSON");
            ServerWsMessage::Error { code: "invalid_input".into(), message: format!("Invalid JSON: {}", e) }
          }
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "code": "internal", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "skill_leveler", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "skill_leveler", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state, owned))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, owned: &mut Option<Uuid>) -> ServerWsMessage {
  let reply = match msg {
    ClientWsMessage::Ping => Ok(ServerWsMessage::Pong),

    ClientWsMessage::Start { account, tier } => {
      match start_assessment(state, &account, tier.as_deref()).await {
        Ok(assessment) => {
          if let Some(previous) = owned.replace(assessment.id) {
            if state.discard(previous).await {
              info!(target: "assessment", %previous, "WS discarded previous candidacy");
            }
          }
          info!(target: "assessment", id = %assessment.id, "WS assessment started");
          Ok(ServerWsMessage::Assessment { assessment })
        }
        Err(e) => Err(e),
      }
    }

    ClientWsMessage::Resume { assessment_id } => get_assessment(state, assessment_id)
      .await
      .map(|assessment| ServerWsMessage::Assessment { assessment }),

    ClientWsMessage::Answer { assessment_id, selected_index } => submit_answer(state, assessment_id, selected_index)
      .await
      .map(|result| ServerWsMessage::AnswerResult { result }),

    ClientWsMessage::NextSkill { assessment_id, tier } => next_skill(state, assessment_id, tier.as_deref())
      .await
      .map(|assessment| ServerWsMessage::Assessment { assessment }),

    ClientWsMessage::Summary { assessment_id } => get_summary(state, assessment_id)
      .await
      .map(|summary| ServerWsMessage::Summary { summary }),
  };
  reply.unwrap_or_else(ServerWsMessage::from)
}
