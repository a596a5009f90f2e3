//! Application state: question catalog, configuration and live candidacies.
//!
//! This module owns:
//!   - the read-only question catalog (one index per skill)
//!   - the effective skill queue and results directory
//!   - candidacies by id, each owned exclusively through the map
//!
//! If the configured bank cannot be loaded we fall back to the built-in seeds.

use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::bank::QuestionCatalog;
use crate::campaign::Candidacy;
use crate::config::{load_app_config_from_env, load_question_bank, AppConfig};
use crate::domain::DEFAULT_SKILL;
use crate::seeds::seed_questions;

pub struct AppState {
    pub catalog: QuestionCatalog,
    pub config: AppConfig,
    pub candidacies: RwLock<HashMap<Uuid, Candidacy>>,
}

impl AppState {
    /// Build state from env: load config, load bank (or seeds), build indexes.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        Self::from_config(load_app_config_from_env())
    }

    pub fn from_config(mut config: AppConfig) -> Self {
        let catalog = match load_question_bank(&config) {
            Some(questions) => QuestionCatalog::build(questions),
            None => {
                warn!(target: "skill_leveler", "No question bank loaded; using built-in seeds");
                config.skills = vec![DEFAULT_SKILL.to_string()];
                QuestionCatalog::build(seed_questions())
            }
        };
        catalog.log_inventory();
        for skill in &config.skills {
            if catalog.index(skill).is_none() {
                warn!(target: "skill_leveler", %skill, "Configured skill has no questions");
            }
        }
        info!(target: "skill_leveler", skills = ?config.skills, default_tier = %config.default_tier, results_dir = %config.results_dir.display(), "State ready");

        Self {
            catalog,
            config,
            candidacies: RwLock::new(HashMap::new()),
        }
    }

    /// Drop a candidacy. Returns whether it existed.
    #[instrument(level = "debug", skip(self))]
    pub async fn discard(&self, id: Uuid) -> bool {
        self.candidacies.write().await.remove(&id).is_some()
    }
}
