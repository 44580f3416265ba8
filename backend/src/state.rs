use axum::extract::FromRef;

use crate::{config::Config, services::ProgressService};

#[derive(Clone)]
pub struct AppState {
    pub service: ProgressService,
    pub config: Config,
}

impl FromRef<AppState> for ProgressService {
    fn from_ref(state: &AppState) -> Self {
        state.service.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
