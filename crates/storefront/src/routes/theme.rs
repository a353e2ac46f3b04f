//! Theme route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

/// Theme payload.
#[derive(Debug, Serialize)]
pub struct ThemeView {
    pub theme: &'static str,
    pub is_dark_mode: bool,
}

/// Current theme.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<ThemeView> {
    let theme = state.theme().load();
    Json(ThemeView {
        theme: theme.as_str(),
        is_dark_mode: theme.is_dark(),
    })
}

/// Toggle dark mode, persisting and publishing the change.
#[instrument(skip(state))]
pub async fn toggle(State(state): State<AppState>) -> Json<ThemeView> {
    let theme = state.theme().toggle();
    Json(ThemeView {
        theme: theme.as_str(),
        is_dark_mode: theme.is_dark(),
    })
}
