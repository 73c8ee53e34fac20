use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{types::AuthorizationState, warning};

/// Receives the redirect from the authorize page and keeps the code for the
/// `auth` command, which performs the exchange itself.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<AuthorizationState>>>>,
) -> Html<&'static str> {
    if let Some(reason) = params.get("error") {
        warning!("Authorization was denied: {}", reason);
        return Html("<h4>Authorization denied.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut state = shared_state.lock().await;
    let Some(auth_state) = state.as_mut() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    if params.get("state") != Some(&auth_state.expected_state) {
        warning!("Ignoring callback with unexpected state parameter");
        return Html("<h4>State mismatch, please retry.</h4>");
    }

    auth_state.code = Some(code.clone());
    Html("<h2>Authorization received.</h2><p>You can close this window.</p>")
}
