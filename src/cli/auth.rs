use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config::{self, Settings},
    error,
    management::{Properties, Property, PropertyStore},
    server::start_api_server,
    spotify::auth::{AuthError, TokenManager, authorize_url},
    success,
    types::AuthorizationState,
    utils, warning,
};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// Obtains a fresh authorization code and spends it on a token pair.
///
/// 1. Starts the local callback server
/// 2. Opens the authorize URL in the default browser
/// 3. Waits for the redirect carrying the code
/// 4. Stores the code, drops the old tokens and exchanges the code once
///
/// Requires `clientID` and `clientSecret` to be set beforehand.
pub async fn auth() {
    let settings = Settings::from_env();
    let store = PropertyStore::new(config::properties_path());
    let mut props = match store.load().await {
        Ok(props) => props,
        Err(e) => error!("Cannot load properties. Err: {}", e),
    };

    let Some(client_id) = props.get(Property::ClientId).map(str::to_string) else {
        error!("clientID is not set. Run playlist-digest props set clientID <id>");
    };
    if props.get(Property::ClientSecret).is_none() {
        error!("clientSecret is not set. Run playlist-digest props set clientSecret <secret>");
    }

    let state = utils::generate_state();
    let url = match authorize_url(
        &settings.auth_url,
        &client_id,
        &settings.redirect_uri,
        &settings.scope,
        &state,
    ) {
        Ok(url) => url,
        Err(e) => error!("{}", e),
    };

    let shared_state = Arc::new(Mutex::new(Some(AuthorizationState {
        expected_state: state,
        code: None,
    })));

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            url
        )
    }

    let Some(code) = wait_for_code(shared_state).await else {
        error!("Authorization failed or timed out.");
    };

    if let Err(e) = store_and_exchange(&settings, &mut props, code).await {
        if let Err(e) = store.persist(&props).await {
            warning!("Failed to save properties: {}", e);
        }
        error!("Token exchange failed: {}", e);
    }

    if let Err(e) = store.persist(&props).await {
        error!("Failed to save tokens: {}", e);
    }
    success!("Authorization successful!");
}

async fn store_and_exchange(
    settings: &Settings,
    props: &mut Properties,
    code: String,
) -> Result<(), AuthError> {
    // a new code is only spent when no access token is stored
    props
        .set(Property::AuthorizationCode, code)
        .unset(Property::AccessToken)
        .unset(Property::RefreshToken);

    let tokens = TokenManager::new(
        Client::new(),
        settings.token_url.clone(),
        settings.redirect_uri.clone(),
    );
    tokens.exchange_code(props).await.map(|_| ())
}

async fn wait_for_code(shared_state: Arc<Mutex<Option<AuthorizationState>>>) -> Option<String> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(code) = lock.as_ref().and_then(|s| s.code.clone()) {
            return Some(code);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
