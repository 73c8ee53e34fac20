use std::fmt;

use reqwest::{Client, Url, header::AUTHORIZATION};

use crate::{
    management::{Properties, Property},
    types::TokenResponse,
    utils,
};

#[derive(Debug)]
pub enum AuthError {
    Http(reqwest::Error),
    MissingProperty(Property),
    MissingAccessToken,
    InvalidUrl(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Http(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Http(e) => write!(f, "token request failed: {}", e),
            AuthError::MissingProperty(p) => write!(f, "property {} is not set", p),
            AuthError::MissingAccessToken => {
                write!(f, "token response did not contain an access token")
            }
            AuthError::InvalidUrl(e) => write!(f, "invalid authorize url: {}", e),
        }
    }
}

impl std::error::Error for AuthError {}

/// Obtains and renews access tokens from the Spotify accounts service.
///
/// Uses the authorization code flow with a client secret: every token request
/// carries `Authorization: Basic base64(clientID:clientSecret)`. Tokens are
/// read from and written to the [`Properties`] passed into each call.
#[derive(Debug, Clone)]
pub struct TokenManager {
    client: Client,
    token_url: String,
    redirect_uri: String,
}

impl TokenManager {
    pub fn new(client: Client, token_url: String, redirect_uri: String) -> Self {
        Self {
            client,
            token_url,
            redirect_uri,
        }
    }

    /// Exchanges the stored authorization code for a token pair.
    ///
    /// An authorization code can only be spent once, so when an access token
    /// is already stored it is returned as is and no request is made. When
    /// only a refresh token is stored the token is renewed with it instead.
    ///
    /// # Errors
    ///
    /// - `MissingProperty` if client credentials or the code are not stored
    /// - `Http` on transport failures or a non-success status
    /// - `MissingAccessToken` if the response carries no access token
    pub async fn exchange_code(&self, props: &mut Properties) -> Result<String, AuthError> {
        if let Some(token) = props.get(Property::AccessToken) {
            return Ok(token.to_string());
        }
        if props.get(Property::RefreshToken).is_some() {
            return self.refresh(props).await;
        }

        let code = required(props, Property::AuthorizationCode)?.to_string();
        let response = self
            .request_token(
                props,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", &code),
                    ("redirect_uri", &self.redirect_uri),
                ],
            )
            .await?;

        if let Some(refresh_token) = response.refresh_token {
            props.refresh_token = Some(refresh_token);
        }
        props.access_token = response.access_token.clone();

        response.access_token.ok_or(AuthError::MissingAccessToken)
    }

    /// Renews the access token with the stored refresh token.
    ///
    /// The accounts service may rotate the refresh token; it is only
    /// overwritten when the response contains a new one.
    pub async fn refresh(&self, props: &mut Properties) -> Result<String, AuthError> {
        let refresh_token = required(props, Property::RefreshToken)?.to_string();
        let response = self
            .request_token(
                props,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", &refresh_token),
                ],
            )
            .await?;

        if let Some(refresh_token) = response.refresh_token {
            props.refresh_token = Some(refresh_token);
        }

        match response.access_token {
            Some(access_token) => {
                props.access_token = Some(access_token.clone());
                Ok(access_token)
            }
            None => Err(AuthError::MissingAccessToken),
        }
    }

    async fn request_token(
        &self,
        props: &Properties,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, AuthError> {
        let client_id = required(props, Property::ClientId)?;
        let client_secret = required(props, Property::ClientSecret)?;

        let response = self
            .client
            .post(&self.token_url)
            .header(
                AUTHORIZATION,
                format!("Basic {}", utils::basic_credentials(client_id, client_secret)),
            )
            .form(form)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<TokenResponse>().await?)
    }
}

/// Builds the URL the user opens to grant access and obtain a code.
pub fn authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: &str,
) -> Result<Url, AuthError> {
    Url::parse_with_params(
        auth_url,
        &[
            ("response_type", "code"),
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("scope", scope),
            ("state", state),
        ],
    )
    .map_err(|e| AuthError::InvalidUrl(e.to_string()))
}

fn required(props: &Properties, property: Property) -> Result<&str, AuthError> {
    props
        .get(property)
        .ok_or(AuthError::MissingProperty(property))
}
