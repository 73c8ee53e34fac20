use std::{fmt, io::Error, path::PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum PropertyError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for PropertyError {
    fn from(err: Error) -> Self {
        PropertyError::IoError(err)
    }
}

impl From<serde_json::Error> for PropertyError {
    fn from(err: serde_json::Error) -> Self {
        PropertyError::SerdeError(err)
    }
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::IoError(e) => write!(f, "property store I/O failed: {}", e),
            PropertyError::SerdeError(e) => write!(f, "property store is malformed: {}", e),
        }
    }
}

impl std::error::Error for PropertyError {}

/// Names of the stored properties, spelled the way they appear on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Property {
    #[value(name = "clientID")]
    ClientId,
    #[value(name = "clientSecret")]
    ClientSecret,
    #[value(name = "authorizationCode")]
    AuthorizationCode,
    #[value(name = "accessToken")]
    AccessToken,
    #[value(name = "refreshToken")]
    RefreshToken,
    #[value(name = "playlistID")]
    PlaylistId,
    #[value(name = "incomingWebhook")]
    IncomingWebhook,
}

impl Property {
    pub const ALL: [Property; 7] = [
        Property::ClientId,
        Property::ClientSecret,
        Property::AuthorizationCode,
        Property::AccessToken,
        Property::RefreshToken,
        Property::PlaylistId,
        Property::IncomingWebhook,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Property::ClientId => "clientID",
            Property::ClientSecret => "clientSecret",
            Property::AuthorizationCode => "authorizationCode",
            Property::AccessToken => "accessToken",
            Property::RefreshToken => "refreshToken",
            Property::PlaylistId => "playlistID",
            Property::IncomingWebhook => "incomingWebhook",
        }
    }

    /// Whether the value should be masked when listed.
    pub fn is_secret(&self) -> bool {
        matches!(
            self,
            Property::ClientSecret
                | Property::AuthorizationCode
                | Property::AccessToken
                | Property::RefreshToken
                | Property::IncomingWebhook
        )
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Credentials, tokens and targets of the job.
///
/// Loaded once at process start and written back once at the end; components
/// receive it as `&mut Properties` instead of reaching for shared state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(rename = "clientID", default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(rename = "clientSecret", default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(rename = "authorizationCode", default, skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<String>,
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(rename = "playlistID", default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    #[serde(rename = "incomingWebhook", default, skip_serializing_if = "Option::is_none")]
    pub incoming_webhook: Option<String>,
}

impl Properties {
    /// Returns the value of `property`, treating an empty string as unset.
    pub fn get(&self, property: Property) -> Option<&str> {
        self.slot(property)
            .as_deref()
            .filter(|value| !value.is_empty())
    }

    pub fn set(&mut self, property: Property, value: impl Into<String>) -> &mut Self {
        *self.slot_mut(property) = Some(value.into());
        self
    }

    pub fn unset(&mut self, property: Property) -> &mut Self {
        *self.slot_mut(property) = None;
        self
    }

    fn slot(&self, property: Property) -> &Option<String> {
        match property {
            Property::ClientId => &self.client_id,
            Property::ClientSecret => &self.client_secret,
            Property::AuthorizationCode => &self.authorization_code,
            Property::AccessToken => &self.access_token,
            Property::RefreshToken => &self.refresh_token,
            Property::PlaylistId => &self.playlist_id,
            Property::IncomingWebhook => &self.incoming_webhook,
        }
    }

    fn slot_mut(&mut self, property: Property) -> &mut Option<String> {
        match property {
            Property::ClientId => &mut self.client_id,
            Property::ClientSecret => &mut self.client_secret,
            Property::AuthorizationCode => &mut self.authorization_code,
            Property::AccessToken => &mut self.access_token,
            Property::RefreshToken => &mut self.refresh_token,
            Property::PlaylistId => &mut self.playlist_id,
            Property::IncomingWebhook => &mut self.incoming_webhook,
        }
    }
}

pub struct PropertyStore {
    path: PathBuf,
}

impl PropertyStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the stored properties. A store that was never written yields
    /// empty properties.
    pub async fn load(&self) -> Result<Properties, PropertyError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Properties::default());
            }
            Err(e) => return Err(PropertyError::IoError(e)),
        };

        if content.trim().is_empty() {
            return Ok(Properties::default());
        }

        Ok(serde_json::from_str(&content)?)
    }

    pub async fn persist(&self, properties: &Properties) -> Result<(), PropertyError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(properties)?;
        async_fs::write(&self.path, json)
            .await
            .map_err(PropertyError::IoError)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
