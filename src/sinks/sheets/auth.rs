//! Access tokens for the Sheets API

use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::Path;
use yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};

/// OAuth2 scope for reading and writing spreadsheets
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Source of bearer tokens for API requests
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Service-account JWT flow backed by a JSON key file
pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
}

impl ServiceAccountTokenProvider {
    /// Load the service account key from `path`
    pub async fn from_file(path: &Path) -> Result<Self> {
        let key = yup_oauth2::read_service_account_key(path).await.map_err(|e| {
            AppError::auth(format!(
                "Failed to load Google credentials from '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self { key })
    }

    /// Parse a service account key from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let key = yup_oauth2::parse_service_account_key(json)
            .map_err(|e| AppError::auth(format!("Invalid service account key: {}", e)))?;
        Ok(Self { key })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let auth = ServiceAccountAuthenticator::builder(self.key.clone())
            .build()
            .await
            .map_err(|e| AppError::auth(format!("Failed to build authenticator: {}", e)))?;

        let token = auth.token(&[SHEETS_SCOPE]).await?;
        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| AppError::auth("Token response did not include an access token"))
    }
}

/// Fixed token, for API endpoints that do not check it
pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
