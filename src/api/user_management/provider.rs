use crate::settings::Settings;
use serde::{Deserialize, Serialize};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const TOKEN_INFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const USER_INFO_URL: &str = "https://www.googleapis.com/oauth2/v1/userinfo";
const REVOKE_URL: &str = "https://oauth2.googleapis.com/revoke";

/// Credentials obtained by exchanging a one-time authorization code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Credentials {
    pub(crate) access_token: String,
    /// Account the ID token was issued for.
    pub(crate) subject: String,
}

/// What the provider reports about an access token.
#[derive(Debug, Default)]
pub(crate) struct TokenInfo {
    pub(crate) user_id: Option<String>,
    pub(crate) issued_to: Option<String>,
    pub(crate) error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserInfo {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) picture: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ProviderError {
    #[error("request to identity provider failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("identity provider answered with status {0}")]
    Rejected(u16),
    #[error("couldn't verify id token: {0}")]
    IdToken(String),
}

/// Third-party identity provider backing the login handshake.
#[rocket::async_trait]
pub(crate) trait IdentityProvider: Send + Sync {
    /// Name recorded in the session as the login provider.
    fn name(&self) -> &'static str;

    async fn exchange_code(&self, code: &str) -> Result<Credentials, ProviderError>;

    async fn token_info(&self, access_token: &str) -> Result<TokenInfo, ProviderError>;

    async fn user_info(&self, access_token: &str) -> Result<UserInfo, ProviderError>;

    async fn revoke(&self, access_token: &str) -> Result<(), ProviderError>;
}

pub(crate) struct GoogleProvider {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    id_token: String,
}

#[derive(Deserialize)]
struct IdTokenClaims {
    sub: String,
}

#[derive(Deserialize)]
struct GoogleTokenInfo {
    sub: Option<String>,
    azp: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl GoogleProvider {
    pub(crate) fn new(settings: &Settings) -> Result<GoogleProvider, ProviderError> {
        Ok(GoogleProvider {
            client: reqwest::Client::builder().build()?,
            client_id: settings.google_client_id.clone(),
            client_secret: settings.google_client_secret.clone(),
        })
    }
}

#[rocket::async_trait]
impl IdentityProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn exchange_code(&self, code: &str) -> Result<Credentials, ProviderError> {
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                // the code comes from the browser's popup flow
                ("redirect_uri", "postmessage"),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Rejected(response.status().as_u16()));
        }

        let tokens = response.json::<TokenResponse>().await?;

        let parser = jsonwebtoken_google::Parser::new(&self.client_id);
        let claims = parser
            .parse::<IdTokenClaims>(&tokens.id_token)
            .await
            .map_err(|err| ProviderError::IdToken(format!("{:?}", err)))?;

        Ok(Credentials {
            access_token: tokens.access_token,
            subject: claims.sub,
        })
    }

    async fn token_info(&self, access_token: &str) -> Result<TokenInfo, ProviderError> {
        // Invalid tokens come back as a 4xx with an error body, which is still a valid answer.
        let info = self
            .client
            .get(TOKEN_INFO_URL)
            .query(&[("access_token", access_token)])
            .send()
            .await?
            .json::<GoogleTokenInfo>()
            .await?;

        Ok(TokenInfo {
            user_id: info.sub,
            issued_to: info.azp,
            error: info.error.or(info.error_description),
        })
    }

    async fn user_info(&self, access_token: &str) -> Result<UserInfo, ProviderError> {
        let response = self
            .client
            .get(USER_INFO_URL)
            .bearer_auth(access_token)
            .query(&[("alt", "json")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Rejected(response.status().as_u16()));
        }

        Ok(response.json::<UserInfo>().await?)
    }

    async fn revoke(&self, access_token: &str) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(REVOKE_URL)
            .form(&[("token", access_token)])
            .send()
            .await?;

        if response.status().as_u16() != 200 {
            return Err(ProviderError::Rejected(response.status().as_u16()));
        }

        Ok(())
    }
}
