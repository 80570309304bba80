use std::sync::Arc;

use crate::api::user_management::models::NewUser;
use crate::api::user_management::provider::IdentityProvider;
use crate::api::user_management::sessions::{
    generate_token, BrowserSession, KnownSession, SessionStore,
};
use crate::db::DbConn;
use crate::error::ErrorResponse;
use crate::settings::Settings;
use log::{error, info, warn};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct LoginPage {
    state: String,
    client_id: String,
}

/// Issues a fresh anti-forgery state token for this browser session.
#[get("/login")]
pub(crate) fn login(
    session: BrowserSession,
    sessions: &State<SessionStore>,
    settings: &State<Settings>,
) -> Result<Json<LoginPage>, ErrorResponse> {
    let state = generate_token();

    sessions.update(&session.key, |s| s.state = Some(state.clone()))?;

    Ok(Json(LoginPage {
        state,
        client_id: settings.google_client_id.clone(),
    }))
}

#[get("/login/")]
pub(crate) fn login_slash(
    session: BrowserSession,
    sessions: &State<SessionStore>,
    settings: &State<Settings>,
) -> Result<Json<LoginPage>, ErrorResponse> {
    login(session, sessions, settings)
}

fn unauthorised(err: &str) -> ErrorResponse {
    warn!("Login rejected: {}", err);
    ErrorResponse::new(Status { code: 401 }, err.to_string())
}

/// Completes the login handshake for the one-time code in the request body.
#[post("/gconnect?<state>", data = "<code>")]
pub(crate) async fn connect(
    state: Option<String>,
    code: String,
    session: KnownSession,
    sessions: &State<SessionStore>,
    provider: &State<Arc<dyn IdentityProvider>>,
    settings: &State<Settings>,
    conn: DbConn,
) -> Result<String, ErrorResponse> {
    // no session means /login was never visited, so no state can match
    let key = match session.key {
        Some(key) => key,
        None => return Err(unauthorised("Invalid state parameter")),
    };
    let current = sessions.get(&key)?.unwrap_or_default();

    if state.is_none() || state != current.state {
        return Err(unauthorised("Invalid state parameter"));
    }

    let credentials = provider.exchange_code(code.trim()).await.map_err(|err| {
        warn!("Couldn't exchange authorization code: {}", err);
        unauthorised("Failed to upgrade the authorization code.")
    })?;

    let token_info = provider
        .token_info(&credentials.access_token)
        .await
        .map_err(|err| {
            ErrorResponse::new(
                Status { code: 500 },
                format!("Couldn't verify access token: {}", err),
            )
        })?;

    if let Some(err) = token_info.error {
        return Err(ErrorResponse::new(Status { code: 500 }, err));
    }

    if token_info.user_id.as_deref() != Some(credentials.subject.as_str()) {
        return Err(unauthorised("Token's user ID doesn't match given user ID."));
    }

    if token_info.issued_to.as_deref() != Some(settings.google_client_id.as_str()) {
        return Err(unauthorised("Token's client ID does not match app's."));
    }

    if current.credentials.is_some()
        && current.provider_subject.as_deref() == Some(credentials.subject.as_str())
    {
        return Ok(format!(
            "{} is already connected",
            current.username.unwrap_or_default()
        ));
    }

    let access_token = credentials.access_token.clone();
    sessions.update(&key, |s| {
        s.provider_subject = Some(credentials.subject.clone());
        s.credentials = Some(credentials);
    })?;

    let profile = provider.user_info(&access_token).await.map_err(|err| {
        ErrorResponse::new(
            Status { code: 500 },
            format!("Couldn't fetch user info: {}", err),
        )
    })?;

    let provider_name = provider.name();
    sessions.update(&key, |s| {
        s.provider = Some(provider_name.to_string());
        s.username = Some(profile.name.clone());
        s.picture = profile.picture.clone();
        s.email = Some(profile.email.clone());
    })?;

    let email = profile.email.clone();
    let user = conn
        .run(move |c| {
            NewUser {
                name: &profile.name,
                email: &profile.email,
                picture: profile.picture.as_deref(),
            }
            .find_or_create(c)
        })
        .await
        .map_err(|err| {
            error!("Couldn't store user {}: {}", email, err);
            ErrorResponse::new(Status { code: 500 }, "Couldn't update user".to_string())
        })?;

    sessions.update(&key, |s| s.user_id = Some(user.id))?;

    info!("User {} logged in via {}", user.id, provider_name);

    Ok(format!("Login successful! Welcome, {}!", user.name))
}
