use crate::api::user_management::models::UserLoggedIn;
use crate::api::user_management::sessions::{KnownSession, SessionStore};
use crate::error::ErrorResponse;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde::Serialize;

#[derive(Serialize)]
pub struct SessionOut {
    pub id: i32,
    pub username: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    pub provider: Option<String>,
}

#[get("/check_login")]
pub(crate) fn check_login(
    user: UserLoggedIn,
    session: KnownSession,
    sessions: &State<SessionStore>,
) -> Result<Json<SessionOut>, ErrorResponse> {
    let current = match session.key {
        Some(key) => sessions.get(&key)?.unwrap_or_default(),
        None => Default::default(),
    };

    Ok(Json(SessionOut {
        id: user.0.id,
        username: current.username,
        email: current.email,
        picture: current.picture,
        provider: current.provider,
    }))
}

#[get("/check_login", rank = 2)]
pub(crate) fn check_login_unauthorised() -> ErrorResponse {
    ErrorResponse::new(Status { code: 401 }, "Login required".to_string())
}
