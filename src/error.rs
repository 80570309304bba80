use rocket::response::{Redirect, Responder, Response};
use rocket::{
    http::{ContentType, Status},
    response,
    serde::json::Json,
    Request,
};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct ApiError {
    err: String,
}

impl ApiError {
    pub(crate) fn new(err: String) -> ApiError {
        ApiError { err }
    }
}

#[derive(Debug)]
pub(crate) struct ErrorResponse<T = ApiError> {
    json: Json<T>,
    status: Status,
}

impl ErrorResponse<ApiError> {
    pub(crate) fn new(status: Status, err: String) -> ErrorResponse<ApiError> {
        ErrorResponse {
            json: Json(ApiError { err }),
            status,
        }
    }
}

impl From<(Status, ApiError)> for ErrorResponse<ApiError> {
    fn from((status, err): (Status, ApiError)) -> Self {
        ErrorResponse {
            json: Json(err),
            status,
        }
    }
}

impl<'r, T: serde::Serialize> Responder<'r, 'static> for ErrorResponse<T> {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        Response::build_from(self.json.respond_to(req)?)
            .status(self.status)
            .header(ContentType::JSON)
            .ok()
    }
}

/// Failure of an ownership-gated route: either the visitor has to log in
/// first, or the request is refused outright.
pub(crate) enum RouteError {
    Login(Redirect),
    Refused(ErrorResponse),
}

impl From<ErrorResponse> for RouteError {
    fn from(err: ErrorResponse) -> Self {
        RouteError::Refused(err)
    }
}

impl<'r> Responder<'r, 'static> for RouteError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        match self {
            RouteError::Login(redirect) => redirect.respond_to(req),
            RouteError::Refused(err) => err.respond_to(req),
        }
    }
}
