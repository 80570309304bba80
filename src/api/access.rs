use crate::api::item_management::models::Item;
use crate::api::room_management::models::Room;
use crate::api::user_management::models::UserLoggedIn;
use crate::api::user_management::sessions::CurrentUser;
use crate::db::DbConn;
use crate::error::{ErrorResponse, RouteError};
use crate::schema;
use diesel::prelude::*;
use log::error;
use rocket::form::{self, Contextual, Form};
use rocket::http::Status;
use rocket::response::Redirect;

/// Sends visitors without a session to the login page.
pub(crate) fn require_login(user: CurrentUser) -> Result<UserLoggedIn, RouteError> {
    user.resolve()?.ok_or_else(|| {
        RouteError::Login(Redirect::to(uri!(
            crate::api::user_management::login::login
        )))
    })
}

/// Loads a room and checks that the session user owns it.
///
/// `action` completes the refusal message, e.g. "edit this room".
pub(crate) async fn owned_room(
    conn: &DbConn,
    room_id: i32,
    user: CurrentUser,
    action: &str,
) -> Result<(Room, UserLoggedIn), RouteError> {
    let room = conn
        .run(move |c| {
            use schema::rooms::dsl::*;
            rooms.find(room_id).first::<Room>(c).optional()
        })
        .await
        .map_err(|err| {
            error!("Couldn't load room {}: {}", room_id, err);
            ErrorResponse::new(Status { code: 500 }, "Couldn't load room".to_string())
        })?
        .ok_or_else(|| {
            ErrorResponse::new(
                Status { code: 404 },
                format!("No room found for room id: {}", room_id),
            )
        })?;

    let user = require_login(user)?;

    if user.0.id != room.user_id {
        return Err(ErrorResponse::new(
            Status { code: 403 },
            format!("You do not have permission to {}!", action),
        )
        .into());
    }

    Ok((room, user))
}

/// Like [`owned_room`], additionally loading an item that must live in that room.
pub(crate) async fn owned_item(
    conn: &DbConn,
    room_id: i32,
    item_id: i32,
    user: CurrentUser,
    action: &str,
) -> Result<(Room, Item, UserLoggedIn), RouteError> {
    let (room, user) = owned_room(conn, room_id, user, action).await?;

    let item = conn
        .run(move |c| {
            use schema::items::dsl::*;
            items.find(item_id).first::<Item>(c).optional()
        })
        .await
        .map_err(|err| {
            error!("Couldn't load item {}: {}", item_id, err);
            ErrorResponse::new(Status { code: 500 }, "Couldn't load item".to_string())
        })?
        .ok_or_else(|| {
            ErrorResponse::new(
                Status { code: 404 },
                format!("No item found for item id: {}", item_id),
            )
        })?;

    if item.room_id != room.id {
        return Err(ErrorResponse::new(
            Status { code: 400 },
            format!(
                "{} (item-id: {}) does not belong to {} (room-id: {})",
                item.name, item.id, room.name, room.id
            ),
        )
        .into());
    }

    Ok((room, item, user))
}

/// Answer to the `?delete=` confirmation parameter of the delete routes.
pub(crate) enum DeleteChoice {
    Ask,
    Confirm,
    Cancel,
}

impl DeleteChoice {
    pub(crate) fn parse(delete: Option<&str>) -> Result<DeleteChoice, ErrorResponse> {
        match delete {
            None => Ok(DeleteChoice::Ask),
            Some("true") => Ok(DeleteChoice::Confirm),
            Some("false") => Ok(DeleteChoice::Cancel),
            Some(other) => Err(ErrorResponse::new(
                Status { code: 400 },
                format!("Invalid value for delete parameter: {}", other),
            )),
        }
    }
}

/// Form validator counting characters rather than bytes.
pub(crate) fn within_chars<'v>(text: &str, max: usize) -> form::Result<'v, ()> {
    if text.chars().count() > max {
        return Err(form::Error::validation(format!("must be at most {} characters", max)).into());
    }

    Ok(())
}

/// Like [`within_chars`], for optional text fields.
pub(crate) fn max_chars<'v>(value: &Option<String>, max: usize) -> form::Result<'v, ()> {
    match value {
        Some(text) => within_chars(text, max),
        None => Ok(()),
    }
}

/// Unwraps a submitted form. Field errors become an error response carrying
/// the form's status.
pub(crate) fn submitted<T>(form: Form<Contextual<'_, T>>) -> Result<T, ErrorResponse> {
    let Contextual { value, context } = form.into_inner();

    value.ok_or_else(|| {
        let message = context
            .errors()
            .map(|err| match &err.name {
                Some(name) => format!("{}: {}", name, err),
                None => err.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");

        ErrorResponse::new(context.status(), message)
    })
}

/// Rejects names that are empty once surrounding whitespace is removed.
pub(crate) fn required_name(name: &str, what: &str) -> Result<String, ErrorResponse> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ErrorResponse::new(
            Status { code: 400 },
            format!("You must fill in {}'s name", what),
        ));
    }

    Ok(name.to_string())
}
