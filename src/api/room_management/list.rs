use crate::api::room_management::models::Room;
use crate::api::user_management::sessions::CurrentUser;
use crate::db::DbConn;
use crate::error::ErrorResponse;
use crate::schema;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::serde::json::Json;

#[get("/")]
pub(crate) async fn index(
    user: CurrentUser,
    conn: DbConn,
) -> Result<Json<Vec<Room>>, ErrorResponse> {
    user_rooms(user, conn).await
}

#[get("/rooms")]
pub(crate) async fn list_rooms(
    user: CurrentUser,
    conn: DbConn,
) -> Result<Json<Vec<Room>>, ErrorResponse> {
    user_rooms(user, conn).await
}

#[get("/rooms/")]
pub(crate) async fn list_rooms_slash(
    user: CurrentUser,
    conn: DbConn,
) -> Result<Json<Vec<Room>>, ErrorResponse> {
    user_rooms(user, conn).await
}

/// Visitors without a session simply own no rooms.
async fn user_rooms(
    user: CurrentUser,
    conn: DbConn,
) -> Result<Json<Vec<Room>>, ErrorResponse> {
    let uid = match user.resolve()? {
        Some(user) => user.0.id,
        None => return Ok(Json(Vec::new())),
    };

    let room_list = conn
        .run(move |c| {
            use schema::rooms::dsl::*;
            rooms
                .filter(user_id.eq(uid))
                .order(name.asc())
                .load::<Room>(c)
                .map_err(|_| {
                    ErrorResponse::new(Status { code: 500 }, "Couldn't load rooms".to_string())
                })
        })
        .await?;

    Ok(Json(room_list))
}
