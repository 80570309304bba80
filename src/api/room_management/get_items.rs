use crate::api::access::owned_room;
use crate::api::item_management::models::Item;
use crate::api::room_management::models::Room;
use crate::api::user_management::sessions::CurrentUser;
use crate::db::DbConn;
use crate::error::{ErrorResponse, RouteError};
use crate::schema;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::serde::json::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct RoomItemsOut {
    pub room: Room,
    pub items: Vec<Item>,
}

#[get("/room/<room_id>/items")]
pub(crate) async fn get_items(
    room_id: i32,
    user: CurrentUser,
    conn: DbConn,
) -> Result<Json<RoomItemsOut>, RouteError> {
    let (room, _) = owned_room(&conn, room_id, user, "view items in this room").await?;

    let rid = room.id;
    let item_list = conn
        .run(move |c| {
            schema::items::table
                .filter(schema::items::room_id.eq(rid))
                .load::<Item>(c)
        })
        .await
        .map_err(|_| ErrorResponse::new(Status { code: 500 }, "Couldn't load items".to_string()))?;

    Ok(Json(RoomItemsOut {
        room,
        items: item_list,
    }))
}
