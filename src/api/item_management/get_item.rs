use crate::api::access::owned_item;
use crate::api::item_management::models::Item;
use crate::api::user_management::sessions::CurrentUser;
use crate::db::DbConn;
use crate::error::RouteError;
use rocket::serde::json::Json;

#[get("/room/<room_id>/items/<item_id>")]
pub(crate) async fn get_item(
    room_id: i32,
    item_id: i32,
    user: CurrentUser,
    conn: DbConn,
) -> Result<Json<Item>, RouteError> {
    let (_, item, _) = owned_item(&conn, room_id, item_id, user, "view items in this room").await?;

    Ok(Json(item))
}
