use crate::api::access::{owned_item, DeleteChoice};
use crate::api::item_management::models::Item;
use crate::api::user_management::sessions::CurrentUser;
use crate::db::DbConn;
use crate::error::{ErrorResponse, RouteError};
use crate::schema;
use diesel::prelude::*;
use log::info;
use rocket::http::Status;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::Either;

#[get("/room/<room_id>/items/<item_id>/delete?<delete>")]
pub(crate) async fn delete_item(
    room_id: i32,
    item_id: i32,
    delete: Option<&str>,
    user: CurrentUser,
    conn: DbConn,
) -> Result<Either<Json<Item>, Redirect>, RouteError> {
    let (room, item, user) =
        owned_item(&conn, room_id, item_id, user, "delete item in this room").await?;
    let back = Redirect::to(uri!(
        crate::api::room_management::get_items::get_items(room_id)
    ));

    match DeleteChoice::parse(delete)? {
        DeleteChoice::Ask => Ok(Either::Left(Json(item))),
        DeleteChoice::Cancel => Ok(Either::Right(back)),
        DeleteChoice::Confirm => {
            let iid = item.id;
            conn.run(move |c| {
                use schema::items::dsl::*;
                diesel::delete(items.filter(id.eq(iid))).execute(c)
            })
            .await
            .map_err(|_| {
                ErrorResponse::new(
                    Status { code: 500 },
                    "Couldn't delete database entry".to_string(),
                )
            })?;

            info!(
                "User {} removed {} from {}",
                user.0.id, item.name, room.name
            );

            Ok(Either::Right(back))
        }
    }
}
