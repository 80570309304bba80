use crate::api::access::{owned_room, DeleteChoice};
use crate::api::room_management::models::Room;
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

/// Without `?delete=` this only shows the room that would be removed.
#[get("/room/<room_id>/delete?<delete>")]
pub(crate) async fn delete_room(
    room_id: i32,
    delete: Option<&str>,
    user: CurrentUser,
    conn: DbConn,
) -> Result<Either<Json<Room>, Redirect>, RouteError> {
    let (room, user) = owned_room(&conn, room_id, user, "delete this room").await?;

    match DeleteChoice::parse(delete)? {
        DeleteChoice::Ask => Ok(Either::Left(Json(room))),
        DeleteChoice::Cancel => Ok(Either::Right(Redirect::to(uri!(
            super::get_items::get_items(room_id)
        )))),
        DeleteChoice::Confirm => {
            let rid = room.id;
            // items first, the schema doesn't cascade
            conn.run(move |c| {
                c.transaction::<_, diesel::result::Error, _>(|c| {
                    diesel::delete(schema::items::table)
                        .filter(schema::items::room_id.eq(rid))
                        .execute(c)?;
                    {
                        use schema::rooms::dsl::*;
                        diesel::delete(rooms.filter(id.eq(rid))).execute(c)
                    }?;

                    Ok(())
                })
            })
            .await
            .map_err(|_| {
                ErrorResponse::new(
                    Status { code: 500 },
                    "Couldn't delete database entries".to_string(),
                )
            })?;

            info!("User {} deleted room {} and its items", user.0.id, rid);

            Ok(Either::Right(Redirect::to(uri!(super::list::list_rooms))))
        }
    }
}
