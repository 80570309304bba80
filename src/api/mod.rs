pub(crate) mod access;
pub(crate) mod export;
pub(crate) mod item_management;
pub(crate) mod room_management;
pub(crate) mod user_management;

use rocket::Route;

pub(crate) fn routes() -> Vec<Route> {
    routes![
        room_management::list::index,
        room_management::list::list_rooms,
        room_management::list::list_rooms_slash,
        room_management::create::create_room,
        room_management::edit::edit_room,
        room_management::delete::delete_room,
        room_management::get_items::get_items,
        item_management::get_item::get_item,
        item_management::create::create_item,
        item_management::edit::edit_item,
        item_management::delete::delete_item,
        user_management::login::login,
        user_management::login::login_slash,
        user_management::login::connect,
        user_management::logout::logout,
        user_management::logout::logout_slash,
        user_management::check_login::check_login,
        user_management::check_login::check_login_unauthorised,
        export::export,
    ]
}
