use super::{location, TestApp};
use crate::schema::items;
use diesel::prelude::*;
use rocket::http::Status;
use serde_json::Value;

fn stored_item(app: &TestApp, item_id: i64) -> Option<(String, Option<String>, Option<String>)> {
    items::table
        .find(item_id as i32)
        .select((items::name, items::description, items::price))
        .first(&mut app.db())
        .optional()
        .expect("query item")
}

#[test]
fn add_and_view_item() {
    let app = TestApp::new();
    app.login_as("alice");
    let room_id = app.add_room("Living");

    let response = app.post_form(
        &format!("/room/{}/items/add", room_id),
        "name=TV&description=Samsung%204k&price=%24%201000",
    );
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(
        location(&response),
        Some(format!("/room/{}/items", room_id))
    );

    let view = app.get_json(&format!("/room/{}/items", room_id));
    let item_id = view["items"][0]["id"].as_i64().expect("item id");

    let item = app.get_json(&format!("/room/{}/items/{}", room_id, item_id));
    assert_eq!(item["name"], "TV");
    assert_eq!(item["description"], "Samsung 4k");
    assert_eq!(item["price"], "$ 1000");
    assert_eq!(item["room_id"].as_i64(), Some(room_id));
}

#[test]
fn item_form_is_validated() {
    let app = TestApp::new();
    app.login_as("alice");
    let room_id = app.add_room("Living");
    let uri = format!("/room/{}/items/add", room_id);

    let response = app.post_form(&uri, "name=&price=1");
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().expect("error body");
    assert_eq!(body["err"], "You must fill in item's name");

    let response = app.post_form(&uri, "name=Sofa&price=123456789");
    assert_eq!(response.status(), Status::UnprocessableEntity);

    let count: i64 = items::table
        .count()
        .get_result(&mut app.db())
        .expect("count items");
    assert_eq!(count, 0);
}

#[test]
fn item_must_belong_to_room() {
    let app = TestApp::new();
    app.login_as("alice");
    let living = app.add_room("Living");
    let bedroom = app.add_room("Bedroom");
    let lamp = app.add_item(bedroom, "Lamp");

    let response = app
        .client
        .get(format!("/room/{}/items/{}", living, lamp))
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().expect("error body");
    assert_eq!(
        body["err"],
        format!(
            "Lamp (item-id: {}) does not belong to Living (room-id: {})",
            lamp, living
        )
    );

    let response = app
        .client
        .get(format!("/room/{}/items/999", living))
        .dispatch();
    assert_eq!(response.status(), Status::NotFound);
}

#[test]
fn edit_item_replaces_fields() {
    let app = TestApp::new();
    app.login_as("alice");
    let room_id = app.add_room("Living");
    let item_id = app.add_item(room_id, "Couch");

    let response = app.post_form(
        &format!("/room/{}/items/{}/edit", room_id, item_id),
        "name=Sofa&price=%24%20800",
    );
    assert_eq!(response.status(), Status::SeeOther);

    assert_eq!(
        stored_item(&app, item_id),
        Some(("Sofa".to_string(), None, Some("$ 800".to_string())))
    );
}

#[test]
fn delete_item_after_confirmation() {
    let app = TestApp::new();
    app.login_as("alice");
    let room_id = app.add_room("Bath");
    let item_id = app.add_item(room_id, "Mirror");
    let uri = format!("/room/{}/items/{}/delete", room_id, item_id);

    let view = app.get_json(&uri);
    assert_eq!(view["name"], "Mirror");

    let response = app.client.get(format!("{}?delete=false", uri)).dispatch();
    assert_eq!(response.status(), Status::SeeOther);
    assert!(stored_item(&app, item_id).is_some());

    let response = app.client.get(format!("{}?delete=true", uri)).dispatch();
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(
        location(&response),
        Some(format!("/room/{}/items", room_id))
    );
    assert_eq!(stored_item(&app, item_id), None);
}

#[test]
fn other_users_cannot_touch_items() {
    let app = TestApp::new();
    app.login_as("alice");
    let room_id = app.add_room("Kitchen");
    let item_id = app.add_item(room_id, "Stove");
    app.logout();

    app.login_as("bob");

    let response = app.post_form(&format!("/room/{}/items/add", room_id), "name=Fridge");
    assert_eq!(response.status(), Status::Forbidden);
    let body: Value = response.into_json().expect("error body");
    assert_eq!(body["err"], "You do not have permission to add items to this room!");

    let response = app.post_form(
        &format!("/room/{}/items/{}/edit", room_id, item_id),
        "name=Oven",
    );
    assert_eq!(response.status(), Status::Forbidden);

    let response = app
        .client
        .get(format!("/room/{}/items/{}/delete?delete=true", room_id, item_id))
        .dispatch();
    assert_eq!(response.status(), Status::Forbidden);

    let response = app
        .client
        .get(format!("/room/{}/items/{}", room_id, item_id))
        .dispatch();
    assert_eq!(response.status(), Status::Forbidden);

    let count: i64 = items::table
        .count()
        .get_result(&mut app.db())
        .expect("count items");
    assert_eq!(count, 1);
    assert_eq!(
        stored_item(&app, item_id).map(|(name, _, _)| name).as_deref(),
        Some("Stove")
    );
}

#[test]
fn item_name_limit_counts_characters() {
    let app = TestApp::new();
    app.login_as("alice");
    let room_id = app.add_room("Living");
    let uri = format!("/room/{}/items/add", room_id);

    // 80 two-byte characters
    let response = app.post_form(&uri, &format!("name={}", "%C3%A9".repeat(80)));
    assert_eq!(response.status(), Status::SeeOther);

    let response = app.post_form(&uri, &format!("name={}", "%C3%A9".repeat(81)));
    assert_eq!(response.status(), Status::UnprocessableEntity);

    let names: Vec<String> = items::table
        .select(items::name)
        .load(&mut app.db())
        .expect("item names");
    assert_eq!(names, vec!["é".repeat(80)]);
}

#[test]
fn invalid_item_edit_leaves_item_unchanged() {
    let app = TestApp::new();
    app.login_as("alice");
    let room_id = app.add_room("Living");
    let item_id = app.add_item(room_id, "Sofa");

    let response = app.post_form(
        &format!("/room/{}/items/{}/edit", room_id, item_id),
        &format!("name={}&price=1", "x".repeat(81)),
    );
    assert_eq!(response.status(), Status::UnprocessableEntity);

    let (name, _, _) = stored_item(&app, item_id).expect("item still stored");
    assert_eq!(name, "Sofa");
}
