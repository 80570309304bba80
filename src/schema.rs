table! {
    items (id) {
        id -> Integer,
        name -> Text,
        description -> Nullable<Text>,
        price -> Nullable<Text>,
        room_id -> Integer,
        user_id -> Integer,
    }
}

table! {
    rooms (id) {
        id -> Integer,
        name -> Text,
        user_id -> Integer,
    }
}

table! {
    users (id) {
        id -> Integer,
        name -> Text,
        email -> Text,
        picture -> Nullable<Text>,
    }
}

joinable!(items -> rooms (room_id));
joinable!(rooms -> users (user_id));

allow_tables_to_appear_in_same_query!(
    items,
    rooms,
    users,
);
