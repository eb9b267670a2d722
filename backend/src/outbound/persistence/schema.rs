//! Diesel table definitions mirroring `backend/migrations`.

diesel::table! {
    users (id) {
        id -> Uuid,
        email -> Text,
        #[max_length = 64]
        username -> Varchar,
        #[max_length = 255]
        password_hash -> Varchar,
        #[max_length = 16]
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    products (id) {
        id -> Uuid,
        name -> Text,
        description -> Text,
        price -> Numeric,
        stock -> Int4,
        category -> Nullable<Text>,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    images (id) {
        id -> Uuid,
        url -> Text,
        product_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    product_likes (user_id, product_id) {
        user_id -> Uuid,
        product_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(images -> products (product_id));
diesel::joinable!(product_likes -> products (product_id));
diesel::joinable!(product_likes -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(images, product_likes, products, users);
