//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is unique.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Text,
        /// `admin` or `user`.
        role -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue entries. Prices are minor units.
    products (id) {
        id -> Uuid,
        name -> Varchar,
        price -> Int8,
        description -> Varchar,
        image -> Text,
        category -> Varchar,
        company -> Varchar,
        colors -> Array<Text>,
        featured -> Bool,
        free_shipping -> Bool,
        inventory -> Nullable<Int4>,
        /// Derived; written only by rating recomputation.
        average_rating -> Int4,
        /// Derived; written only by rating recomputation.
        num_of_reviews -> Int4,
        user_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Product reviews; unique on `(product_id, user_id)`.
    reviews (id) {
        id -> Uuid,
        rating -> Int2,
        title -> Varchar,
        comment -> Text,
        user_id -> Uuid,
        product_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Orders; `items` holds the product snapshots as JSON.
    orders (id) {
        id -> Uuid,
        user_id -> Uuid,
        items -> Jsonb,
        tax -> Int8,
        shipping_fee -> Int8,
        subtotal -> Int8,
        total -> Int8,
        status -> Varchar,
        client_secret -> Text,
        payment_intent_id -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(products -> users (user_id));
diesel::joinable!(reviews -> products (product_id));
diesel::joinable!(orders -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, products, reviews, orders);
