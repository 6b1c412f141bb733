// Hand-written table definitions rather than generated by
// `diesel print-schema` (no live database available at write time).

diesel::table! {
    markets (id) {
        id -> BigInt,
        venue -> Text,
        external_id -> Text,
        title -> Text,
        category -> Nullable<Text>,
        status -> Text,
        close_time -> Nullable<Timestamptz>,
        derived_topic -> Nullable<Text>,
        metadata -> Jsonb,
        outcomes -> Jsonb,
    }
}

diesel::table! {
    market_links (left_market_id, right_market_id) {
        left_market_id -> BigInt,
        right_market_id -> BigInt,
        left_venue -> Text,
        right_venue -> Text,
        topic -> Text,
        score -> Float4,
        reason -> Text,
        algo_version -> Text,
        status -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    watchlist_items (venue, market_id) {
        venue -> Text,
        market_id -> BigInt,
        priority -> Int2,
        reason -> Text,
    }
}
