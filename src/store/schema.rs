//! Diesel table definitions for the SQLite schema.
//!
//! Kept in sync with the embedded migrations by hand. Dates are RFC 3339
//! TEXT and odds prices are decimal TEXT; conversion happens in the model
//! layer.

diesel::table! {
    leagues (id) {
        id -> Integer,
        name -> Text,
        country -> Text,
        season -> Text,
        league_type -> Text,
        external_id -> Text,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    teams (id) {
        id -> Integer,
        name -> Text,
        country -> Text,
        league_id -> Integer,
        founded_year -> Nullable<Integer>,
        external_id -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    matches (id) {
        id -> Integer,
        league_id -> Integer,
        home_team_id -> Integer,
        away_team_id -> Integer,
        match_date -> Text,
        status -> Text,
        home_goals -> Nullable<Integer>,
        away_goals -> Nullable<Integer>,
        home_shots -> Nullable<Integer>,
        away_shots -> Nullable<Integer>,
        home_shots_on_target -> Nullable<Integer>,
        away_shots_on_target -> Nullable<Integer>,
        home_possession -> Nullable<Double>,
        away_possession -> Nullable<Double>,
        home_passes -> Nullable<Integer>,
        away_passes -> Nullable<Integer>,
        home_pass_accuracy -> Nullable<Double>,
        away_pass_accuracy -> Nullable<Double>,
        home_fouls -> Nullable<Integer>,
        away_fouls -> Nullable<Integer>,
        home_yellow_cards -> Nullable<Integer>,
        away_yellow_cards -> Nullable<Integer>,
        home_red_cards -> Nullable<Integer>,
        away_red_cards -> Nullable<Integer>,
        external_id -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    odds (id) {
        id -> Integer,
        match_id -> Integer,
        bookmaker -> Text,
        home_win_odds -> Text,
        draw_odds -> Text,
        away_win_odds -> Text,
        over_2_5_odds -> Nullable<Text>,
        under_2_5_odds -> Nullable<Text>,
        retrieved_at -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    match_stats (id) {
        id -> Integer,
        match_id -> Integer,
        source -> Text,
        payload -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::joinable!(teams -> leagues (league_id));
diesel::joinable!(matches -> leagues (league_id));
diesel::joinable!(odds -> matches (match_id));
diesel::joinable!(match_stats -> matches (match_id));

diesel::allow_tables_to_appear_in_same_query!(leagues, teams, matches, odds, match_stats);
