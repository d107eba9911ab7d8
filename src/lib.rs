//! Scoreline - multi-source football match data aggregation.
//!
//! This crate fetches football (soccer) schedules, results, statistics and
//! betting odds from independent, unreliable external sources and
//! reconciles them into one persisted canonical dataset for a prediction
//! consumer.
//!
//! # Architecture
//!
//! - [`source`] - one adapter per external system (an HTML scrape and two
//!   rate-limited REST APIs, plus the odds API), each owning its own
//!   league mapping, request pacing, and error translation
//! - [`pipeline`] - the reconciliation engine and run orchestration:
//!   entity matching, dedup, merge policy, and partial-failure accounting
//! - [`store`] - Diesel/SQLite persistence behind natural-key lookups
//! - [`domain`] - canonical entities, raw per-source records, summaries
//! - [`config`] - TOML configuration with environment-supplied API keys
//! - [`error`] - the error taxonomy shared by all of the above
//!
//! # Example
//!
//! ```no_run
//! use scoreline::pipeline::Pipeline;
//! use scoreline::store::Store;
//!
//! # async fn run() -> scoreline::error::Result<()> {
//! let store = Store::open("scoreline.db")?;
//! let pipeline = Pipeline::new(store);
//!
//! let season = "2023-24".parse().expect("valid season");
//! let summary = pipeline
//!     .run_full_pipeline(scoreline::domain::LeagueCode::Epl, &season, true)
//!     .await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod store;
