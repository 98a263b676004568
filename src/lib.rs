//! # Civica
//!
//! A civic official directory aggregation and ranking engine.
//!
//! Civica resolves a caller-supplied location, queries multiple heterogeneous
//! officeholder directories, normalizes their records into one schema, and
//! produces a deterministically ranked, jurisdiction-bucketed roster of the
//! elected officials covering that location.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌───────────────────┐
//! │   Location   │    │ Directory client  │──┐
//! │   Resolver   │    │ (cursor paging)   │  │
//! └──────┬───────┘    └───────────────────┘  │   ┌───────────┐   ┌─────────┐
//!        │            ┌───────────────────┐  ├──▶│ Normalize │──▶│ Rank &  │
//!        └───────────▶│  Roster client    │──┘   │ +Locality │   │ Bucket  │
//!                     │ (state dump)      │      └───────────┘   └────┬────┘
//!                     └───────────────────┘                          │
//!                                              ┌──────────┐    ┌─────▼────┐
//!                                              │   CLI    │    │   HTTP   │
//!                                              │ (civica) │    │ serve    │
//!                                              └──────────┘    └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! civica providers                  # check which credentials are configured
//! civica lookup --zip 94105         # officials for a zip code
//! civica lookup --address "1 Main St, Springfield, IL" --json
//! civica serve                      # start the HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and credentials |
//! | [`models`] | Canonical location and officeholder types |
//! | [`error`] | Lookup error taxonomy |
//! | [`geocode`] | Location resolution with state-code fallback |
//! | [`provider_cursor`] | Cursor-paginated directory client |
//! | [`provider_state`] | State-dump roster client |
//! | [`normalize`] | Provider record → common schema mapping |
//! | [`locality`] | Sub-state locality matching heuristic |
//! | [`ranking`] | Priority/group rule tables and bucketing |
//! | [`aggregate`] | Per-request orchestration |
//! | [`server`] | HTTP API |

pub mod aggregate;
pub mod config;
pub mod error;
pub mod geocode;
pub mod locality;
pub mod models;
pub mod normalize;
pub mod provider_cursor;
pub mod provider_state;
pub mod providers;
pub mod ranking;
pub mod server;
