//! Business rules of the floorball platform.
//!
//! Items from the `entity` crate are re-exported through `entity_api` so that
//! consumers of `domain` never depend on the lower layers directly.
pub use entity_api::{
    age_group, approval_status, clubs, competition_matches, competition_pool_teams,
    competition_pools, competition_rows, competition_seasons, gender, global_role, leagues,
    referees, roles, stats_events, stats_files, stats_kind, stats_players, teams, user_roles,
    users, Id,
};

pub mod approval;
pub mod competition;
pub mod error;
pub mod filter;
pub mod guest_defaults;
pub mod league;
pub mod preferences;
pub mod registration;
pub mod stats;
pub mod user;
