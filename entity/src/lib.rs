use uuid::Uuid;

pub mod prelude;

// Accounts and approvals
pub mod approval_status;
pub mod global_role;
pub mod roles;
pub mod user_roles;
pub mod users;

// League reference data
pub mod clubs;
pub mod leagues;
pub mod referees;
pub mod teams;

// Competition reference data
pub mod age_group;
pub mod competition_matches;
pub mod competition_pool_teams;
pub mod competition_pools;
pub mod competition_rows;
pub mod competition_seasons;
pub mod gender;

// Match statistics
pub mod stats_events;
pub mod stats_files;
pub mod stats_kind;
pub mod stats_players;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
