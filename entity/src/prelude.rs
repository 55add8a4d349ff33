pub use super::clubs::Entity as Clubs;
pub use super::competition_matches::Entity as CompetitionMatches;
pub use super::competition_pool_teams::Entity as CompetitionPoolTeams;
pub use super::competition_pools::Entity as CompetitionPools;
pub use super::competition_rows::Entity as CompetitionRows;
pub use super::competition_seasons::Entity as CompetitionSeasons;
pub use super::leagues::Entity as Leagues;
pub use super::referees::Entity as Referees;
pub use super::stats_events::Entity as StatsEvents;
pub use super::stats_files::Entity as StatsFiles;
pub use super::stats_players::Entity as StatsPlayers;
pub use super::teams::Entity as Teams;
pub use super::user_roles::Entity as UserRoles;
pub use super::users::Entity as Users;
