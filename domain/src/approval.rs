//! The approval gate: who may decide which role membership.
//!
//! Every role names the role that approves it, forming two chains below
//! `admin`:
//!
//! ```text
//! admin -> tournament_admin -> club_leader -> team_leader -> player, supporter
//!                                         \-> secretariat
//! admin -> ref_admin -> referee
//! ```
//!
//! An actor may decide a pending membership when one of its approved
//! memberships is the target's approver or an ancestor of it, and covers the
//! target: club and team leader authority only reaches their own club or team.
use crate::error::Error;
use crate::{
    approval_status::ApprovalStatus, global_role::GlobalRole, roles::Role, user_roles, users, Id,
};
use chrono::Utc;
use entity_api::{team, user, user_role};
use log::*;
use sea_orm::{DatabaseConnection, Iterable, TransactionTrait};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// The role that approves memberships of `role`. Admin memberships are only granted.
pub fn approver_of(role: Role) -> Option<Role> {
    match role {
        Role::Admin => None,
        Role::TournamentAdmin | Role::RefAdmin => Some(Role::Admin),
        Role::ClubLeader => Some(Role::TournamentAdmin),
        Role::Referee => Some(Role::RefAdmin),
        Role::TeamLeader | Role::Secretariat => Some(Role::ClubLeader),
        Role::Player | Role::Supporter => Some(Role::TeamLeader),
    }
}

/// Memberships a club or team leader decides wait in `PendingLeader`, the rest in `PendingAdmin`.
pub fn pending_status_for(role: Role) -> ApprovalStatus {
    match approver_of(role) {
        Some(Role::ClubLeader) | Some(Role::TeamLeader) => ApprovalStatus::PendingLeader,
        _ => ApprovalStatus::PendingAdmin,
    }
}

/// Whether `actor` is `required` or one of its ancestors along the approver chain.
pub fn dominates(actor: Role, required: Role) -> bool {
    let mut current = Some(required);
    while let Some(role) = current {
        if role == actor {
            return true;
        }
        current = approver_of(role);
    }
    false
}

/// An approved membership seen as the power to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authority {
    pub role: Role,
    pub club_id: Option<Id>,
    pub team_id: Option<Id>,
}

impl Authority {
    fn covers(&self, target: &Target) -> bool {
        match self.role {
            Role::Admin | Role::TournamentAdmin | Role::RefAdmin => true,
            Role::ClubLeader => self.club_id.is_some() && self.club_id == target.club_id,
            Role::TeamLeader => self.team_id.is_some() && self.team_id == target.team_id,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Id,
    pub authorities: Vec<Authority>,
}

impl Actor {
    /// Authority of a user: its approved memberships, plus admin for global admins.
    pub fn from_user(user: &users::Model) -> Self {
        let mut authorities: Vec<Authority> = user
            .roles
            .iter()
            .filter(|membership| membership.status == ApprovalStatus::Approved)
            .map(|membership| Authority {
                role: membership.role,
                club_id: membership.club_id,
                team_id: membership.team_id,
            })
            .collect();

        if user.global_role == GlobalRole::Admin {
            authorities.push(Authority {
                role: Role::Admin,
                club_id: None,
                team_id: None,
            });
        }

        Actor {
            user_id: user.id,
            authorities,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.authorities.iter().any(|a| a.role == Role::Admin)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.authorities.iter().any(|a| a.role == role)
    }

    /// Roles whose memberships this actor can decide somewhere.
    pub fn decidable_roles(&self) -> Vec<Role> {
        Role::iter()
            .filter(|role| {
                approver_of(*role).is_some_and(|required| {
                    self.authorities
                        .iter()
                        .any(|authority| dominates(authority.role, required))
                })
            })
            .collect()
    }
}

/// The membership being decided, with the club it belongs to resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub user_id: Id,
    pub role: Role,
    pub status: ApprovalStatus,
    /// The membership's club, or the club owning its team
    pub club_id: Option<Id>,
    pub team_id: Option<Id>,
}

impl Target {
    pub fn new(membership: &user_roles::Model, team_club_id: Option<Id>) -> Self {
        Target {
            user_id: membership.user_id,
            role: membership.role,
            status: membership.status,
            club_id: membership.club_id.or(team_club_id),
            team_id: membership.team_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalError {
    /// Nobody may decide it, or not this actor
    Forbidden,
    /// Already decided or withdrawn
    NotPending,
}

impl From<ApprovalError> for Error {
    fn from(err: ApprovalError) -> Self {
        match err {
            ApprovalError::Forbidden => Error::forbidden(),
            ApprovalError::NotPending => Error::conflict("Membership is no longer pending"),
        }
    }
}

/// The status a decision moves `target` to, if `actor` may make it.
pub fn authorize_decision(
    actor: &Actor,
    target: &Target,
    approve: bool,
) -> Result<ApprovalStatus, ApprovalError> {
    if actor.user_id == target.user_id {
        return Err(ApprovalError::Forbidden);
    }

    let required = approver_of(target.role).ok_or(ApprovalError::Forbidden)?;
    let authorized = actor
        .authorities
        .iter()
        .any(|authority| dominates(authority.role, required) && authority.covers(target));
    if !authorized {
        return Err(ApprovalError::Forbidden);
    }

    if !target.status.is_pending() {
        return Err(ApprovalError::NotPending);
    }

    Ok(if approve {
        ApprovalStatus::Approved
    } else {
        ApprovalStatus::Rejected
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Requester {
    #[schema(value_type = Uuid)]
    pub id: Id,
    pub email: String,
    pub username: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PendingMembership {
    pub membership: user_roles::Model,
    pub requested_by: Option<Requester>,
}

async fn target_of(
    db: &DatabaseConnection,
    membership: &user_roles::Model,
) -> Result<Target, Error> {
    let team_club_id = match (membership.club_id, membership.team_id) {
        (None, Some(team_id)) => team::find_by_id(db, team_id).await?.club_id,
        _ => None,
    };
    Ok(Target::new(membership, team_club_id))
}

/// Approves or rejects a pending membership on behalf of `actor`.
pub async fn decide(
    db: &DatabaseConnection,
    actor: &users::Model,
    membership_id: Id,
    approve: bool,
) -> Result<user_roles::Model, Error> {
    let membership = user_role::find_by_id(db, membership_id).await?;
    let target = target_of(db, &membership).await?;
    let next = authorize_decision(&Actor::from_user(actor), &target, approve)?;

    let txn = db.begin().await?;
    // Only succeeds while the row still holds the status read above
    let decided =
        user_role::transition_status(&txn, membership.id, membership.status, next, Some(actor.id))
            .await?;
    if next == ApprovalStatus::Approved {
        user::promote_global_role(
            &txn,
            membership.user_id,
            GlobalRole::SuperuserPending,
            GlobalRole::Member,
        )
        .await?;
    }
    txn.commit().await?;

    info!(
        "User {} moved {} membership {} to {next}",
        actor.id, decided.role, decided.id
    );
    Ok(decided)
}

/// Every pending membership `actor` may decide, newest first, optionally
/// narrowed to one club.
pub async fn pending_for(
    db: &DatabaseConnection,
    actor: &users::Model,
    club_id: Option<Id>,
) -> Result<Vec<PendingMembership>, Error> {
    let authority = Actor::from_user(actor);
    let pending = user_role::find_pending_by_roles(db, authority.decidable_roles()).await?;

    let team_ids: Vec<Id> = pending
        .iter()
        .filter(|membership| membership.club_id.is_none())
        .filter_map(|membership| membership.team_id)
        .collect();
    let team_clubs: HashMap<Id, Option<Id>> = team::find_by_ids(db, team_ids)
        .await?
        .into_iter()
        .map(|team| (team.id, team.club_id))
        .collect();

    let decidable: Vec<user_roles::Model> = pending
        .into_iter()
        .filter(|membership| {
            let team_club_id = membership
                .team_id
                .and_then(|id| team_clubs.get(&id).copied().flatten());
            let target = Target::new(membership, team_club_id);
            authorize_decision(&authority, &target, true).is_ok()
                && club_id.map_or(true, |club_id| target.club_id == Some(club_id))
        })
        .collect();

    let requesters: HashMap<Id, Requester> = user::find_by_ids(
        db,
        decidable.iter().map(|membership| membership.user_id).collect(),
    )
    .await?
    .into_iter()
    .map(|user| {
        (
            user.id,
            Requester {
                id: user.id,
                email: user.email,
                username: user.username,
                name: user.name,
            },
        )
    })
    .collect();

    Ok(decidable
        .into_iter()
        .map(|membership| PendingMembership {
            requested_by: requesters.get(&membership.user_id).cloned(),
            membership,
        })
        .collect())
}

/// Lets the owner pull back a membership that has not been decided yet.
pub async fn withdraw(
    db: &DatabaseConnection,
    owner: &users::Model,
    membership_id: Id,
) -> Result<user_roles::Model, Error> {
    let membership = user_role::find_by_id(db, membership_id).await?;
    if membership.user_id != owner.id {
        return Err(Error::forbidden());
    }
    if !membership.status.is_pending() {
        return Err(ApprovalError::NotPending.into());
    }

    Ok(user_role::transition_status(
        db,
        membership.id,
        membership.status,
        ApprovalStatus::Withdrawn,
        None,
    )
    .await?)
}

/// Deletes a membership outright. Admins only.
pub async fn remove(
    db: &DatabaseConnection,
    actor: &users::Model,
    membership_id: Id,
) -> Result<(), Error> {
    if !Actor::from_user(actor).is_admin() {
        return Err(Error::forbidden());
    }

    let membership = user_role::find_by_id(db, membership_id).await?;
    if membership.user_id == actor.id && membership.role == Role::Admin {
        return Err(Error::conflict(
            "An admin cannot remove their own admin membership",
        ));
    }

    user_role::delete_by_id(db, membership.id).await?;
    warn!(
        "Admin {} removed {} membership {} of user {}",
        actor.id, membership.role, membership.id, membership.user_id
    );
    Ok(())
}

/// Gives a user an already approved tournament admin or referee admin membership.
pub async fn grant(
    db: &DatabaseConnection,
    actor: &users::Model,
    user_id: Id,
    role: Role,
) -> Result<user_roles::Model, Error> {
    if !Actor::from_user(actor).is_admin() {
        return Err(Error::forbidden());
    }
    if !matches!(role, Role::TournamentAdmin | Role::RefAdmin) {
        return Err(Error::invalid(format!("{role} cannot be granted")));
    }

    let grantee = user::find_by_id(db, user_id).await?;
    let scope_key = crate::registration::GLOBAL_SCOPE;
    if user_role::find_live(db, grantee.id, role, scope_key)
        .await?
        .is_some()
    {
        return Err(Error::conflict(format!("User already holds {role}")));
    }

    let now = Utc::now();
    let txn = db.begin().await?;
    let granted = user_role::create(
        &txn,
        user_roles::Model {
            id: Id::nil(),
            user_id: grantee.id,
            role,
            status: ApprovalStatus::Approved,
            club_id: None,
            team_id: None,
            referee_id: None,
            club_leader_title: None,
            scope_key: scope_key.to_owned(),
            decided_by_id: Some(actor.id),
            decided_at: Some(now.into()),
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await?;
    user::promote_global_role(
        &txn,
        grantee.id,
        GlobalRole::SuperuserPending,
        GlobalRole::Member,
    )
    .await?;
    txn.commit().await?;

    info!("Admin {} granted {role} to user {}", actor.id, grantee.id);
    Ok(granted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(authorities: &[(Role, Option<Id>, Option<Id>)]) -> Actor {
        Actor {
            user_id: Id::new_v4(),
            authorities: authorities
                .iter()
                .map(|(role, club_id, team_id)| Authority {
                    role: *role,
                    club_id: *club_id,
                    team_id: *team_id,
                })
                .collect(),
        }
    }

    fn target(role: Role, club_id: Option<Id>, team_id: Option<Id>) -> Target {
        Target {
            user_id: Id::new_v4(),
            role,
            status: pending_status_for(role),
            club_id,
            team_id,
        }
    }

    #[test]
    fn every_role_but_admin_has_an_approver() {
        assert_eq!(approver_of(Role::Admin), None);
        assert_eq!(approver_of(Role::TournamentAdmin), Some(Role::Admin));
        assert_eq!(approver_of(Role::RefAdmin), Some(Role::Admin));
        assert_eq!(approver_of(Role::ClubLeader), Some(Role::TournamentAdmin));
        assert_eq!(approver_of(Role::Referee), Some(Role::RefAdmin));
        assert_eq!(approver_of(Role::TeamLeader), Some(Role::ClubLeader));
        assert_eq!(approver_of(Role::Secretariat), Some(Role::ClubLeader));
        assert_eq!(approver_of(Role::Player), Some(Role::TeamLeader));
        assert_eq!(approver_of(Role::Supporter), Some(Role::TeamLeader));
    }

    #[test]
    fn leader_approved_roles_wait_for_a_leader() {
        assert_eq!(pending_status_for(Role::TeamLeader), ApprovalStatus::PendingLeader);
        assert_eq!(pending_status_for(Role::Secretariat), ApprovalStatus::PendingLeader);
        assert_eq!(pending_status_for(Role::Player), ApprovalStatus::PendingLeader);
        assert_eq!(pending_status_for(Role::ClubLeader), ApprovalStatus::PendingAdmin);
        assert_eq!(pending_status_for(Role::Referee), ApprovalStatus::PendingAdmin);
        assert_eq!(pending_status_for(Role::RefAdmin), ApprovalStatus::PendingAdmin);
    }

    #[test]
    fn dominance_follows_the_approver_chain() {
        assert!(dominates(Role::Admin, Role::TeamLeader));
        assert!(dominates(Role::TournamentAdmin, Role::ClubLeader));
        assert!(dominates(Role::TournamentAdmin, Role::TeamLeader));
        assert!(dominates(Role::ClubLeader, Role::ClubLeader));
        assert!(dominates(Role::RefAdmin, Role::RefAdmin));
        assert!(!dominates(Role::RefAdmin, Role::ClubLeader));
        assert!(!dominates(Role::TournamentAdmin, Role::RefAdmin));
        assert!(!dominates(Role::TeamLeader, Role::ClubLeader));
        assert!(!dominates(Role::Referee, Role::TeamLeader));
    }

    #[test]
    fn admin_decides_admin_tier_requests() {
        let admin = actor(&[(Role::Admin, None, None)]);

        assert_eq!(
            authorize_decision(&admin, &target(Role::TournamentAdmin, None, None), true),
            Ok(ApprovalStatus::Approved)
        );
        assert_eq!(
            authorize_decision(&admin, &target(Role::RefAdmin, None, None), false),
            Ok(ApprovalStatus::Rejected)
        );
    }

    #[test]
    fn tournament_admin_approves_club_leaders_but_not_referees() {
        let tournament_admin = actor(&[(Role::TournamentAdmin, None, None)]);
        let club_id = Some(Id::new_v4());

        assert!(
            authorize_decision(&tournament_admin, &target(Role::ClubLeader, club_id, None), true)
                .is_ok()
        );
        assert_eq!(
            authorize_decision(&tournament_admin, &target(Role::Referee, None, None), true),
            Err(ApprovalError::Forbidden)
        );
    }

    #[test]
    fn ref_admin_approves_referees_only() {
        let ref_admin = actor(&[(Role::RefAdmin, None, None)]);

        assert!(authorize_decision(&ref_admin, &target(Role::Referee, None, None), true).is_ok());
        assert_eq!(
            authorize_decision(&ref_admin, &target(Role::ClubLeader, None, None), true),
            Err(ApprovalError::Forbidden)
        );
    }

    #[test]
    fn club_leader_authority_stops_at_the_club() {
        let own_club = Id::new_v4();
        let other_club = Id::new_v4();
        let leader = actor(&[(Role::ClubLeader, Some(own_club), None)]);

        assert!(authorize_decision(
            &leader,
            &target(Role::TeamLeader, Some(own_club), Some(Id::new_v4())),
            true
        )
        .is_ok());
        assert!(
            authorize_decision(&leader, &target(Role::Secretariat, Some(own_club), None), true)
                .is_ok()
        );
        assert_eq!(
            authorize_decision(
                &leader,
                &target(Role::TeamLeader, Some(other_club), Some(Id::new_v4())),
                true
            ),
            Err(ApprovalError::Forbidden)
        );
        // A club leader cannot approve another club leader
        assert_eq!(
            authorize_decision(&leader, &target(Role::ClubLeader, Some(own_club), None), true),
            Err(ApprovalError::Forbidden)
        );
    }

    #[test]
    fn club_leaders_reach_players_of_their_club_teams() {
        let club = Id::new_v4();
        let leader = actor(&[(Role::ClubLeader, Some(club), None)]);

        assert!(authorize_decision(
            &leader,
            &target(Role::Player, Some(club), Some(Id::new_v4())),
            true
        )
        .is_ok());
    }

    #[test]
    fn team_leader_authority_stops_at_the_team() {
        let team = Id::new_v4();
        let leader = actor(&[(Role::TeamLeader, None, Some(team))]);

        assert!(
            authorize_decision(&leader, &target(Role::Supporter, None, Some(team)), true).is_ok()
        );
        assert_eq!(
            authorize_decision(
                &leader,
                &target(Role::Player, None, Some(Id::new_v4())),
                true
            ),
            Err(ApprovalError::Forbidden)
        );
        assert_eq!(
            authorize_decision(&leader, &target(Role::TeamLeader, None, Some(team)), true),
            Err(ApprovalError::Forbidden)
        );
    }

    #[test]
    fn decided_memberships_are_a_conflict() {
        let admin = actor(&[(Role::Admin, None, None)]);
        for status in [
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
            ApprovalStatus::Withdrawn,
        ] {
            let mut decided = target(Role::RefAdmin, None, None);
            decided.status = status;
            assert_eq!(
                authorize_decision(&admin, &decided, true),
                Err(ApprovalError::NotPending)
            );
        }
    }

    #[test]
    fn nobody_decides_their_own_membership() {
        let admin = actor(&[(Role::Admin, None, None)]);
        let mut own = target(Role::RefAdmin, None, None);
        own.user_id = admin.user_id;

        assert_eq!(
            authorize_decision(&admin, &own, true),
            Err(ApprovalError::Forbidden)
        );
    }

    #[test]
    fn admin_memberships_cannot_be_decided() {
        let admin = actor(&[(Role::Admin, None, None)]);
        assert_eq!(
            authorize_decision(&admin, &target(Role::Admin, None, None), true),
            Err(ApprovalError::Forbidden)
        );
    }

    #[test]
    fn actors_without_authority_decide_nothing() {
        let player = actor(&[(Role::Player, None, Some(Id::new_v4()))]);
        assert!(player.decidable_roles().is_empty());

        let club_leader = actor(&[(Role::ClubLeader, Some(Id::new_v4()), None)]);
        assert_eq!(
            club_leader.decidable_roles(),
            vec![
                Role::TeamLeader,
                Role::Secretariat,
                Role::Player,
                Role::Supporter
            ]
        );
    }

    #[test]
    fn only_approved_memberships_give_authority() {
        let now = Utc::now();
        let user_id = Id::new_v4();
        let membership = |role: Role, status: ApprovalStatus| user_roles::Model {
            id: Id::new_v4(),
            user_id,
            role,
            status,
            club_id: None,
            team_id: None,
            referee_id: None,
            club_leader_title: None,
            scope_key: "global".to_owned(),
            decided_by_id: None,
            decided_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        };
        let user = users::Model {
            id: user_id,
            email: "ta@floorball.dk".to_owned(),
            username: "ta".to_owned(),
            name: None,
            password: String::new(),
            global_role: GlobalRole::Member,
            created_at: now.into(),
            updated_at: now.into(),
            roles: vec![
                membership(Role::TournamentAdmin, ApprovalStatus::Approved),
                membership(Role::RefAdmin, ApprovalStatus::PendingAdmin),
            ],
        };

        let actor = Actor::from_user(&user);
        assert!(actor.has_role(Role::TournamentAdmin));
        assert!(!actor.has_role(Role::RefAdmin));
        assert!(!actor.is_admin());
    }

    #[test]
    fn global_admins_hold_admin_authority() {
        let now = Utc::now();
        let user = users::Model {
            id: Id::new_v4(),
            email: "admin@floorball.dk".to_owned(),
            username: "admin".to_owned(),
            name: None,
            password: String::new(),
            global_role: GlobalRole::Admin,
            created_at: now.into(),
            updated_at: now.into(),
            roles: vec![],
        };

        assert!(Actor::from_user(&user).is_admin());
    }
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::error::{DomainErrorKind, EntityErrorKind, InternalErrorKind, RequestErrorKind};
    use crate::teams;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn user(global_role: GlobalRole, roles: Vec<user_roles::Model>) -> users::Model {
        let now = Utc::now();
        let id = roles.first().map_or_else(Id::new_v4, |membership| membership.user_id);
        users::Model {
            id,
            email: format!("{id}@floorball.dk"),
            username: id.to_string(),
            name: None,
            password: String::new(),
            global_role,
            created_at: now.into(),
            updated_at: now.into(),
            roles,
        }
    }

    fn membership(
        user_id: Id,
        role: Role,
        status: ApprovalStatus,
        club_id: Option<Id>,
        team_id: Option<Id>,
    ) -> user_roles::Model {
        let now = Utc::now();
        user_roles::Model {
            id: Id::new_v4(),
            user_id,
            role,
            status,
            club_id,
            team_id,
            referee_id: None,
            club_leader_title: None,
            scope_key: match (club_id, team_id) {
                (_, Some(team_id)) => format!("team:{team_id}"),
                (Some(club_id), None) => format!("club:{club_id}"),
                (None, None) => crate::registration::GLOBAL_SCOPE.to_owned(),
            },
            decided_by_id: None,
            decided_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn team(id: Id, club_id: Id) -> teams::Model {
        let now = Utc::now();
        teams::Model {
            id,
            league_id: Id::new_v4(),
            club_id: Some(club_id),
            name: "Alliancen København".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn rows_affected(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn tournament_admin() -> users::Model {
        let id = Id::new_v4();
        user(
            GlobalRole::Member,
            vec![membership(id, Role::TournamentAdmin, ApprovalStatus::Approved, None, None)],
        )
    }

    fn admin() -> users::Model {
        user(GlobalRole::Admin, vec![])
    }

    fn kind_of(err: Error) -> DomainErrorKind {
        err.error_kind
    }

    #[tokio::test]
    async fn approving_records_the_decider_and_promotes_in_one_transaction() -> Result<(), Error> {
        let actor = tournament_admin();
        let pending = membership(
            Id::new_v4(),
            Role::ClubLeader,
            ApprovalStatus::PendingAdmin,
            Some(Id::new_v4()),
            None,
        );
        let mut approved = pending.clone();
        approved.status = ApprovalStatus::Approved;
        approved.decided_by_id = Some(actor.id);
        approved.decided_at = Some(Utc::now().into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending.clone()]])
            .append_exec_results([rows_affected(1)])
            .append_query_results([[approved.clone()]])
            .append_exec_results([rows_affected(1)])
            .into_connection();

        let decided = decide(&db, &actor, pending.id, true).await?;
        assert_eq!(decided.status, ApprovalStatus::Approved);
        assert_eq!(decided.decided_by_id, Some(actor.id));
        assert!(decided.decided_at.is_some());

        // The lookup, then status update, re-read and promotion as one transaction
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        let decision = format!("{:?}", log[1]);
        assert!(decision.contains("decided_by_id"));
        assert!(decision.contains("decided_at"));
        assert!(decision.contains(&actor.id.to_string()));
        assert!(decision.contains("global_role"));
        Ok(())
    }

    #[tokio::test]
    async fn rejecting_leaves_the_global_role_alone() -> Result<(), Error> {
        let actor = tournament_admin();
        let pending = membership(
            Id::new_v4(),
            Role::ClubLeader,
            ApprovalStatus::PendingAdmin,
            Some(Id::new_v4()),
            None,
        );
        let mut rejected = pending.clone();
        rejected.status = ApprovalStatus::Rejected;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending.clone()]])
            .append_exec_results([rows_affected(1)])
            .append_query_results([[rejected]])
            .into_connection();

        let decided = decide(&db, &actor, pending.id, false).await?;
        assert_eq!(decided.status, ApprovalStatus::Rejected);

        let log = db.into_transaction_log();
        assert!(!format!("{:?}", log[1]).contains("global_role"));
        Ok(())
    }

    #[tokio::test]
    async fn a_concurrent_decision_is_a_conflict() {
        let actor = tournament_admin();
        let pending = membership(
            Id::new_v4(),
            Role::ClubLeader,
            ApprovalStatus::PendingAdmin,
            Some(Id::new_v4()),
            None,
        );
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending.clone()]])
            .append_exec_results([rows_affected(0)])
            .into_connection();

        let err = decide(&db, &actor, pending.id, true).await.unwrap_err();
        assert_eq!(
            kind_of(err),
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Conflict))
        );
    }

    #[tokio::test]
    async fn team_memberships_are_decided_by_the_club_of_the_team() -> Result<(), Error> {
        let club_id = Id::new_v4();
        let team_id = Id::new_v4();
        let leader_id = Id::new_v4();
        let club_leader = user(
            GlobalRole::Member,
            vec![membership(
                leader_id,
                Role::ClubLeader,
                ApprovalStatus::Approved,
                Some(club_id),
                None,
            )],
        );
        let pending = membership(
            Id::new_v4(),
            Role::Player,
            ApprovalStatus::PendingLeader,
            None,
            Some(team_id),
        );
        let mut approved = pending.clone();
        approved.status = ApprovalStatus::Approved;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending.clone()]])
            .append_query_results([[team(team_id, club_id)]])
            .append_exec_results([rows_affected(1)])
            .append_query_results([[approved]])
            .append_exec_results([rows_affected(0)])
            .into_connection();

        let decided = decide(&db, &club_leader, pending.id, true).await?;
        assert_eq!(decided.status, ApprovalStatus::Approved);
        Ok(())
    }

    #[tokio::test]
    async fn a_leader_of_another_club_may_not_decide() {
        let club_leader = user(
            GlobalRole::Member,
            vec![membership(
                Id::new_v4(),
                Role::ClubLeader,
                ApprovalStatus::Approved,
                Some(Id::new_v4()),
                None,
            )],
        );
        let pending = membership(
            Id::new_v4(),
            Role::TeamLeader,
            ApprovalStatus::PendingLeader,
            Some(Id::new_v4()),
            None,
        );
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending.clone()]])
            .into_connection();

        let err = decide(&db, &club_leader, pending.id, true).await.unwrap_err();
        assert_eq!(
            kind_of(err),
            DomainErrorKind::Request(RequestErrorKind::Forbidden)
        );
        // Nothing was written
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn owners_withdraw_pending_memberships() -> Result<(), Error> {
        let owner = user(GlobalRole::SuperuserPending, vec![]);
        let pending = membership(
            owner.id,
            Role::Referee,
            ApprovalStatus::PendingAdmin,
            None,
            None,
        );
        let mut withdrawn = pending.clone();
        withdrawn.status = ApprovalStatus::Withdrawn;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending.clone()]])
            .append_exec_results([rows_affected(1)])
            .append_query_results([[withdrawn]])
            .into_connection();

        let result = withdraw(&db, &owner, pending.id).await?;
        assert_eq!(result.status, ApprovalStatus::Withdrawn);
        assert_eq!(result.decided_by_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn only_the_owner_withdraws_and_only_while_pending() {
        let owner = user(GlobalRole::Member, vec![]);
        let approved = membership(owner.id, Role::Referee, ApprovalStatus::Approved, None, None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[approved.clone()]])
            .append_query_results([[approved.clone()]])
            .into_connection();

        let stranger = user(GlobalRole::Member, vec![]);
        assert_eq!(
            kind_of(withdraw(&db, &stranger, approved.id).await.unwrap_err()),
            DomainErrorKind::Request(RequestErrorKind::Forbidden)
        );
        assert!(matches!(
            kind_of(withdraw(&db, &owner, approved.id).await.unwrap_err()),
            DomainErrorKind::Request(RequestErrorKind::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn only_admins_remove_memberships() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = remove(&db, &tournament_admin(), Id::new_v4())
            .await
            .unwrap_err();
        assert_eq!(
            kind_of(err),
            DomainErrorKind::Request(RequestErrorKind::Forbidden)
        );
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn admins_cannot_remove_their_own_admin_membership() {
        let actor = admin();
        let own = membership(actor.id, Role::Admin, ApprovalStatus::Approved, None, None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[own.clone()]])
            .into_connection();

        assert!(matches!(
            kind_of(remove(&db, &actor, own.id).await.unwrap_err()),
            DomainErrorKind::Request(RequestErrorKind::Conflict(_))
        ));
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn admins_remove_other_memberships() -> Result<(), Error> {
        let other = membership(
            Id::new_v4(),
            Role::Player,
            ApprovalStatus::Approved,
            None,
            Some(Id::new_v4()),
        );
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[other.clone()]])
            .append_exec_results([rows_affected(1)])
            .into_connection();

        remove(&db, &admin(), other.id).await?;
        assert_eq!(db.into_transaction_log().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn only_admin_tier_roles_are_granted_and_only_by_admins() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        assert_eq!(
            kind_of(
                grant(&db, &tournament_admin(), Id::new_v4(), Role::RefAdmin)
                    .await
                    .unwrap_err()
            ),
            DomainErrorKind::Request(RequestErrorKind::Forbidden)
        );
        for role in [Role::Admin, Role::ClubLeader, Role::Player] {
            assert!(matches!(
                kind_of(grant(&db, &admin(), Id::new_v4(), role).await.unwrap_err()),
                DomainErrorKind::Request(RequestErrorKind::Invalid(_))
            ));
        }
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn granting_a_role_already_held_is_a_conflict() {
        let grantee = user(GlobalRole::Member, vec![]);
        let held = membership(grantee.id, Role::RefAdmin, ApprovalStatus::Approved, None, None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[(grantee.clone(), held.clone())]])
            .append_query_results([[held]])
            .into_connection();

        let err = grant(&db, &admin(), grantee.id, Role::RefAdmin)
            .await
            .unwrap_err();
        assert!(matches!(
            kind_of(err),
            DomainErrorKind::Request(RequestErrorKind::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn club_leaders_see_pending_requests_of_their_own_club() -> Result<(), Error> {
        let club_a = Id::new_v4();
        let team_in_a = Id::new_v4();
        let leader_id = Id::new_v4();
        let club_leader = user(
            GlobalRole::Member,
            vec![membership(
                leader_id,
                Role::ClubLeader,
                ApprovalStatus::Approved,
                Some(club_a),
                None,
            )],
        );

        let own_club = membership(
            Id::new_v4(),
            Role::TeamLeader,
            ApprovalStatus::PendingLeader,
            Some(club_a),
            None,
        );
        let other_club = membership(
            Id::new_v4(),
            Role::TeamLeader,
            ApprovalStatus::PendingLeader,
            Some(Id::new_v4()),
            None,
        );
        let own_team = membership(
            Id::new_v4(),
            Role::Player,
            ApprovalStatus::PendingLeader,
            None,
            Some(team_in_a),
        );
        let requester = user(GlobalRole::SuperuserPending, vec![own_club.clone()]);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![own_club.clone(), other_club, own_team.clone()]])
            .append_query_results([[team(team_in_a, club_a)]])
            .append_query_results([[requester.clone()]])
            .into_connection();

        let pending = pending_for(&db, &club_leader, None).await?;
        let ids: Vec<Id> = pending.iter().map(|p| p.membership.id).collect();
        assert_eq!(ids, vec![own_club.id, own_team.id]);
        assert_eq!(
            pending[0].requested_by.as_ref().map(|r| r.id),
            Some(requester.id)
        );
        assert_eq!(pending[1].requested_by, None);
        Ok(())
    }

    #[tokio::test]
    async fn pending_requests_can_be_narrowed_to_one_club() -> Result<(), Error> {
        let club_a = Id::new_v4();
        let in_a = membership(
            Id::new_v4(),
            Role::TeamLeader,
            ApprovalStatus::PendingLeader,
            Some(club_a),
            None,
        );
        let in_b = membership(
            Id::new_v4(),
            Role::Secretariat,
            ApprovalStatus::PendingLeader,
            Some(Id::new_v4()),
            None,
        );
        let referee = membership(
            Id::new_v4(),
            Role::Referee,
            ApprovalStatus::PendingAdmin,
            None,
            None,
        );
        let requester = user(GlobalRole::SuperuserPending, vec![in_a.clone()]);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![in_a.clone(), in_b, referee]])
            .append_query_results([[requester]])
            .into_connection();

        let pending = pending_for(&db, &admin(), Some(club_a)).await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].membership.id, in_a.id);
        Ok(())
    }
}
