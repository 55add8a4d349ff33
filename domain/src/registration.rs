use crate::approval::pending_status_for;
use crate::error::Error;
use crate::{
    global_role::GlobalRole,
    roles::{ClubLeaderTitle, Role},
    user_roles, users, Id,
};
use chrono::Utc;
use email_address::EmailAddress;
use entity_api::{club, referee, team, user, user_role};
use log::*;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use utoipa::ToSchema;

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const GLOBAL_SCOPE: &str = "global";

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "email": "leder@floorball.dk",
    "username": "leder",
    "password": "hemmelig",
    "role": "team_leader",
    "team_id": "b3c1a4f6-4f57-4b52-9d5c-0d4ea1f8b1a2"
}))]
pub struct RegistrationParams {
    pub email: String,
    pub username: String,
    pub name: Option<String>,
    pub password: String,
    pub role: Role,
    #[schema(value_type = Option<Uuid>)]
    pub club_id: Option<Id>,
    #[schema(value_type = Option<Uuid>)]
    pub team_id: Option<Id>,
    #[schema(value_type = Option<Uuid>)]
    pub referee_id: Option<Id>,
    pub club_leader_title: Option<ClubLeaderTitle>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RoleRequestParams {
    pub role: Role,
    #[schema(value_type = Option<Uuid>)]
    pub club_id: Option<Id>,
    #[schema(value_type = Option<Uuid>)]
    pub team_id: Option<Id>,
    #[schema(value_type = Option<Uuid>)]
    pub referee_id: Option<Id>,
    pub club_leader_title: Option<ClubLeaderTitle>,
}

impl From<&RegistrationParams> for RoleRequestParams {
    fn from(params: &RegistrationParams) -> Self {
        RoleRequestParams {
            role: params.role,
            club_id: params.club_id,
            team_id: params.team_id,
            referee_id: params.referee_id,
            club_leader_title: params.club_leader_title,
        }
    }
}

/// What a requested membership is attached to, with only the fields its role uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleScope {
    pub club_id: Option<Id>,
    pub team_id: Option<Id>,
    pub referee_id: Option<Id>,
    pub club_leader_title: Option<ClubLeaderTitle>,
    pub scope_key: String,
}

/// A membership together with the name of what it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MembershipView {
    pub membership: user_roles::Model,
    pub scope_label: String,
}

pub fn validate_email(email: &str) -> Result<String, Error> {
    let email = email.trim().to_lowercase();
    EmailAddress::from_str(&email)
        .map_err(|_| Error::invalid(format!("{email} is not a valid email address")))?;
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<(), Error> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::invalid(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Checks that `params.role` can be requested and carries the scope it needs.
pub fn validate_scope(params: &RoleRequestParams) -> Result<RoleScope, Error> {
    let missing = |what: &str| Error::invalid(format!("{} requires a {what}", params.role));

    match params.role {
        Role::Admin | Role::TournamentAdmin | Role::RefAdmin => Err(Error::invalid(format!(
            "{} cannot be requested",
            params.role
        ))),
        Role::ClubLeader | Role::Secretariat => {
            let club_id = params.club_id.ok_or_else(|| missing("club"))?;
            let club_leader_title = match params.role {
                Role::ClubLeader => Some(
                    params
                        .club_leader_title
                        .ok_or_else(|| missing("club leader title"))?,
                ),
                _ => None,
            };
            Ok(RoleScope {
                club_id: Some(club_id),
                team_id: None,
                referee_id: None,
                club_leader_title,
                scope_key: format!("club:{club_id}"),
            })
        }
        Role::TeamLeader | Role::Player | Role::Supporter => {
            let team_id = params.team_id.ok_or_else(|| missing("team"))?;
            Ok(RoleScope {
                club_id: None,
                team_id: Some(team_id),
                referee_id: None,
                club_leader_title: None,
                scope_key: format!("team:{team_id}"),
            })
        }
        Role::Referee => {
            let referee_id = params.referee_id.ok_or_else(|| missing("referee"))?;
            Ok(RoleScope {
                club_id: None,
                team_id: None,
                referee_id: Some(referee_id),
                club_leader_title: None,
                scope_key: format!("referee:{referee_id}"),
            })
        }
    }
}

// The club, team or referee a scope points at has to exist.
async fn ensure_scope_exists(db: &DatabaseConnection, scope: &RoleScope) -> Result<(), Error> {
    let unknown = |what: &str| Error::invalid(format!("Unknown {what}"));

    if let Some(club_id) = scope.club_id {
        club::find_by_id(db, club_id)
            .await
            .map_err(|_| unknown("club"))?;
    }
    if let Some(team_id) = scope.team_id {
        team::find_by_id(db, team_id)
            .await
            .map_err(|_| unknown("team"))?;
    }
    if let Some(referee_id) = scope.referee_id {
        referee::find_by_id(db, referee_id)
            .await
            .map_err(|_| unknown("referee"))?;
    }
    Ok(())
}

fn pending_membership(role: Role, scope: RoleScope, user_id: Id) -> user_roles::Model {
    let now = Utc::now();
    user_roles::Model {
        id: Id::nil(),
        user_id,
        role,
        status: pending_status_for(role),
        club_id: scope.club_id,
        team_id: scope.team_id,
        referee_id: scope.referee_id,
        club_leader_title: scope.club_leader_title,
        scope_key: scope.scope_key,
        decided_by_id: None,
        decided_at: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

/// Creates a user awaiting approval of its first membership.
pub async fn register(
    db: &DatabaseConnection,
    params: RegistrationParams,
) -> Result<users::Model, Error> {
    let email = validate_email(&params.email)?;
    let username = params.username.trim().to_owned();
    if username.is_empty() {
        return Err(Error::invalid("Username is required"));
    }
    validate_password(&params.password)?;
    let scope = validate_scope(&RoleRequestParams::from(&params))?;
    ensure_scope_exists(db, &scope).await?;

    if user::find_by_email(db, &email).await?.is_some() {
        return Err(Error::conflict("Email is already registered"));
    }
    if user::find_by_username(db, &username).await?.is_some() {
        return Err(Error::conflict("Username is already taken"));
    }

    let now = Utc::now();
    let user_model = users::Model {
        id: Id::nil(),
        email,
        username,
        name: params
            .name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty()),
        password: params.password,
        global_role: GlobalRole::SuperuserPending,
        created_at: now.into(),
        updated_at: now.into(),
        roles: vec![],
    };

    let user = user::create_with_membership(
        db,
        user_model,
        pending_membership(params.role, scope, Id::nil()),
    )
    .await?;

    info!("Registered user {} requesting {}", user.id, params.role);
    Ok(user)
}

/// Files another pending membership for a user that already holds an approved one.
pub async fn request_role(
    db: &DatabaseConnection,
    user: &users::Model,
    params: RoleRequestParams,
) -> Result<user_roles::Model, Error> {
    if !matches!(user.global_role, GlobalRole::Member | GlobalRole::Admin) {
        return Err(Error::forbidden());
    }

    let scope = validate_scope(&params)?;
    ensure_scope_exists(db, &scope).await?;

    if user_role::find_live(db, user.id, params.role, &scope.scope_key)
        .await?
        .is_some()
    {
        return Err(Error::conflict(format!(
            "A {} membership for {} already exists",
            params.role, scope.scope_key
        )));
    }

    let membership =
        user_role::create(db, pending_membership(params.role, scope, user.id)).await?;
    info!(
        "User {} requested {} ({})",
        user.id, membership.role, membership.scope_key
    );
    Ok(membership)
}

/// All memberships of `user`, newest first, labelled with their club, team or referee name.
pub async fn my_roles(
    db: &DatabaseConnection,
    user: &users::Model,
) -> Result<Vec<MembershipView>, Error> {
    let memberships = user_role::find_by_user(db, user.id).await?;

    let club_names: HashMap<Id, String> = club::find_by_ids(
        db,
        memberships.iter().filter_map(|m| m.club_id).collect(),
    )
    .await?
    .into_iter()
    .map(|club| (club.id, club.name))
    .collect();
    let team_names: HashMap<Id, String> = team::find_by_ids(
        db,
        memberships.iter().filter_map(|m| m.team_id).collect(),
    )
    .await?
    .into_iter()
    .map(|team| (team.id, team.name))
    .collect();
    let referee_names: HashMap<Id, String> = if memberships.iter().any(|m| m.referee_id.is_some())
    {
        referee::find_all(db)
            .await?
            .into_iter()
            .map(|referee| (referee.id, referee.name))
            .collect()
    } else {
        HashMap::new()
    };

    Ok(memberships
        .into_iter()
        .map(|membership| {
            let scope_label = membership
                .club_id
                .and_then(|id| club_names.get(&id))
                .or_else(|| membership.team_id.and_then(|id| team_names.get(&id)))
                .or_else(|| membership.referee_id.and_then(|id| referee_names.get(&id)))
                .cloned()
                .unwrap_or_else(|| GLOBAL_SCOPE.to_owned());
            MembershipView {
                membership,
                scope_label,
            }
        })
        .collect())
}
