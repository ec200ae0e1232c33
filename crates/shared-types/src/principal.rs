use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The two kinds of account on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Citizen,
    Lawyer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Lawyer => "lawyer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "citizen" => Some(Role::Citizen),
            "lawyer" => Some(Role::Lawyer),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated caller. Built per request from a verified token and a
/// live identity record; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn citizen(id: Uuid) -> Self {
        Self { id, role: Role::Citizen }
    }

    pub fn lawyer(id: Uuid) -> Self {
        Self { id, role: Role::Lawyer }
    }

    pub fn is_citizen(&self) -> bool {
        self.role == Role::Citizen
    }

    pub fn is_lawyer(&self) -> bool {
        self.role == Role::Lawyer
    }

    pub fn actor(&self) -> ActorRef {
        ActorRef::new(self.role, self.id)
    }
}

/// Weak reference to a citizen or lawyer record.
///
/// Serialized as `{"kind": "citizen", "id": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ActorRef {
    Citizen(Uuid),
    Lawyer(Uuid),
}

impl ActorRef {
    pub fn new(role: Role, id: Uuid) -> Self {
        match role {
            Role::Citizen => ActorRef::Citizen(id),
            Role::Lawyer => ActorRef::Lawyer(id),
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            ActorRef::Citizen(id) | ActorRef::Lawyer(id) => *id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            ActorRef::Citizen(_) => Role::Citizen,
            ActorRef::Lawyer(_) => Role::Lawyer,
        }
    }

    /// True when this reference points at the given principal.
    pub fn is(&self, principal: &Principal) -> bool {
        self.role() == principal.role && self.id() == principal.id
    }
}

impl From<Principal> for ActorRef {
    fn from(p: Principal) -> Self {
        p.actor()
    }
}

/// Access level carried by a share grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
    Read,
    Edit,
}

/// One entry of a resource's `sharedWith` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ShareGrant {
    pub principal: ActorRef,
    pub permission: SharePermission,
}

/// Insert or replace the grant for `principal`. Returns true if a grant was replaced.
pub fn upsert_grant(grants: &mut Vec<ShareGrant>, principal: ActorRef, permission: SharePermission) -> bool {
    match grants.iter_mut().find(|g| g.principal == principal) {
        Some(existing) => {
            existing.permission = permission;
            true
        }
        None => {
            grants.push(ShareGrant { principal, permission });
            false
        }
    }
}

/// Permission held by `principal` in `grants`, if any.
pub fn grant_for(grants: &[ShareGrant], principal: &Principal) -> Option<SharePermission> {
    grants
        .iter()
        .find(|g| g.principal.is(principal))
        .map(|g| g.permission)
}
