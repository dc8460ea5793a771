use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Snowflake of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialId(pub u64);

/// Snowflake of a guild member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub u64);

impl Display for CredentialId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a role in the guild hierarchy.
///
/// Higher positions outrank lower ones. Two roles can share a position, in which case Discord
/// treats the older role (lower snowflake) as the higher one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    pub position: u16,
    pub id: CredentialId
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position.cmp(&other.position)
            .then_with(|| other.id.0.cmp(&self.id.0))
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: CredentialId,
    pub name: String,
    pub position: u16,
    /// The implicit @everyone role.
    pub everyone: bool,
    /// Whether the role carries the Administrator permission.
    pub administrative: bool
}

impl Credential {
    pub fn rank(&self) -> Rank {
        Rank { position: self.position, id: self.id }
    }

    pub fn is_administrative(&self) -> bool {
        self.administrative
    }

    /// True if this role sits strictly below `ceiling`, i.e. the bot may hand it out.
    pub fn is_below(&self, ceiling: &Credential) -> bool {
        self.rank() < ceiling.rank()
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub display_name: String,
    pub mention: String,
    /// Every role held, @everyone included.
    pub credentials: Vec<Credential>
}

impl Actor {
    pub fn has_credential(&self, id: CredentialId) -> bool {
        self.credentials.iter().any(|c| c.id == id)
    }

    pub fn is_administrative(&self) -> bool {
        self.credentials.iter().any(Credential::is_administrative)
    }
}

#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub const EVERYONE: u64 = 1;

    pub fn role(id: u64, position: u16) -> Credential {
        Credential {
            id: CredentialId(id),
            name: format!("role-{id}"),
            position,
            everyone: id == EVERYONE,
            administrative: false
        }
    }

    pub fn admin_role(id: u64, position: u16) -> Credential {
        Credential { administrative: true, ..role(id, position) }
    }

    pub fn everyone() -> Credential {
        role(EVERYONE, 0)
    }

    pub fn member(id: u64, name: &str, roles: Vec<Credential>) -> Actor {
        let mut credentials = vec![everyone()];
        credentials.extend(roles);

        Actor {
            id: ActorId(id),
            display_name: name.to_string(),
            mention: format!("<@{id}>"),
            credentials
        }
    }
}
