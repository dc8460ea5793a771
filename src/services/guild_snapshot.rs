use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use serenity::{
    http::{Http, HttpError},
    model::{
        guild::{Member, Role},
        id::{GuildId, RoleId, UserId},
        permissions::Permissions,
        ModelError
    }
};
use tracing::debug;

use crate::{BotContext, Error};
use crate::models::roles::{Actor, ActorId, Credential, CredentialId};
use crate::services::role_transfer::{MembershipError, MembershipService, RoleHierarchy};

/// The guild's roles as the cache saw them when the command ran, plus the bot's top role.
///
/// Built fresh for every invocation so the quarantine role and the bot's position are never stale.
pub struct GuildSnapshot {
    http: Arc<Http>,
    guild_id: GuildId,
    bot_permissions: Permissions,
    roles: HashMap<RoleId, Role>,
    bot: Member,
    top: Credential
}

impl GuildSnapshot {
    pub async fn capture(ctx: BotContext<'_>) -> Result<Self, Error> {
        let guild_id = ctx.guild_id().ok_or("This command can only be run in a server.")?;
        let bot_id = ctx.serenity_context().cache.current_user().id;
        let bot = guild_id.member(ctx.serenity_context(), bot_id).await?;

        // The cache reference can't be held across an await, so take what we need first.
        let (bot_permissions, roles) = {
            let guild = ctx.guild().ok_or("This server is not in my cache yet.")?;
            (guild.member_permissions(&bot), guild.roles.clone())
        };

        let mut snapshot = Self {
            http: ctx.serenity_context().http.clone(),
            guild_id,
            bot_permissions,
            roles,
            bot,
            top: Credential {
                id: CredentialId(guild_id.get()),
                name: "@everyone".to_string(),
                position: 0,
                everyone: true,
                administrative: false
            }
        };
        snapshot.top = snapshot.highest_credential(&snapshot.bot);

        Ok(snapshot)
    }

    fn everyone_id(&self) -> RoleId {
        self.guild_id.everyone_role()
    }

    fn credential_of(&self, role: &Role) -> Credential {
        Credential {
            id: CredentialId(role.id.get()),
            name: role.name.clone(),
            position: role.position,
            everyone: role.id == self.everyone_id(),
            administrative: role.permissions.administrator()
        }
    }

    /// The member's roles with @everyone in front.
    fn member_roles<'a>(&'a self, member: &'a Member) -> impl Iterator<Item = &'a Role> + 'a {
        std::iter::once(self.everyone_id())
            .chain(member.roles.iter().copied())
            .filter_map(|id| self.roles.get(&id))
    }

    fn highest_credential(&self, member: &Member) -> Credential {
        let everyone = self.roles.get(&self.everyone_id()).map(|r| self.credential_of(r));

        self.member_roles(member)
            .map(|r| self.credential_of(r))
            .max_by_key(Credential::rank)
            .or(everyone)
            .unwrap_or_else(|| self.top.clone())
    }

    pub fn actor(&self, member: &Member) -> Actor {
        Actor {
            id: ActorId(member.user.id.get()),
            display_name: member.display_name().to_string(),
            mention: format!("<@{}>", member.user.id.get()),
            credentials: self.member_roles(member).map(|r| self.credential_of(r)).collect()
        }
    }

    pub fn bot_can_manage_roles(&self) -> bool {
        self.bot_permissions.administrator() || self.bot_permissions.manage_roles()
    }

    fn user_id(actor: &Actor) -> UserId {
        UserId::new(actor.id.0)
    }
}

impl RoleHierarchy for GuildSnapshot {
    fn top_credential(&self) -> &Credential {
        &self.top
    }

    fn credential(&self, id: CredentialId) -> Option<Credential> {
        self.roles.get(&RoleId::new(id.0)).map(|r| self.credential_of(r))
    }
}

#[async_trait]
impl MembershipService for GuildSnapshot {
    async fn grant(&self, actor: &Actor, credentials: &[Credential], reason: &str) -> Result<(), MembershipError> {
        for credential in credentials {
            debug!("Adding {} to {}", credential.name, actor.display_name);
            self.http.add_member_role(self.guild_id, Self::user_id(actor), RoleId::new(credential.id.0), Some(reason)).await?;
        }

        Ok(())
    }

    async fn revoke(&self, actor: &Actor, credentials: &[Credential], reason: &str) -> Result<(), MembershipError> {
        for credential in credentials {
            debug!("Removing {} from {}", credential.name, actor.display_name);
            self.http.remove_member_role(self.guild_id, Self::user_id(actor), RoleId::new(credential.id.0), Some(reason)).await?;
        }

        Ok(())
    }
}

impl From<serenity::Error> for MembershipError {
    fn from(ex: serenity::Error) -> Self {
        let forbidden = match &ex {
            serenity::Error::Http(http) => {
                let http: &HttpError = http;
                matches!(http, HttpError::UnsuccessfulRequest(response) if response.status_code.as_u16() == 403)
            }
            serenity::Error::Model(ModelError::Hierarchy | ModelError::InvalidPermissions { .. }) => true,
            _ => false
        };

        if forbidden {
            MembershipError::Forbidden(ex.to_string())
        } else {
            MembershipError::Other(ex.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_errors_are_forbidden() {
        let ex: MembershipError = serenity::Error::Model(ModelError::Hierarchy).into();
        assert!(matches!(ex, MembershipError::Forbidden(_)));
    }

    #[test]
    fn other_errors_keep_their_description() {
        let ex: MembershipError = serenity::Error::Other("gateway went away").into();

        match ex {
            MembershipError::Other(description) => assert_eq!(description, "gateway went away"),
            other => panic!("expected a generic error, got {other:?}")
        }
    }
}
