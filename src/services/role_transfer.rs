use std::fmt::{Display, Formatter};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::config::TransferSettings;
use crate::models::roles::{Actor, Credential, CredentialId};

/// Read-only view of the guild's role hierarchy for one invocation.
pub trait RoleHierarchy {
    /// The highest role the bot holds. Nothing at or above it can be granted or revoked.
    fn top_credential(&self) -> &Credential;
    fn credential(&self, id: CredentialId) -> Option<Credential>;
}

#[derive(Debug, Error)]
pub enum MembershipError {
    /// Discord refused because of missing permissions or role hierarchy.
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Other(String)
}

#[async_trait]
pub trait MembershipService: Send + Sync {
    async fn grant(&self, actor: &Actor, credentials: &[Credential], reason: &str) -> Result<(), MembershipError>;
    async fn revoke(&self, actor: &Actor, credentials: &[Credential], reason: &str) -> Result<(), MembershipError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("Error: You cannot transfer roles from a member who has the moderator role.")]
    ModeratorSource,
    #[error("Error: You cannot transfer roles from yourself.")]
    SelfTransfer,
    #[error("Error: This command cannot be used on a member who has a role with Administrator permissions.")]
    AdministratorSource,
    #[error("There are no roles on {0} that I can manage.")]
    NothingToTransfer(String),
    #[error("Error: The quarantine role with ID `{0}` was not found.")]
    QuarantineMissing(CredentialId),
    #[error("Error: The quarantine role is higher than my top role, so I cannot assign it.")]
    QuarantineTooHigh
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStep {
    GrantDestination,
    RevokeSource,
    Quarantine
}

/// How an invocation ended. Its `Display` is the one message sent back to the invoker.
#[derive(Debug)]
pub enum TransferOutcome {
    Rejected(Rejection),
    Forbidden(MutationStep),
    Failed(MutationStep, String),
    Succeeded { from: String, to: String }
}

impl Display for TransferOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferOutcome::Rejected(rejection) => write!(f, "{rejection}"),
            TransferOutcome::Forbidden(_) => write!(f, "I do not have sufficient permissions or my role is too low in the hierarchy to perform this action."),
            TransferOutcome::Failed(_, description) => write!(f, "An unexpected error occurred: {description}"),
            TransferOutcome::Succeeded { from, to } => write!(f, "✅ All manageable roles from **{from}** have been moved successfully to **{to}**.")
        }
    }
}

/// The source's roles that the bot may move: everything below the bot's top role, minus @everyone.
pub fn transferable_credentials(source: &Actor, top: &Credential) -> Vec<Credential> {
    source.credentials.iter()
        .filter(|c| !c.everyone && c.is_below(top))
        .cloned()
        .collect()
}

/// Local checks. Nothing here talks to Discord.
fn validate<G: RoleHierarchy + ?Sized>(
    guild: &G,
    settings: &TransferSettings,
    invoker: &Actor,
    source: &Actor
) -> Result<(Vec<Credential>, Credential), Rejection> {
    if source.has_credential(settings.required_role) {
        return Err(Rejection::ModeratorSource);
    }

    if source.id == invoker.id {
        return Err(Rejection::SelfTransfer);
    }

    if source.is_administrative() {
        return Err(Rejection::AdministratorSource);
    }

    let top = guild.top_credential();
    let roles = transferable_credentials(source, top);
    if roles.is_empty() {
        return Err(Rejection::NothingToTransfer(source.mention.clone()));
    }

    let quarantine = guild.credential(settings.quarantine_role)
        .ok_or(Rejection::QuarantineMissing(settings.quarantine_role))?;
    if !quarantine.is_below(top) {
        return Err(Rejection::QuarantineTooHigh);
    }

    Ok((roles, quarantine))
}

fn mutation_failure(step: MutationStep, ex: MembershipError) -> TransferOutcome {
    match ex {
        MembershipError::Forbidden(description) => {
            warn!("Role transfer refused at {:?}: {}", step, description);
            TransferOutcome::Forbidden(step)
        }
        MembershipError::Other(description) => {
            error!("Role transfer failed at {:?}: {}", step, description);
            TransferOutcome::Failed(step, description)
        }
    }
}

/// Moves every manageable role from `source` to `destination`, then quarantines `source`.
///
/// The three mutations run strictly in order and the first failure stops the rest. Nothing already
/// applied is rolled back.
pub async fn transfer_roles<G>(
    guild: &G,
    settings: &TransferSettings,
    invoker: &Actor,
    source: &Actor,
    destination: &Actor
) -> TransferOutcome
where
    G: RoleHierarchy + MembershipService + ?Sized
{
    let (roles, quarantine) = match validate(guild, settings, invoker, source) {
        Ok(validated) => validated,
        Err(rejection) => {
            info!("{} cannot transfer roles from {}: {}", invoker.display_name, source.display_name, rejection);
            return TransferOutcome::Rejected(rejection);
        }
    };

    let reason = format!("Roles transferred from {} by {}", source.display_name, invoker.display_name);
    if let Err(ex) = guild.grant(destination, &roles, &reason).await {
        return mutation_failure(MutationStep::GrantDestination, ex);
    }

    let reason = format!("Roles transferred to {} by {}", destination.display_name, invoker.display_name);
    if let Err(ex) = guild.revoke(source, &roles, &reason).await {
        return mutation_failure(MutationStep::RevokeSource, ex);
    }

    let reason = format!("Quarantined after role transfer by {}", invoker.display_name);
    if let Err(ex) = guild.grant(source, std::slice::from_ref(&quarantine), &reason).await {
        return mutation_failure(MutationStep::Quarantine, ex);
    }

    info!("{} moved {} role(s) from {} to {}", invoker.display_name, roles.len(), source.display_name, destination.display_name);

    TransferOutcome::Succeeded {
        from: source.display_name.clone(),
        to: destination.display_name.clone()
    }
}
