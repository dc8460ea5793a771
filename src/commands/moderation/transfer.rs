use serenity::model::guild::Member;
use tracing::{debug, error};

use crate::{BotContext, Error};
use crate::services::guild_snapshot::GuildSnapshot;
use crate::services::permissions::{self, InvocationContext, Verdict};
use crate::services::role_transfer::transfer_roles;

async fn invocation_context(ctx: BotContext<'_>) -> InvocationContext {
    if ctx.guild_id().is_none() {
        return InvocationContext::default();
    }

    let snapshot = match GuildSnapshot::capture(ctx).await {
        Ok(snapshot) => snapshot,
        Err(ex) => {
            error!("Failed to read guild for permission check: {}", ex);
            return InvocationContext { in_guild: true, ..Default::default() };
        }
    };

    let invoker = ctx.author_member().await.map(|member| snapshot.actor(&member));

    InvocationContext {
        in_guild: true,
        invoker,
        bot_can_manage_roles: snapshot.bot_can_manage_roles()
    }
}

async fn can_transfer(ctx: BotContext<'_>) -> Result<bool, Error> {
    let preconditions = permissions::transfer_preconditions(&ctx.data().transfer);
    let invocation = invocation_context(ctx).await;

    match permissions::evaluate(&preconditions, &invocation) {
        Verdict::Allow => Ok(true),
        Verdict::Deny(reason) => {
            debug!("Denied transferroles for {}: {}", ctx.author().name, reason);
            Ok(false)
        }
        Verdict::Refuse(message) => {
            debug!("Refused transferroles for {}: {}", ctx.author().name, message);
            ctx.say(message).await?;
            Ok(false)
        }
    }
}

/// Copies roles from an old member to a new member, then quarantines the old member.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "can_transfer",
    description_localized("en-US", "Move an old account's roles to a new account and quarantine the old one.")
)]
pub async fn transferroles(
    ctx: BotContext<'_>,
    #[description = "The member to take roles from"] old_member: Member,
    #[description = "The member to give roles to"] new_member: Member)
-> Result<(), Error> {
    // Captured again rather than reused from the check: roles may have moved in between, and the
    // quarantine role and bot position have to be read as of now.
    let snapshot = GuildSnapshot::capture(ctx).await?;

    let invoker = ctx.author_member().await
        .map(|member| snapshot.actor(&member))
        .ok_or("Could not resolve the invoking member.")?;
    let source = snapshot.actor(&old_member);
    let destination = snapshot.actor(&new_member);

    let outcome = transfer_roles(&snapshot, &ctx.data().transfer, &invoker, &source, &destination).await;

    ctx.say(outcome.to_string()).await?;

    Ok(())
}
