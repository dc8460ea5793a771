use tracing::info;

use crate::{BotContext, Error};

#[poise::command(
    prefix_command,
    slash_command,
    description_localized("en-US", "Info about this bot.")
)]
pub async fn info(ctx: BotContext<'_>) -> Result<(), Error> {
    const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");
    let content = format!("roletransfer v{} - moves roles from old accounts to new ones", VERSION.unwrap_or("<unknown>"));

    ctx.say(content).await?;
    Ok(())
}

/// Owner-only: offers buttons to publish or withdraw the slash version of the commands.
#[poise::command(prefix_command, hide_in_help, owners_only)]
pub async fn register(ctx: BotContext<'_>) -> Result<(), Error> {
    info!("{} opened slash command registration", ctx.author().name);
    poise::builtins::register_application_commands_buttons(ctx).await?;

    Ok(())
}
