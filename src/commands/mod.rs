mod general;
mod moderation;

use tracing::{debug, error};

use crate::{BotContext, Data, Error};

/// Shows what the bot can do, or details on one command.
#[poise::command(prefix_command, slash_command, guild_only)]
async fn help(
    ctx: BotContext<'_>,
    #[description = "Command to explain"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> Result<(), Error> {
    let config = poise::builtins::HelpConfiguration {
        extra_text_at_bottom: "transferroles needs the moderator role and moves every role I can manage.",
        ephemeral: true,
        ..Default::default()
    };

    poise::builtins::help(ctx, command.as_deref(), config).await?;
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        // Anything the invoker should hear about was already said by the check.
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            if let Some(ex) = error {
                error!("Check for {} failed: {}", ctx.command().name, ex);
            } else {
                debug!("{} was denied {}", ctx.author().name, ctx.command().name);
            }
        }
        other => {
            if let Err(ex) = poise::builtins::on_error(other).await {
                error!("Failed to report command error: {}", ex);
            }
        }
    }
}

pub fn get_framework(pref: &str) -> poise::FrameworkOptions<Data, Error> {
    poise::FrameworkOptions {
        commands: vec![
            help(),
            general::info(),
            general::register(),
            moderation::transferroles()
        ],
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(pref.to_string()),
            mention_as_prefix: true,
            ..Default::default()
        },
        on_error: |error| Box::pin(on_error(error)),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framework_carries_every_command() {
        let options = get_framework("~");
        let names: Vec<_> = options.commands.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["help", "info", "register", "transferroles"]);
        assert_eq!(options.prefix_options.prefix.as_deref(), Some("~"));
        assert!(options.prefix_options.mention_as_prefix);
    }
}
