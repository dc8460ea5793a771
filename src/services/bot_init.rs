use serenity::{
    client::Context,
    model::{
        gateway::Ready
    }
};
use tracing::info;

pub async fn ready(ctx: &Context, ready: &Ready) {
    info!("Logged in as {} in {} guild(s)", ready.user.name, ready.guilds.len());

    if ctx.cache.guild_count() == 0 {
        info!("Guild cache is still empty; transferroles will work once guilds finish loading");
    }
}
