pub mod bot_init;
pub mod guild_snapshot;
pub mod permissions;
pub mod role_transfer;
