use std::sync::Arc;

use serenity::http::Http;
use tracing::info;

use crate::bot::{commands::commands::builtin_commands, context::context::{ChatClient, PluginContext}, db::connect, discord::discord::{run_discord_bot, Handler}, events::events::builtin_events, manager::manager::Manager, state::def::{BotConfig, BotResult}};

pub mod state;
pub mod usage;
pub mod context;
pub mod commands;
pub mod events;
pub mod manager;
pub mod dispatcher;
pub mod db;
pub mod discord;

pub async fn run_bot(config: BotConfig) -> BotResult<()> {
    let pool = connect(&config.database_url).await?;
    let http: Arc<dyn ChatClient> = Arc::new(Http::new(&config.token));

    let manager = Arc::new(Manager::new(
        config.settings.disabled.iter().cloned(),
        config.settings.disabled_events.iter().cloned(),
    ));
    let ctx = PluginContext::new(http.clone(), manager.handle(), pool).with_prefix(config.settings.prefix.clone());

    let commands = manager.load_commands(&ctx, &builtin_commands()).await;
    let events = manager.load_events(&ctx, &builtin_events()).await;
    info!("Loaded {commands} commands and {events} events");

    let handler = Handler { manager, client: http, prefix: config.settings.prefix.clone() };
    run_discord_bot(&config.token, handler).await
}
