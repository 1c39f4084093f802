use std::sync::Arc;

use serenity::{all::{Context, EventHandler, GatewayIntents, Message, Ready, ResumedEvent}, async_trait, Client};
use tracing::{error, info};

use crate::bot::{context::context::{ChatClient, ChatMessage}, dispatcher::dispatcher::{dispatch_event, dispatch_message}, events::events::{READY, RESUME}, manager::manager::Manager, state::def::BotResult};

pub struct Handler {
    pub manager: Arc<Manager>,
    pub client: Arc<dyn ChatClient>,
    pub prefix: String,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, _ctx: Context, msg: Message) {
        let message = ChatMessage::from(&msg);
        if let Err(e) = dispatch_message(&self.manager, &self.prefix, self.client.as_ref(), message).await {
            error!("Message error: {e:?}");
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
        dispatch_event(&self.manager, READY).await;
    }

    async fn resume(&self, _ctx: Context, _: ResumedEvent) {
        dispatch_event(&self.manager, RESUME).await;
    }
}

pub async fn run_discord_bot(token: &str, handler: Handler) -> BotResult<()> {
    let intents = GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(token, intents).event_handler(handler).await?;

    client.start().await?;
    Ok(())
}
