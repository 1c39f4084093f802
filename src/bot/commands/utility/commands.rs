use std::sync::Arc;

use futures::FutureExt;
use tracing::debug;

use crate::bot::{commands::commands::{CommandDescriptor, CommandFactory, CommandT, FnCommand}, context::context::PluginContext, db::tags::{fetch_tag, save_tag}, state::def::{BotError, BotResult}};

pub const UTILITY_COMMANDS: &[CommandFactory] = &[tag_command];

pub fn tag_command(ctx: PluginContext) -> BotResult<Arc<dyn CommandT>> {
    let descriptor = CommandDescriptor::new("tag", "Show a stored tag, or store one by adding text", "tag <name> [*text]")?
        .in_category("utility");

    Ok(Arc::new(FnCommand::new(ctx, descriptor, |ctx, args, message| {
        async move {
            let name = args.get("name").ok_or_else(|| BotError::Custom("tag name was not bound".into()))?;

            let reply = match args.rest_joined() {
                Some(text) => {
                    save_tag(&ctx.db, message.guild_id, name, &text, message.author.id).await?;
                    debug!("{} saved tag {}", message.author.name, name);
                    format!("Saved tag `{}`", name)
                }
                None => match fetch_tag(&ctx.db, message.guild_id, name).await? {
                    Some(content) => content,
                    None => format!("No tag named `{}`", name),
                },
            };
            ctx.reply(&message, &reply).await
        }
        .boxed()
    })))
}
