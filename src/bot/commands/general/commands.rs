use std::sync::Arc;

use futures::FutureExt;

use crate::bot::{commands::commands::{CommandDescriptor, CommandFactory, CommandT, FnCommand}, context::context::PluginContext, manager::manager::CommandsByCategory, state::def::BotResult};

pub const GENERAL_COMMANDS: &[CommandFactory] = &[help_command, ping_command];

pub fn help_command(ctx: PluginContext) -> BotResult<Arc<dyn CommandT>> {
    let descriptor = CommandDescriptor::new("help", "List commands or show how to use one", "help [command]")?
        .in_category("general");

    Ok(Arc::new(FnCommand::new(ctx, descriptor, |ctx, args, message| {
        async move {
            let reply = match args.get("command") {
                Some(name) => match ctx.manager.command(name).await {
                    Some(cmd) if !cmd.descriptor().is_hidden() => cmd.descriptor().help_line(&ctx.prefix),
                    _ => format!("Unknown command `{}`", name),
                },
                None => render_overview(&ctx.manager.visible_commands().await),
            };
            ctx.reply(&message, &reply).await
        }
        .boxed()
    })))
}

pub fn ping_command(ctx: PluginContext) -> BotResult<Arc<dyn CommandT>> {
    let descriptor = CommandDescriptor::new("ping", "Check that the bot is alive", "ping")?.in_category("general");

    Ok(Arc::new(FnCommand::new(ctx, descriptor, |ctx, _, message| {
        async move { ctx.reply(&message, "Pong!").await }.boxed()
    })))
}

fn render_overview(groups: &CommandsByCategory) -> String {
    if groups.is_empty() {
        return "No commands available".into();
    }

    groups
        .iter()
        .map(|(category, commands)| {
            let names: Vec<&str> = commands.iter().map(|c| c.name()).collect();
            format!("**{}**: {}", category, names.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
