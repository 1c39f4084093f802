use tracing::{debug, error, warn};

use crate::bot::{context::context::{ChatClient, ChatMessage}, manager::manager::Manager, state::def::BotResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Not a command: bot author or missing prefix.
    Ignored,
    Unknown(String),
    /// Arguments did not fit the usage, the usage line was sent back.
    UsageRejected(String),
    Executed(String),
    /// The command returned an error, a failure notice was sent back.
    Failed(String),
}

/// Splits `message` into a command name and its words. `None` when the
/// message does not start with `prefix`.
pub fn parse_invocation<'a>(prefix: &str, message: &'a str) -> Option<(&'a str, Vec<&'a str>)> {
    let rest = message.trim_start().strip_prefix(prefix)?;
    let mut words = rest.split_whitespace();
    let name = words.next()?;
    Some((name, words.collect()))
}

pub async fn dispatch_message(manager: &Manager, prefix: &str, client: &dyn ChatClient, message: ChatMessage) -> BotResult<Dispatch> {
    if message.author.bot {
        return Ok(Dispatch::Ignored);
    }

    let Some((cmd_name, words)) = parse_invocation(prefix, &message.content) else {
        return Ok(Dispatch::Ignored);
    };
    let cmd_name = cmd_name.to_lowercase();

    let Some(cmd) = manager.command(&cmd_name).await else {
        debug!("Unknown command {cmd_name}");
        return Ok(Dispatch::Unknown(cmd_name));
    };

    let args = match cmd.usage().bind(words.as_slice()) {
        Ok(args) => args,
        Err(e) => {
            debug!("{} rejected arguments: {e}", cmd.name());
            client.send_message(message.channel_id, &format!("Usage: {}{}", prefix, cmd.usage())).await?;
            return Ok(Dispatch::UsageRejected(cmd_name));
        }
    };

    let channel_id = message.channel_id;
    if let Err(e) = cmd.execute(args, message).await {
        error!("Command {} failed: {e}", cmd.name());
        client.send_message(channel_id, &format!("Command `{}` failed", cmd.name())).await?;
        return Ok(Dispatch::Failed(cmd_name));
    }

    Ok(Dispatch::Executed(cmd_name))
}

/// Runs every listener registered for `event_name`. A failing listener does
/// not stop the others.
pub async fn dispatch_event(manager: &Manager, event_name: &str) -> usize {
    let mut succeeded = 0;
    for event in manager.events(event_name).await {
        match event.execute().await {
            Ok(()) => succeeded += 1,
            Err(e) => warn!("Event {} failed: {e}", event.name()),
        }
    }
    succeeded
}
