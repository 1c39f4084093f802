use std::sync::Arc;

use futures::{future::BoxFuture, FutureExt};
use serenity::{all::{ChannelId, Message}, http::Http};
use sqlx::SqlitePool;
use tracing::Span;

use crate::bot::{manager::manager::ManagerHandle, state::def::{default_prefix, BotResult, PluginKind}};

pub trait ChatClient: Send + Sync {
    fn send_message<'a>(&'a self, channel_id: u64, content: &'a str) -> BoxFuture<'a, BotResult<()>>;
}

impl ChatClient for Http {
    fn send_message<'a>(&'a self, channel_id: u64, content: &'a str) -> BoxFuture<'a, BotResult<()>> {
        async move {
            ChannelId::new(channel_id).say(self, content).await?;
            Ok(())
        }
        .boxed()
    }
}

/// Platform independent view of an incoming chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub author: ChatUser,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    pub id: u64,
    pub name: String,
    pub bot: bool,
}

impl From<&Message> for ChatMessage {
    fn from(msg: &Message) -> Self {
        ChatMessage {
            id: msg.id.get(),
            channel_id: msg.channel_id.get(),
            guild_id: msg.guild_id.map(|g| g.get()),
            author: ChatUser {
                id: msg.author.id.get(),
                name: msg.author.name.clone(),
                bot: msg.author.bot,
            },
            content: msg.content.clone(),
        }
    }
}

/// Collaborators handed to every plugin when it is constructed.
#[derive(Clone)]
pub struct PluginContext {
    pub bot: Arc<dyn ChatClient>,
    pub manager: ManagerHandle,
    pub db: SqlitePool,
    /// Command prefix, shown in replies that quote a usage line.
    pub prefix: String,
    /// Log span of the plugin, set by [`PluginContext::scoped`].
    pub span: Span,
}

impl PluginContext {
    pub fn new(bot: Arc<dyn ChatClient>, manager: ManagerHandle, db: SqlitePool) -> Self {
        Self { bot, manager, db, prefix: default_prefix(), span: Span::none() }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn scoped(mut self, kind: PluginKind, name: &str) -> Self {
        self.span = tracing::info_span!("plugin", kind = %kind, name = %name);
        self
    }

    pub async fn reply(&self, message: &ChatMessage, content: &str) -> BotResult<()> {
        self.bot.send_message(message.channel_id, content).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::bot::manager::manager::Manager;

    #[derive(Default)]
    pub struct RecordingClient {
        sent: Mutex<Vec<(u64, String)>>,
    }

    impl RecordingClient {
        pub fn sent(&self) -> Vec<(u64, String)> {
            self.sent.lock().unwrap().clone()
        }

        pub fn last(&self) -> Option<String> {
            self.sent.lock().unwrap().last().map(|(_, m)| m.clone())
        }
    }

    impl ChatClient for RecordingClient {
        fn send_message<'a>(&'a self, channel_id: u64, content: &'a str) -> BoxFuture<'a, BotResult<()>> {
            self.sent.lock().unwrap().push((channel_id, content.to_string()));
            async { Ok(()) }.boxed()
        }
    }

    pub async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    pub async fn test_context(manager: &Manager) -> (PluginContext, Arc<RecordingClient>) {
        let client = Arc::new(RecordingClient::default());
        let ctx = PluginContext::new(client.clone(), manager.handle(), memory_pool().await);
        (ctx, client)
    }

    pub fn message(content: &str) -> ChatMessage {
        ChatMessage {
            id: 1,
            channel_id: 42,
            guild_id: Some(7),
            author: ChatUser { id: 99, name: "tester".into(), bot: false },
            content: content.into(),
        }
    }
}
