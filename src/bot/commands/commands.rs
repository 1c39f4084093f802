use std::sync::Arc;

use futures::{future::BoxFuture, FutureExt};
use tracing::Instrument;

use crate::bot::{commands::{general::commands::GENERAL_COMMANDS, utility::commands::UTILITY_COMMANDS}, context::context::{ChatMessage, PluginContext}, state::{def::{BotResult, DefinitionError, PluginKind}, state::require_field}, usage::{arguments::BoundArguments, usage::Usage}};

/// Builds a command from the collaborators it needs. Returning `Err` rejects
/// the command before it is ever registered.
pub type CommandFactory = fn(PluginContext) -> BotResult<Arc<dyn CommandT>>;

pub fn builtin_commands() -> Vec<CommandFactory> {
    GENERAL_COMMANDS.iter().chain(UTILITY_COMMANDS).copied().collect()
}

/// Static metadata of a command. Can only be obtained through
/// [`CommandDescriptor::new`], so every instance has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    name: String,
    description: String,
    usage: Usage,
    hidden: bool,
    category: Option<String>,
}

impl CommandDescriptor {
    /// Fields are checked in order name, description, usage; the usage grammar
    /// is only parsed once all three are present.
    pub fn new(name: impl Into<String>, description: impl Into<String>, usage: impl Into<String>) -> Result<Self, DefinitionError> {
        let name = require_field(PluginKind::Command, "name", name.into())?;
        let description = require_field(PluginKind::Command, "description", description.into())?;
        let usage = require_field(PluginKind::Command, "usage", usage.into())?;
        let usage = Usage::parse(&usage)?;

        Ok(Self { name, description, usage, hidden: false, category: None })
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into().trim().to_lowercase();
        self.category = (!category.is_empty()).then_some(category);
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn description(&self) -> &str { &self.description }
    pub fn usage(&self) -> &Usage { &self.usage }
    pub fn is_hidden(&self) -> bool { self.hidden }
    pub fn category(&self) -> Option<&str> { self.category.as_deref() }

    pub fn help_line(&self, prefix: &str) -> String {
        format!("`{}{}`: {}", prefix, self.usage, self.description)
    }
}

pub trait CommandT: Send + Sync {
    fn descriptor(&self) -> &CommandDescriptor;

    fn execute(&self, args: BoundArguments, message: ChatMessage) -> BoxFuture<'static, BotResult<()>>;

    fn name(&self) -> &str {
        self.descriptor().name()
    }

    fn usage(&self) -> &Usage {
        self.descriptor().usage()
    }
}

/// A command backed by a closure.
pub struct FnCommand<F> {
    ctx: PluginContext,
    descriptor: CommandDescriptor,
    func: F,
}

impl<F> FnCommand<F>
where
    F: Fn(PluginContext, BoundArguments, ChatMessage) -> BoxFuture<'static, BotResult<()>> + Send + Sync + 'static,
{
    pub fn new(ctx: PluginContext, descriptor: CommandDescriptor, func: F) -> Self {
        let ctx = ctx.scoped(PluginKind::Command, descriptor.name());
        Self { ctx, descriptor, func }
    }
}

impl<F> CommandT for FnCommand<F>
where
    F: Fn(PluginContext, BoundArguments, ChatMessage) -> BoxFuture<'static, BotResult<()>> + Send + Sync + 'static,
{
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn execute(&self, args: BoundArguments, message: ChatMessage) -> BoxFuture<'static, BotResult<()>> {
        let span = self.ctx.span.clone();
        (self.func)(self.ctx.clone(), args, message).instrument(span).boxed()
    }
}
