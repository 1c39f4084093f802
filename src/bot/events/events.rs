use std::sync::Arc;

use futures::{future::BoxFuture, FutureExt};
use tracing::Instrument;

use crate::bot::{context::context::PluginContext, events::lifecycle::LIFECYCLE_EVENTS, state::{def::{BotResult, DefinitionError, PluginKind}, state::require_field}};

pub const READY: &str = "ready";
pub const RESUME: &str = "resume";

pub type EventFactory = fn(PluginContext) -> BotResult<Arc<dyn EventT>>;

pub fn builtin_events() -> Vec<EventFactory> {
    LIFECYCLE_EVENTS.to_vec()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    name: String,
}

impl EventDescriptor {
    pub fn new(name: impl Into<String>) -> Result<Self, DefinitionError> {
        let name = require_field(PluginKind::Event, "name", name.into())?;
        Ok(Self { name: name.to_lowercase() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Listener for a platform event, run each time the event fires.
pub trait EventT: Send + Sync {
    fn descriptor(&self) -> &EventDescriptor;

    fn execute(&self) -> BoxFuture<'static, BotResult<()>>;

    fn name(&self) -> &str {
        self.descriptor().name()
    }
}

pub struct FnEvent<F> {
    ctx: PluginContext,
    descriptor: EventDescriptor,
    func: F,
}

impl<F> FnEvent<F>
where
    F: Fn(PluginContext) -> BoxFuture<'static, BotResult<()>> + Send + Sync + 'static,
{
    pub fn new(ctx: PluginContext, descriptor: EventDescriptor, func: F) -> Self {
        let ctx = ctx.scoped(PluginKind::Event, descriptor.name());
        Self { ctx, descriptor, func }
    }
}

impl<F> EventT for FnEvent<F>
where
    F: Fn(PluginContext) -> BoxFuture<'static, BotResult<()>> + Send + Sync + 'static,
{
    fn descriptor(&self) -> &EventDescriptor {
        &self.descriptor
    }

    fn execute(&self) -> BoxFuture<'static, BotResult<()>> {
        let span = self.ctx.span.clone();
        (self.func)(self.ctx.clone()).instrument(span).boxed()
    }
}
