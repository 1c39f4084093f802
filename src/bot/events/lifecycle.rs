use std::sync::Arc;

use futures::FutureExt;
use tracing::info;

use crate::bot::{context::context::PluginContext, events::events::{EventDescriptor, EventFactory, EventT, FnEvent, READY, RESUME}, state::def::BotResult};

pub const LIFECYCLE_EVENTS: &[EventFactory] = &[ready_event, resume_event];

pub fn ready_event(ctx: PluginContext) -> BotResult<Arc<dyn EventT>> {
    Ok(Arc::new(FnEvent::new(ctx, EventDescriptor::new(READY)?, |ctx| {
        async move {
            let visible: usize = ctx.manager.visible_commands().await.values().map(Vec::len).sum();
            info!("Bot is ready with {visible} public commands");
            Ok(())
        }
        .boxed()
    })))
}

pub fn resume_event(ctx: PluginContext) -> BotResult<Arc<dyn EventT>> {
    Ok(Arc::new(FnEvent::new(ctx, EventDescriptor::new(RESUME)?, |_| {
        async move {
            info!("Gateway session resumed");
            Ok(())
        }
        .boxed()
    })))
}
