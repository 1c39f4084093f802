use std::{collections::{BTreeMap, HashMap, HashSet}, sync::{Arc, Weak}};

use tokio::sync::RwLock;
use tracing::{error, info};

use crate::bot::{commands::commands::{CommandFactory, CommandT}, context::context::PluginContext, events::events::{EventFactory, EventT}, state::def::{BotResult, ConfigError, DefinitionError}};

pub const DEFAULT_CATEGORY: &str = "general";

pub type CommandsByCategory = BTreeMap<String, Vec<Arc<dyn CommandT>>>;

#[derive(Default)]
struct Registry {
    commands: HashMap<String, Arc<dyn CommandT>>,
    events: HashMap<String, Vec<Arc<dyn EventT>>>,
    // separate so a command and an event may share a name
    disabled_commands: HashSet<String>,
    disabled_events: HashSet<String>,
}

impl Registry {
    fn command(&self, name: &str) -> Option<Arc<dyn CommandT>> {
        self.commands.get(&name.to_lowercase()).cloned()
    }

    fn visible_commands(&self) -> CommandsByCategory {
        let mut groups = CommandsByCategory::new();
        for cmd in self.commands.values().filter(|c| !c.descriptor().is_hidden()) {
            let category = cmd.descriptor().category().unwrap_or(DEFAULT_CATEGORY).to_string();
            groups.entry(category).or_default().push(cmd.clone());
        }
        for commands in groups.values_mut() {
            commands.sort_by(|a, b| a.name().cmp(b.name()));
        }
        groups
    }
}

/// Owns every loaded command and event.
///
/// Plugins only see the registry through a [`ManagerHandle`], which is weak so
/// that loaded plugins do not keep the manager alive.
pub struct Manager {
    registry: Arc<RwLock<Registry>>,
}

#[derive(Clone, Default)]
pub struct ManagerHandle(Weak<RwLock<Registry>>);

impl Manager {
    pub fn new(disabled_commands: impl IntoIterator<Item = String>, disabled_events: impl IntoIterator<Item = String>) -> Self {
        let registry = Registry {
            disabled_commands: disabled_commands.into_iter().map(|n| n.to_lowercase()).collect(),
            disabled_events: disabled_events.into_iter().map(|n| n.to_lowercase()).collect(),
            ..Default::default()
        };
        Self { registry: Arc::new(RwLock::new(registry)) }
    }

    pub fn handle(&self) -> ManagerHandle {
        ManagerHandle(Arc::downgrade(&self.registry))
    }

    pub async fn register_command(&self, command: Arc<dyn CommandT>) -> Result<(), DefinitionError> {
        let key = command.name().to_lowercase();
        let mut registry = self.registry.write().await;

        if registry.disabled_commands.contains(&key) {
            return Err(ConfigError::Disabled(key).into());
        }
        if registry.commands.contains_key(&key) {
            return Err(ConfigError::DuplicateCommand(key).into());
        }

        registry.commands.insert(key, command);
        Ok(())
    }

    pub async fn register_event(&self, event: Arc<dyn EventT>) -> Result<(), DefinitionError> {
        let key = event.name().to_lowercase();
        let mut registry = self.registry.write().await;

        if registry.disabled_events.contains(&key) {
            return Err(ConfigError::Disabled(key).into());
        }

        registry.events.entry(key).or_default().push(event);
        Ok(())
    }

    /// Builds a command from its factory and registers it. A rejected command
    /// is logged and never becomes reachable.
    pub async fn load_command(&self, ctx: &PluginContext, factory: CommandFactory) -> BotResult<()> {
        let command = factory(ctx.clone()).inspect_err(|e| error!("Rejected command: {e}"))?;
        let name = command.name().to_string();

        self.register_command(command).await.inspect_err(|e| error!("Rejected command {name}: {e}"))?;
        info!("Loaded command {name}");
        Ok(())
    }

    pub async fn load_event(&self, ctx: &PluginContext, factory: EventFactory) -> BotResult<()> {
        let event = factory(ctx.clone()).inspect_err(|e| error!("Rejected event: {e}"))?;
        let name = event.name().to_string();

        self.register_event(event).await.inspect_err(|e| error!("Rejected event {name}: {e}"))?;
        info!("Loaded event {name}");
        Ok(())
    }

    /// Loads every factory, skipping rejected ones. Returns how many were accepted.
    pub async fn load_commands(&self, ctx: &PluginContext, factories: &[CommandFactory]) -> usize {
        let mut loaded = 0;
        for factory in factories {
            if self.load_command(ctx, *factory).await.is_ok() {
                loaded += 1;
            }
        }
        loaded
    }

    pub async fn load_events(&self, ctx: &PluginContext, factories: &[EventFactory]) -> usize {
        let mut loaded = 0;
        for factory in factories {
            if self.load_event(ctx, *factory).await.is_ok() {
                loaded += 1;
            }
        }
        loaded
    }

    pub async fn command(&self, name: &str) -> Option<Arc<dyn CommandT>> {
        self.registry.read().await.command(name)
    }

    pub async fn events(&self, name: &str) -> Vec<Arc<dyn EventT>> {
        self.registry.read().await.events.get(&name.to_lowercase()).cloned().unwrap_or_default()
    }

    pub async fn visible_commands(&self) -> CommandsByCategory {
        self.registry.read().await.visible_commands()
    }

    pub async fn command_count(&self) -> usize {
        self.registry.read().await.commands.len()
    }
}

impl ManagerHandle {
    pub async fn command(&self, name: &str) -> Option<Arc<dyn CommandT>> {
        let registry = self.0.upgrade()?;
        let guard = registry.read().await;
        guard.command(name)
    }

    pub async fn visible_commands(&self) -> CommandsByCategory {
        match self.0.upgrade() {
            Some(registry) => registry.read().await.visible_commands(),
            None => CommandsByCategory::new(),
        }
    }
}
