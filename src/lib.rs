//! Command and event plugins for a Discord bot.
//!
//! Plugins declare their metadata through [`bot::commands::commands::CommandDescriptor`]
//! and [`bot::events::events::EventDescriptor`], whose constructors validate the
//! definition. A definition that fails validation is rejected by the
//! [`bot::manager::manager::Manager`] when it is loaded and never runs.

pub mod bot;
