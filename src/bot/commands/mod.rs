pub mod commands;
pub mod general;
pub mod utility;
