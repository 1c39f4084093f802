pub mod usage;
pub mod arguments;
