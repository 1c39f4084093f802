pub mod def;
pub mod state;
