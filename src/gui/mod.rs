pub mod components;
pub mod constants;
pub mod feedback;
pub mod manager;
pub mod overlay;

pub use manager::{run_gui, Launch};
