// Gateway module for app - follows the Train Station Pattern
// All external access must go through this gateway

mod config;
mod controller;
mod report;

pub use config::{get_config_dir, init_config, load_config, save_config, Config, DisplayConfig};
pub use controller::{Controller, ScreenRequest, TablePlan};
pub use report::{FileReport, SavedOutput, ScreenReport};
