pub mod app;
pub mod cli;
pub mod constants;
pub mod files;
pub mod imaging;
pub mod router;
pub mod session;
pub mod tabular;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config, Controller, ScreenRequest};
pub use files::{OutputBuffer, UploadedFile};
pub use router::{route, Screen};
pub use session::Session;
pub use utils::SweeperError;
