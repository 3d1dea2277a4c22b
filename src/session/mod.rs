/// Session management module - Gateway

mod gate;

pub use gate::{is_valid_email, Authenticated, Session};
