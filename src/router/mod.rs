/// Navigation router - Gateway

mod screen;

pub use screen::{route, Screen};
