pub mod models;
pub mod schedule;

pub use models::*;
pub use schedule::qualification_schedule;
