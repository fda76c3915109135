pub mod export;
pub mod points;

pub use export::write_chart;
pub use points::{Point, StatLine};
