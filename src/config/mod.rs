pub mod settings;

pub use settings::{ApiSettings, AppConfig, OutputSettings, RatingSettings};
