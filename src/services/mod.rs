pub mod lookup;
pub mod tracking;
