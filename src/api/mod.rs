pub mod tba_client;

pub use tba_client::TbaClient;
