pub mod error;

pub use error::{KvError, Result};
