pub mod config;
pub mod epic;
pub mod pool;
pub mod task;

pub use config::*;
pub use epic::*;
pub use pool::*;
pub use task::*;
