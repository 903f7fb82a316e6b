pub mod direction;
pub mod error;
pub mod supervisor;

pub use direction::Direction;
pub use error::SupervisorError;
pub use supervisor::{Decision, RunState, Supervisor, SupervisorConfig};
