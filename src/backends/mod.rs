//! Background remover implementations
//!
//! - Command backend (pipes images through an external program)
//! - Mock backend (scripted outcomes for tests and demos)

pub mod command;
pub mod mock;

pub use self::command::CommandRemover;
pub use self::mock::{MockBehavior, MockRemover, MOCK_PNG_BYTES};
