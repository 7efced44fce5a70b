//! Transaction state machine and in-flight transaction context

mod context;
mod machine;
mod state;

pub use context::TransactionContext;
pub use machine::Engine;
pub use state::State;
