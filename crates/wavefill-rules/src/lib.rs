mod balancing;
pub mod compiler;
pub mod defaults;
pub mod loader;
pub mod validator;

pub use compiler::{compile, CompiledRules, PropagationMatrix};
pub use loader::{PatternDef, PatternSetDef};
