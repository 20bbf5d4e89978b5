// core.rs splits responsibilities into submodules: chain management and
// block sealing, balance state, and chain integrity validation.
pub mod chain;
pub mod state;
pub mod validation;

pub use chain::*;
pub use state::*;
pub use validation::*;
