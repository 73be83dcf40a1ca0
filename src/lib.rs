pub mod branch;
pub mod predictor;
pub mod sim;
pub mod sweep;
pub mod trace;

pub use branch::*;
pub use predictor::*;
pub use sim::*;
pub use sweep::*;
pub use trace::*;
