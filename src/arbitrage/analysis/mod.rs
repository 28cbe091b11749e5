// Cost analysis: slippage models and the two-leg fee model built on them.

pub mod fee;
pub mod math;

pub use fee::*;
pub use math::*;
