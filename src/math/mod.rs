pub mod range;
pub mod slippage;
pub mod tick;
