pub mod data_api;
pub mod liquidity_api;
pub mod position_api;
pub(crate) mod utils;

pub use data_api::ClmmDataApi;
pub use position_api::{ClmmPositionApi, select_position};
