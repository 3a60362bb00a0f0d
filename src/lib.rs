#![allow(async_fn_in_trait)]
#![allow(private_bounds)]
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]

pub mod apis;
pub mod builders;
pub mod constants;
pub mod index;
pub mod math;
pub mod providers;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;

pub use apis::{ClmmDataApi, ClmmPositionApi};
pub use providers::ClmmApi;
pub use types::{ClmmSdkError, OperationReport};
