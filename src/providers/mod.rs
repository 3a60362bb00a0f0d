pub mod api;
pub mod batch;
pub mod simulate;

pub use api::{ClmmApi, ClmmWalletProvider};
pub use batch::{BatchReceipt, DEADLINE_SECONDS, ReceiptLog};
