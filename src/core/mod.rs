pub mod catalog;
pub mod ledger;
pub mod log;
pub mod validate;

pub use catalog::{ActiveItems, AgendaCatalog};
pub use ledger::CheckInLedger;
