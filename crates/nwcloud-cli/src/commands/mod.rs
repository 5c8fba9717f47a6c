pub mod status;
pub mod toggle;
