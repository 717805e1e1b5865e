pub mod components;
pub mod l1_bs;
pub mod l1_err;

pub use l1_bs::TrxL1Bs;
pub use l1_err::L1Err;
