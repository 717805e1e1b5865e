pub mod trxc_bs;
pub mod trxc_dev;
pub mod virt_dev;

pub use trxc_bs::TrxcBs;
pub use trxc_dev::{TrxcDev, TrxcDevError};
pub use virt_dev::VirtTrxcDev;
