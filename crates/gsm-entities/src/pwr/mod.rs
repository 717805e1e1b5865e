pub mod ramp_bs;

pub use ramp_bs::PowerRampBs;
