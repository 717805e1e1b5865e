pub mod component_test;
pub mod sink;

pub use component_test::{ComponentTest, TestL1, TestTrxc, default_test_config};
