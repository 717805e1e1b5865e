#![allow(dead_code)]

pub mod entity_trait;
pub mod l1;
pub mod messagerouter;
pub mod pwr;
pub mod sched;
pub mod trxc;

// Re-export commonly used items from router
pub use entity_trait::BtsEntityTrait;
pub use messagerouter::{MessagePrio, MessageQueue, MessageRouter};
