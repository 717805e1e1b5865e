use as_any::AsAny;
use gsm_core::bts_entities::BtsEntity;
use gsm_config::SharedConfig;
use gsm_saps::SapMsg;
use crate::MessageQueue;

/// Trait for BTS control-plane entities
/// Used by MessageRouter for passing messages between entities
pub trait BtsEntityTrait: Send + AsAny {
    /// Returns the entity type identifier
    fn entity(&self) -> BtsEntity;

    /// Handle incoming SAP primitive
    fn rx_prim(&mut self, queue: &mut MessageQueue, message: SapMsg);

    /// Update configuration (optional)
    #[allow(dead_code)]
    fn set_config(&mut self, _config: SharedConfig) {}

    /// Called at the start of each router tick
    fn tick_start(&mut self, _queue: &mut MessageQueue, _tick: u64) { }

    /// Called at the end of each router tick
    fn tick_end(&mut self, _queue: &mut MessageQueue, _tick: u64) -> bool { false }
}
