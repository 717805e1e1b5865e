use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use gsm_config::SharedConfig;
use gsm_core::bts_entities::BtsEntity;
use gsm_saps::SapMsg;

use crate::BtsEntityTrait;


#[derive(Default)]
pub enum MessagePrio {
    Immediate,
    #[default]
    Normal,
}

pub struct MessageQueue {
    messages: VecDeque<SapMsg>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self {
            messages: VecDeque::new(),
        }
    }

    pub fn push_back(&mut self, message: SapMsg) {
        self.messages.push_back(message);
    }

    pub fn push_prio(&mut self, message: SapMsg, prio: MessagePrio) {
        match prio {
            MessagePrio::Immediate => {
                // Insert at the front for immediate processing
                self.messages.push_front(message);
            }
            MessagePrio::Normal => {
                // Insert at the back for normal processing
                self.messages.push_back(message);
            }
        }
    }

    pub fn pop_front(&mut self) -> Option<SapMsg> {
        self.messages.pop_front()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MessageRouter {
    /// While currently unused by the MessageRouter, this may change in the future
    /// As such, we provide the MessageRouter with a copy of the SharedConfig
    _config: SharedConfig,
    entities: HashMap<BtsEntity, Box<dyn BtsEntityTrait>>,
    msg_queue: MessageQueue,

    /// Number of completed ticks. Entities use it to pace ramps and deferred responses.
    tick: u64,

    /// Wall-clock pacing between ticks, None runs ticks back to back
    tick_interval: Option<Duration>,
}


impl MessageRouter {
    pub fn new(config: SharedConfig) -> Self {
        Self {
            entities: HashMap::new(),
            msg_queue: MessageQueue::new(),
            _config: config,
            tick: 0,
            tick_interval: None,
        }
    }

    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub fn get_tick(&self) -> u64 {
        self.tick
    }

    pub fn register_entity(&mut self, entity: Box<dyn BtsEntityTrait>) {
        let comp_type = entity.entity();
        tracing::debug!("register_entity {:?}", comp_type);
        self.entities.insert(comp_type, entity);
    }

    /// Returns a mut ref to a component of the requested type
    pub fn get_entity(&mut self, comp: BtsEntity) -> Option<&mut dyn BtsEntityTrait> {
        self.entities.get_mut(&comp).map(|entity| entity.as_mut())
    }

    pub fn submit_message(&mut self, message: SapMsg) {
        tracing::debug!("submit_message {:?}: {:?} -> {:?} {}", message.get_sap(), message.get_source(), message.get_dest(), message.msg);
        self.msg_queue.push_back(message);
    }

    pub fn deliver_message(&mut self) {

        let message = self.msg_queue.pop_front();
        if let Some(message) = message {

            tracing::debug!("deliver_message: got {:?}: {:?} -> {:?} {}", message.get_sap(), message.get_source(), message.get_dest(), message.msg);

            // Determine the destination entity
            let dest = message.get_dest();

            // Check if the destination entity registered and deliver if found
            if let Some(entity) = self.entities.get_mut(dest) {
                entity.rx_prim(&mut self.msg_queue, message);
            } else {
                tracing::warn!("deliver_message: entity {:?} not found for {:?}: {:?} -> {:?}", dest, message.get_sap(), message.get_source(), message.get_dest());
            }
        }
    }

    pub fn deliver_all_messages(&mut self) {
        while !self.msg_queue.is_empty() {
            self.deliver_message();
        }
    }

    pub fn get_msgqueue_len(&self) -> usize {
        self.msg_queue.len()
    }

    pub fn tick_start(&mut self) {

        tracing::trace!("--- tick {} ----------------------------", self.tick);

        // Call tick on all entities
        for entity in self.entities.values_mut() {
            entity.tick_start(&mut self.msg_queue, self.tick);
        }
    }

    /// Executes all end-of-tick functions. The transceiver link goes first, so responses
    /// it produces are processed within the same tick.
    pub fn tick_end(&mut self) {

        tracing::trace!("############################ end-of-tick ############################");

        let target = BtsEntity::Trxc;
        if let Some(entity) = self.entities.get_mut(&target) {
            tracing::trace!("tick_end for entity {:?}", target);
            entity.tick_end(&mut self.msg_queue, self.tick);
        }
        self.deliver_all_messages();

        // Then call tick_end on all other entities
        for entity in self.entities.values_mut() {
            if entity.entity() == BtsEntity::Trxc {
                continue;
            }
            entity.tick_end(&mut self.msg_queue, self.tick);
        }
        self.deliver_all_messages();

        self.tick += 1;
    }


    /// Runs the full stack either forever or for a specified number of ticks.
    /// When a `running` flag is given, the stack stops as soon as it is cleared.
    pub fn run_stack(&mut self, num_ticks: Option<usize>, running: Option<Arc<AtomicBool>>) {

        let mut ticks: usize = 0;

        loop {
            // Send tick_start event
            self.tick_start();

            // Deliver messages until queue empty
            while self.get_msgqueue_len() > 0 {
                self.deliver_all_messages();
            }

            // Send tick_end event and process final messages
            self.tick_end();

            // Check if we should stop
            ticks += 1;
            if let Some(num_ticks) = num_ticks {
                if ticks >= num_ticks {
                    break;
                }
            }
            if let Some(ref running) = running {
                if !running.load(Ordering::SeqCst) {
                    tracing::info!("Stopping stack after {} ticks", ticks);
                    break;
                }
            }

            if let Some(interval) = self.tick_interval {
                std::thread::sleep(interval);
            }
        }
    }
}
