use gsm_config::{SharedConfig, StackConfig};
use gsm_core::bts_entities::BtsEntity;
use gsm_core::Sap;
use gsm_entities::{BtsEntityTrait, MessageRouter};
use gsm_saps::{SapMsg, SapMsgInner};

use gsm_entities::l1::TrxL1Bs;
use gsm_entities::pwr::PowerRampBs;
use gsm_entities::sched::SlotScheduler;
use gsm_entities::trxc::{TrxcBs, VirtTrxcDev};

use super::sink::Sink;

/// Creates a default config for testing. It can still be modified as needed
/// before passing it to the ComponentTest constructor
pub fn default_test_config(num_trx: usize) -> StackConfig {
    let mut cfg = StackConfig::new(num_trx);
    for trx in cfg.trx.iter_mut() {
        trx.nominal_power_dbm = 20;
    }
    // Large steps keep ramps short
    cfg.power_ramp.step_size_db = 10;
    cfg.power_ramp.max_initial_power_dbm = 0;
    cfg
}

pub type TestL1 = TrxL1Bs<SlotScheduler>;
pub type TestTrxc = TrxcBs<VirtTrxcDev>;

/// Infrastructure for testing BTS control-plane entities
/// Quick setup of all components for end-to-end testing
/// Supports optional sinks for collecting messages for later inspection
pub struct ComponentTest {
    pub config: SharedConfig,
    pub router: MessageRouter,
    pub sinks: Vec<BtsEntity>,
}

impl ComponentTest {

    pub fn new(config: StackConfig) -> Self {
        let shared_config = SharedConfig::from_config(config);
        let mr = MessageRouter::new(shared_config.clone());

        Self {
            config: shared_config,
            router: mr,
            sinks: vec![],
        }
    }

    pub fn get_shared_config(&self) -> SharedConfig {
        self.config.clone()
    }

    pub fn populate_entities(&mut self, components: Vec<BtsEntity>, sinks: Vec<BtsEntity>) {

        // Setup the stack with all requested components
        for component in components.iter() {
            match component {
                BtsEntity::L1 => {
                    let sched = SlotScheduler::new(&self.config);
                    let l1 = TrxL1Bs::new(self.config.clone(), sched);
                    self.register_entity(l1);
                }
                BtsEntity::Trxc => {
                    let dev = VirtTrxcDev::new(&self.config);
                    let trxc = TrxcBs::new(self.config.clone(), dev);
                    self.register_entity(trxc);
                }
                BtsEntity::Pwr => {
                    let pwr = PowerRampBs::new(self.config.clone());
                    self.register_entity(pwr);
                }
                _ => {
                    panic!("Component not implemented: {:?}", component);
                }
            }
        }

        // Create sinks for debugging / message collection
        self.create_sinks(sinks);
    }

    fn create_sinks(&mut self, sinks: Vec<BtsEntity>) {

        for sink in sinks.iter() {
            assert!(!self.sinks.contains(sink), "Sink already exists: {:?}", sink);
            assert!(self.router.get_entity(*sink).is_none(), "Sink already registered as entity: {:?}", sink);

            self.sinks.push(*sink);
            let sink = Sink::new(*sink);
            self.router.register_entity(Box::new(sink));
        }
    }

    pub fn register_entity<T: 'static + BtsEntityTrait>(&mut self, entity: T) {
        self.router.register_entity(Box::new(entity));
    }

    pub fn run_stack(&mut self, num_ticks: Option<usize>) {
        self.router.run_stack(num_ticks, None);
    }

    pub fn submit_message(&mut self, message: SapMsg) {
        self.router.submit_message(message);
    }

    /// Submits a primitive as sent by `src` to L1
    pub fn submit_to_l1(&mut self, sap: Sap, src: BtsEntity, msg: SapMsgInner) {
        self.router.submit_message(SapMsg::new(sap, src, BtsEntity::L1, msg));
    }

    pub fn deliver_all_messages(&mut self) {
        self.router.deliver_all_messages();
    }

    pub fn l1(&mut self) -> &mut TestL1 {
        self.router.get_entity(BtsEntity::L1)
            .and_then(|e| e.as_any_mut().downcast_mut::<TestL1>())
            .expect("L1 not registered")
    }

    pub fn trxc(&mut self) -> &mut TestTrxc {
        self.router.get_entity(BtsEntity::Trxc)
            .and_then(|e| e.as_any_mut().downcast_mut::<TestTrxc>())
            .expect("Trxc not registered")
    }

    pub fn pwr(&mut self) -> &mut PowerRampBs {
        self.router.get_entity(BtsEntity::Pwr)
            .and_then(|e| e.as_any_mut().downcast_mut::<PowerRampBs>())
            .expect("Pwr not registered")
    }

    pub fn dump_sinks(&mut self) -> Vec<SapMsg> {
        let mut msgs = vec![];
        for sink in self.sinks.iter() {
            if let Some(component) = self.router.get_entity(*sink) {
                if let Some(sink) = component.as_any_mut().downcast_mut::<Sink>() {
                    let mut sink_msgs = sink.take_msgqueue();
                    msgs.append(&mut sink_msgs);
                }
            }
        }
        msgs
    }
}
