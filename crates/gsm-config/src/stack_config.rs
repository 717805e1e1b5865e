use std::sync::Arc;

use gsm_core::{NUM_TIMESLOTS, PhysChanConfig};

/// Maximum number of carriers a single BTS instance drives
pub const MAX_TRX: usize = 8;

/// Per-carrier (TRX) configuration
#[derive(Debug, Clone)]
pub struct CfgTrx {
    /// Nominal output power in dBm. The transceiver may report a different
    /// value after power-on, which then takes precedence.
    pub nominal_power_dbm: i32,

    /// Forced reduction of the maximum output power in dB. When set, it overrides the
    /// reduction signalled over OML and power ramps bypass the nominal power limit.
    pub forced_max_power_red_db: Option<i32>,

    /// Bit n set means timeslot n may be configured
    pub slotmask: u8,

    /// Physical channel kinds the transceiver is able to schedule
    pub supported_pchans: Vec<PhysChanConfig>,
}

impl Default for CfgTrx {
    fn default() -> Self {
        Self {
            nominal_power_dbm: default_nominal_power_dbm(),
            forced_max_power_red_db: None,
            slotmask: 0xff,
            supported_pchans: default_supported_pchans(),
        }
    }
}

#[inline]
fn default_nominal_power_dbm() -> i32 {
    23
}

/// All concrete kinds. Dynamic kinds are resolved before reaching the scheduler.
pub fn default_supported_pchans() -> Vec<PhysChanConfig> {
    vec![
        PhysChanConfig::None,
        PhysChanConfig::Ccch,
        PhysChanConfig::CcchSdcch4,
        PhysChanConfig::CcchSdcch4Cbch,
        PhysChanConfig::TchF,
        PhysChanConfig::TchH,
        PhysChanConfig::Sdcch8Sacch8c,
        PhysChanConfig::Sdcch8Sacch8cCbch,
        PhysChanConfig::Pdch,
    ]
}

/// Settings for the power ramp executor
#[derive(Debug, Clone)]
pub struct CfgPowerRamp {
    /// Power increase per ramp step, in dB
    pub step_size_db: i32,
    /// A ramp-up starts from at most this output power, in dBm
    pub max_initial_power_dbm: i32,
}

impl Default for CfgPowerRamp {
    fn default() -> Self {
        Self {
            step_size_db: 2,
            max_initial_power_dbm: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StackConfig {
    pub debug_log: Option<String>,

    /// One entry per carrier, index is the TRX number
    pub trx: Vec<CfgTrx>,

    pub power_ramp: CfgPowerRamp,
}

impl StackConfig {
    pub fn new(num_trx: usize) -> Self {
        StackConfig {
            debug_log: None,
            trx: vec![CfgTrx::default(); num_trx],
            power_ramp: CfgPowerRamp::default(),
        }
    }

    /// Validate that all required configuration fields are properly set.
    pub fn validate(&self) -> Result<(), &str> {
        if self.trx.is_empty() {
            return Err("at least one trx must be configured");
        }
        if self.trx.len() > MAX_TRX {
            return Err("too many trx configured");
        }

        for trx in self.trx.iter() {
            if let Some(red) = trx.forced_max_power_red_db {
                if red < 0 {
                    return Err("forced_max_power_red must not be negative");
                }
            }
            if trx.supported_pchans.iter().any(|p| p.is_dynamic()) {
                return Err("supported_pchans may only list concrete channel kinds");
            }
        }

        // C0 carries the BCCH, which must be schedulable on TS0
        let c0 = &self.trx[0];
        if c0.slotmask & 0x01 == 0 {
            return Err("timeslot 0 of trx 0 must be enabled");
        }
        if !c0.supported_pchans.iter().any(|p| p.has_ccch()) {
            return Err("trx 0 must support a CCCH channel combination");
        }

        if self.power_ramp.step_size_db <= 0 {
            return Err("power_ramp step_size must be positive");
        }

        Ok(())
    }

    /// Number of timeslots enabled on the given carrier
    pub fn enabled_timeslots(&self, trx: usize) -> usize {
        (0..NUM_TIMESLOTS)
            .filter(|tn| self.trx[trx].slotmask & (1 << tn) != 0)
            .count()
    }
}

/// Global shared configuration. Immutable after construction.
#[derive(Clone)]
pub struct SharedConfig {
    cfg: Arc<StackConfig>,
}

impl SharedConfig {
    pub fn new(num_trx: usize) -> Self {
        Self::from_config(StackConfig::new(num_trx))
    }

    pub fn from_config(cfg: StackConfig) -> Self {
        // Check config for validity before returning the SharedConfig object
        match cfg.validate() {
            Ok(_) => {}
            Err(e) => panic!("Invalid stack configuration: {}", e),
        }

        Self { cfg: Arc::new(cfg) }
    }

    /// Access immutable config.
    pub fn config(&self) -> Arc<StackConfig> {
        Arc::clone(&self.cfg)
    }
}
