pub mod slot_sched;

use gsm_core::{ChanNr, Direction, PhysChanConfig, TrxNr};
use gsm_saps::ph::fields::chan_mode::{RslCmode, TchMode};
use gsm_saps::ph::fields::encryption::Encryption;

pub use slot_sched::SlotScheduler;

/// Link of a logical channel that can be armed separately
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    /// The dedicated channel itself (TCH or SDCCH, or the CBCH)
    Dedic,
    /// Its slow associated control channel
    Sacch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedErr {
    UnknownTrx(TrxNr),
    InvalidTimeslot(u8),
    /// The transceiver cannot schedule this channel combination
    UnsupportedPchan(PhysChanConfig),
    /// The timeslot carries no channel combination the logical channel could live on
    NoPchan(u8),
}

/// Mode settings of one logical channel as handed to the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchedMode {
    pub rsl_cmode: RslCmode,
    pub tch_mode: TchMode,
    /// AMR codec modes of the active codec set, most robust first
    pub amr_modes: Vec<u8>,
    /// Index of the codec mode to start with
    pub initial_mode: u8,
    /// Uplink access bursts are to be decoded (handover or group call)
    pub access_signalling: bool,
}

impl SchedMode {
    pub fn codecs(&self) -> usize {
        self.amr_modes.len()
    }
}

/// Command interface of the per-timeslot burst scheduler. The scheduler is owned by the L1
/// entity and all calls complete synchronously.
pub trait L1Scheduler: Send {
    /// Configure the channel combination of a timeslot
    fn set_pchan(&mut self, trx: TrxNr, tn: u8, pchan: PhysChanConfig) -> Result<(), SchedErr>;

    /// Arm or disarm one link of a logical channel
    fn set_lchan(&mut self, trx: TrxNr, chan_nr: ChanNr, link: LinkClass, active: bool) -> Result<(), SchedErr>;

    /// Start or stop FCCH/SCH/BCCH/CCCH on a CCCH-carrying timeslot
    fn set_bcch_ccch(&mut self, trx: TrxNr, tn: u8, active: bool) -> Result<(), SchedErr>;

    fn set_mode(&mut self, trx: TrxNr, chan_nr: ChanNr, mode: &SchedMode);

    /// Apply ciphering for one direction, `Direction::Ul` or `Direction::Dl`
    fn set_cipher(&mut self, trx: TrxNr, chan_nr: ChanNr, dir: Direction, encr: &Encryption);

    /// Toggle decoding of uplink access bursts. Ignored for channels the scheduler does not know.
    fn set_ul_access(&mut self, trx: TrxNr, chan_nr: ChanNr, enable: bool);

    /// Set the codec mode requested from the mobile (downlink CMR)
    fn set_amr_cmr(&mut self, trx: TrxNr, chan_nr: ChanNr, cmr: u8);
}
