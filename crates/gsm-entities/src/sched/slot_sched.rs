use std::collections::HashMap;

use gsm_config::SharedConfig;
use gsm_core::{ChanNr, Direction, NUM_TIMESLOTS, PhysChanConfig, TrxNr};
use gsm_saps::ph::fields::encryption::{CipherAlg, Encryption};

use super::{L1Scheduler, LinkClass, SchedErr, SchedMode};

/// Scheduler state of one logical channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedChanState {
    pub dedic: bool,
    pub sacch: bool,
    pub mode: SchedMode,
    pub ul_cipher: Option<CipherAlg>,
    pub dl_cipher: Option<CipherAlg>,
    pub ul_access: bool,
    pub dl_cmr: u8,
}

struct SchedTrx {
    supported: Vec<PhysChanConfig>,
    pchan: [PhysChanConfig; NUM_TIMESLOTS],
    bcch_ccch: [bool; NUM_TIMESLOTS],
    chans: HashMap<ChanNr, SchedChanState>,
}

/// Scheduler keeping the per-timeslot channel state without producing bursts. Used by the
/// virtual BTS, where no radio is attached, and by the tests.
pub struct SlotScheduler {
    trx: Vec<SchedTrx>,
}

impl SlotScheduler {
    pub fn new(config: &SharedConfig) -> Self {
        let trx = config.config().trx.iter()
            .map(|t| SchedTrx {
                supported: t.supported_pchans.clone(),
                pchan: [PhysChanConfig::None; NUM_TIMESLOTS],
                bcch_ccch: [false; NUM_TIMESLOTS],
                chans: HashMap::new(),
            })
            .collect();
        Self { trx }
    }

    pub fn pchan(&self, trx: TrxNr, tn: u8) -> Option<PhysChanConfig> {
        self.trx.get(trx as usize).and_then(|t| t.pchan.get(tn as usize).copied())
    }

    pub fn bcch_ccch_active(&self, trx: TrxNr, tn: u8) -> bool {
        self.trx.get(trx as usize)
            .and_then(|t| t.bcch_ccch.get(tn as usize).copied())
            .unwrap_or(false)
    }

    /// Scheduler state of a logical channel, None if neither of its links is armed
    pub fn chan(&self, trx: TrxNr, chan_nr: ChanNr) -> Option<&SchedChanState> {
        self.trx.get(trx as usize).and_then(|t| t.chans.get(&chan_nr))
    }

    fn get_trx(&mut self, trx: TrxNr) -> Result<&mut SchedTrx, SchedErr> {
        self.trx.get_mut(trx as usize).ok_or(SchedErr::UnknownTrx(trx))
    }

    fn get_chan(&mut self, trx: TrxNr, chan_nr: ChanNr) -> Option<&mut SchedChanState> {
        self.trx.get_mut(trx as usize).and_then(|t| t.chans.get_mut(&chan_nr))
    }
}

impl L1Scheduler for SlotScheduler {
    fn set_pchan(&mut self, trx: TrxNr, tn: u8, pchan: PhysChanConfig) -> Result<(), SchedErr> {
        let t = self.get_trx(trx)?;
        if tn as usize >= NUM_TIMESLOTS {
            return Err(SchedErr::InvalidTimeslot(tn));
        }
        if !t.supported.contains(&pchan) {
            return Err(SchedErr::UnsupportedPchan(pchan));
        }

        tracing::debug!(trx = trx, "set_pchan TS{} {} -> {}", tn, t.pchan[tn as usize], pchan);
        if t.pchan[tn as usize] != pchan {
            // Logical channels do not survive a change of channel combination
            t.chans.retain(|c, _| c.tn() != tn);
            t.bcch_ccch[tn as usize] = false;
        }
        t.pchan[tn as usize] = pchan;
        Ok(())
    }

    fn set_lchan(&mut self, trx: TrxNr, chan_nr: ChanNr, link: LinkClass, active: bool) -> Result<(), SchedErr> {
        let t = self.get_trx(trx)?;
        let tn = chan_nr.tn();
        if t.pchan[tn as usize] == PhysChanConfig::None {
            return Err(SchedErr::NoPchan(tn));
        }

        tracing::debug!(trx = trx, "set_lchan {} {:?} active={}", chan_nr, link, active);
        let entry = t.chans.entry(chan_nr).or_default();
        match link {
            LinkClass::Dedic => entry.dedic = active,
            LinkClass::Sacch => entry.sacch = active,
        }
        if !entry.dedic && !entry.sacch {
            t.chans.remove(&chan_nr);
        }
        Ok(())
    }

    fn set_bcch_ccch(&mut self, trx: TrxNr, tn: u8, active: bool) -> Result<(), SchedErr> {
        let t = self.get_trx(trx)?;
        let pchan = t.pchan.get(tn as usize).copied().ok_or(SchedErr::InvalidTimeslot(tn))?;
        if !pchan.has_ccch() {
            return Err(SchedErr::NoPchan(tn));
        }
        t.bcch_ccch[tn as usize] = active;
        Ok(())
    }

    fn set_mode(&mut self, trx: TrxNr, chan_nr: ChanNr, mode: &SchedMode) {
        let Some(chan) = self.get_chan(trx, chan_nr) else {
            tracing::warn!(trx = trx, "set_mode for unarmed {}", chan_nr);
            return;
        };
        tracing::debug!(trx = trx, "set_mode {} {:?}", chan_nr, mode);
        chan.mode = mode.clone();
        chan.dl_cmr = mode.initial_mode;
    }

    fn set_cipher(&mut self, trx: TrxNr, chan_nr: ChanNr, dir: Direction, encr: &Encryption) {
        let Some(chan) = self.get_chan(trx, chan_nr) else {
            tracing::warn!(trx = trx, "set_cipher for unarmed {}", chan_nr);
            return;
        };
        let alg = if encr.alg.is_encrypting() { Some(encr.alg) } else { None };
        match dir {
            Direction::Ul => chan.ul_cipher = alg,
            Direction::Dl => chan.dl_cipher = alg,
            Direction::Both => {
                chan.ul_cipher = alg;
                chan.dl_cipher = alg;
            }
            Direction::None => {}
        }
    }

    fn set_ul_access(&mut self, trx: TrxNr, chan_nr: ChanNr, enable: bool) {
        if let Some(chan) = self.get_chan(trx, chan_nr) {
            chan.ul_access = enable;
        }
    }

    fn set_amr_cmr(&mut self, trx: TrxNr, chan_nr: ChanNr, cmr: u8) {
        if let Some(chan) = self.get_chan(trx, chan_nr) {
            chan.dl_cmr = cmr;
        }
    }
}
