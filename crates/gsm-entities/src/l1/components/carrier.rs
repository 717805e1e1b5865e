use gsm_config::CfgTrx;
use gsm_core::power::to_mdb;
use gsm_core::{AdmState, ChanNr, NUM_TIMESLOTS, PhysChanConfig, TS_MAX_LCHAN, TrxNr};
use gsm_saps::ph::fields::lchan_params::LchanParams;

use crate::l1::L1Err;
use crate::l1::components::adm_state::OutstandingRamp;
use crate::l1::components::amr_loop::AmrLoop;
use crate::l1::components::provision::ProvisioningChannel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LchanState {
    #[default]
    None,
    Active,
}

/// Progress of the ciphering handshake of a logical channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CiphState {
    #[default]
    None,
    /// Uplink deciphering applied
    RxConf,
    /// Uplink deciphering and downlink enciphering applied
    RxTxConf,
}

#[derive(Debug, Clone, Default)]
pub struct Lchan {
    pub state: LchanState,
    pub ciph_state: CiphState,
    /// Parameters of the last activation or mode modify
    pub params: LchanParams,
    pub amr_loop: AmrLoop,
}

#[derive(Debug, Clone)]
pub struct Timeslot {
    pub tn: u8,
    /// Channel combination as configured through OML
    pub pchan: PhysChanConfig,
    /// Current and desired concrete kind of a dynamic timeslot
    pub dyn_is: PhysChanConfig,
    pub dyn_want: PhysChanConfig,
    pub tsc_set: u8,
    pub tsc: u8,
    /// Timeslot may be configured (slot mask)
    pub enabled: bool,
    /// Token of the SETSLOT a dynamic connect is waiting for
    pub pending_connect: Option<u32>,
    pub lchans: [Lchan; TS_MAX_LCHAN],
}

impl Timeslot {
    fn new(tn: u8, enabled: bool) -> Self {
        Self {
            tn,
            pchan: PhysChanConfig::None,
            dyn_is: PhysChanConfig::None,
            dyn_want: PhysChanConfig::None,
            tsc_set: 0,
            tsc: 0,
            enabled,
            pending_connect: None,
            lchans: std::array::from_fn(|_| Lchan::default()),
        }
    }
}

/// One transceiver with its eight timeslots
pub struct RadioCarrier {
    pub trx: TrxNr,
    pub adm_state: AdmState,

    /// Nominal output power as configured or reported by the transceiver
    pub nominal_power_dbm: i32,
    /// Maximum output power, equal to the nominal power
    pub p_max_out_mdbm: i32,
    /// Output power currently applied
    pub p_total_cur_mdbm: i32,
    /// Maximum power reduction signalled over OML
    pub max_power_red_db: i32,
    /// Configured reduction overriding the OML one
    pub forced_max_power_red_db: Option<i32>,

    pub arfcn: Option<u16>,
    pub bsic: Option<u8>,
    pub rf_muted: bool,

    pub prov: ProvisioningChannel,

    /// Ramp started on behalf of an administrative state change
    pub adm_ramp: Option<OutstandingRamp>,
    /// The ramp to operating power after power-on waits for the nominal power report
    pub ramp_after_nominal: bool,
    next_ramp_token: u32,

    pub ts: [Timeslot; NUM_TIMESLOTS],
}

impl RadioCarrier {
    pub fn new(trx: TrxNr, cfg: &CfgTrx) -> Self {
        Self {
            trx,
            adm_state: AdmState::Locked,
            nominal_power_dbm: cfg.nominal_power_dbm,
            p_max_out_mdbm: to_mdb(cfg.nominal_power_dbm),
            p_total_cur_mdbm: 0,
            max_power_red_db: 0,
            forced_max_power_red_db: cfg.forced_max_power_red_db,
            arfcn: None,
            bsic: None,
            rf_muted: true,
            prov: ProvisioningChannel::new(trx),
            adm_ramp: None,
            ramp_after_nominal: false,
            next_ramp_token: 1,
            ts: std::array::from_fn(|tn| Timeslot::new(tn as u8, cfg.slotmask & (1 << tn) != 0)),
        }
    }

    /// An administrative state change is waiting for its power ramp
    #[inline]
    pub fn procedure_pending(&self) -> bool {
        self.adm_ramp.is_some()
    }

    pub fn next_ramp_token(&mut self) -> u32 {
        let token = self.next_ramp_token;
        self.next_ramp_token = self.next_ramp_token.wrapping_add(1);
        token
    }

    pub fn lchan(&self, chan_nr: ChanNr) -> Result<&Lchan, L1Err> {
        let idx = chan_nr.lchan_idx().ok_or(L1Err::UnknownChannel(chan_nr))?;
        Ok(&self.ts[chan_nr.tn() as usize].lchans[idx])
    }

    pub fn lchan_mut(&mut self, chan_nr: ChanNr) -> Result<&mut Lchan, L1Err> {
        let idx = chan_nr.lchan_idx().ok_or(L1Err::UnknownChannel(chan_nr))?;
        Ok(&mut self.ts[chan_nr.tn() as usize].lchans[idx])
    }

    pub fn timeslot_mut(&mut self, tn: u8) -> Result<&mut Timeslot, L1Err> {
        self.ts.get_mut(tn as usize).ok_or(L1Err::ResourceNotAvailable)
    }
}

/// Looks up a carrier by its number
pub fn carrier_mut(carriers: &mut [RadioCarrier], trx: TrxNr) -> Result<&mut RadioCarrier, L1Err> {
    carriers.get_mut(trx as usize).ok_or(L1Err::UnknownTrx(trx))
}
