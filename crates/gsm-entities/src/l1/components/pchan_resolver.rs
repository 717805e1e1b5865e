use gsm_core::pchan::to_slot_type;
use gsm_core::{CCCH_LCHAN, ChanNr, PhysChanConfig};
use gsm_saps::ph::fields::lchan_params::RelActKind;
use gsm_saps::trxc::TscCfg;

use crate::MessageQueue;
use crate::l1::L1Err;
use crate::l1::components::carrier::{LchanState, RadioCarrier, Timeslot};
use crate::sched::{L1Scheduler, LinkClass};

/// Concrete kind a timeslot currently operates as. Dynamic timeslots report the kind they
/// switched to, which is only defined while no switch is in progress.
pub fn effective_kind(ts: &Timeslot) -> PhysChanConfig {
    match ts.pchan {
        PhysChanConfig::TchFPdch | PhysChanConfig::OsmoDyn => {
            assert_eq!(ts.dyn_is, ts.dyn_want, "TS{} resolved during a dynamic switch", ts.tn);
            ts.dyn_is
        }
        other => other,
    }
}

/// Initial concrete kind of a freshly configured dynamic timeslot
pub fn initial_dyn_kind(pchan: PhysChanConfig) -> PhysChanConfig {
    match pchan {
        PhysChanConfig::TchFPdch => PhysChanConfig::TchF,
        _ => PhysChanConfig::None,
    }
}

/// Configure timeslot `tn` as `kind`: scheduler first, then the always-on channels the kind
/// carries, then the transceiver. Returns the token of the SETSLOT command.
pub fn apply(
    carrier: &mut RadioCarrier,
    sched: &mut dyn L1Scheduler,
    queue: &mut MessageQueue,
    tn: u8,
    kind: PhysChanConfig,
) -> Result<u32, L1Err> {
    if kind.is_dynamic() {
        return Err(L1Err::InvalidTarget);
    }
    let trx = carrier.trx;
    let ts = carrier.timeslot_mut(tn)?;
    if !ts.enabled {
        tracing::debug!(trx = trx, "TS{} disabled by slot mask", tn);
        return Err(L1Err::ResourceNotAvailable);
    }

    if let Err(e) = sched.set_pchan(trx, tn, kind) {
        tracing::warn!(trx = trx, "scheduler refused {} on TS{}: {:?}", kind, tn, e);
        return Err(L1Err::ResourceNotAvailable);
    }

    // The scheduler treats both CBCH variants alike, so the SDCCH/4 address serves both
    if kind.has_cbch() {
        if let Err(e) = sched.set_lchan(trx, ChanNr::cbch4(tn), LinkClass::Dedic, true) {
            tracing::warn!(trx = trx, "failed to activate CBCH on TS{}: {:?}", tn, e);
        }
    }
    if kind.has_ccch() {
        if let Err(e) = sched.set_bcch_ccch(trx, tn, true) {
            tracing::warn!(trx = trx, "failed to activate BCCH/CCCH on TS{}: {:?}", tn, e);
        }
        let lchan = &mut ts.lchans[CCCH_LCHAN];
        lchan.params.rel_act_kind = RelActKind::Oml;
        lchan.state = LchanState::Active;
    }

    let slot_type = to_slot_type(kind);
    let tsc = if ts.tsc_set != 0 {
        Some(TscCfg { set: ts.tsc_set + 1, code: ts.tsc })
    } else {
        None
    };
    tracing::info!(trx = trx, "Configuring slot type {} (pchan {}) on TS{}", slot_type, kind, tn);
    Ok(carrier.prov.set_timeslot(queue, tn, slot_type, tsc))
}
