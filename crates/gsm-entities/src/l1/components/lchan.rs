//! Activation, mode changes, ciphering and release of logical channels

use gsm_core::bts_entities::BtsEntity;
use gsm_core::{ChanNr, Direction, Sap, TrxNr};
use gsm_saps::ph::fields::encryption::Encryption;
use gsm_saps::ph::fields::lchan_params::{LchanParams, RelActKind};
use gsm_saps::ph::{MphConfKind, MphInfoConf};
use gsm_saps::{SapMsg, SapMsgInner};

use crate::MessageQueue;
use crate::l1::L1Err;
use crate::l1::components::carrier::{CiphState, Lchan, LchanState, RadioCarrier};
use crate::sched::{L1Scheduler, LinkClass, SchedMode};

fn send_conf(queue: &mut MessageQueue, trx: TrxNr, chan_nr: ChanNr, kind: MphConfKind) {
    tracing::debug!(trx = trx, "-> MPH-INFO {:?} CONF {}", kind, chan_nr);
    queue.push_back(SapMsg::new(
        Sap::PhSap,
        BtsEntity::L1,
        BtsEntity::Rsl,
        SapMsgInner::MphInfoConf(MphInfoConf { trx, chan_nr, kind, cause: 0 }),
    ));
}

/// Looks up the addressed channel, refusing the common control channel addresses
fn checked_lchan(carrier: &mut RadioCarrier, chan_nr: ChanNr) -> Result<&mut Lchan, L1Err> {
    let lchan = carrier.lchan_mut(chan_nr)?;
    if chan_nr.is_reserved() {
        return Err(L1Err::PermissionDenied(chan_nr));
    }
    Ok(lchan)
}

fn set_link(sched: &mut dyn L1Scheduler, trx: TrxNr, chan_nr: ChanNr, link: LinkClass, active: bool) {
    if let Err(e) = sched.set_lchan(trx, chan_nr, link, active) {
        tracing::warn!(trx = trx, "failed to set {:?} of {} active={}: {:?}", link, chan_nr, active, e);
    }
}

/// Push channel mode and AMR settings to the scheduler, and (re)start the adaptation loop
fn push_mode(sched: &mut dyn L1Scheduler, trx: TrxNr, chan_nr: ChanNr, lchan: &mut Lchan, access_signalling: bool) {
    let mode = &lchan.params.mode;
    let is_amr = mode.tch_mode.is_amr();
    let sched_mode = SchedMode {
        rsl_cmode: mode.rsl_cmode,
        tch_mode: mode.tch_mode,
        amr_modes: if is_amr { mode.amr.modes.iter().map(|m| m.mode).collect() } else { vec![] },
        initial_mode: if is_amr { mode.amr.initial_mode() } else { 0 },
        access_signalling,
    };
    sched.set_mode(trx, chan_nr, &sched_mode);

    if is_amr {
        lchan.amr_loop.configure(&mode.amr);
    }
    lchan.amr_loop.set_enabled(is_amr);
}

/// Ciphering state follows the algorithm, A5/0 never counts as ciphered
fn ciph_state_from_alg(lchan: &Lchan) -> CiphState {
    if lchan.params.encr.alg.is_encrypting() {
        CiphState::RxTxConf
    } else {
        CiphState::None
    }
}

pub fn activate(
    carrier: &mut RadioCarrier,
    sched: &mut dyn L1Scheduler,
    queue: &mut MessageQueue,
    chan_nr: ChanNr,
    params: LchanParams,
) -> Result<(), L1Err> {
    let trx = carrier.trx;
    let lchan = checked_lchan(carrier, chan_nr)?;
    tracing::info!(trx = trx, "activating {} ({}, {})", chan_nr, params.mode.tch_mode, params.encr.alg);

    let access_signalling = params.ho_enabled || params.asci;
    lchan.params = params;

    set_link(sched, trx, chan_nr, LinkClass::Dedic, true);
    set_link(sched, trx, chan_nr, LinkClass::Sacch, true);
    push_mode(sched, trx, chan_nr, lchan, access_signalling);
    lchan.state = LchanState::Active;

    apply_ciphering(sched, trx, chan_nr, lchan, true, true);
    lchan.ciph_state = ciph_state_from_alg(lchan);

    send_conf(queue, trx, chan_nr, MphConfKind::Activate);
    Ok(())
}

/// Update mode and ciphering of a channel. Access burst decoding is switched off.
/// Ciphering is only pushed to the scheduler for active channels.
pub fn modify(
    carrier: &mut RadioCarrier,
    sched: &mut dyn L1Scheduler,
    chan_nr: ChanNr,
    params: LchanParams,
) -> Result<(), L1Err> {
    let trx = carrier.trx;
    let lchan = carrier.lchan_mut(chan_nr)?;
    tracing::info!(trx = trx, "modifying {} ({}, {})", chan_nr, params.mode.tch_mode, params.encr.alg);

    lchan.params = params;
    push_mode(sched, trx, chan_nr, lchan, false);

    // The handshake needs an active channel, the resulting state follows the algorithm anyway
    if lchan.state == LchanState::Active {
        apply_ciphering(sched, trx, chan_nr, lchan, true, true);
    }
    lchan.ciph_state = ciph_state_from_alg(lchan);
    Ok(())
}

/// Release a channel, or only its SACCH. Channels activated for immediate re-activation
/// are armed again right away and stay active.
pub fn deactivate(
    carrier: &mut RadioCarrier,
    sched: &mut dyn L1Scheduler,
    queue: &mut MessageQueue,
    chan_nr: ChanNr,
    sacch_only: bool,
) -> Result<(), L1Err> {
    let trx = carrier.trx;
    let lchan = checked_lchan(carrier, chan_nr)?;

    // SACCH goes first in any case
    set_link(sched, trx, chan_nr, LinkClass::Sacch, false);
    if sacch_only {
        tracing::info!(trx = trx, "deactivating SACCH of {}", chan_nr);
        return Ok(());
    }

    tracing::info!(trx = trx, "deactivating {}", chan_nr);
    set_link(sched, trx, chan_nr, LinkClass::Dedic, false);
    lchan.amr_loop.set_enabled(false);
    lchan.ciph_state = CiphState::None;

    if lchan.params.rel_act_kind == RelActKind::React {
        tracing::info!(trx = trx, "re-activating {}", chan_nr);
        lchan.params.rel_act_kind = RelActKind::Rsl;
        set_link(sched, trx, chan_nr, LinkClass::Dedic, true);
        set_link(sched, trx, chan_nr, LinkClass::Sacch, true);
        push_mode(sched, trx, chan_nr, lchan, false);
        lchan.state = LchanState::Active;
    } else {
        lchan.state = LchanState::None;
    }

    send_conf(queue, trx, chan_nr, MphConfKind::Deactivate);
    Ok(())
}

/// Ciphering handshake. Uplink is applied before downlink, and a downlink request implies
/// uplink unless that is already confirmed.
fn apply_ciphering(sched: &mut dyn L1Scheduler, trx: TrxNr, chan_nr: ChanNr, lchan: &mut Lchan, uplink: bool, downlink: bool) {
    if uplink {
        sched.set_cipher(trx, chan_nr, Direction::Ul, &lchan.params.encr);
        lchan.ciph_state = CiphState::RxConf;
    }
    if downlink {
        if lchan.ciph_state != CiphState::RxConf {
            sched.set_cipher(trx, chan_nr, Direction::Ul, &lchan.params.encr);
        }
        sched.set_cipher(trx, chan_nr, Direction::Dl, &lchan.params.encr);
        lchan.ciph_state = CiphState::RxTxConf;
    }
}

/// Start ciphering, with a new algorithm and key if given. Ignored for channels that are
/// not active.
pub fn set_ciphering(
    carrier: &mut RadioCarrier,
    sched: &mut dyn L1Scheduler,
    chan_nr: ChanNr,
    encr: Option<Encryption>,
    uplink: bool,
    downlink: bool,
) -> Result<(), L1Err> {
    let trx = carrier.trx;
    let lchan = carrier.lchan_mut(chan_nr)?;
    if lchan.state != LchanState::Active {
        tracing::debug!(trx = trx, "ignoring ciphering request for inactive {}", chan_nr);
        return Ok(());
    }
    if let Some(encr) = encr {
        lchan.params.encr = encr;
    }

    apply_ciphering(sched, trx, chan_nr, lchan, uplink, downlink);
    if !lchan.params.encr.alg.is_encrypting() {
        lchan.ciph_state = CiphState::None;
    }
    tracing::info!(trx = trx, "{} ciphering {:?} ({})", chan_nr, lchan.ciph_state, lchan.params.encr.alg);
    Ok(())
}

pub fn set_uplink_access(carrier: &mut RadioCarrier, sched: &mut dyn L1Scheduler, chan_nr: ChanNr, enable: bool) -> Result<(), L1Err> {
    // Address check only, the scheduler ignores channels it has no entry for
    carrier.lchan(chan_nr)?;
    tracing::debug!(trx = carrier.trx, "{} uplink access bursts {}", chan_nr, if enable { "on" } else { "off" });
    sched.set_ul_access(carrier.trx, chan_nr, enable);
    Ok(())
}
