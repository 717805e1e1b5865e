use gsm_core::bts_entities::BtsEntity;
use gsm_core::power::{RF_DISABLED_MDBM, from_mdb, to_mdb};
use gsm_core::{AdmState, Sap};
use gsm_saps::pwr::{PowerChangedInd, PowerRampReq};
use gsm_saps::{SapMsg, SapMsgInner};

use crate::MessageQueue;
use crate::l1::L1Err;
use crate::l1::components::carrier::RadioCarrier;

/// Nominal output power after the reduction signalled over OML
pub fn p_nominal_mdbm(carrier: &RadioCarrier) -> i32 {
    carrier.p_max_out_mdbm - to_mdb(carrier.max_power_red_db)
}

/// Target of a ramp to operating power. A configured forced reduction replaces the OML one
/// and bypasses the nominal power limit.
pub fn operating_ramp_target(carrier: &RadioCarrier) -> (i32, bool) {
    match carrier.forced_max_power_red_db {
        None => (p_nominal_mdbm(carrier), false),
        Some(red) => (carrier.p_max_out_mdbm - to_mdb(red), true),
    }
}

pub fn check_ramp_target(carrier: &RadioCarrier, target_mdbm: i32, bypass: bool) -> Result<(), L1Err> {
    if target_mdbm < RF_DISABLED_MDBM || target_mdbm > carrier.p_max_out_mdbm {
        return Err(L1Err::RampNotStartable);
    }
    if !bypass && target_mdbm > p_nominal_mdbm(carrier) {
        return Err(L1Err::RampNotStartable);
    }
    Ok(())
}

/// Hand a ramp towards `target_mdbm` to the ramp executor. Returns the token its completion
/// will carry.
pub fn start_power_ramp(carrier: &mut RadioCarrier, queue: &mut MessageQueue, target_mdbm: i32, bypass: bool) -> Result<u32, L1Err> {
    check_ramp_target(carrier, target_mdbm, bypass)?;

    let token = carrier.next_ramp_token();
    tracing::info!(trx = carrier.trx, "ramping power {} -> {} mdBm (token {})",
        carrier.p_total_cur_mdbm, target_mdbm, token);
    queue.push_back(SapMsg::new(
        Sap::PwrSap,
        BtsEntity::L1,
        BtsEntity::Pwr,
        SapMsgInner::PowerRampReq(PowerRampReq {
            trx: carrier.trx,
            token,
            target_mdbm,
            cur_mdbm: carrier.p_total_cur_mdbm,
            max_mdbm: carrier.p_max_out_mdbm,
            bypass,
        }),
    ));
    Ok(token)
}

pub fn start_operating_ramp(carrier: &mut RadioCarrier, queue: &mut MessageQueue) -> Result<u32, L1Err> {
    let (target, bypass) = operating_ramp_target(carrier);
    start_power_ramp(carrier, queue, target, bypass)
}

/// One ramp step: apply `p_trxout_mdbm` as attenuation relative to the maximum output power
pub fn change_power(carrier: &mut RadioCarrier, queue: &mut MessageQueue, p_trxout_mdbm: i32) {
    let att_db = from_mdb(carrier.p_max_out_mdbm - p_trxout_mdbm);
    carrier.prov.set_power_att(queue, att_db);
}

/// The transceiver applied a new attenuation
pub fn power_changed(carrier: &mut RadioCarrier, queue: &mut MessageQueue, att_db: i32) {
    let p_trxout_mdbm = carrier.p_max_out_mdbm - to_mdb(att_db);
    tracing::debug!(trx = carrier.trx, "power changed to {} mdBm (att {} dB)", p_trxout_mdbm, att_db);
    carrier.p_total_cur_mdbm = p_trxout_mdbm;
    queue.push_back(SapMsg::new(
        Sap::PwrSap,
        BtsEntity::L1,
        BtsEntity::Pwr,
        SapMsgInner::PowerChangedInd(PowerChangedInd { trx: carrier.trx, p_trxout_mdbm }),
    ));
}

/// The transceiver reported its nominal output power
pub fn set_nominal_power(carrier: &mut RadioCarrier, queue: &mut MessageQueue, nominal_power_dbm: i32) {
    let changed = carrier.nominal_power_dbm != nominal_power_dbm;
    carrier.nominal_power_dbm = nominal_power_dbm;
    carrier.p_max_out_mdbm = to_mdb(nominal_power_dbm);
    // A very low nominal power also caps where we currently are
    carrier.p_total_cur_mdbm = carrier.p_total_cur_mdbm.min(carrier.p_max_out_mdbm);

    // Not powered yet: the ramp follows once it is
    if !changed || !carrier.prov.is_powered() || carrier.adm_state == AdmState::Unlocked {
        return;
    }
    if let Err(e) = start_operating_ramp(carrier, queue) {
        tracing::warn!(trx = carrier.trx, "cannot adapt to nominal power {} dBm: {}", nominal_power_dbm, e);
    }
}
