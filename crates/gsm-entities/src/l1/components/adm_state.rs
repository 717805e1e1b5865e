use gsm_core::power::RF_DISABLED_MDBM;
use gsm_core::{AdmState, NmNackCause};
use gsm_saps::nm::{NmMsgType, NmObj};

use crate::MessageQueue;
use crate::l1::components::carrier::RadioCarrier;
use crate::l1::components::nm_reply::{send_ack, send_nack, send_pcu_info};
use crate::l1::components::power_ctrl;

/// The ramp an administrative state change is waiting for. A newer request in the opposite
/// direction replaces it, after which its completion no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutstandingRamp {
    pub token: u32,
    /// Ramp-down for `Locked`, ramp-up for `Unlocked`
    pub target: AdmState,
    /// Object the state change was requested for, acknowledged on completion
    pub obj: NmObj,
}

/// Administrative state change of a radio carrier
pub fn request(carrier: &mut RadioCarrier, queue: &mut MessageQueue, obj: NmObj, target: AdmState) {
    tracing::info!(trx = carrier.trx, "ADM state change to {} requested", target);

    // Transceiver off: only keep its RF mute state in line, ramping starts at power-on
    if !carrier.prov.is_powered() {
        let mute = target != AdmState::Unlocked;
        carrier.prov.set_rf_mute(queue, mute);
        carrier.rf_muted = mute;
        carrier.adm_state = target;
        send_pcu_info(queue, carrier);
        send_ack(queue, obj, NmMsgType::ChgAdmState);
        return;
    }

    // The outstanding ramp stays in place until its replacement has started
    let superseded = carrier.adm_ramp;
    let mut unmute = true;
    if let Some(outstanding) = superseded {
        tracing::info!(trx = carrier.trx, "ADM change received while previous one to {} still WIP", outstanding.target);
        assert!(outstanding.target != target,
            "trx {}: ADM change to {} while already ramping towards it", carrier.trx, target);

        // Still ramping down, so RF was never muted
        unmute = target != AdmState::Unlocked;
    }

    if !start_ramp(carrier, queue, obj, target, unmute) {
        return;
    }

    if let Some(outstanding) = superseded {
        if outstanding.target == AdmState::Unlocked {
            // The superseded ramp-up will never complete its UNLOCKED request
            send_nack(queue, outstanding.obj, NmMsgType::ChgAdmState, NmNackCause::ReqNotGrant);
        }
    }
}

/// Start the ramp for an administrative state change. `unmute` is false when a ramp-up
/// takes over from a ramp-down that had not muted RF yet. Returns false, after NACKing the
/// request, if the ramp cannot start. The outstanding ramp is only replaced on success.
pub fn start_ramp(carrier: &mut RadioCarrier, queue: &mut MessageQueue, obj: NmObj, target: AdmState, unmute: bool) -> bool {
    match target {
        AdmState::Locked => {
            match power_ctrl::start_power_ramp(carrier, queue, RF_DISABLED_MDBM, true) {
                Ok(token) => {
                    carrier.adm_ramp = Some(OutstandingRamp { token, target, obj });
                    // Committed right away, RF is muted once the ramp completes
                    carrier.adm_state = AdmState::Locked;
                    send_ack(queue, obj, NmMsgType::ChgAdmState);
                    true
                }
                Err(e) => {
                    tracing::warn!(trx = carrier.trx, "cannot ramp down: {}", e);
                    send_nack(queue, obj, NmMsgType::ChgAdmState, e.nack_cause());
                    false
                }
            }
        }
        AdmState::Unlocked => {
            let (target_mdbm, bypass) = power_ctrl::operating_ramp_target(carrier);
            if let Err(e) = power_ctrl::check_ramp_target(carrier, target_mdbm, bypass) {
                tracing::warn!(trx = carrier.trx, "cannot ramp up to {} mdBm: {}", target_mdbm, e);
                send_nack(queue, obj, NmMsgType::ChgAdmState, e.nack_cause());
                return false;
            }

            // Unmute before the power rises
            if unmute {
                carrier.prov.set_rf_mute(queue, false);
                carrier.rf_muted = false;
            }

            match power_ctrl::start_power_ramp(carrier, queue, target_mdbm, bypass) {
                Ok(token) => {
                    carrier.adm_ramp = Some(OutstandingRamp { token, target, obj });
                    true
                }
                Err(e) => {
                    tracing::warn!(trx = carrier.trx, "cannot ramp up: {}", e);
                    send_nack(queue, obj, NmMsgType::ChgAdmState, e.nack_cause());
                    false
                }
            }
        }
    }
}

/// A power ramp completed. Returns false if the token does not belong to the outstanding
/// administrative ramp, which is the case for superseded and non-administrative ramps.
pub fn ramp_complete(carrier: &mut RadioCarrier, queue: &mut MessageQueue, token: u32) -> bool {
    let Some(outstanding) = carrier.adm_ramp else {
        return false;
    };
    if outstanding.token != token {
        return false;
    }
    carrier.adm_ramp = None;
    tracing::info!(trx = carrier.trx, "power ramp due to ADM STATE change to {} finished", outstanding.target);

    match outstanding.target {
        AdmState::Locked => {
            carrier.prov.set_rf_mute(queue, true);
            carrier.rf_muted = true;
            send_pcu_info(queue, carrier);
        }
        AdmState::Unlocked => {
            carrier.adm_state = AdmState::Unlocked;
            send_pcu_info(queue, carrier);
            send_ack(queue, outstanding.obj, NmMsgType::ChgAdmState);
        }
    }
    true
}

/// The carrier is being closed, an outstanding state change can no longer complete
pub fn abandon(carrier: &mut RadioCarrier, queue: &mut MessageQueue) {
    if let Some(outstanding) = carrier.adm_ramp.take() {
        tracing::info!(trx = carrier.trx, "abandoning ADM change to {}", outstanding.target);
        if outstanding.target == AdmState::Unlocked {
            send_nack(queue, outstanding.obj, NmMsgType::ChgAdmState, NmNackCause::ReqNotGrant);
        }
    }
}
