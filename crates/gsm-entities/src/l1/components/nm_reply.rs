use gsm_core::bts_entities::BtsEntity;
use gsm_core::{NmNackCause, OpState, Sap};
use gsm_saps::nm::{NmAck, NmMsgType, NmNack, NmObj, NmOpStateInd};
use gsm_saps::pcu::PcuInfoInd;
use gsm_saps::{SapMsg, SapMsgInner};

use crate::MessageQueue;
use crate::l1::components::carrier::RadioCarrier;

pub fn send_ack(queue: &mut MessageQueue, obj: NmObj, msg_type: NmMsgType) {
    tracing::debug!(trx = obj.trx, "-> ACK {:?} {:?}", msg_type, obj.class);
    queue.push_back(SapMsg::new(
        Sap::NmSap,
        BtsEntity::L1,
        BtsEntity::Oml,
        SapMsgInner::NmAck(NmAck { obj, msg_type }),
    ));
}

pub fn send_nack(queue: &mut MessageQueue, obj: NmObj, msg_type: NmMsgType, cause: NmNackCause) {
    tracing::warn!(trx = obj.trx, "-> NACK {:?} {:?}: {}", msg_type, obj.class, cause);
    queue.push_back(SapMsg::new(
        Sap::NmSap,
        BtsEntity::L1,
        BtsEntity::Oml,
        SapMsgInner::NmNack(NmNack { obj, msg_type, cause }),
    ));
}

pub fn send_op_state(queue: &mut MessageQueue, obj: NmObj, op_state: OpState) {
    queue.push_back(SapMsg::new(
        Sap::NmSap,
        BtsEntity::L1,
        BtsEntity::Oml,
        SapMsgInner::NmOpStateInd(NmOpStateInd { obj, op_state }),
    ));
}

/// Tell the PCU whether the carrier is usable for packet data
pub fn send_pcu_info(queue: &mut MessageQueue, carrier: &RadioCarrier) {
    queue.push_back(SapMsg::new(
        Sap::PcuSap,
        BtsEntity::L1,
        BtsEntity::Pcu,
        SapMsgInner::PcuInfoInd(PcuInfoInd {
            trx: carrier.trx,
            adm_state: carrier.adm_state,
            rf_muted: carrier.rf_muted,
        }),
    ));
}
