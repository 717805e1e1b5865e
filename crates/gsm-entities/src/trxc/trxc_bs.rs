use gsm_config::SharedConfig;
use gsm_core::Sap;
use gsm_core::bts_entities::BtsEntity;
use gsm_saps::trxc::TrxcCmdRsp;
use gsm_saps::{SapMsg, SapMsgInner};

use crate::{BtsEntityTrait, MessageQueue};

use super::trxc_dev::TrxcDev;

/// Transceiver control link. Forwards commands from L1 to the transport and
/// returns the responses at the end of each tick.
pub struct TrxcBs<D: TrxcDev> {
    config: SharedConfig,
    pub dev: D,
}

impl<D: TrxcDev> TrxcBs<D> {
    pub fn new(config: SharedConfig, dev: D) -> Self {
        Self { config, dev }
    }

    fn send_rsp(queue: &mut MessageQueue, rsp: TrxcCmdRsp) {
        queue.push_back(SapMsg::new(Sap::TrxcSap, BtsEntity::Trxc, BtsEntity::L1, SapMsgInner::TrxcCmdRsp(rsp)));
    }

    fn rx_trxc_cmd_req(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        let SapMsgInner::TrxcCmdReq(req) = message.msg else { panic!() };
        tracing::debug!(trx = req.trx, "-> CMD {} (token {})", req.cmd, req.token);

        if let Err(e) = self.dev.submit(&req) {
            tracing::error!(trx = req.trx, "cannot send {}: {:?}", req.cmd, e);
            Self::send_rsp(queue, TrxcCmdRsp { trx: req.trx, token: req.token, status: -1, value: None });
        }
    }
}

impl<D: TrxcDev + 'static> BtsEntityTrait for TrxcBs<D> {
    fn entity(&self) -> BtsEntity {
        BtsEntity::Trxc
    }

    fn set_config(&mut self, config: SharedConfig) {
        self.config = config;
    }

    fn rx_prim(&mut self, queue: &mut MessageQueue, message: SapMsg) {
        match message.msg {
            SapMsgInner::TrxcCmdReq(_) => self.rx_trxc_cmd_req(queue, message),
            _ => panic!("unexpected primitive on {:?}: {}", message.sap, message.msg),
        }
    }

    fn tick_end(&mut self, queue: &mut MessageQueue, _tick: u64) -> bool {
        let rsps = self.dev.poll();
        let any = !rsps.is_empty();
        for rsp in rsps {
            tracing::trace!(trx = rsp.trx, "<- RSP token {} status {}", rsp.token, rsp.status);
            Self::send_rsp(queue, rsp);
        }
        any
    }
}
