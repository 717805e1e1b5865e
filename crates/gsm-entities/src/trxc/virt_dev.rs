use std::collections::VecDeque;

use gsm_config::SharedConfig;
use gsm_core::TrxNr;
use gsm_saps::trxc::{ProvisioningRequest, TrxcCmdReq, TrxcCmdRsp};

use super::trxc_dev::{TrxcDev, TrxcDevError};

type FailMatcher = Box<dyn Fn(TrxNr, &ProvisioningRequest) -> bool + Send>;

/// In-process transceiver. Accepts every command and answers on the next poll.
pub struct VirtTrxcDev {
    nominal_power_dbm: Vec<i32>,
    powered: Vec<bool>,
    rsp_queue: VecDeque<TrxcCmdRsp>,

    /// Every command received, in order
    history: Vec<(TrxNr, ProvisioningRequest)>,
    /// Commands matching one of these are answered with the given status
    failures: Vec<(FailMatcher, i32)>,
}

impl VirtTrxcDev {
    pub fn new(config: &SharedConfig) -> Self {
        let nominal_power_dbm: Vec<i32> = config.config().trx.iter().map(|t| t.nominal_power_dbm).collect();
        let num_trx = nominal_power_dbm.len();
        Self {
            nominal_power_dbm,
            powered: vec![false; num_trx],
            rsp_queue: VecDeque::new(),
            history: vec![],
            failures: vec![],
        }
    }

    /// Make the transceiver report a different nominal power than configured
    pub fn set_nominal_power(&mut self, trx: TrxNr, dbm: i32) {
        self.nominal_power_dbm[trx as usize] = dbm;
    }

    /// Answer all matching commands with a non-zero `status`
    pub fn fail_matching<F>(&mut self, matcher: F, status: i32)
    where
        F: Fn(TrxNr, &ProvisioningRequest) -> bool + Send + 'static,
    {
        self.failures.push((Box::new(matcher), status));
    }

    pub fn is_powered(&self, trx: TrxNr) -> bool {
        self.powered.get(trx as usize).copied().unwrap_or(false)
    }

    pub fn history(&self) -> &[(TrxNr, ProvisioningRequest)] {
        &self.history
    }

    pub fn take_history(&mut self) -> Vec<(TrxNr, ProvisioningRequest)> {
        std::mem::take(&mut self.history)
    }

    fn execute(&mut self, trx: TrxNr, cmd: &ProvisioningRequest) -> Option<i32> {
        let idx = trx as usize;
        match cmd {
            ProvisioningRequest::Enable => {
                self.powered[idx] = true;
                None
            }
            ProvisioningRequest::Close => {
                self.powered[idx] = false;
                None
            }
            // No amplification beyond the nominal power
            ProvisioningRequest::SetPowerAtt { att_db } => Some((*att_db).max(0)),
            ProvisioningRequest::NomTxPower => Some(self.nominal_power_dbm[idx]),
            _ => None,
        }
    }
}

impl TrxcDev for VirtTrxcDev {
    fn submit(&mut self, req: &TrxcCmdReq) -> Result<(), TrxcDevError> {
        if req.trx as usize >= self.powered.len() {
            return Err(TrxcDevError::UnknownTrx);
        }
        self.history.push((req.trx, req.cmd.clone()));

        let failure = self.failures.iter()
            .find(|(matcher, _)| matcher(req.trx, &req.cmd))
            .map(|(_, status)| *status);
        let (status, value) = match failure {
            Some(status) => (status, None),
            None => (0, self.execute(req.trx, &req.cmd)),
        };

        self.rsp_queue.push_back(TrxcCmdRsp { trx: req.trx, token: req.token, status, value });
        Ok(())
    }

    fn poll(&mut self) -> Vec<TrxcCmdRsp> {
        self.rsp_queue.drain(..).collect()
    }
}
