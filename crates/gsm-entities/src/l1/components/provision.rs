use std::collections::HashMap;

use gsm_core::bts_entities::BtsEntity;
use gsm_core::{Sap, TrxNr, TrxSlotType};
use gsm_saps::trxc::{ProvisioningRequest, TrxcCmdReq, TrxcCmdRsp, TscCfg};
use gsm_saps::{SapMsg, SapMsgInner};

use crate::MessageQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvState {
    /// Transceiver powered off
    Closed,
    /// Power-on requested, waiting for the transceiver to confirm
    Enabling,
    /// Transceiver powered
    Enabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvErr {
    InvalidState(ProvState),
    UnknownToken(u32),
    /// Power-on response for a power-on abandoned by a close
    StaleEnable(u32),
}

/// Command conduit towards the transceiver of one carrier. Every command is sent right away
/// and remembered under a token until the matching response arrives.
pub struct ProvisioningChannel {
    trx: TrxNr,
    state: ProvState,
    next_token: u32,
    pending: HashMap<u32, ProvisioningRequest>,
    /// Token of the power-on in progress
    enable_token: Option<u32>,
}

impl ProvisioningChannel {
    pub fn new(trx: TrxNr) -> Self {
        Self {
            trx,
            state: ProvState::Closed,
            next_token: 1,
            pending: HashMap::new(),
            enable_token: None,
        }
    }

    pub fn state(&self) -> ProvState {
        self.state
    }

    #[inline]
    pub fn is_powered(&self) -> bool {
        self.state == ProvState::Enabled
    }

    pub fn num_pending(&self) -> usize {
        self.pending.len()
    }

    fn submit(&mut self, queue: &mut MessageQueue, cmd: ProvisioningRequest) -> u32 {
        let token = self.next_token;
        self.next_token = self.next_token.wrapping_add(1);

        tracing::debug!(trx = self.trx, "-> CMD {} (token {})", cmd, token);
        self.pending.insert(token, cmd.clone());
        queue.push_back(SapMsg::new(
            Sap::TrxcSap,
            BtsEntity::L1,
            BtsEntity::Trxc,
            SapMsgInner::TrxcCmdReq(TrxcCmdReq { trx: self.trx, token, cmd }),
        ));
        token
    }

    /// Power on the transceiver. Refused unless it is powered off.
    pub fn enable(&mut self, queue: &mut MessageQueue) -> Result<u32, ProvErr> {
        if self.state != ProvState::Closed {
            return Err(ProvErr::InvalidState(self.state));
        }
        self.state = ProvState::Enabling;
        let token = self.submit(queue, ProvisioningRequest::Enable);
        self.enable_token = Some(token);
        Ok(token)
    }

    /// Power off the transceiver. Takes effect immediately, a pending power-on is abandoned.
    pub fn close(&mut self, queue: &mut MessageQueue) -> u32 {
        self.state = ProvState::Closed;
        self.enable_token = None;
        self.submit(queue, ProvisioningRequest::Close)
    }

    pub fn set_frequency(&mut self, queue: &mut MessageQueue, arfcn: u16) -> u32 {
        self.submit(queue, ProvisioningRequest::SetFrequency { arfcn })
    }

    pub fn set_identity(&mut self, queue: &mut MessageQueue, bsic: u8) -> u32 {
        self.submit(queue, ProvisioningRequest::SetIdentity { bsic })
    }

    pub fn set_timeslot(&mut self, queue: &mut MessageQueue, tn: u8, slot_type: TrxSlotType, tsc: Option<TscCfg>) -> u32 {
        self.submit(queue, ProvisioningRequest::SetTimeslot { tn, slot_type, tsc })
    }

    pub fn set_rf_mute(&mut self, queue: &mut MessageQueue, mute: bool) -> u32 {
        self.submit(queue, ProvisioningRequest::RfMute { mute })
    }

    pub fn set_power_att(&mut self, queue: &mut MessageQueue, att_db: i32) -> u32 {
        self.submit(queue, ProvisioningRequest::SetPowerAtt { att_db })
    }

    pub fn query_nominal_power(&mut self, queue: &mut MessageQueue) -> u32 {
        self.submit(queue, ProvisioningRequest::NomTxPower)
    }

    /// Match a response to the request it answers. A power-on response completes the
    /// transition out of `Enabling`, unless a close abandoned that power-on.
    pub fn resolve(&mut self, rsp: &TrxcCmdRsp) -> Result<ProvisioningRequest, ProvErr> {
        let req = self.pending.remove(&rsp.token).ok_or(ProvErr::UnknownToken(rsp.token))?;

        if req == ProvisioningRequest::Enable {
            if self.enable_token != Some(rsp.token) {
                return Err(ProvErr::StaleEnable(rsp.token));
            }
            self.enable_token = None;
            self.state = if rsp.status == 0 { ProvState::Enabled } else { ProvState::Closed };
        }
        Ok(req)
    }
}
