use super::chan_mode::ChanModeParams;
use super::encryption::Encryption;

/// Who activated a logical channel, and thus how a release is to be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelActKind {
    /// Activated through RSL CHANNEL ACTIVATION
    #[default]
    Rsl,
    /// Activated on behalf of the PCU (PDCH)
    Pcu,
    /// Always-on channel activated as part of the timeslot configuration
    Oml,
    /// A release immediately re-activates the channel
    React,
}

/// Everything the upper layer supplies when activating or modifying a logical channel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LchanParams {
    pub mode: ChanModeParams,
    pub encr: Encryption,
    /// Handover reference expected, uplink access bursts must be decoded
    pub ho_enabled: bool,
    /// Voice group or broadcast call channel, uplink access bursts must be decoded
    pub asci: bool,
    pub rel_act_kind: RelActKind,
}
