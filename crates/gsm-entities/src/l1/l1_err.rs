use gsm_core::{ChanNr, NmNackCause, TrxNr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum L1Err {
    UnknownTrx(TrxNr),
    UnknownChannel(ChanNr),
    /// Channel number addresses a common control channel owned by the timeslot configuration
    PermissionDenied(ChanNr),
    /// Dynamic channel kinds need to be resolved before they can be applied
    InvalidTarget,
    /// Timeslot disabled, or the scheduler refused the channel combination
    ResourceNotAvailable,
    /// Requested output power lies outside the limits of the carrier
    RampNotStartable,
}

impl L1Err {
    /// Cause reported to the management layer when a request fails with this error
    pub fn nack_cause(&self) -> NmNackCause {
        match self {
            L1Err::ResourceNotAvailable => NmNackCause::ResNotAvail,
            L1Err::RampNotStartable => NmNackCause::ReqNotGrant,
            _ => NmNackCause::CantPerform,
        }
    }
}

impl core::fmt::Display for L1Err {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            L1Err::UnknownTrx(trx) => write!(f, "unknown trx {}", trx),
            L1Err::UnknownChannel(c) => write!(f, "unknown channel {}", c),
            L1Err::PermissionDenied(c) => write!(f, "permission denied for {}", c),
            L1Err::InvalidTarget => write!(f, "invalid target"),
            L1Err::ResourceNotAvailable => write!(f, "resource not available"),
            L1Err::RampNotStartable => write!(f, "power ramp cannot be started"),
        }
    }
}
