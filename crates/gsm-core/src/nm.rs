/// Administrative state of a managed object (TS 52.021, 9.4.4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmState {
    Locked,
    Unlocked,
}

impl core::fmt::Display for AdmState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AdmState::Locked => write!(f, "LOCKED"),
            AdmState::Unlocked => write!(f, "UNLOCKED"),
        }
    }
}

/// Operational state of a managed object (TS 52.021, 9.4.38)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpState {
    Disabled,
    Enabled,
}

/// Object classes (TS 52.021, 9.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NmObjClass {
    SiteManager,
    Bts,
    RadioCarrier,
    Channel,
    BasebandTransceiver,
    GprsNse,
    GprsCell,
    GprsNsvc,
    /// Any object class not handled by this BTS model
    Other(u8),
}

impl NmObjClass {
    pub fn from_raw(x: u8) -> Self {
        match x {
            0x00 => NmObjClass::SiteManager,
            0x01 => NmObjClass::Bts,
            0x02 => NmObjClass::RadioCarrier,
            0x03 => NmObjClass::Channel,
            0x04 => NmObjClass::BasebandTransceiver,
            0xf0 => NmObjClass::GprsNse,
            0xf1 => NmObjClass::GprsCell,
            0xf2 => NmObjClass::GprsNsvc,
            other => NmObjClass::Other(other),
        }
    }

    pub fn into_raw(self) -> u8 {
        match self {
            NmObjClass::SiteManager => 0x00,
            NmObjClass::Bts => 0x01,
            NmObjClass::RadioCarrier => 0x02,
            NmObjClass::Channel => 0x03,
            NmObjClass::BasebandTransceiver => 0x04,
            NmObjClass::GprsNse => 0xf0,
            NmObjClass::GprsCell => 0xf1,
            NmObjClass::GprsNsvc => 0xf2,
            NmObjClass::Other(x) => x,
        }
    }
}

/// NACK causes (TS 52.021, 9.4.36), restricted to the ones this BTS model generates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NmNackCause {
    /// Object class not supported
    ObjClassNotSupp = 0x06,
    /// Message cannot be performed
    CantPerform = 0x11,
    /// Resource not available
    ResNotAvail = 0x1a,
    /// Request not granted
    ReqNotGrant = 0x28,
}

impl std::convert::TryFrom<u64> for NmNackCause {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0x06 => Ok(NmNackCause::ObjClassNotSupp),
            0x11 => Ok(NmNackCause::CantPerform),
            0x1a => Ok(NmNackCause::ResNotAvail),
            0x28 => Ok(NmNackCause::ReqNotGrant),
            _ => Err(()),
        }
    }
}

impl NmNackCause {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        self as u64
    }
}

impl From<NmNackCause> for u64 {
    fn from(e: NmNackCause) -> Self { e.into_raw() }
}

impl core::fmt::Display for NmNackCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NmNackCause::ObjClassNotSupp => write!(f, "Object class not supported"),
            NmNackCause::CantPerform => write!(f, "Message cannot be performed"),
            NmNackCause::ResNotAvail => write!(f, "Resource not available"),
            NmNackCause::ReqNotGrant => write!(f, "Request not granted"),
        }
    }
}
