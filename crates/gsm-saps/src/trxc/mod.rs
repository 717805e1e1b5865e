use gsm_core::{TrxNr, TrxSlotType};

/// Training sequence of a timeslot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TscCfg {
    /// Training sequence set, one-based on the wire. Zero means the default set and is omitted.
    pub set: u8,
    pub code: u8,
}

/// Commands understood by the transceiver control interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningRequest {
    /// Power on the transceiver
    Enable,
    /// Power off the transceiver
    Close,
    SetFrequency { arfcn: u16 },
    SetIdentity { bsic: u8 },
    SetTimeslot { tn: u8, slot_type: TrxSlotType, tsc: Option<TscCfg> },
    RfMute { mute: bool },
    /// Output attenuation relative to the nominal power, in dB
    SetPowerAtt { att_db: i32 },
    /// Query the nominal output power
    NomTxPower,
}

impl core::fmt::Display for ProvisioningRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProvisioningRequest::Enable => write!(f, "POWERON"),
            ProvisioningRequest::Close => write!(f, "POWEROFF"),
            ProvisioningRequest::SetFrequency { arfcn } => write!(f, "SETFREQ {}", arfcn),
            ProvisioningRequest::SetIdentity { bsic } => write!(f, "SETBSIC {}", bsic),
            ProvisioningRequest::SetTimeslot { tn, slot_type, tsc: Some(tsc) } => {
                write!(f, "SETSLOT {} {} C{}/S{}", tn, slot_type.into_raw(), tsc.code, tsc.set)
            }
            ProvisioningRequest::SetTimeslot { tn, slot_type, tsc: None } => {
                write!(f, "SETSLOT {} {}", tn, slot_type.into_raw())
            }
            ProvisioningRequest::RfMute { mute } => write!(f, "RFMUTE {}", *mute as u8),
            ProvisioningRequest::SetPowerAtt { att_db } => write!(f, "SETPOWER {}", att_db),
            ProvisioningRequest::NomTxPower => write!(f, "NOMTXPOWER"),
        }
    }
}

/// A command towards the transceiver. The response carries the same token.
#[derive(Debug)]
pub struct TrxcCmdReq {
    pub trx: TrxNr,
    pub token: u32,
    pub cmd: ProvisioningRequest,
}

/// Response of the transceiver to a `TrxcCmdReq`
#[derive(Debug)]
pub struct TrxcCmdRsp {
    pub trx: TrxNr,
    pub token: u32,
    /// Zero on success
    pub status: i32,
    /// Applied attenuation (SETPOWER) or reported nominal power in dBm (NOMTXPOWER)
    pub value: Option<i32>,
}
