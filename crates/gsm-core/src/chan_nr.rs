use core::fmt;

use crate::{CBCH_LCHAN, CCCH_LCHAN};

/// Logical channel types that can be addressed by a channel number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LchanType {
    TchF,
    TchH,
    Sdcch4,
    Sdcch8,
    Bcch,
    Rach,
    PchAgch,
    /// Vendor-specific PDCH address
    Pdch,
    /// Vendor-specific CBCH address on SDCCH/4 configurations
    Cbch4,
    /// Vendor-specific CBCH address on SDCCH/8 configurations
    Cbch8,
}

/// RSL channel number (TS 48.058, 9.3.1)
/// Bits 8-4 (C-bits) encode the channel type and sub-channel, bits 3-1 the timeslot number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChanNr(pub u8);

impl ChanNr {
    const C_TCH_F: u8 = 0x01;
    const C_TCH_H: u8 = 0x02;
    const C_SDCCH4: u8 = 0x04;
    const C_SDCCH8: u8 = 0x08;
    const C_BCCH: u8 = 0x10;
    const C_RACH: u8 = 0x11;
    const C_PCH_AGCH: u8 = 0x12;
    const C_OSMO_PDCH: u8 = 0x18;
    const C_OSMO_CBCH4: u8 = 0x19;
    const C_OSMO_CBCH8: u8 = 0x1a;

    fn from_cbits(cbits: u8, tn: u8) -> Self {
        assert!(tn < 8, "timeslot number out of range: {}", tn);
        ChanNr((cbits << 3) | tn)
    }

    pub fn tch_f(tn: u8) -> Self {
        Self::from_cbits(Self::C_TCH_F, tn)
    }

    pub fn tch_h(tn: u8, sub: u8) -> Self {
        assert!(sub < 2);
        Self::from_cbits(Self::C_TCH_H | sub, tn)
    }

    pub fn sdcch4(tn: u8, sub: u8) -> Self {
        assert!(sub < 4);
        Self::from_cbits(Self::C_SDCCH4 | sub, tn)
    }

    pub fn sdcch8(tn: u8, sub: u8) -> Self {
        assert!(sub < 8);
        Self::from_cbits(Self::C_SDCCH8 | sub, tn)
    }

    pub fn bcch(tn: u8) -> Self {
        Self::from_cbits(Self::C_BCCH, tn)
    }

    pub fn pch_agch(tn: u8) -> Self {
        Self::from_cbits(Self::C_PCH_AGCH, tn)
    }

    pub fn pdch(tn: u8) -> Self {
        Self::from_cbits(Self::C_OSMO_PDCH, tn)
    }

    pub fn cbch4(tn: u8) -> Self {
        Self::from_cbits(Self::C_OSMO_CBCH4, tn)
    }

    pub fn cbch8(tn: u8) -> Self {
        Self::from_cbits(Self::C_OSMO_CBCH8, tn)
    }

    #[inline]
    pub fn into_raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn cbits(&self) -> u8 {
        self.0 >> 3
    }

    #[inline]
    pub fn tn(&self) -> u8 {
        self.0 & 0x07
    }

    /// Channel numbers with C-bits 10xxx address common control channels (BCCH, RACH, PCH/AGCH).
    /// Those are owned by the timeslot configuration and can never be activated or deactivated
    /// on request.
    #[inline]
    pub fn is_reserved(&self) -> bool {
        (self.0 & 0xE0) == 0x80
    }

    pub fn lchan_type(&self) -> Option<LchanType> {
        let cbits = self.cbits();
        match cbits {
            Self::C_TCH_F => Some(LchanType::TchF),
            0x02..=0x03 => Some(LchanType::TchH),
            0x04..=0x07 => Some(LchanType::Sdcch4),
            0x08..=0x0f => Some(LchanType::Sdcch8),
            Self::C_BCCH => Some(LchanType::Bcch),
            Self::C_RACH => Some(LchanType::Rach),
            Self::C_PCH_AGCH => Some(LchanType::PchAgch),
            Self::C_OSMO_PDCH => Some(LchanType::Pdch),
            Self::C_OSMO_CBCH4 => Some(LchanType::Cbch4),
            Self::C_OSMO_CBCH8 => Some(LchanType::Cbch8),
            _ => None,
        }
    }

    /// Index of the addressed logical channel within its timeslot, None for unassigned C-bits
    pub fn lchan_idx(&self) -> Option<usize> {
        let cbits = self.cbits();
        let idx = match self.lchan_type()? {
            LchanType::TchF | LchanType::Pdch => 0,
            LchanType::TchH => (cbits & 0x01) as usize,
            LchanType::Sdcch4 => (cbits & 0x03) as usize,
            LchanType::Sdcch8 => (cbits & 0x07) as usize,
            LchanType::Bcch | LchanType::Rach | LchanType::PchAgch => CCCH_LCHAN,
            LchanType::Cbch4 | LchanType::Cbch8 => CBCH_LCHAN,
        };
        Some(idx)
    }

    #[inline]
    pub fn is_half_rate(&self) -> bool {
        self.lchan_type() == Some(LchanType::TchH)
    }
}

impl fmt::Display for ChanNr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lchan_type() {
            Some(LchanType::TchF) => write!(f, "TCH/F on TS{}", self.tn()),
            Some(LchanType::TchH) => write!(f, "TCH/H({}) on TS{}", self.cbits() & 0x01, self.tn()),
            Some(LchanType::Sdcch4) => write!(f, "SDCCH/4({}) on TS{}", self.cbits() & 0x03, self.tn()),
            Some(LchanType::Sdcch8) => write!(f, "SDCCH/8({}) on TS{}", self.cbits() & 0x07, self.tn()),
            Some(LchanType::Bcch) => write!(f, "BCCH on TS{}", self.tn()),
            Some(LchanType::Rach) => write!(f, "RACH on TS{}", self.tn()),
            Some(LchanType::PchAgch) => write!(f, "PCH/AGCH on TS{}", self.tn()),
            Some(LchanType::Pdch) => write!(f, "PDCH on TS{}", self.tn()),
            Some(LchanType::Cbch4) => write!(f, "CBCH(SDCCH/4) on TS{}", self.tn()),
            Some(LchanType::Cbch8) => write!(f, "CBCH(SDCCH/8) on TS{}", self.tn()),
            None => write!(f, "UNKNOWN(0x{:02x})", self.0),
        }
    }
}
