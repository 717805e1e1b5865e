//! Core utilities for the GSM BTS transceiver control plane
//!
//! This crate provides fundamental types and utilities used across the stack:
//! - Channel number encoding (ChanNr) and logical channel addressing
//! - Physical channel configurations and transceiver slot type codes
//! - Network management enums (administrative state, NACK causes, object classes)
//! - Power unit helpers
//! - Common macros and debug utilities

pub mod bts_common;
pub mod bts_entities;
pub mod chan_nr;
pub mod debug;
pub mod direction;
pub mod nm;
pub mod pchan;
pub mod power;

// Re-export commonly used items
pub use bts_common::*;
pub use chan_nr::{ChanNr, LchanType};
pub use direction::Direction;
pub use nm::{AdmState, NmNackCause, NmObjClass, OpState};
pub use pchan::{PhysChanConfig, TrxSlotType};

/// Index of a transceiver (carrier) within the BTS. TRX 0 is C0, the BCCH carrier.
pub type TrxNr = u8;

/// Number of timeslots per TDMA frame on one carrier
pub const NUM_TIMESLOTS: usize = 8;

/// Maximum number of logical channels addressable within one timeslot
pub const TS_MAX_LCHAN: usize = 8;

/// Logical channel index of the CBCH on CBCH-carrying timeslot configurations
pub const CBCH_LCHAN: usize = 2;

/// Logical channel index used for BCCH/CCCH on CCCH-carrying timeslot configurations
pub const CCCH_LCHAN: usize = 4;
