#![allow(dead_code)]

/// Primitives exchanged between the BTS entities, one module per SAP
pub mod nm;
pub mod pcu;
pub mod ph;
pub mod pwr;
pub mod sapmsg;
pub mod trxc;

pub use sapmsg::*;
