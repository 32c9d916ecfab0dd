//! Color management: YCbCr encoding tables and calibration-driven white balance.

pub mod encoding;
pub mod white_balance;
