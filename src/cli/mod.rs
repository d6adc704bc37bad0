//! Terminal presentation of the conversion form

pub mod convert;
pub mod currencies;
pub mod interactive;
pub mod setup;
pub mod status;
pub mod ui;
