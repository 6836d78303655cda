//! Library side of the `hl7` command: demo definitions, skeleton building and
//! logging setup.

pub mod definitions;
pub mod listing;
pub mod logging;
pub mod skeleton;
