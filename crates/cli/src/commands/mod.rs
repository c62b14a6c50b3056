//! CLI Commands

pub mod cases;
pub mod run;
