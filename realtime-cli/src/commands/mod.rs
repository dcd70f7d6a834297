//! Command handlers

pub mod publish;
pub mod resolve;
pub mod serve;
