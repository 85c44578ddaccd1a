//! Core functionality: the journal document, edits, persistence and configuration

pub mod config;
pub mod edit;
pub mod image;
pub mod journal;
pub mod region;
pub mod storage;
