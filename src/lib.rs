//! Chatflow - Conversational workflow engine
//!
//! Drives scripted chat dialogues step by step: messages, free-text
//! questions and numbered option pools, with branching into named
//! workflows, back navigation, restarts and lazily loaded content.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
