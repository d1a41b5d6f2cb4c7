//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the RPC layer decoupled from storage details.

pub mod memo_service;
