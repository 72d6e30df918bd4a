//! Grow Journal - Cultivation tracking
//!
//! Rooms hold cultivation cycles. A cycle moves from vegetative to flowering
//! to finished, owns a weekly flowering schedule, and collects journal logs
//! filed under those weeks. A small inventory keeps strains with their clone
//! stock and a seed bank.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
