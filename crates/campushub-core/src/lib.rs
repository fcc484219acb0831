//! CampusHub Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `SyncRecord`, `RemoteRecord`, validated id newtypes
//! - **Port definitions** - Traits for adapters: `IRemoteSource`,
//!   `ICacheStore`, `IConnectivityProbe`, `IIdentitySource`, `ITelemetrySink`
//! - **Configuration** - YAML config with validation and a builder
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O. Ports define
//! trait interfaces that adapter crates implement (`campushub-cache` for
//! storage, platform glue for connectivity/identity). The orchestration
//! runtime lives in `campushub-sync`, pure reconciliation in
//! `campushub-conflict`.

pub mod config;
pub mod domain;
pub mod ports;
