//! Infrastructure layer for the agent.
//!
//! Contains OS-facing adapters: the line-power monitor, the persisted flag
//! store, the overlay host controller, and configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `voltify_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`power_source`** – Reads line-power state (sysfs on Linux) and turns
//!   changes into `PowerEvent`s on a background thread.
//!
//! - **`flag_store`** – `FlagReader` implementations: one file per key on
//!   disk, plus an in-memory store for tests and embedding.
//!
//! - **`overlay`** – `OverlayController` implementations: a child-process
//!   overlay host, a dry-run controller that only logs, and a recording mock.
//!
//! - **`storage`** – TOML configuration file persistence.

pub mod flag_store;
pub mod overlay;
pub mod power_source;
pub mod storage;
