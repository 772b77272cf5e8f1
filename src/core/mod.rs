//! # Core Application Logic
//!
//! The parts of Reel that know nothing about terminals.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Action / Effect      │
//!                    │  • Session (auth, cache)│
//!                    │  • Navigator (pages)    │
//!                    │  • Config               │
//!                    │                         │
//!                    │  No I/O in transitions. │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │    API     │
//!           │ (ratatui)  │              │ (reqwest)  │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`action`]: `Action`, `Effect` and the `Update` result of a transition
//! - [`state`]: the `Session` shared read-only with every page
//! - [`navigation`]: current page and the one-level back pointer
//! - [`config`]: settings file and override resolution

pub mod action;
pub mod config;
pub mod navigation;
pub mod state;
