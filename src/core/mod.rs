//! # Core Application Logic
//!
//! This module contains Venom's business logic.
//! It knows nothing about any specific UI technology or storage backend.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (App, cache)   │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Command (effects)    │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │ Scheduler  │      │    CLI     │
//!     │ (ratatui)  │      │ (tokio)    │      │ pull/list  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all session state in one place
//! - [`action`]: The `Action` enum and the `update()` controller
//! - [`command`]: Side effects the controller asks for
//! - [`form`]: Field-by-field form engine
//! - [`cache`]: Local copy of the remote projects
//! - [`project`]: The `Project` record
//! - [`config`]: Layered configuration
//! - [`error`]: Failure taxonomy

pub mod action;
pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod form;
pub mod input;
pub mod project;
pub mod state;
