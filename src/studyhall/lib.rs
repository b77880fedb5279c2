//! # Studyhall Architecture
//!
//! Studyhall is a **UI-agnostic library for authoring and studying learning
//! modules**. The bundled CLI is just one client; the library never assumes a
//! terminal.
//!
//! ## The Layer Stack
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (indexes → UUIDs → Modules)            │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure business logic                                      │
//! │  - Operates on Rust types, returns Rust types               │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract ContentStore trait                              │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Content Model
//!
//! A [`model::Module`] is a unit of learning content composed of ordered
//! [`model::Step`]s. Steps are polymorphic over [`model::StepBody`] (video,
//! quiz, flashcards, free response, poll, resource) but live in a single
//! collection per module, discriminated by a `kind` tag. The module carries a
//! denormalized `step_count` that the storage layer keeps in sync with the
//! steps collection on every write, so it cannot drift when a command fails
//! midway.
//!
//! Study activity lives beside the content: a [`model::Progress`] record per
//! (user, module) tracks completed steps and quiz scores, and
//! [`model::JournalEntry`] holds free-form or module-linked notes.
//!
//! ## The Index System
//!
//! Commands address modules through short display indexes (`1`, `p1`, `d2`)
//! that map to the stable UUIDs at the storage level. See catalog.rs.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward (API, commands, storage), code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** writes to stdout/stderr
//! - **Never** calls `std::process::exit`
//! - **Never** assumes a terminal environment
//!
//! The same core could serve a REST API, a desktop app, or any other UI.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): thorough unit tests of business logic
//!    against `InMemoryStore`. This is where the lion's share of testing
//!    lives.
//! 2. **Store** (`store/`): backend tests exercising persistence and the
//!    step-count guarantee.
//! 3. **CLI** (`tests/`): end-to-end runs of the binary checking argument
//!    handling and output.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade—entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Module`, `Step`, `Progress`, `JournalEntry`)
//! - [`catalog`]: Display indexing system (p1, 1, d1 notation)
//! - [`config`]: Configuration management
//! - [`editor`]: External editor integration
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod store;
