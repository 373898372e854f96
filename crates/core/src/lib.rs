//! Core library for devlens
//!
//! This crate implements the **Functional Core** of the devlens application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`devlens_core`** (this crate): domain types and the logic that can be
//!   tested against fixture data and temporary directories
//! - **`devlens`**: CLI, configuration, network clients and the HTTP server
//!   (the Imperative Shell)
//!
//! # Module Organization
//!
//! - [`collect`]: walking a project tree, snapshots and prompt building
//! - [`response`]: turning model API responses into a [`response::ResponseEnvelope`]
//! - [`serve`]: request path resolution and content types for the dev server
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use devlens_core::collect::{build_prompt, walk, PromptStyle, WalkOptions};
//!
//! let files = walk(Path::new("."), &WalkOptions::default())?;
//! let prompt = build_prompt(&files, PromptStyle::Markdown);
//! ```

pub mod collect;
pub mod response;
pub mod serve;
