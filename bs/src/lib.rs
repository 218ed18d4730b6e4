//! Brainstorm - idea generation with per-idea AI enrichment
//!
//! A session starts from a creative brief. The model generates a batch of
//! ideas, and each idea can then be enriched independently: expanded into a
//! full write-up, discussed in a refine chat, rewritten from that chat, or
//! combined with another idea. One idea is finally chosen and exported.
//!
//! # Modules
//!
//! - [`domain`] - Brief and idea data model
//! - [`store`] - Idea collection actor, the single writer of idea state
//! - [`llm`] - LLM client trait with Anthropic and OpenAI implementations
//! - [`enrich`] - Prompting, response parsing and validation
//! - [`controller`] - Per-idea pending gate and enrichment dispatch
//! - [`combine`] - Pairwise selection and merge
//! - [`session`] - Phase machine and user actions
//! - [`repl`] - Interactive terminal front end
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod combine;
pub mod config;
pub mod controller;
pub mod domain;
pub mod enrich;
pub mod llm;
pub mod repl;
pub mod session;
pub mod store;

pub use config::Config;
pub use domain::{Brief, Idea, IdeaId};
pub use session::{ActionOutcome, Session, SessionAction, SessionPhase};
