//! homily — client engine for sermon outlining.
//!
//! The engine classifies a sermon's thoughts into four outline buckets
//! (introduction, main, conclusion, ambiguous), runs an explicit drag
//! session for moving thoughts between and within buckets, and persists
//! the result optimistically: local state first, debounced network saves
//! after, full snapshot rollback when the structure save fails.
//!
//! A sibling optimistic cache applies the same discipline to dashboard
//! sermon CRUD and preach-status mutations.

pub mod api;
pub mod cache;
pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod model;
pub mod ops;
pub mod session;

pub use error::{Error, Result};
