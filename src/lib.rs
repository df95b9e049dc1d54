// ABOUTME: Public library API for the crosspost reconciliation engine
// ABOUTME: Re-exports core modules for external use

pub mod backend;
pub mod cli;
pub mod config;
pub mod devto;
pub mod error;
pub mod hashnode;
pub mod identity;
pub mod matcher;
pub mod model;
pub mod schedule;
pub mod source;
pub mod sync;
pub mod tags;
pub mod util;

pub use error::{Error, Result};
pub use model::{Article, CanonicalIdentity, PublishOutcome, RemotePost, ResolvedTag};
