//! Stacksmith Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Stacksmith
//! full-stack project generator, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         stacksmith-cli (CLI)            │
//! │  prompts, signal thread, exit codes     │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GenerationService, CommandRunner,     │
//! │   TransactionContext)                   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (Filesystem, CommandExecutor,          │
//! │   ContentGenerator, RecoveryPrompt)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    stacksmith-adapters (Infrastructure) │
//! │  (LocalFilesystem, SystemExecutor, ...) │
//! └─────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  catalog, compatibility rules,          │
//! │  strategy tables, StackSelection        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stacksmith_core::prelude::*;
//!
//! let selection = StackSelection::builder()
//!     .frontend(Frontend::React)
//!     .backend(Backend::NodeExpress)
//!     .database(Database::MongoDb).unwrap()
//!     .auth(Auth::Jwt).unwrap()
//!     .build()
//!     .unwrap();
//!
//! assert!(has_template(selection.backend(), selection.database()));
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CommandRunner, GenerationPlan, GenerationReport, GenerationRequest, GenerationService,
        CleanupOutcome, RecoveryPolicy, TransactionContext,
        ports::{
            CommandExecutor, CommandFailure, ContentGenerator, Filesystem, RecoveryChoice,
            RecoveryPrompt, RenderContext,
        },
    };
    pub use crate::domain::{
        Auth, Backend, CommandSpec, ContentKind, Database, Frontend, GenerationStep,
        ProjectWorkspace, StackSelection, UserConfig, Violation, has_template, validate,
    };
    pub use crate::error::{StacksmithError, StacksmithResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
