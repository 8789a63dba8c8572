//! Kiln Builder - container image specs compiled to build instructions.
//!
//! A [`BuildSpec`] is recorded through chained mutators, lowered into a
//! plan of [`Instruction`]s, and rendered either as a `buildah` script
//! ([`script()`]) or as Dockerfile text ([`dockerfile()`]). The [`Driver`]
//! runs a rendered script through a shell, one line at a time.

pub mod compile;
pub mod driver;
pub mod spec;

// Re-export common types
pub use compile::{dockerfile, plan, script, Instruction, BUILDAH};
pub use driver::{BuildReport, CommandRunner, Driver, ShellRunner, StepOutcome};
pub use spec::{
    Argv, BuildSpec, FixedIdentity, IdentitySource, ImageDefinition, ImageLabels, RandomIdentity,
    Step,
};

/// Kiln Builder version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
