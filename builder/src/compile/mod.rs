//! Instruction compiler.
//!
//! Lowers a [`BuildSpec`] into an ordered plan of logical [`Instruction`]s,
//! then renders that plan for a backend:
//!
//! - [`script()`]: `buildah` command lines driving a named working container
//! - [`dockerfile()`]: Dockerfile text
//!
//! Both renderers walk the same plan, so they encode the same operations in
//! the same order and differ only in syntax.
//!
//! # Plan Order
//!
//! FROM, then one instruction per step in insertion order, then the trailing
//! block: EXPOSE, ENTRYPOINT, VOLUME, CMD, author, LABEL.

pub mod dockerfile;
pub mod script;

use std::fmt;

use crate::spec::{BuildSpec, Step};

pub use dockerfile::dockerfile;
pub use script::{script, BUILDAH};

/// One logical build operation, independent of its encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `FROM <image>`; empty when the spec has no base
    From { image: String },
    /// `RUN <command>`
    Run { command: String },
    /// `ENV <key>=<value>`
    Env { key: String, value: String },
    /// `USER <user>[:<group>]`
    User { user: String },
    /// `COPY <src> <dst>`
    Copy { src: String, dst: String },
    /// `WORKDIR <path>`
    Workdir { path: String },
    /// `EXPOSE <port>`
    Expose { port: u16 },
    /// `ENTRYPOINT ["exec", "form"]`
    Entrypoint { exec: Vec<String> },
    /// `VOLUME ["/a", "/b"]`
    Volume { paths: Vec<String> },
    /// `CMD ["exec", "form"]`
    Cmd { exec: Vec<String> },
    /// Image author
    Author { name: String },
    /// `LABEL <key>=<value>`
    Label { key: String, value: String },
}

impl Instruction {
    /// Dockerfile keyword for this instruction.
    pub fn keyword(&self) -> &'static str {
        match self {
            Instruction::From { .. } => "FROM",
            Instruction::Run { .. } => "RUN",
            Instruction::Env { .. } => "ENV",
            Instruction::User { .. } => "USER",
            Instruction::Copy { .. } => "COPY",
            Instruction::Workdir { .. } => "WORKDIR",
            Instruction::Expose { .. } => "EXPOSE",
            Instruction::Entrypoint { .. } => "ENTRYPOINT",
            Instruction::Volume { .. } => "VOLUME",
            Instruction::Cmd { .. } => "CMD",
            Instruction::Author { .. } | Instruction::Label { .. } => "LABEL",
        }
    }

    /// Whether this instruction came from a recorded step rather than from
    /// the base image or a singleton field.
    pub fn is_step(&self) -> bool {
        matches!(
            self,
            Instruction::Run { .. }
                | Instruction::Env { .. }
                | Instruction::User { .. }
                | Instruction::Copy { .. }
                | Instruction::Workdir { .. }
        )
    }
}

impl From<&Step> for Instruction {
    fn from(step: &Step) -> Self {
        match step {
            Step::Run { cmd } => Instruction::Run {
                command: cmd.clone(),
            },
            Step::Env { name, value } => Instruction::Env {
                key: name.clone(),
                value: value.clone(),
            },
            Step::User { id } => Instruction::User { user: id.clone() },
            Step::Copy { src, dest } => Instruction::Copy {
                src: src.clone(),
                dst: dest.clone(),
            },
            Step::WorkDir { dir } => Instruction::Workdir { path: dir.clone() },
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&dockerfile::render_line(self))
    }
}

/// Lower a spec into its ordered plan.
///
/// Never fails: a spec without a base image yields `FROM` with an empty
/// image, and empty singleton fields are simply skipped.
pub fn plan(spec: &BuildSpec) -> Vec<Instruction> {
    let def = spec.definition();
    let mut plan = Vec::with_capacity(def.steps.len() + 8);

    plan.push(Instruction::From {
        image: def.base.clone().unwrap_or_default(),
    });

    for (index, step) in def.steps.iter().enumerate() {
        tracing::trace!(index, kind = step.kind(), "Planned step");
        plan.push(Instruction::from(step));
    }

    // Port 0 is treated as unset
    if let Some(port) = def.port.filter(|p| *p != 0) {
        plan.push(Instruction::Expose { port });
    }
    if let Some(ref exec) = def.entrypoint {
        plan.push(Instruction::Entrypoint { exec: exec.clone() });
    }
    if !def.volumes.is_empty() {
        plan.push(Instruction::Volume {
            paths: def.volumes.clone(),
        });
    }
    if let Some(ref exec) = def.command {
        plan.push(Instruction::Cmd { exec: exec.clone() });
    }
    if let Some(ref name) = def.author {
        plan.push(Instruction::Author { name: name.clone() });
    }
    if let Some(ref labels) = def.labels {
        plan.extend(
            labels
                .entries()
                .into_iter()
                .map(|(key, value)| Instruction::Label { key, value }),
        );
    }

    tracing::debug!(
        identity = spec.identity(),
        instructions = plan.len(),
        steps = def.steps.len(),
        "Planned build"
    );
    plan
}

/// Compact JSON array, e.g. `["bash","-c"]`.
pub(crate) fn json_array(items: &[String]) -> String {
    serde_json::Value::from(items.to_vec()).to_string()
}

/// JSON string literal, e.g. `"Jane Doe"`.
pub(crate) fn json_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}
