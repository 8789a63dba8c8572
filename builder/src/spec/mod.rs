//! Build specification model.
//!
//! A [`BuildSpec`] records the desired image as ordered [`Step`]s plus a set
//! of singleton fields (base image, entrypoint, command, author, port,
//! labels) and an append-only volume list. Only `steps` preserves call
//! order; singleton fields are replaced wholesale on every set.
//!
//! # Example
//!
//! ```
//! use kiln_builder::BuildSpec;
//!
//! let mut spec = BuildSpec::new();
//! spec.base("docker.io/ubuntu")
//!     .run("mkdir -p /app")
//!     .workdir("/app")
//!     .env("MODE", "release");
//! spec.copy("mod.ts", "/app")?.user("1000:1000");
//! assert_eq!(spec.definition().steps.len(), 5);
//! # Ok::<(), kiln_core::KilnError>(())
//! ```

mod identity;
mod labels;
mod step;

use std::path::Path;

use kiln_core::error::{KilnError, Result};
use serde::{Deserialize, Serialize};

pub use identity::{FixedIdentity, IdentitySource, RandomIdentity, IDENTITY_LEN};
pub use labels::{ImageLabels, AUTHORS_LABEL};
pub use step::Step;

/// The data half of a build spec: everything except the working-container
/// identity.
///
/// Every field defaults, so a definition file only lists what it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDefinition {
    /// Source image reference
    #[serde(rename = "from")]
    pub base: Option<String>,
    /// Ordered build steps
    pub steps: Vec<Step>,
    /// Port to expose
    pub port: Option<u16>,
    /// Entrypoint argv
    pub entrypoint: Option<Vec<String>>,
    /// Default command argv
    #[serde(rename = "cmd")]
    pub command: Option<Vec<String>>,
    /// Image author
    pub author: Option<String>,
    /// Structured labels
    pub labels: Option<ImageLabels>,
    /// Volume mount points
    pub volumes: Vec<String>,
}

impl ImageDefinition {
    /// Parse a definition from YAML (JSON is accepted as well).
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read and parse a definition file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| match e {
            KilnError::Serialization(msg) => {
                KilnError::Serialization(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Serialize the definition as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// One argv argument: a single string or a flat list spliced in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argv {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Argv {
    fn from(s: &str) -> Self {
        Argv::One(s.to_string())
    }
}

impl From<String> for Argv {
    fn from(s: String) -> Self {
        Argv::One(s)
    }
}

impl From<Vec<String>> for Argv {
    fn from(v: Vec<String>) -> Self {
        Argv::Many(v)
    }
}

impl From<Vec<&str>> for Argv {
    fn from(v: Vec<&str>) -> Self {
        Argv::Many(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Argv {
    fn from(v: &[&str]) -> Self {
        Argv::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

/// Flatten argv arguments one level.
fn flatten_argv<I, A>(argv: I) -> Vec<String>
where
    I: IntoIterator<Item = A>,
    A: Into<Argv>,
{
    let mut flat = Vec::new();
    for arg in argv {
        match arg.into() {
            Argv::One(s) => flat.push(s),
            Argv::Many(v) => flat.extend(v),
        }
    }
    flat
}

/// Reject Copy destinations that are not absolute.
fn validate_copy_dest(dest: &str) -> Result<()> {
    if dest.starts_with('/') {
        Ok(())
    } else {
        Err(KilnError::Validation(format!(
            "destination path should be absolute: {}",
            dest
        )))
    }
}

/// Description of a desired container image.
///
/// Mutators take `&mut self` and return `&mut Self` so calls chain.
/// [`BuildSpec::copy`] is the only fallible mutator.
///
/// Cloning copies the definition but draws a fresh random identity, so a
/// spec and its clone never share a working container.
#[derive(Debug, PartialEq, Eq)]
pub struct BuildSpec {
    identity: String,
    definition: ImageDefinition,
}

impl Clone for BuildSpec {
    fn clone(&self) -> Self {
        Self {
            identity: RandomIdentity.next_identity(),
            definition: self.definition.clone(),
        }
    }
}

impl Default for BuildSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildSpec {
    /// Empty spec with a random identity.
    pub fn new() -> Self {
        Self::with_identity(&RandomIdentity)
    }

    /// Empty spec named by the given identity source.
    pub fn with_identity(source: &dyn IdentitySource) -> Self {
        Self {
            identity: source.next_identity(),
            definition: ImageDefinition::default(),
        }
    }

    /// Spec seeded from a definition, with a random identity.
    pub fn from_definition(definition: ImageDefinition) -> Result<Self> {
        Self::from_definition_with(definition, &RandomIdentity)
    }

    /// Spec seeded from a definition.
    ///
    /// Steps are normalized the same way the mutators normalize them: Env
    /// names and values are trimmed, and any Copy step with a relative
    /// destination rejects the whole definition.
    pub fn from_definition_with(
        mut definition: ImageDefinition,
        source: &dyn IdentitySource,
    ) -> Result<Self> {
        for step in definition.steps.iter_mut() {
            match step {
                Step::Copy { dest, .. } => validate_copy_dest(dest)?,
                Step::Env { name, value } => {
                    *name = name.trim().to_string();
                    *value = value.trim().to_string();
                }
                Step::Run { .. } | Step::User { .. } | Step::WorkDir { .. } => {}
            }
        }
        Ok(Self {
            identity: source.next_identity(),
            definition,
        })
    }

    /// Name of the working container used by the buildah script.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Read-only view of the recorded definition.
    pub fn definition(&self) -> &ImageDefinition {
        &self.definition
    }

    /// Set the base image, replacing any previous one.
    pub fn base(&mut self, image: impl Into<String>) -> &mut Self {
        self.definition.base = Some(image.into());
        self
    }

    /// Append a shell command. The command is embedded verbatim.
    pub fn run(&mut self, cmd: impl Into<String>) -> &mut Self {
        self.definition.steps.push(Step::Run { cmd: cmd.into() });
        self
    }

    /// Append an environment variable; name and value are trimmed.
    pub fn env(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> &mut Self {
        self.definition.steps.push(Step::Env {
            name: name.as_ref().trim().to_string(),
            value: value.as_ref().trim().to_string(),
        });
        self
    }

    /// Replace the default command.
    pub fn command<I, A>(&mut self, argv: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Argv>,
    {
        self.definition.command = Some(flatten_argv(argv));
        self
    }

    /// Replace the entrypoint.
    pub fn entrypoint<I, A>(&mut self, argv: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Argv>,
    {
        self.definition.entrypoint = Some(flatten_argv(argv));
        self
    }

    /// Append a copy of `src` into the absolute path `dest`.
    ///
    /// # Errors
    ///
    /// Returns `KilnError::Validation` when `dest` does not start with `/`;
    /// the spec is left unchanged.
    pub fn copy(&mut self, src: impl Into<String>, dest: impl Into<String>) -> Result<&mut Self> {
        let dest = dest.into();
        if let Err(e) = validate_copy_dest(&dest) {
            tracing::debug!(identity = %self.identity, dest = %dest, "Rejected COPY step");
            return Err(e);
        }
        self.definition.steps.push(Step::Copy {
            src: src.into(),
            dest,
        });
        Ok(self)
    }

    /// Append a user switch (`name`, `uid` or `uid:gid`).
    pub fn user(&mut self, id: impl Into<String>) -> &mut Self {
        self.definition.steps.push(Step::User { id: id.into() });
        self
    }

    /// Append a working-directory change.
    pub fn workdir(&mut self, dir: impl Into<String>) -> &mut Self {
        self.definition.steps.push(Step::WorkDir { dir: dir.into() });
        self
    }

    /// Declare a volume.
    pub fn volume(&mut self, path: impl Into<String>) -> &mut Self {
        self.definition.volumes.push(path.into());
        self
    }

    /// Set the author, replacing any previous one.
    pub fn author(&mut self, author: impl Into<String>) -> &mut Self {
        self.definition.author = Some(author.into());
        self
    }

    /// Set the exposed port, replacing any previous one.
    pub fn expose(&mut self, port: u16) -> &mut Self {
        self.definition.port = Some(port);
        self
    }

    /// Set the label metadata, replacing any previous labels.
    pub fn labels(&mut self, labels: ImageLabels) -> &mut Self {
        self.definition.labels = Some(labels);
        self
    }
}
