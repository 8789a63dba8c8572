//! Ordered build steps.

use serde::{Deserialize, Serialize};

/// A single ordered build operation recorded on a spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Step {
    /// Execute a shell command inside the image
    Run { cmd: String },
    /// Set an environment variable
    Env { name: String, value: String },
    /// Copy a file or tree into the image; `dest` is absolute
    Copy { src: String, dest: String },
    /// Set the effective user, optionally `uid:gid`
    User { id: String },
    /// Set the working directory
    WorkDir { dir: String },
}

impl Step {
    /// Short lowercase name of the step kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Run { .. } => "run",
            Step::Env { .. } => "env",
            Step::Copy { .. } => "copy",
            Step::User { .. } => "user",
            Step::WorkDir { .. } => "workdir",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_kind() {
        let step = Step::WorkDir {
            dir: "/app".to_string(),
        };
        assert_eq!(step.kind(), "workdir");
    }

    #[test]
    fn test_step_serialized_tag() {
        let step = Step::Copy {
            src: "mod.ts".to_string(),
            dest: "/app".to_string(),
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["type"], "copy");
        assert_eq!(json["dest"], "/app");
    }

    #[test]
    fn test_step_deserialize_workdir() {
        let step: Step = serde_json::from_str(r#"{"type":"workdir","dir":"/srv"}"#).unwrap();
        assert_eq!(
            step,
            Step::WorkDir {
                dir: "/srv".to_string()
            }
        );
    }

    #[test]
    fn test_step_deserialize_unknown_type() {
        assert!(serde_json::from_str::<Step>(r#"{"type":"add","src":"a"}"#).is_err());
    }
}
