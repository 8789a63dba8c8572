//! Declarative renderer: Dockerfile text.

use super::{json_array, json_string, plan, Instruction};
use crate::spec::BuildSpec;

/// Render the spec as Dockerfile text, one instruction per line.
///
/// Lines are joined with `\n` and there is no trailing newline.
pub fn dockerfile(spec: &BuildSpec) -> String {
    plan(spec)
        .iter()
        .map(render_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one instruction as a Dockerfile line.
pub(crate) fn render_line(instruction: &Instruction) -> String {
    let keyword = instruction.keyword();
    match instruction {
        Instruction::From { image } => format!("{keyword} {image}"),
        Instruction::Run { command } => format!("{keyword} {command}"),
        Instruction::Env { key, value } => format!("{keyword} {key}={value}"),
        Instruction::User { user } => format!("{keyword} {user}"),
        Instruction::Copy { src, dst } => format!("{keyword} {src} {dst}"),
        Instruction::Workdir { path } => format!("{keyword} {path}"),
        Instruction::Expose { port } => format!("{keyword} {port}"),
        Instruction::Entrypoint { exec } | Instruction::Cmd { exec } => {
            format!("{keyword} {}", json_array(exec))
        }
        Instruction::Volume { paths } => format!("{keyword} {}", json_array(paths)),
        Instruction::Author { name } => format!("{keyword} author={}", json_string(name)),
        Instruction::Label { key, value } => format!("{keyword} {key}={}", json_string(value)),
    }
}
