//! Imperative renderer: `buildah` command lines.
//!
//! Every line targets the working container named by the spec identity.
//! Values are interpolated verbatim; nothing is shell-escaped.

use super::{json_array, json_string, plan, Instruction};
use crate::spec::BuildSpec;

/// Build tool invoked by every generated line.
pub const BUILDAH: &str = "buildah";

/// Render the spec as an ordered list of shell command lines that build it
/// in a working container and commit the result as `image_name`.
pub fn script(spec: &BuildSpec, image_name: &str) -> Vec<String> {
    let id = spec.identity();
    let mut lines = Vec::new();
    for instruction in plan(spec) {
        render_into(&instruction, id, &mut lines);
    }
    lines.push(format!("{BUILDAH} commit {id} {image_name}"));
    lines
}

/// Append the command line(s) for one instruction.
///
/// `Volume` expands to one line per path; every other instruction yields
/// exactly one line.
fn render_into(instruction: &Instruction, id: &str, lines: &mut Vec<String>) {
    match instruction {
        Instruction::From { image } => {
            lines.push(format!("{BUILDAH} from --name {id} {image}"));
        }
        Instruction::Run { command } => {
            lines.push(format!("{BUILDAH} run {id} {command}"));
        }
        Instruction::Env { key, value } => {
            lines.push(format!("{BUILDAH} config --env {key}={value} {id}"));
        }
        Instruction::User { user } => {
            lines.push(format!("{BUILDAH} config --user {user} {id}"));
        }
        Instruction::Copy { src, dst } => {
            lines.push(format!(
                "export MNT=$({BUILDAH} mount {id}) && cp -r {src} $MNT/{dst}"
            ));
        }
        Instruction::Workdir { path } => {
            lines.push(format!("{BUILDAH} config --workingdir {path} {id}"));
        }
        Instruction::Expose { port } => {
            lines.push(format!("{BUILDAH} config --port {port} {id}"));
        }
        Instruction::Entrypoint { exec } => {
            lines.push(format!(
                "{BUILDAH} config --entrypoint '{}' {id}",
                json_array(exec)
            ));
        }
        Instruction::Volume { paths } => {
            for path in paths {
                lines.push(format!("{BUILDAH} config --volume '{path}' {id}"));
            }
        }
        Instruction::Cmd { exec } => {
            lines.push(format!("{BUILDAH} config --cmd '{}' {id}", json_array(exec)));
        }
        Instruction::Author { name } => {
            lines.push(format!(
                "{BUILDAH} config --author {} {id}",
                json_string(name)
            ));
        }
        Instruction::Label { key, value } => {
            lines.push(format!(
                "{BUILDAH} config --label {key}={} {id}",
                json_string(value)
            ));
        }
    }
}
