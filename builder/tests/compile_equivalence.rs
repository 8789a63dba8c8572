//! End-to-end checks that the buildah script and the Dockerfile describe the
//! same build.

use kiln_builder::{
    dockerfile, plan, script, BuildSpec, FixedIdentity, ImageDefinition, ImageLabels, Instruction,
};

/// The example image: an Ubuntu shell with a copied module.
fn example_spec() -> BuildSpec {
    let mut spec = BuildSpec::with_identity(&FixedIdentity::new("1a2b3c4d"));
    spec.base("docker.io/ubuntu")
        .author("Dinesh Bhattarai")
        .run("echo 'hello'")
        .run("mkdir -p /app")
        .workdir("/app")
        .env("test", "value");
    spec.copy("mod.ts", "/app")
        .expect("absolute destination")
        .user("1000:1000")
        .volume("/var/lib/docker")
        .command(["bash"])
        .entrypoint(["bash", "-c"]);
    spec
}

/// Map a buildah line back to the Dockerfile keyword of the operation it
/// performs. Bookkeeping lines (commit) map to `None`.
fn script_keyword(line: &str) -> Option<&'static str> {
    if line.starts_with("export MNT=$(buildah mount ") {
        return Some("COPY");
    }
    let mut words = line.split_whitespace().skip(1);
    match (words.next(), words.next()) {
        (Some("from"), _) => Some("FROM"),
        (Some("run"), _) => Some("RUN"),
        (Some("commit"), _) => None,
        (Some("config"), Some(flag)) => match flag {
            "--env" => Some("ENV"),
            "--user" => Some("USER"),
            "--workingdir" => Some("WORKDIR"),
            "--port" => Some("EXPOSE"),
            "--entrypoint" => Some("ENTRYPOINT"),
            "--volume" => Some("VOLUME"),
            "--cmd" => Some("CMD"),
            "--author" | "--label" => Some("LABEL"),
            other => panic!("unexpected config flag {other}"),
        },
        _ => panic!("unexpected script line {line}"),
    }
}

#[test]
fn test_example_dockerfile() {
    assert_eq!(
        dockerfile(&example_spec()),
        [
            "FROM docker.io/ubuntu",
            "RUN echo 'hello'",
            "RUN mkdir -p /app",
            "WORKDIR /app",
            "ENV test=value",
            "COPY mod.ts /app",
            "USER 1000:1000",
            r#"ENTRYPOINT ["bash","-c"]"#,
            r#"VOLUME ["/var/lib/docker"]"#,
            r#"CMD ["bash"]"#,
            r#"LABEL author="Dinesh Bhattarai""#,
        ]
        .join("\n")
    );
}

#[test]
fn test_example_script() {
    assert_eq!(
        script(&example_spec(), "docker.io/dineshdb/test"),
        vec![
            "buildah from --name 1a2b3c4d docker.io/ubuntu",
            "buildah run 1a2b3c4d echo 'hello'",
            "buildah run 1a2b3c4d mkdir -p /app",
            "buildah config --workingdir /app 1a2b3c4d",
            "buildah config --env test=value 1a2b3c4d",
            "export MNT=$(buildah mount 1a2b3c4d) && cp -r mod.ts $MNT//app",
            "buildah config --user 1000:1000 1a2b3c4d",
            r#"buildah config --entrypoint '["bash","-c"]' 1a2b3c4d"#,
            "buildah config --volume '/var/lib/docker' 1a2b3c4d",
            r#"buildah config --cmd '["bash"]' 1a2b3c4d"#,
            r#"buildah config --author "Dinesh Bhattarai" 1a2b3c4d"#,
            "buildah commit 1a2b3c4d docker.io/dineshdb/test",
        ]
    );
}

/// Assert that the Dockerfile, the script and the plan list the same
/// operations in the same order.
fn assert_renderers_agree(spec: &BuildSpec) {
    let from_dockerfile: Vec<String> = dockerfile(spec)
        .lines()
        .map(|l| l.split_whitespace().next().unwrap_or_default().to_string())
        .collect();

    // Collapse consecutive --volume lines: the script emits one per path.
    let mut from_script: Vec<String> = Vec::new();
    for keyword in script(spec, "out").iter().filter_map(|l| script_keyword(l)) {
        if keyword == "VOLUME" && from_script.last().map(String::as_str) == Some("VOLUME") {
            continue;
        }
        from_script.push(keyword.to_string());
    }

    let from_plan: Vec<String> = plan(spec)
        .iter()
        .map(|i| i.keyword().to_string())
        .collect();

    assert_eq!(from_dockerfile, from_plan);
    assert_eq!(from_script, from_plan);
}

#[test]
fn test_renderers_agree_on_operations() {
    let mut spec = example_spec();
    spec.expose(8080).labels(ImageLabels {
        authors: vec!["Dinesh".to_string()],
        version: Some("0.1.0".to_string()),
        description: Some("example".to_string()),
    });
    assert_renderers_agree(&spec);
}

#[test]
fn test_renderers_agree_without_base_or_steps() {
    let mut spec = BuildSpec::with_identity(&FixedIdentity::new("5e5e5e5e"));
    spec.volume("/a")
        .volume("/b")
        .volume("/c")
        .entrypoint(["/init"])
        .command(["serve", "--verbose"])
        .author("ops")
        .expose(443)
        .labels(ImageLabels {
            authors: vec!["a".to_string(), "b".to_string()],
            version: None,
            description: Some("no base".to_string()),
        });
    assert_renderers_agree(&spec);

    let volume_lines = script(&spec, "out")
        .iter()
        .filter(|l| script_keyword(l) == Some("VOLUME"))
        .count();
    assert_eq!(volume_lines, 3);
    assert!(dockerfile(&spec).contains(r#"VOLUME ["/a","/b","/c"]"#));
}

#[test]
fn test_renderers_agree_on_steps_only() {
    let mut spec = BuildSpec::with_identity(&FixedIdentity::new("0badf00d"));
    spec.base("alpine")
        .env("PATH", "/bin")
        .run("apk add curl")
        .user("root")
        .workdir("/srv")
        .run("apk add curl");
    spec.copy("dist", "/srv").expect("absolute destination");
    assert_renderers_agree(&spec);
}

#[test]
fn test_port_zero_definition_renders_no_expose() {
    let def = ImageDefinition::from_yaml("from: alpine\nport: 0\n").unwrap();
    let spec = BuildSpec::from_definition_with(def, &FixedIdentity::new("00c0ffee")).unwrap();
    assert_renderers_agree(&spec);
    assert!(!dockerfile(&spec).contains("EXPOSE"));
    assert!(script(&spec, "out").iter().all(|l| !l.contains("--port")));
}

#[test]
fn test_step_instructions_match_steps() {
    let spec = example_spec();
    let steps = spec.definition().steps.len();
    let planned = plan(&spec).iter().filter(|i| i.is_step()).count();
    assert_eq!(planned, steps);

    // The first `steps` lines after FROM are the per-step lines in both forms.
    let script_lines = script(&spec, "out");
    let dockerfile_text = dockerfile(&spec);
    let dockerfile_lines: Vec<&str> = dockerfile_text.lines().collect();
    for (i, step) in plan(&spec)
        .iter()
        .filter(|ins| ins.is_step())
        .enumerate()
    {
        assert_eq!(dockerfile_lines[i + 1], step.to_string());
        assert_eq!(script_keyword(&script_lines[i + 1]), Some(step.keyword()));
    }
}

#[test]
fn test_relative_copy_leaves_spec_untouched() {
    let mut spec = BuildSpec::with_identity(&FixedIdentity::new("00000000"));
    assert!(spec.copy("mod.ts", "app").is_err());
    assert_eq!(spec.definition().steps.len(), 0);
    assert_eq!(dockerfile(&spec), "FROM ");
}

#[test]
fn test_compilation_is_repeatable_across_generators() {
    let spec = example_spec();
    let first_script = script(&spec, "img");
    let first_dockerfile = dockerfile(&spec);
    assert_eq!(script(&spec, "img"), first_script);
    assert_eq!(dockerfile(&spec), first_dockerfile);
    assert!(matches!(plan(&spec)[0], Instruction::From { .. }));
}
