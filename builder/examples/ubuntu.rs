//! Build an Ubuntu-based image with buildah.
//!
//! ```bash
//! cargo run -p kiln-builder --example ubuntu            # run the build
//! cargo run -p kiln-builder --example ubuntu -- --print # print Dockerfile + script
//! ```
//!
//! `KILN_SHELL` and `KILN_FAILURE_POLICY` adjust the driver.

use kiln_builder::{dockerfile, script, BuildSpec, Driver};
use kiln_core::DriverConfig;
use tracing_subscriber::EnvFilter;

const IMAGE_NAME: &str = "docker.io/dineshdb/test";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut spec = BuildSpec::new();
    spec.base("docker.io/ubuntu")
        .author("Dinesh Bhattarai")
        .run("echo 'hello'")
        .run("mkdir -p /app")
        .workdir("/app")
        .env("test", "value");
    spec.copy("mod.ts", "/app")?
        .user("1000:1000")
        .volume("/var/lib/docker")
        .command(["bash"])
        .entrypoint(["bash", "-c"]);

    if std::env::args().any(|a| a == "--print") {
        println!("{}\n", dockerfile(&spec));
        for line in script(&spec, IMAGE_NAME) {
            println!("{line}");
        }
        return Ok(());
    }

    let driver = Driver::new(DriverConfig::from_env()?);
    let report = driver.build(&spec, IMAGE_NAME).await?;
    if !report.success() {
        eprintln!("{} step(s) failed", report.failures().count());
    }
    Ok(())
}
