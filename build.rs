use std::process::Command;
use vergen::EmitBuilder;

// Emits VERGEN_BUILD_TIMESTAMP and, inside a git checkout, VERGEN_GIT_SHA
// for the /api/version endpoint.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let in_git_checkout = Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .is_ok_and(|output| output.status.success());

    let mut builder = EmitBuilder::builder();
    builder.build_timestamp();
    if in_git_checkout {
        builder.git_sha(true);
    }
    builder.emit()?;
    Ok(())
}
