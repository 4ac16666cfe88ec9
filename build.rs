use anyhow::Result;
use vergen::EmitBuilder;

// Git metadata printed by the CLI in --debug mode
fn main() -> Result<()> {
    EmitBuilder::builder()
        .git_sha(true)
        .git_commit_date()
        .git_dirty(false)
        .emit()?;
    Ok(())
}
