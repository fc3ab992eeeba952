use std::error::Error;

// Emits VERGEN_GIT_SHA, VERGEN_GIT_DIRTY and VERGEN_CARGO_TARGET_TRIPLE for `--version`.
fn main() -> Result<(), Box<dyn Error>> {
    let cargo = vergen_gitcl::CargoBuilder::default()
        .target_triple(true)
        .build()?;
    let git = vergen_gitcl::GitclBuilder::default()
        .sha(true)
        .dirty(false)
        .build()?;

    vergen_gitcl::Emitter::default()
        .add_instructions(&cargo)?
        .add_instructions(&git)?
        .emit()?;
    Ok(())
}
