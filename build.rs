use std::error::Error;

use vergen_gitcl::{CargoBuilder, Emitter, GitclBuilder};

/// Stamp the git revision and target triple into the binary for `doctor`
///
/// Outside a git checkout the git values are emitted as placeholders.
fn main() -> Result<(), Box<dyn Error>> {
    let cargo = CargoBuilder::default().target_triple(true).build()?;
    let git = GitclBuilder::default().sha(true).dirty(true).build()?;

    Emitter::default()
        .add_instructions(&cargo)?
        .add_instructions(&git)?
        .emit()?;
    Ok(())
}
