//! Handler for `ordo check`.

use std::path::Path;

use miette::Result;

pub fn exec(file: &Path) -> Result<()> {
    let resolution = super::plan::resolve_file(file, false)?;
    println!("ok: {} steps", resolution.len());
    Ok(())
}
