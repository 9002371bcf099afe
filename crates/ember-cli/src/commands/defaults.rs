//! Print the default emitter file

use anyhow::Result;

use crate::file::EmitterFile;

pub fn run() -> Result<()> {
    print!("{}", EmitterFile::default().to_toml()?);
    Ok(())
}
