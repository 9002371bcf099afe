//! Emitter file validation command

use anyhow::Result;

use crate::file::EmitterFile;

pub fn run(path: &str) -> Result<()> {
    let file = EmitterFile::load(path)?;
    file.options().validate()?;

    println!("{path}: ok");
    println!(
        "  duration {}s, {}",
        file.core.duration,
        if file.core.loops < 0 {
            "looping forever".to_string()
        } else {
            format!("{} loop(s)", file.core.loops)
        }
    );
    println!(
        "  rate {}/s, {} burst(s), capacity {}",
        file.emission.rate,
        file.emission.bursts.len(),
        file.core.max_particles
    );
    println!(
        "  {} despawn rule(s), {} module(s)",
        file.core.despawning_rules.len(),
        file.modules.len()
    );
    Ok(())
}
