//! Emitter description files

use std::path::Path;

use anyhow::{Context, Result};
use ember_core::{Sampler, SeededSampler};
use ember_particles::{
    CoreOptions, EmissionOptions, Emitter, EmitterOptions, ModuleConfig, RendererOptions,
    ShapeOptions,
};
use serde::{Deserialize, Serialize};

/// A TOML document describing one emitter: the four option groups plus
/// the modules to attach, in order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterFile {
    pub core: CoreOptions,
    pub emission: EmissionOptions,
    pub shape: ShapeOptions,
    pub renderer: RendererOptions,
    pub modules: Vec<ModuleConfig>,
}

impl EmitterFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read emitter file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse emitter file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn options(&self) -> EmitterOptions {
        EmitterOptions {
            core: self.core.clone(),
            emission: self.emission.clone(),
            shape: self.shape.clone(),
            renderer: self.renderer.clone(),
        }
    }

    /// Build a validated emitter with the file's modules attached
    pub fn build<S: Sampler>(&self, sampler: S) -> Result<Emitter<S>> {
        let mut emitter = Emitter::with_sampler(self.options(), sampler)?;
        for module in &self.modules {
            emitter.add_boxed_module(module.clone().into_module());
        }
        Ok(emitter)
    }

    pub fn build_seeded(&self, seed: Option<u64>) -> Result<Emitter<SeededSampler>> {
        let sampler = seed.map(SeededSampler::new).unwrap_or_default();
        self.build(sampler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::EmberError;

    const FOUNTAIN: &str = include_str!("../../../demos/fountain.toml");

    #[test]
    fn demo_file_builds() {
        let file = EmitterFile::parse(FOUNTAIN).unwrap();
        assert_eq!(file.modules.len(), 3);
        let emitter = file.build_seeded(Some(1)).unwrap();
        assert_eq!(emitter.module_count(), 3);
        assert_eq!(emitter.core().loops, 3);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let file = EmitterFile::parse("").unwrap();
        assert!(file.modules.is_empty());
        assert_eq!(file.core.max_particles, CoreOptions::default().max_particles);
        assert!(file.build_seeded(None).is_ok());
    }

    #[test]
    fn default_file_survives_toml() {
        let text = EmitterFile::default().to_toml().unwrap();
        let parsed = EmitterFile::parse(&text).unwrap();
        assert!(parsed.options().validate().is_ok());
        assert_eq!(parsed.core.despawning_rules.len(), 1);
    }

    #[test]
    fn invalid_rate_is_reported() {
        let file = EmitterFile::parse("[emission]\nrate = 0\n").unwrap();
        let err = file.build_seeded(None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<EmberError>(),
            Some(&EmberError::InvalidRate(0.0))
        );
    }

    #[test]
    fn negative_capacity_fails_to_parse() {
        assert!(EmitterFile::parse("[core]\nmax_particles = -4\n").is_err());
    }
}
