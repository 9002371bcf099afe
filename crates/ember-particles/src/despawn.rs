//! Despawn rules: predicates over a particle, OR-combined by the emitter

use std::fmt;
use std::sync::Arc;

use ember_core::Vec3;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// Shared predicate used by [`DespawnRule::Custom`]
pub type Predicate = Arc<dyn Fn(&Particle) -> bool + Send + Sync>;

/// A condition under which a particle is removed.
///
/// Rules are evaluated after the particle's full update for the tick. Any
/// single match removes the particle.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DespawnRule {
    /// Remaining lifetime has run out (`lifetime <= 0`)
    LifetimeExpired,
    /// Location left the axis-aligned box
    OutsideBounds { min: Vec3, max: Vec3 },
    /// Size shrank below the threshold
    SizeBelow { size: f32 },
    /// Colour alpha reached zero
    Transparent,
    /// Host-supplied predicate; cannot be written to a config file
    #[serde(skip)]
    Custom(Predicate),
}

impl DespawnRule {
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Particle) -> bool + Send + Sync + 'static,
    {
        DespawnRule::Custom(Arc::new(predicate))
    }

    pub fn matches(&self, particle: &Particle) -> bool {
        match self {
            DespawnRule::LifetimeExpired => particle.lifetime <= 0.0,
            DespawnRule::OutsideBounds { min, max } => {
                let p = particle.location;
                p.cmplt(*min).any() || p.cmpgt(*max).any()
            }
            DespawnRule::SizeBelow { size } => particle.size < *size,
            DespawnRule::Transparent => particle.colour.a <= 0.0,
            DespawnRule::Custom(predicate) => predicate(particle),
        }
    }
}

/// True if any rule matches. Evaluation runs in list order and stops at
/// the first match.
pub fn should_despawn(rules: &[DespawnRule], particle: &Particle) -> bool {
    rules.iter().any(|rule| rule.matches(particle))
}

impl fmt::Debug for DespawnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DespawnRule::LifetimeExpired => write!(f, "LifetimeExpired"),
            DespawnRule::OutsideBounds { min, max } => f
                .debug_struct("OutsideBounds")
                .field("min", min)
                .field("max", max)
                .finish(),
            DespawnRule::SizeBelow { size } => {
                f.debug_struct("SizeBelow").field("size", size).finish()
            }
            DespawnRule::Transparent => write!(f, "Transparent"),
            DespawnRule::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn particle_with_lifetime(lifetime: f32) -> Particle {
        Particle::new(Vec3::ZERO, Vec3::ZERO, lifetime)
    }

    #[test]
    fn lifetime_expired_includes_zero() {
        let rule = DespawnRule::LifetimeExpired;
        assert!(rule.matches(&particle_with_lifetime(0.0)));
        assert!(rule.matches(&particle_with_lifetime(-0.1)));
        assert!(!rule.matches(&particle_with_lifetime(0.01)));
    }

    #[test]
    fn outside_bounds() {
        let rule = DespawnRule::OutsideBounds {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let mut p = particle_with_lifetime(1.0);
        assert!(!rule.matches(&p));
        p.location = Vec3::new(0.0, 1.5, 0.0);
        assert!(rule.matches(&p));
        p.location = Vec3::new(-2.0, 0.0, 0.0);
        assert!(rule.matches(&p));
    }

    #[test]
    fn size_and_alpha_rules() {
        let mut p = particle_with_lifetime(1.0);
        p.size = 0.01;
        assert!(DespawnRule::SizeBelow { size: 0.05 }.matches(&p));
        assert!(!DespawnRule::Transparent.matches(&p));
        p.colour.a = 0.0;
        assert!(DespawnRule::Transparent.matches(&p));
    }

    #[test]
    fn rules_are_or_combined() {
        let rules = vec![
            DespawnRule::SizeBelow { size: 0.0 },
            DespawnRule::custom(|p| p.rotation > 1.0),
        ];
        let mut p = particle_with_lifetime(1.0);
        assert!(!should_despawn(&rules, &p));
        p.rotation = 2.0;
        assert!(should_despawn(&rules, &p));
    }

    #[test]
    fn evaluation_stops_at_first_match() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let rules = vec![
            DespawnRule::LifetimeExpired,
            DespawnRule::custom(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                false
            }),
        ];
        should_despawn(&rules, &particle_with_lifetime(0.0));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        should_despawn(&rules, &particle_with_lifetime(1.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_rules_never_despawn() {
        assert!(!should_despawn(&[], &particle_with_lifetime(-5.0)));
    }

    #[test]
    fn parse_rules_from_toml() {
        #[derive(Deserialize)]
        struct Rules {
            rules: Vec<DespawnRule>,
        }
        let src = r#"
[[rules]]
rule = "lifetime_expired"

[[rules]]
rule = "outside_bounds"
min = [-10.0, -10.0, -10.0]
max = [10.0, 10.0, 10.0]
"#;
        let parsed: Rules = toml::from_str(src).unwrap();
        assert_eq!(parsed.rules.len(), 2);
        assert!(matches!(parsed.rules[0], DespawnRule::LifetimeExpired));
        assert!(matches!(parsed.rules[1], DespawnRule::OutsideBounds { .. }));
    }
}
