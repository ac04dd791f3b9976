//! Enemy templates, pools, and uniform pool selection.

use std::collections::BTreeMap;

use super::StageError;
use super::config::StageConfig;
use crate::rng::{RngOracle, RollContext, compute_seed};

/// Static description of a spawnable enemy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    /// Type tag (`normal`, `elite`, `boss`); validated when stats are bound.
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub exp_reward: u64,
}

#[cfg(feature = "serde")]
fn default_level() -> u32 {
    1
}

impl EnemyTemplate {
    pub fn new(id: &str, name: &str, kind: &str, level: u32, exp_reward: u64) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            kind: kind.to_owned(),
            level,
            exp_reward,
        }
    }
}

/// Template id → template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TemplateCatalog {
    templates: BTreeMap<String, EnemyTemplate>,
}

impl TemplateCatalog {
    pub fn new(templates: impl IntoIterator<Item = EnemyTemplate>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|template| (template.id.clone(), template))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&EnemyTemplate> {
        self.templates.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnemyTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Pool id → eligible template ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EnemyPools {
    pools: BTreeMap<String, Vec<String>>,
}

/// Outcome of drawing templates from a pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolDraw<'a> {
    /// Pool actually drawn from (differs from the request on fallback).
    pub pool: &'a str,
    pub fallback: bool,
    pub templates: Vec<&'a EnemyTemplate>,
}

impl EnemyPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(mut self, id: &str, template_ids: &[&str]) -> Self {
        self.pools.insert(
            id.to_owned(),
            template_ids.iter().map(|t| (*t).to_owned()).collect(),
        );
        self
    }

    pub fn get(&self, id: &str) -> Option<&[String]> {
        self.pools.get(id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.pools
            .iter()
            .map(|(id, templates)| (id.as_str(), templates.as_slice()))
    }

    /// Draws `count` templates uniformly (with replacement) from `pool`.
    ///
    /// Unknown pools fall back to [`StageConfig::DEFAULT_POOL`]. Each draw
    /// uses its own seed derived from `game_seed` and `nonce + i`.
    pub fn draw<'a>(
        &'a self,
        pool: &str,
        count: u32,
        catalog: &'a TemplateCatalog,
        rng: &(impl RngOracle + ?Sized),
        game_seed: u64,
        nonce: u64,
    ) -> Result<PoolDraw<'a>, StageError> {
        let (pool_id, entries, fallback) = match self.pools.get_key_value(pool) {
            Some((id, entries)) => (id.as_str(), entries, false),
            None => {
                let (id, entries) = self
                    .pools
                    .get_key_value(StageConfig::DEFAULT_POOL)
                    .ok_or_else(|| StageError::UnknownPool {
                        pool: pool.to_owned(),
                    })?;
                (id.as_str(), entries, true)
            }
        };

        if entries.is_empty() {
            return Err(StageError::EmptyPool {
                pool: pool_id.to_owned(),
            });
        }

        let templates = (0..u64::from(count))
            .map(|i| {
                let seed = compute_seed(game_seed, nonce.wrapping_add(i), 0, RollContext::PoolPick);
                let template_id = &entries[rng.pick_index(seed, entries.len())];
                catalog
                    .get(template_id)
                    .ok_or_else(|| StageError::UnknownTemplate {
                        template: template_id.clone(),
                        pool: pool_id.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PoolDraw {
            pool: pool_id,
            fallback,
            templates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;

    fn fixtures() -> (EnemyPools, TemplateCatalog) {
        let catalog = TemplateCatalog::new([
            EnemyTemplate::new("slime", "Slime", "normal", 1, 10),
            EnemyTemplate::new("bat", "Bat", "normal", 1, 10),
            EnemyTemplate::new("ogre", "Ogre", "elite", 3, 40),
        ]);
        let pools = EnemyPools::new()
            .with_pool("normal", &["slime", "bat"])
            .with_pool("elite", &["ogre"])
            .with_pool("broken", &["missing"]);
        (pools, catalog)
    }

    #[test]
    fn draws_requested_count_from_named_pool() {
        let (pools, catalog) = fixtures();
        let draw = pools.draw("elite", 3, &catalog, &PcgRng, 1, 0).unwrap();
        assert_eq!(draw.pool, "elite");
        assert!(!draw.fallback);
        assert_eq!(draw.templates.len(), 3);
        assert!(draw.templates.iter().all(|t| t.id == "ogre"));
    }

    #[test]
    fn unknown_pool_falls_back_to_normal() {
        let (pools, catalog) = fixtures();
        let draw = pools.draw("volcano", 2, &catalog, &PcgRng, 1, 0).unwrap();
        assert_eq!(draw.pool, "normal");
        assert!(draw.fallback);
        assert!(draw.templates.iter().all(|t| t.kind == "normal"));
    }

    #[test]
    fn missing_fallback_pool_is_an_error() {
        let (_, catalog) = fixtures();
        let pools = EnemyPools::new().with_pool("elite", &["ogre"]);
        assert!(matches!(
            pools.draw("volcano", 1, &catalog, &PcgRng, 1, 0),
            Err(StageError::UnknownPool { .. })
        ));
    }

    #[test]
    fn dangling_template_id_is_an_error() {
        let (pools, catalog) = fixtures();
        assert!(matches!(
            pools.draw("broken", 1, &catalog, &PcgRng, 1, 0),
            Err(StageError::UnknownTemplate { .. })
        ));
    }

    #[test]
    fn selection_is_uniform_enough_and_deterministic() {
        let (pools, catalog) = fixtures();
        let draw = pools.draw("normal", 400, &catalog, &PcgRng, 7, 0).unwrap();
        let slimes = draw.templates.iter().filter(|t| t.id == "slime").count();
        assert!((120..=280).contains(&slimes), "slimes = {slimes}");

        let again = pools.draw("normal", 400, &catalog, &PcgRng, 7, 0).unwrap();
        assert_eq!(draw, again);
    }
}
