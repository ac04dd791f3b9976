//! Stat derivation engine.
//!
//! # Architecture
//!
//! ```text
//! [ Attributes ]            STR DEX VIT AGI CTR
//!      ↓ derive             fixed linear formulas + attack interval
//! [ Attribute portion ]
//!      ↓ compose            + class base table (player / enemy)
//!      ↓ with_bonuses       + equipment deltas, clamped
//! [ DerivedStats ]          ATK DEF HP ASPD CR CRD
//! ```
//!
//! All functions are pure and deterministic. Stats are always recomputed as
//! a whole; nothing in the crate patches a single field of a bound snapshot.

pub mod attributes;
pub mod bonus;
pub mod calculator;
pub mod derived;
pub mod interval;

pub use attributes::{Attribute, Attributes};
pub use bonus::StatBonuses;
pub use calculator::{EnemyStatBlock, EnemyStatCalculator, PlayerStatCalculator, StatError};
pub use derived::{DerivedStats, compose, derive, with_bonuses};
pub use interval::attack_interval;
