#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Combat resolution for Frame Assault mechs.
//!
//! A [`Mech`] owns its structure and an ordered weapon loadout. Attacks
//! measure the Manhattan range to the target, then discharge every weapon in
//! loadout order. Each discharge draws one roll from the injected
//! [`RollSource`](frame_assault_core::RollSource), applies damage through the
//! [`Target`](frame_assault_core::Target) capability, and reports to the
//! [`Notifier`](frame_assault_core::Notifier) carried by the [`FireContext`].

mod mech;
mod tracer;
mod weapon;

use frame_assault_core::{Notifier, RollSource, ShotOutcome};

pub use mech::Mech;
pub use tracer::{Tracer, TracerState};
pub use weapon::Weapon;

/// Collaborators lent to weapons for the duration of a volley.
pub struct FireContext<'a> {
    roll: &'a mut dyn RollSource,
    notifier: &'a mut dyn Notifier,
    tracers: Option<&'a mut Vec<Tracer>>,
}

impl<'a> FireContext<'a> {
    /// Creates a context without a tracer sink.
    pub fn new(roll: &'a mut dyn RollSource, notifier: &'a mut dyn Notifier) -> Self {
        Self {
            roll,
            notifier,
            tracers: None,
        }
    }

    /// Attaches a sink that receives a tracer for every attempted shot.
    #[must_use]
    pub fn with_tracers(mut self, tracers: &'a mut Vec<Tracer>) -> Self {
        self.tracers = Some(tracers);
        self
    }
}

/// Record of a single weapon discharge within a volley.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shot {
    /// Name of the weapon that fired.
    pub weapon: String,
    /// Range the weapon fired at.
    pub range: u32,
    /// What the shot achieved.
    pub outcome: ShotOutcome,
}
