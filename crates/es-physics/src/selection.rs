//! Kinematic + identification object filters.

use serde::{Deserialize, Serialize};

use crate::object::{Identify, Kinematic};

/// `pt > pt_min && |eta| < abs_eta_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicCuts {
    /// Strict lower bound on transverse momentum.
    pub pt_min: f64,
    /// Strict upper bound on |pseudorapidity|.
    pub abs_eta_max: f64,
}

impl KinematicCuts {
    /// New threshold pair.
    pub const fn new(pt_min: f64, abs_eta_max: f64) -> Self {
        Self { pt_min, abs_eta_max }
    }

    /// `true` if the object passes both thresholds.
    pub fn accepts<K: Kinematic + ?Sized>(&self, obj: &K) -> bool {
        obj.pt() > self.pt_min && obj.eta().abs() < self.abs_eta_max
    }
}

/// Keep the objects passing `cuts` and `predicate`, in their original order.
pub fn select<T, F>(objects: &[T], cuts: KinematicCuts, predicate: F) -> Vec<T>
where
    T: Kinematic + Clone,
    F: Fn(&T) -> bool,
{
    objects.iter().filter(|o| cuts.accepts(*o) && predicate(o)).cloned().collect()
}

/// [`select`] with every identification criterion in `ids` ANDed.
pub fn select_with_ids<T, Id>(objects: &[T], cuts: KinematicCuts, ids: &[Id]) -> Vec<T>
where
    T: Kinematic + Identify<Id> + Clone,
    Id: Copy,
{
    select(objects, cuts, |o| o.passes_all(ids))
}

/// Keep the objects passing `predicate` only, in order.
pub fn filter_by<T, F>(objects: &[T], predicate: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    objects.iter().filter(|o| predicate(o)).cloned().collect()
}
