//! Angular-overlap removal within and between object collections.
//!
//! All routines are O(n·m) in the collection sizes, preserve the order of the
//! surviving objects, and never modify their inputs.

use serde::{Deserialize, Serialize};

use crate::object::Kinematic;

/// How to resolve a pair of objects that overlap within one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Drop every object that lies within the threshold of any other object:
    /// both members of an overlapping pair go.
    #[default]
    SymmetricMutualRemoval,
    /// Object `i` is dropped only if some later object `j > i` overlaps it,
    /// so the later-indexed member of a pair survives. Order-dependent.
    ForwardOnlyRemoval,
}

/// Remove objects overlapping other objects of the same collection.
///
/// Overlap means `ΔR < threshold`.
pub fn remove_self_overlap<T>(objects: &[T], threshold: f64, policy: OverlapPolicy) -> Vec<T>
where
    T: Kinematic + Clone,
{
    let overlaps = |i: usize, j: usize| objects[i].delta_r(&objects[j]) < threshold;
    (0..objects.len())
        .filter(|&i| {
            let clashes = match policy {
                OverlapPolicy::SymmetricMutualRemoval => {
                    (0..objects.len()).any(|j| j != i && overlaps(i, j))
                }
                OverlapPolicy::ForwardOnlyRemoval => (i + 1..objects.len()).any(|j| overlaps(i, j)),
            };
            !clashes
        })
        .map(|i| objects[i].clone())
        .collect()
}

/// Remove objects of `primary` lying within `threshold` of any object in
/// `reference`.
pub fn remove_cross_overlap<T, R>(primary: &[T], reference: &[R], threshold: f64) -> Vec<T>
where
    T: Kinematic + Clone,
    R: Kinematic,
{
    primary
        .iter()
        .filter(|p| reference.iter().all(|r| p.delta_r(r) >= threshold))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::four_momentum::FourMomentum;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    fn at(eta: f64, phi: f64) -> FourMomentum {
        FourMomentum::from_pt_eta_phi_m(30.0, eta, phi, 0.0)
    }

    #[test]
    fn close_pair_removed_symmetrically() {
        let objs = vec![at(0.0, 0.0), at(0.1, 0.05), at(1.5, 2.0)];
        let out = remove_self_overlap(&objs, 0.4, OverlapPolicy::SymmetricMutualRemoval);
        assert_eq!(out.len(), 1);
        assert!((out[0].eta() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn close_pair_forward_only_keeps_later() {
        let objs = vec![at(0.0, 0.0), at(0.1, 0.05), at(1.5, 2.0)];
        let out = remove_self_overlap(&objs, 0.4, OverlapPolicy::ForwardOnlyRemoval);
        assert_eq!(out.len(), 2);
        assert!((out[0].eta() - 0.1).abs() < 1e-9);
        assert!((out[1].eta() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn overlap_across_phi_boundary() {
        let objs = vec![at(0.0, PI - 0.05), at(0.0, -PI + 0.05)];
        let out = remove_self_overlap(&objs, 0.4, OverlapPolicy::SymmetricMutualRemoval);
        assert!(out.is_empty());
    }

    #[test]
    fn cross_overlap_drops_near_reference() {
        let jets = vec![at(0.0, 0.0), at(2.0, 1.0), at(-1.0, -2.0)];
        let leptons = vec![at(0.05, 0.1), at(-1.0, -2.3)];
        let out = remove_cross_overlap(&jets, &leptons, 0.4);
        assert_eq!(out.len(), 1);
        assert!((out[0].eta() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn cross_overlap_with_empty_reference_is_identity() {
        let jets = vec![at(0.0, 0.0), at(0.0, 0.1)];
        let none: Vec<FourMomentum> = Vec::new();
        assert_eq!(remove_cross_overlap(&jets, &none, 0.4), jets);
    }

    #[test]
    fn separated_objects_survive() {
        let objs = vec![at(0.0, 0.0), at(0.0, 0.4)];
        let out = remove_self_overlap(&objs, 0.3, OverlapPolicy::SymmetricMutualRemoval);
        assert_eq!(out.len(), 2);
    }

    fn collection() -> impl Strategy<Value = Vec<FourMomentum>> {
        proptest::collection::vec((-2.5f64..2.5, -PI..PI), 0..12)
            .prop_map(|v| v.into_iter().map(|(eta, phi)| at(eta, phi)).collect())
    }

    proptest! {
        #[test]
        fn prop_self_overlap_idempotent(objs in collection(), thr in 0.05f64..1.5) {
            for policy in [OverlapPolicy::SymmetricMutualRemoval, OverlapPolicy::ForwardOnlyRemoval] {
                let once = remove_self_overlap(&objs, thr, policy);
                let twice = remove_self_overlap(&once, thr, policy);
                prop_assert_eq!(&once, &twice);
            }
        }

        #[test]
        fn prop_cross_overlap_preserves_order(objs in collection(), refs in collection()) {
            let out = remove_cross_overlap(&objs, &refs, 0.4);
            // surviving objects appear as an ordered subsequence of the input
            let mut it = objs.iter();
            for o in &out {
                prop_assert!(it.any(|x| x == o));
            }
        }
    }
}
