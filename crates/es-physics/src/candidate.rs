//! Combinatorial best-candidate selection.
//!
//! "No candidate" is always `None`; callers never have to test for a
//! zero-momentum placeholder.

use serde::{Deserialize, Serialize};

use crate::object::{Charged, FitQuality, Kinematic};

/// Ranking rule that produced a [`Candidate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionRule {
    /// Highest transverse momentum.
    LeadingPt,
    /// Opposite-sign pair minimising the summed fit χ².
    BestFitQuality,
}

/// Object (or tuple of objects) chosen from a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<T> {
    /// The chosen object(s).
    pub objects: T,
    /// Rule that chose them.
    pub rule: SelectionRule,
}

/// Two objects ordered by transverse momentum, plus their combined score.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair<T> {
    /// Higher-pT member.
    pub leading: T,
    /// Lower-pT member.
    pub subleading: T,
    /// Sum of the members' fit χ².
    pub score: f64,
}

impl<T: Kinematic> Pair<T> {
    /// Order `a` and `b` so the higher-pT one leads (ties keep `a` first).
    pub fn ordered(a: T, b: T, score: f64) -> Self {
        if b.pt() > a.pt() {
            Self { leading: b, subleading: a, score }
        } else {
            Self { leading: a, subleading: b, score }
        }
    }
}

/// Stable descending sort by transverse momentum.
///
/// Equal-pT objects keep their input order.
pub fn sort_by_pt<T: Kinematic>(mut objects: Vec<T>) -> Vec<T> {
    objects.sort_by(|a, b| b.pt().total_cmp(&a.pt()));
    objects
}

/// Highest-pT object (first one on ties).
pub fn leading<T: Kinematic + Clone>(objects: &[T]) -> Option<Candidate<T>> {
    let mut best: Option<&T> = None;
    for o in objects {
        if best.is_none_or(|b| o.pt() > b.pt()) {
            best = Some(o);
        }
    }
    best.map(|o| Candidate { objects: o.clone(), rule: SelectionRule::LeadingPt })
}

/// Opposite-sign pair with the smallest summed fit χ².
///
/// Pairs `(i, j)` with `i < j` are scanned in index order and a later pair
/// replaces the current best only if its score is strictly smaller. Returns
/// `None` for fewer than two objects or when no opposite-sign pair exists.
pub fn best_pair_by_fit_quality<T>(objects: &[T]) -> Option<Candidate<Pair<T>>>
where
    T: Kinematic + Charged + FitQuality + Clone,
{
    if objects.len() < 2 {
        return None;
    }
    let mut best: Option<(usize, usize, f64)> = None;
    for i in 0..objects.len() {
        for j in i + 1..objects.len() {
            if objects[i].charge() * objects[j].charge() >= 0 {
                continue;
            }
            let score = objects[i].fit_chi2() + objects[j].fit_chi2();
            if best.is_none_or(|(_, _, s)| score < s) {
                best = Some((i, j, score));
            }
        }
    }
    best.map(|(i, j, score)| Candidate {
        objects: Pair::ordered(objects[i].clone(), objects[j].clone(), score),
        rule: SelectionRule::BestFitQuality,
    })
}
