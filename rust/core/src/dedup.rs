// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Intersection deduplication.
//!
//! A ray through a wall is reported once per face it crosses: the front and
//! back of a single-layer wall, every layer boundary of a layered one. All of
//! those hits share the same [`BarrierRef`], and only the first one (the face
//! where the conduit enters the wall) should become a penetration.
//!
//! The helpers are stable: survivors keep the relative order of their first
//! occurrence, and no sorting by distance happens here.

use crate::ids::BarrierRef;
use crate::model::RayHit;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::hash::Hash;

/// Hits produced by a single ray. Rarely more than a handful.
pub type HitList = SmallVec<[RayHit; 8]>;

/// Keeps the first item for every distinct key, in input order.
pub fn dedup_by_key<T, K, I, F, C>(items: I, mut key: F) -> C
where
    I: IntoIterator<Item = T>,
    K: Hash + Eq,
    F: FnMut(&T) -> K,
    C: FromIterator<T>,
{
    let mut seen: FxHashSet<K> = FxHashSet::default();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Keeps the first item of every equivalence class under `eq`, in input order.
///
/// Quadratic in the number of survivors; meant for equality strategies that
/// have no hashable key.
pub fn dedup_by<T, I, F>(items: I, mut eq: F) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T, &T) -> bool,
{
    let mut kept: Vec<T> = Vec::new();
    for item in items {
        if !kept.iter().any(|existing| eq(existing, &item)) {
            kept.push(item);
        }
    }
    kept
}

/// Deduplication key of a hit: the barrier it refers to.
#[inline]
pub fn hit_key(hit: &RayHit) -> BarrierRef {
    hit.reference
}

/// Drops every hit whose barrier was already hit earlier in the sequence.
pub fn deduplicate_hits<I>(hits: I) -> HitList
where
    I: IntoIterator<Item = RayHit>,
{
    dedup_by_key(hits, hit_key)
}
