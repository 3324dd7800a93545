//! Derived index over a crawler's segments.
//!
//! The cache partitions segment indices by kind and by working state. It is
//! rebuilt wholesale after any structural change and stamped with the
//! generation it was built for, so stale reads can be caught.

use ordered_float::OrderedFloat;

use crate::segments::{Segment, SegmentKind};

const KINDS: usize = SegmentKind::ALL.len();

#[derive(Debug, Clone, Default)]
pub struct SegmentCache {
    generation: u64,
    /// Every segment, ordered by (kind, cost)
    sorted: Vec<usize>,
    active: Vec<usize>,
    /// Not active and not destroyed (damaged, deactivated, packaged)
    disabled: Vec<usize>,
    destroyed: Vec<usize>,
    undestroyed: Vec<usize>,
    by_kind: [Vec<usize>; KINDS],
    active_by_kind: [Vec<usize>; KINDS],
}

impl SegmentCache {
    pub fn build(segments: &[Segment], generation: u64) -> Self {
        let mut cache = SegmentCache {
            generation,
            ..Default::default()
        };

        cache.sorted = (0..segments.len()).collect();
        cache
            .sorted
            .sort_by_key(|&i| (segments[i].kind(), OrderedFloat(segments[i].cost())));

        for &i in &cache.sorted {
            let segment = &segments[i];
            let kind = segment.kind().index();
            cache.by_kind[kind].push(i);

            if segment.is_destroyed() {
                cache.destroyed.push(i);
                continue;
            }
            cache.undestroyed.push(i);

            if segment.is_active() {
                cache.active.push(i);
                cache.active_by_kind[kind].push(i);
            } else {
                cache.disabled.push(i);
            }
        }

        cache
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn sorted(&self) -> &[usize] {
        &self.sorted
    }

    pub fn active(&self) -> &[usize] {
        &self.active
    }

    pub fn disabled(&self) -> &[usize] {
        &self.disabled
    }

    pub fn destroyed(&self) -> &[usize] {
        &self.destroyed
    }

    pub fn undestroyed(&self) -> &[usize] {
        &self.undestroyed
    }

    pub fn of_kind(&self, kind: SegmentKind) -> &[usize] {
        &self.by_kind[kind.index()]
    }

    pub fn active_of_kind(&self, kind: SegmentKind) -> &[usize] {
        &self.active_by_kind[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ActorId;
    use crate::segments::DefCatalog;

    fn segments(names: &[&str]) -> Vec<Segment> {
        let catalog = DefCatalog::builtin().unwrap();
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Segment::new(catalog.get(n).unwrap(), ActorId::from_u128(1), i as u64))
            .collect()
    }

    #[test]
    fn test_partitions() {
        let mut segs = segments(&["Autocannon", "Reactor", "Wheels", "Armor Plate"]);
        let max = segs[0].max_health();
        segs[0].add_dmg(max);
        segs[2].set_activated(false);

        let cache = SegmentCache::build(&segs, 3);
        assert_eq!(cache.generation(), 3);
        assert_eq!(cache.destroyed(), &[0]);
        assert_eq!(cache.disabled(), &[2]);
        assert_eq!(cache.undestroyed().len(), 3);
        assert_eq!(cache.active().len(), 2);
        assert_eq!(cache.of_kind(SegmentKind::Offense), &[0]);
        assert!(cache.active_of_kind(SegmentKind::Offense).is_empty());
        assert_eq!(cache.active_of_kind(SegmentKind::Power), &[1]);
    }

    #[test]
    fn test_sorted_by_kind_then_cost() {
        let catalog = DefCatalog::builtin().unwrap();
        let big = catalog
            .get("Reactor")
            .map(|d| std::sync::Arc::new(d.resize(3.0).unwrap()))
            .unwrap();
        let mut segs = segments(&["Armor Plate", "Reactor"]);
        segs.push(Segment::new(big, ActorId::from_u128(1), 9));
        segs.push(segments(&["Wheels"]).remove(0));

        let cache = SegmentCache::build(&segs, 0);
        // Power (cheap, then resized), Traction, Defense
        assert_eq!(cache.sorted(), &[1, 2, 3, 0]);
    }

    #[test]
    fn test_empty() {
        let cache = SegmentCache::build(&[], 0);
        assert!(cache.sorted().is_empty());
        assert!(cache.active_of_kind(SegmentKind::Traction).is_empty());
    }
}
