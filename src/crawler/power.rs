//! Power distribution across reactors, and the per-tick power cycle.
//!
//! Charge is fed in proportion to each reactor's headroom and drawn in
//! proportion to each reactor's charge, so reactors fill and empty together.

use std::time::Duration;

use super::Crawler;
use crate::segments::{SegmentKind, SegmentState};

/// What one call to [`Crawler::tick`] did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Charge produced by reactors and chargers
    pub generated: f32,
    /// Generated charge that did not fit in any reactor
    pub overflow: f32,
    /// Shield charge restored
    pub shield_restored: f32,
}

impl Crawler {
    fn reactor_indices(&self) -> Vec<usize> {
        self.cache()
            .active_of_kind(SegmentKind::Power)
            .iter()
            .copied()
            .filter(|&i| matches!(self.segments[i].state(), SegmentState::Reactor { .. }))
            .collect()
    }

    /// Charge stored across active reactors
    pub fn total_charge(&self) -> f32 {
        self.reactor_indices()
            .into_iter()
            .map(|i| self.segments[i].charge())
            .sum()
    }

    /// Capacity of active reactors
    pub fn total_capacity(&self) -> f32 {
        self.reactor_indices()
            .into_iter()
            .map(|i| self.segments[i].capacity())
            .sum()
    }

    /// Charge produced per hour by active reactors and chargers
    pub fn total_generation(&self) -> f32 {
        self.active_segments(SegmentKind::Power)
            .map(|s| s.generation())
            .sum()
    }

    /// Add charge to the reactors; returns what did not fit
    pub fn feed_power(&mut self, delta: f32) -> f32 {
        if !(delta > 0.0) {
            return 0.0;
        }
        let reactors = self.reactor_indices();
        let headroom: Vec<f32> = reactors
            .iter()
            .map(|&i| (self.segments[i].capacity() - self.segments[i].charge()).max(0.0))
            .collect();
        let total: f32 = headroom.iter().sum();
        if total <= 0.0 {
            return delta;
        }

        let fed = delta.min(total);
        for (&i, room) in reactors.iter().zip(&headroom) {
            let segment = &mut self.segments[i];
            segment.set_charge(segment.charge() + fed * room / total);
        }
        delta - fed
    }

    /// Take charge from the reactors; returns the shortfall
    pub fn draw_power(&mut self, delta: f32) -> f32 {
        if !(delta > 0.0) {
            return 0.0;
        }
        let reactors = self.reactor_indices();
        let charges: Vec<f32> = reactors.iter().map(|&i| self.segments[i].charge()).collect();
        let total: f32 = charges.iter().sum();
        if total <= 0.0 {
            return delta;
        }

        let drawn = delta.min(total);
        for (&i, charge) in reactors.iter().zip(&charges) {
            let segment = &mut self.segments[i];
            segment.set_charge(segment.charge() - drawn * charge / total);
        }
        delta - drawn
    }

    /// Advance cooldowns, generate power and recharge shields
    pub fn tick(&mut self, elapsed: Duration) -> TickReport {
        for segment in &mut self.segments {
            segment.tick_cooldown(elapsed);
        }

        let hours = elapsed.as_secs_f32() / 3600.0;
        let generated = self.total_generation() * hours;
        let overflow = self.feed_power(generated);

        let shields: Vec<usize> = self
            .cache()
            .active_of_kind(SegmentKind::Defense)
            .iter()
            .copied()
            .filter(|&i| matches!(self.segments[i].state(), SegmentState::Shield { .. }))
            .collect();

        let mut shield_restored = 0.0;
        for i in shields {
            let segment = &self.segments[i];
            let missing = (segment.shield_capacity() - segment.shield_left()).max(0.0);
            let wanted = (segment.recharge() * hours).min(missing);
            if wanted <= 0.0 {
                continue;
            }
            let got = wanted - self.draw_power(wanted);
            let segment = &mut self.segments[i];
            segment.set_shield_left(segment.shield_left() + got);
            shield_restored += got;
        }

        if generated > 0.0 || shield_restored > 0.0 {
            tracing::trace!(
                crawler = %self.name,
                generated,
                overflow,
                shield_restored,
                "power tick"
            );
        }

        TickReport {
            generated,
            overflow,
            shield_restored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ActorId;
    use crate::segments::DefCatalog;

    fn crawler(names: &[&str]) -> Crawler {
        let catalog = DefCatalog::builtin().unwrap();
        let mut crawler = Crawler::new(ActorId::from_u128(3), "Power", 5, 10);
        for name in names {
            crawler.install(catalog.get(name).unwrap());
        }
        crawler
    }

    #[test]
    fn test_feed_overflow_single_reactor() {
        let mut c = crawler(&["Reactor"]);
        let cap = c.total_capacity();
        c.segment_mut(0).unwrap().set_charge(cap - 6.0);
        c.update_segment_cache();

        let overflow = c.feed_power(10.0);
        assert_eq!(overflow, 4.0);
        assert_eq!(c.segments()[0].charge(), cap);
    }

    #[test]
    fn test_feed_and_draw_ignore_non_positive() {
        let mut c = crawler(&["Reactor"]);
        c.segment_mut(0).unwrap().set_charge(50.0);
        c.update_segment_cache();

        assert_eq!(c.feed_power(0.0), 0.0);
        assert_eq!(c.feed_power(-3.0), 0.0);
        assert_eq!(c.draw_power(-3.0), 0.0);
        assert_eq!(c.draw_power(f32::NAN), 0.0);
        assert_eq!(c.segments()[0].charge(), 50.0);
    }

    #[test]
    fn test_no_reactors_everything_overflows() {
        let mut c = crawler(&["Wheels", "Solar Array"]);
        assert_eq!(c.feed_power(12.0), 12.0);
        assert_eq!(c.draw_power(12.0), 12.0);
        assert_eq!(c.total_charge(), 0.0);
    }

    #[test]
    fn test_feed_proportional_to_headroom() {
        let mut c = crawler(&["Reactor", "Reactor"]);
        let cap = c.segments()[0].capacity();
        c.segment_mut(0).unwrap().set_charge(cap - 30.0);
        c.segment_mut(1).unwrap().set_charge(cap - 10.0);
        c.update_segment_cache();

        assert_eq!(c.feed_power(20.0), 0.0);
        assert!((c.segments()[0].charge() - (cap - 15.0)).abs() < 1e-3);
        assert!((c.segments()[1].charge() - (cap - 5.0)).abs() < 1e-3);
    }

    #[test]
    fn test_draw_proportional_and_shortfall() {
        let mut c = crawler(&["Reactor", "Reactor"]);
        c.segment_mut(0).unwrap().set_charge(30.0);
        c.segment_mut(1).unwrap().set_charge(10.0);
        c.update_segment_cache();

        assert_eq!(c.draw_power(20.0), 0.0);
        assert!((c.segments()[0].charge() - 15.0).abs() < 1e-3);
        assert!((c.segments()[1].charge() - 5.0).abs() < 1e-3);

        let shortfall = c.draw_power(50.0);
        assert!((shortfall - 30.0).abs() < 1e-3);
        assert_eq!(c.total_charge(), 0.0);
    }

    #[test]
    fn test_inactive_reactor_excluded() {
        let mut c = crawler(&["Reactor", "Reactor"]);
        let cap = c.segments()[0].capacity();
        c.set_activated(1, false);
        assert_eq!(c.total_capacity(), cap);
        assert_eq!(c.total_charge(), cap);
    }

    #[test]
    fn test_tick_generates_and_cools_down() {
        let mut c = crawler(&["Reactor", "Solar Array", "Autocannon"]);
        c.segment_mut(0).unwrap().set_charge(0.0);
        c.segment_mut(2).unwrap().start_cycle(Duration::from_secs(30));
        c.update_segment_cache();

        let generation = c.total_generation();
        let report = c.tick(Duration::from_secs(3600));
        assert!((report.generated - generation).abs() < 1e-3);
        assert_eq!(report.overflow, 0.0);
        assert!((c.total_charge() - generation).abs() < 1e-3);
        assert!(c.segments()[2].is_cycle_ready());
    }

    #[test]
    fn test_tick_recharges_shield_from_reactor() {
        let mut c = crawler(&["Reactor", "Shield Emitter"]);
        c.segment_mut(0).unwrap().set_charge(0.0);
        c.segment_mut(1).unwrap().set_shield_left(0.0);
        c.update_segment_cache();

        let report = c.tick(Duration::from_secs(60));
        assert!(report.shield_restored > 0.0);
        let shield = c.segments()[1].shield_left();
        assert!((shield - report.shield_restored).abs() < 1e-4);
        assert!((c.total_charge() - (report.generated - shield)).abs() < 1e-3);
    }

    #[test]
    fn test_tick_shield_starved_without_charge() {
        let mut c = crawler(&["Shield Emitter"]);
        c.segment_mut(0).unwrap().set_shield_left(0.0);
        c.update_segment_cache();

        let report = c.tick(Duration::from_secs(600));
        assert_eq!(report.shield_restored, 0.0);
        assert_eq!(c.segments()[0].shield_left(), 0.0);
    }
}
