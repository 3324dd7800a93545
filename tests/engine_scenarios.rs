//! Power, movement and combat scenarios run against built-in crawlers

use std::sync::Arc;
use std::time::Duration;

use crawler_core::combat::{HitRecord, HitType};
use crawler_core::core::{config, ActorId, Commodity, SimRng, Terrain};
use crawler_core::crawler::Crawler;
use crawler_core::segments::def::ArmorDef;
use crawler_core::segments::{
    DefCatalog, DefVariant, SegmentDef, SegmentKind, Stat, Tier, WeaponClass,
};

fn build(id: u128, seed: u64, names: &[&str]) -> Crawler {
    let catalog = DefCatalog::builtin().unwrap();
    let mut crawler = Crawler::new(ActorId::from_u128(id), format!("Crawler {}", id), seed, 20);
    for name in names {
        crawler.install(catalog.get(name).unwrap());
    }
    crawler.supplies.add(Commodity::Slugs, 500.0);
    crawler.supplies.add(Commodity::Rockets, 100.0);
    crawler
}

fn warship(id: u128, seed: u64) -> Crawler {
    build(
        id,
        seed,
        &[
            "Reactor",
            "Fusion Core",
            "Treads",
            "Autocannon",
            "Laser",
            "Missile Rack",
            "Targeting Array",
            "Armor Plate",
            "Ablative Plating",
            "Shield Emitter",
            "Cargo Hold",
            "Crew Quarters",
        ],
    )
}

#[test]
fn test_feed_power_overflow() {
    let mut crawler = build(1, 1, &["Reactor"]);
    let capacity = crawler.total_capacity();
    crawler.segment_mut(0).unwrap().set_charge(capacity - 6.0);
    crawler.update_segment_cache();

    assert_eq!(crawler.feed_power(10.0), 4.0);
    assert_eq!(crawler.total_charge(), capacity);
}

#[test]
fn test_equal_headroom_fills_evenly() {
    let mut crawler = build(1, 1, &["Reactor", "Reactor", "Reactor"]);
    let capacity = crawler.segments()[0].capacity();
    for i in 0..3 {
        crawler.segment_mut(i).unwrap().set_charge(capacity - 20.0);
    }
    crawler.update_segment_cache();

    assert_eq!(crawler.feed_power(30.0), 0.0);
    for segment in crawler.segments() {
        assert!((segment.charge() - (capacity - 10.0)).abs() < 1e-3);
    }
}

#[test]
fn test_armor_soaks_and_absorbs_rest() {
    let mut crawler = build(1, 1, &["Armor Plate", "Reactor"]);
    let reduction = crawler.segments()[0].reduction();
    assert_eq!(reduction, 2.0);

    let result = crawler.absorb_hit(8, &mut SimRng::new(12));
    assert_eq!(result.armor, 8);
    assert_eq!(crawler.segments()[0].hits(), 6);
    assert_eq!(result.hull + result.crew + result.overkill, 0);
}

#[test]
fn test_heavy_plate_soaks_five_of_eight() {
    // Qualities that resolve to Reduction 5 and MaxHealth 10 at size 1
    let reduction_q = 3.0 * 2.5f32.ln() / 1.5f32.ln();
    let health_q = 3.0 * (10.0f32 / 16.0).ln() / 1.5f32.ln();
    let plate = SegmentDef::new(
        "Heavy Plate",
        'H',
        1.0,
        DefVariant::Armor(ArmorDef {
            reduction: Tier::new(1.0, 0.0),
        }),
    )
    .with_quality(Stat::Reduction, reduction_q)
    .unwrap()
    .with_quality(Stat::MaxHits, health_q)
    .unwrap();

    let mut crawler = build(1, 1, &[]);
    crawler.install(Arc::new(plate));
    crawler.install(DefCatalog::builtin().unwrap().get("Reactor").unwrap());
    assert!((crawler.segments()[0].reduction() - 5.0).abs() < 1e-3);
    assert_eq!(crawler.segments()[0].max_health(), 10);

    let result = crawler.absorb_hit(8, &mut SimRng::new(12));
    assert_eq!(result.armor, 8);
    assert_eq!(crawler.segments()[0].hits(), 3);
    assert_eq!(crawler.segments()[1].hits(), 0);
    assert_eq!(result.hull + result.crew + result.overkill, 0);
}

#[test]
fn test_shield_then_hull() {
    let mut crawler = build(1, 1, &["Shield Emitter", "Cargo Hold"]);
    crawler.segment_mut(0).unwrap().set_shield_left(5.0);
    crawler.update_segment_cache();
    let health = crawler.segments()[1].health();

    let result = crawler.absorb_hit(8, &mut SimRng::new(99));
    assert_eq!(result.shield, 5);
    assert_eq!(result.hull, 3);
    assert_eq!(crawler.segments()[1].health(), health - 3);
}

#[test]
fn test_overload_penalizes_speed() {
    let mut crawler = build(1, 1, &["Fusion Core", "Treads"]);
    let unloaded = crawler.evaluate_move(Terrain::Flat);

    let lift = crawler.lift_on(Terrain::Flat);
    let cargo = (1.5 * lift - crawler.mass()) / Commodity::Scrap.unit_weight();
    crawler.supplies.add(Commodity::Scrap, cargo);
    assert!((crawler.mass() / lift - 1.5).abs() < 1e-2);

    let loaded = crawler.evaluate_move(Terrain::Flat);
    assert!(loaded.speed < unloaded.speed);
    let expected = unloaded.speed / (crawler.mass() / lift).powf(config().overload_exponent);
    assert!((loaded.speed - expected).abs() < 1e-2);
    assert!(loaded.note.unwrap().contains("too heavy"));
}

#[test]
fn test_beyond_terrain_limit_is_immobile_there() {
    let crawler = build(1, 1, &["Fusion Core", "Wheels"]);
    assert_eq!(crawler.speed_on(Terrain::Shattered), 0.0);
    assert_eq!(crawler.lift_on(Terrain::Shattered), 0.0);
    // Flat ground on the way still counts
    assert!(crawler.evaluate_move(Terrain::Shattered).speed > 0.0);
}

#[test]
fn test_create_fire_stays_within_charge() {
    for seed in 0..20 {
        let mut crawler = warship(1, seed);
        // Starve the reactors so weapons compete for power
        let drain = crawler.segments()[3].drain();
        for i in 0..2 {
            crawler.segment_mut(i).unwrap().set_charge(drain);
        }
        crawler.update_segment_cache();

        let before = crawler.total_charge();
        let hits = crawler.create_fire();
        let fired_drain: f32 = crawler
            .segments()
            .iter()
            .filter(|s| s.kind() == SegmentKind::Offense && !s.is_cycle_ready())
            .map(|s| s.drain())
            .sum();
        assert!(fired_drain <= before + 1e-3);
        assert!(crawler.total_charge() >= 0.0);
        assert!(!hits.is_empty());
    }
}

#[test]
fn test_receive_fire_conserves_damage() {
    let mut attacker = warship(1, 5);
    let mut defender = warship(2, 6);
    for round in 0..10 {
        attacker.tick(Duration::from_secs(30));
        let hits = attacker.create_fire();
        let report = defender.receive_fire(&mut attacker, &hits);
        assert_eq!(report.outcomes.len(), hits.len(), "round {}", round);
        for outcome in &report.outcomes {
            let a = &outcome.absorption;
            assert_eq!(a.absorbed() + a.overkill, a.damage);
            if outcome.hit_type == HitType::Misses {
                assert_eq!(a.damage, 0);
            }
        }
        let dealt: i64 = report
            .outcomes
            .iter()
            .map(|o| (o.absorption.damage - o.absorption.overkill) as i64)
            .sum();
        assert_eq!(report.total_damage, dealt);
    }
}

#[test]
fn test_hits_stay_in_bounds_under_heavy_fire() {
    let mut attacker = warship(1, 1);
    let mut defender = warship(2, 2);
    let hits: Vec<HitRecord> = (0..200)
        .map(|seed| HitRecord {
            seed,
            attacker: attacker.id(),
            weapon: 3,
            class: WeaponClass::Gun,
            expected_damage: 25.0,
            aim: 1e6,
        })
        .collect();

    let report = defender.receive_fire(&mut attacker, &hits);
    for segment in defender.segments() {
        assert!(segment.hits() >= 0 && segment.hits() <= segment.max_health());
    }
    assert!(defender.is_destroyed());
    assert!(report.destroyed);
    assert!(defender.is_cache_current());
    // The defender never fired back, so this was not a hostile kill
    assert_eq!(report.kill_reward, config().friendly_kill_morale);
    assert_eq!(attacker.morale, config().friendly_kill_morale);
}

#[test]
fn test_skirmish_is_deterministic() {
    fn run(seed: u64) -> (String, String) {
        let mut red = warship(1, seed);
        let mut blue = warship(2, seed.wrapping_add(1));
        for _ in 0..15 {
            red.tick(Duration::from_secs(20));
            blue.tick(Duration::from_secs(20));
            let red_fire = red.create_fire();
            let blue_fire = blue.create_fire();
            blue.receive_fire(&mut red, &red_fire);
            red.receive_fire(&mut blue, &blue_fire);
        }
        (
            red.to_data().to_json().unwrap(),
            blue.to_data().to_json().unwrap(),
        )
    }

    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}
