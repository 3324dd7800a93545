//! Save/load round trips through the def catalog

use crawler_core::core::{ActorId, Commodity, CrawlerError, Terrain};
use crawler_core::crawler::{Crawler, CrawlerData};
use crawler_core::segments::{DefCatalog, Segment, Stat};
use std::time::Duration;

#[test]
fn test_every_builtin_segment_round_trips() {
    let mut catalog = DefCatalog::builtin().unwrap();
    let owner = ActorId::from_u128(1);
    for def in catalog.bases().to_vec() {
        let mut segment = Segment::new(def.clone(), owner, 17);
        segment.add_dmg(2);
        segment.set_packaged(true);
        segment.set_charge(segment.capacity() / 3.0);
        segment.set_shield_left(1.0);
        segment.set_recipe(Some("slugs".into()));
        segment.set_production_progress(0.25);
        segment.store(12.0);

        let data = segment.to_data();
        let restored = Segment::from_data(&mut catalog, owner, &data).unwrap();
        assert_eq!(restored.to_data(), data, "{}", def.name);
        assert_eq!(restored.working(), segment.working());
        assert_eq!(restored.state(), segment.state());
        assert!(std::sync::Arc::ptr_eq(restored.def(), &def));
    }
}

#[test]
fn test_derived_defs_resolve_after_reload() {
    let mut catalog = DefCatalog::builtin().unwrap();
    let base = catalog.get("Missile Rack").unwrap();
    let big = catalog.resize(&base, 3.0).unwrap();
    let derived = catalog.upgrade(&big, Stat::Aim, 1).unwrap();
    assert_eq!(derived.name, "Missile Rack@3+aim");

    let segment = Segment::new(derived.clone(), ActorId::from_u128(1), 5);
    let data = segment.to_data();

    // A fresh catalog has never seen the derived def
    let mut fresh = DefCatalog::builtin().unwrap();
    assert!(fresh.get(&data.def_name).is_none());
    let restored = Segment::from_data(&mut fresh, ActorId::from_u128(1), &data).unwrap();
    assert_eq!(**restored.def(), *derived);
}

#[test]
fn test_crawler_round_trip_after_combat() {
    let mut catalog = DefCatalog::builtin().unwrap();
    let mut red = Crawler::new(ActorId::from_u128(1), "Red", 3, 15);
    let mut blue = Crawler::new(ActorId::from_u128(2), "Blue", 4, 15);
    for name in ["Reactor", "Autocannon", "Laser", "Shield Emitter", "Armor Plate", "Treads"] {
        red.install(catalog.get(name).unwrap());
        blue.install(catalog.get(name).unwrap());
    }
    red.supplies.add(Commodity::Slugs, 50.0);
    blue.supplies.add(Commodity::Slugs, 50.0);

    for _ in 0..4 {
        red.tick(Duration::from_secs(30));
        blue.tick(Duration::from_secs(30));
        let hits = red.create_fire();
        blue.receive_fire(&mut red, &hits);
        let hits = blue.create_fire();
        red.receive_fire(&mut blue, &hits);
    }

    let json = blue.to_data().to_json().unwrap();
    let loaded = Crawler::from_data(&mut catalog, &CrawlerData::from_json(&json).unwrap()).unwrap();
    assert_eq!(loaded.to_data(), blue.to_data());
    assert_eq!(loaded.crew, blue.crew);
    assert_eq!(loaded.relation(red.id()), blue.relation(red.id()));
    assert_eq!(
        loaded.evaluate_move(Terrain::Rough),
        blue.evaluate_move(Terrain::Rough)
    );
}

#[test]
fn test_identical_crawlers_save_identically() {
    let catalog = DefCatalog::builtin().unwrap();
    let build = |order: &[(Commodity, f32)]| {
        let mut crawler = Crawler::new(ActorId::from_u128(9), "Twin", 21, 12);
        for name in ["Reactor", "Autocannon", "Missile Rack", "Treads"] {
            crawler.install(catalog.get(name).unwrap());
        }
        for &(commodity, amount) in order {
            crawler.supplies.add(commodity, amount);
        }
        crawler
    };
    let stock = [
        (Commodity::Rockets, 85.0),
        (Commodity::Slugs, 485.0),
        (Commodity::Rations, 40.0),
        (Commodity::Scrap, 7.5),
    ];
    let mut reversed = stock;
    reversed.reverse();

    let first = build(&stock);
    let second = build(&reversed);
    assert_eq!(first.to_data().to_json().unwrap(), second.to_data().to_json().unwrap());
    assert_eq!(first.mass().to_bits(), second.mass().to_bits());
}

#[test]
fn test_malformed_name_rejected() {
    let mut catalog = DefCatalog::builtin().unwrap();
    let result = catalog.resolve("Laser+bogus");
    assert!(matches!(result, Err(CrawlerError::MalformedDefName(_))));
    let result = catalog.resolve("Laser+lift");
    assert!(matches!(result, Err(CrawlerError::StatNotApplicable { .. })));
}
