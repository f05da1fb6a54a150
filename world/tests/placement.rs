use resort_tycoon_core::{
    BuildingId, BuildingKind, Catalog, CellCoord, Command, Event, PlacementError, Rejection,
    SimulationConfig,
};
use resort_tycoon_world::{apply, query, World};

fn place(world: &mut World, kind: BuildingKind, gx: i32, gz: i32) -> Result<Vec<Event>, Rejection> {
    run(
        world,
        Command::PlaceBuilding {
            kind,
            anchor: CellCoord::new(gx, gz),
        },
    )
}

fn run(world: &mut World, command: Command) -> Result<Vec<Event>, Rejection> {
    let mut events = Vec::new();
    apply(world, command, &mut events)?;
    Ok(events)
}

fn placement_error(result: Result<Vec<Event>, Rejection>) -> PlacementError {
    match result {
        Err(Rejection::Placement(error)) => error,
        other => panic!("expected a placement rejection, got {other:?}"),
    }
}

#[test]
fn validation_reports_first_failure_in_order() {
    let mut world = World::new();
    let _ = place(&mut world, BuildingKind::Villa, 0, 0).expect("villa placed");

    assert_eq!(
        placement_error(place(&mut world, BuildingKind::Spa, 12, 12)),
        PlacementError::OutOfBounds,
        "bounds are checked before terrain and level"
    );
    assert_eq!(
        placement_error(place(&mut world, BuildingKind::Palm, 0, 10)),
        PlacementError::Unbuildable
    );
    assert_eq!(
        placement_error(place(&mut world, BuildingKind::Spa, 1, 1)),
        PlacementError::TileOccupied,
        "occupancy is checked before the level gate"
    );
    assert_eq!(
        placement_error(place(&mut world, BuildingKind::Spa, -4, -4)),
        PlacementError::LevelLocked { required: 8 }
    );
}

#[test]
fn shoreline_items_only_fit_the_shore_ring() {
    let mut world = World::new();
    let _ = place(&mut world, BuildingKind::Generator, 0, 0).expect("generator placed");
    assert_eq!(
        query::validate_site(&world, BuildingKind::BeachDj, CellCoord::new(-2, -2)),
        Err(Rejection::Placement(PlacementError::Unbuildable))
    );
    assert_eq!(
        query::validate_site(&world, BuildingKind::BeachDj, CellCoord::new(-1, -12)),
        Ok(())
    );
}

#[test]
fn insufficient_funds_is_reported_last() {
    let config = SimulationConfig {
        starting_money: 100.0,
        ..SimulationConfig::default()
    };
    let mut world = World::with_config(config, Catalog::standard());

    assert_eq!(
        placement_error(place(&mut world, BuildingKind::Villa, 0, 0)),
        PlacementError::InsufficientFunds { cost: 200 }
    );
    assert!((query::balance(&world) - 100.0).abs() < f64::EPSILON);
    assert!(query::buildings(&world).is_empty());
}

#[test]
fn palms_keep_their_distance() {
    let mut world = World::new();
    let _ = place(&mut world, BuildingKind::Palm, 0, 0).expect("palm placed");

    assert_eq!(
        placement_error(place(&mut world, BuildingKind::Palm, 1, 1)),
        PlacementError::SpacingViolation
    );
    assert!(place(&mut world, BuildingKind::Palm, 2, 0).is_ok());
    assert!(
        place(&mut world, BuildingKind::FlowerBed, 1, 1).is_ok(),
        "spacing applies to palms only"
    );
}

#[test]
fn moves_are_free_and_respect_validation() {
    let mut world = World::new();
    let _ = place(&mut world, BuildingKind::Villa, 0, 0).expect("villa placed");
    let _ = place(&mut world, BuildingKind::Road, 4, 0).expect("road placed");
    let _ = place(&mut world, BuildingKind::Palm, -3, -3).expect("palm placed");
    let villa = BuildingId::new(0);
    let road = BuildingId::new(1);
    let palm = BuildingId::new(2);
    let balance = query::balance(&world);
    let xp = query::progression(&world).xp;

    let events = run(
        &mut world,
        Command::MoveBuilding {
            building: villa,
            anchor: CellCoord::new(0, 0),
        },
    )
    .expect("same anchor");
    assert!(events.is_empty(), "moving onto the current anchor is a no-op");

    let events = run(
        &mut world,
        Command::MoveBuilding {
            building: villa,
            anchor: CellCoord::new(1, 0),
        },
    )
    .expect("overlapping own cells is allowed");
    assert_eq!(
        events.first(),
        Some(&Event::BuildingMoved {
            building: villa,
            from: CellCoord::new(0, 0),
            to: CellCoord::new(1, 0),
        })
    );
    assert_eq!(query::building_at(&world, CellCoord::new(0, 0)), None);
    assert_eq!(query::building_at(&world, CellCoord::new(2, 1)), Some(villa));

    assert_eq!(
        run(
            &mut world,
            Command::MoveBuilding {
                building: villa,
                anchor: CellCoord::new(3, 0),
            },
        ),
        Err(Rejection::Placement(PlacementError::TileOccupied))
    );
    assert_eq!(
        run(
            &mut world,
            Command::MoveBuilding {
                building: road,
                anchor: CellCoord::new(5, 5),
            },
        ),
        Err(Rejection::Immovable(BuildingKind::Road))
    );
    assert_eq!(
        run(
            &mut world,
            Command::MoveBuilding {
                building: BuildingId::new(42),
                anchor: CellCoord::new(5, 5),
            },
        ),
        Err(Rejection::MissingBuilding(BuildingId::new(42)))
    );
    assert!(
        run(
            &mut world,
            Command::MoveBuilding {
                building: palm,
                anchor: CellCoord::new(-3, -2),
            },
        )
        .is_ok(),
        "a palm does not crowd itself"
    );

    assert!((query::balance(&world) - balance).abs() < f64::EPSILON);
    assert_eq!(query::progression(&world).xp, xp);
}

#[test]
fn demolition_frees_cells_without_refund() {
    let mut world = World::new();
    let _ = place(&mut world, BuildingKind::Villa, 0, 0).expect("villa placed");
    let balance = query::balance(&world);

    let events = run(
        &mut world,
        Command::DemolishBuilding {
            building: BuildingId::new(0),
        },
    )
    .expect("demolished");

    assert!(matches!(
        events.first(),
        Some(Event::BuildingDemolished {
            kind: BuildingKind::Villa,
            ..
        })
    ));
    assert!(query::occupancy_view(&world).is_empty());
    assert!((query::balance(&world) - balance).abs() < f64::EPSILON);
    assert_eq!(
        run(
            &mut world,
            Command::DemolishBuilding {
                building: BuildingId::new(0),
            },
        ),
        Err(Rejection::MissingBuilding(BuildingId::new(0)))
    );

    let _ = place(&mut world, BuildingKind::Villa, 0, 0).expect("villa placed again");
    assert!(query::building(&world, BuildingId::new(1)).is_some(), "ids are not reused");
}

#[test]
fn villa_first_earning_bonus_is_paid_once() {
    let mut world = World::new();
    let _ = place(&mut world, BuildingKind::Villa, 0, 0).expect("villa placed");
    let events = place(&mut world, BuildingKind::Generator, 3, 0).expect("generator placed");

    let awards: Vec<u64> = events
        .iter()
        .filter_map(|event| match event {
            Event::ExperienceGained { amount, .. } => Some(*amount),
            _ => None,
        })
        .collect();
    assert_eq!(awards, vec![10, 30]);
    assert_eq!(query::progression(&world).xp, 55);
    assert!(query::statuses(&world)[0].active);

    let _ = run(
        &mut world,
        Command::DemolishBuilding {
            building: BuildingId::new(1),
        },
    )
    .expect("generator demolished");
    assert!(!query::statuses(&world)[0].active);

    let _ = place(&mut world, BuildingKind::Generator, 3, 0).expect("generator rebuilt");
    assert_eq!(query::progression(&world).xp, 65, "no second villa bonus");
    assert!((query::balance(&world) - 300.0).abs() < f64::EPSILON);
}

#[test]
fn level_ups_announce_unlocked_items() {
    let config = SimulationConfig {
        starting_money: 10_000.0,
        ..SimulationConfig::default()
    };
    let mut world = World::with_config(config, Catalog::standard());
    let mut level_ups = Vec::new();
    for gx in [-6, -4, -2, 0, 2, 4, 6] {
        let events = place(&mut world, BuildingKind::Villa, gx, 0).expect("villa placed");
        level_ups.extend(events.into_iter().filter(|event| matches!(event, Event::LeveledUp { .. })));
    }

    assert_eq!(
        level_ups,
        vec![Event::LeveledUp {
            level: 2,
            levels_gained: 1,
            unlocked: vec![BuildingKind::WaterTower, BuildingKind::Pool],
        }]
    );
    let progression = query::progression(&world);
    assert_eq!(progression.level, 2);
    assert_eq!(progression.xp, 5);
    assert_eq!(progression.xp_to_next, 150);
}

#[test]
fn scenery_is_free_and_skips_invalid_anchors() {
    let mut world = World::new();
    let events = run(
        &mut world,
        Command::PlaceScenery {
            kind: BuildingKind::Palm,
            anchors: vec![
                CellCoord::new(0, -12),
                CellCoord::new(0, -12),
                CellCoord::new(1, -12),
                CellCoord::new(0, 10),
                CellCoord::new(-4, -11),
            ],
        },
    )
    .expect("scenery placed");

    let placed: Vec<CellCoord> = events
        .iter()
        .filter_map(|event| match event {
            Event::BuildingPlaced { region, cost, .. } => {
                assert_eq!(*cost, 0);
                Some(region.anchor())
            }
            _ => None,
        })
        .collect();
    assert_eq!(placed, vec![CellCoord::new(0, -12), CellCoord::new(-4, -11)]);
    assert!((query::balance(&world) - 1_000.0).abs() < f64::EPSILON);
    assert_eq!(query::progression(&world).xp, 0);
}
