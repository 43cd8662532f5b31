use std::{
    collections::{hash_map::DefaultHasher, HashMap},
    hash::{Hash, Hasher},
};

use kaiju_cats_core::{CatStatus, CellCoord, Command, CommandKind, Event, TileKind};
use kaiju_cats_world::{self as world, query, World, WorldConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const LAYOUT: &str = "\
RStart .  h  M  HH .  RBed
.      S  P  .  hh X  .
GStart hh .  H  .  P  GBed
.      #  S  .  h  .  .
BStart .  P  hh .  M  BBed
";

const TURN_LIMIT: u32 = 15;

fn base_world() -> World {
    let mut config = WorldConfig::default();
    for (entry, power) in config.roster.iter_mut().zip([1000, 2000, 3000]) {
        entry.initial_power = power;
    }
    World::from_layout(LAYOUT, &config).expect("layout parses")
}

fn random_placements(rng: &mut ChaCha8Rng, world: &World, count: usize) -> Vec<Command> {
    let (columns, rows) = query::dimensions(world);
    (0..count)
        .map(|_| {
            let cell = CellCoord::new(rng.gen_range(0..columns + 1), rng.gen_range(0..rows));
            let kind = CommandKind::ALL[rng.gen_range(0..CommandKind::ALL.len())];
            let floor = rng.gen_range(0..3);
            Command::PlaceCommand { cell, kind, floor }
        })
        .collect()
}

fn play(world: &mut World, placements: &[Command]) -> Vec<Event> {
    let mut events = Vec::new();
    for command in placements {
        world::apply(world, *command, &mut events);
    }
    for _ in 0..TURN_LIMIT {
        world::apply(world, Command::AdvanceTurn, &mut events);
    }
    events
}

fn fingerprint(events: &[Event]) -> u64 {
    let mut hasher = DefaultHasher::new();
    events.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn budget_never_overflows_and_rejections_are_free() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x6b61_696a_75);
    for _ in 0..64 {
        let mut world = base_world();
        for command in random_placements(&mut rng, &world, 40) {
            let before = query::budget_spent(&world);
            let commands_before = query::placed_commands(&world);
            let mut events = Vec::new();
            world::apply(&mut world, command, &mut events);

            assert!(query::budget_spent(&world) <= query::budget_total(&world));
            match events.as_slice() {
                [Event::CommandRejected { .. }] => {
                    assert_eq!(query::budget_spent(&world), before);
                    assert_eq!(query::placed_commands(&world), commands_before);
                }
                [Event::CommandPlaced {
                    remaining_budget, ..
                }] => assert_eq!(*remaining_budget, query::budget_remaining(&world)),
                other => panic!("unexpected placement events: {other:?}"),
            }
        }
    }
}

#[test]
fn identical_inputs_replay_identically() {
    let mut rng = ChaCha8Rng::seed_from_u64(15);
    let template = base_world();

    for _ in 0..32 {
        let placements = random_placements(&mut rng, &template, 12);

        let mut first = template.clone();
        let mut second = template.clone();
        let first_events = play(&mut first, &placements);
        let second_events = play(&mut second, &placements);

        assert_eq!(fingerprint(&first_events), fingerprint(&second_events));
        assert_eq!(query::cat_view(&first), query::cat_view(&second));
        assert_eq!(query::final_score(&first), query::final_score(&second));
    }

    let mut untouched = template.clone();
    assert_eq!(query::turn(&untouched), 0);
    let _ = play(&mut untouched, &[]);
    assert_eq!(query::turn(&template), 0);
}

#[test]
fn floors_only_ever_come_down() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..32 {
        let mut world = base_world();
        let mut events = Vec::new();
        for command in random_placements(&mut rng, &world, 16) {
            world::apply(&mut world, command, &mut events);
        }

        let mut floors = standing_floors(&world);
        let mut demolished: HashMap<CellCoord, u8> = HashMap::new();
        for _ in 0..TURN_LIMIT {
            events.clear();
            world::apply(&mut world, Command::AdvanceTurn, &mut events);
            for event in &events {
                if let Event::FloorDestroyed { cell, .. } = event {
                    *demolished.entry(*cell).or_default() += 1;
                }
            }

            let now = standing_floors(&world);
            for (cell, (total, remaining)) in &now {
                let (_, previous) = floors[cell];
                assert!(remaining <= &previous, "floors grew back at {cell}");
                assert_eq!(
                    total - remaining,
                    demolished.get(cell).copied().unwrap_or(0),
                    "floor count out of step at {cell}"
                );
            }
            floors = now;
        }
    }
}

fn standing_floors(world: &World) -> HashMap<CellCoord, (u8, u8)> {
    let (columns, rows) = query::dimensions(world);
    let mut floors = HashMap::new();
    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            if let Some(TileKind::Building {
                total_floors,
                remaining_floors,
                ..
            }) = query::tile_kind(world, cell)
            {
                let _ = floors.insert(cell, (total_floors, remaining_floors));
            }
        }
    }
    floors
}

#[test]
fn terminal_cats_stay_put_and_landings_are_exclusive() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xca7);
    for _ in 0..32 {
        let mut world = base_world();
        let mut events = Vec::new();
        for command in random_placements(&mut rng, &world, 16) {
            world::apply(&mut world, command, &mut events);
        }

        for _ in 0..TURN_LIMIT {
            let before = query::cat_view(&world);
            events.clear();
            world::apply(&mut world, Command::AdvanceTurn, &mut events);
            let after = query::cat_view(&world);

            for cat in before.iter().filter(|cat| cat.status.is_terminal()) {
                assert_eq!(after.get(cat.color), Some(cat));
            }

            let mut landed: HashMap<CellCoord, usize> = HashMap::new();
            for event in &events {
                let color = match event {
                    Event::CatMoved { color, .. } | Event::CatRebounded { color, .. } => *color,
                    _ => continue,
                };
                let cat = after.get(color).expect("cat exists");
                if cat.status != CatStatus::Defeated {
                    *landed.entry(cat.cell).or_default() += 1;
                }
            }
            assert!(landed.values().all(|count| *count == 1), "{landed:?}");
        }
    }
}

#[test]
fn arrivals_never_exceed_finished_cats() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..32 {
        let mut world = base_world();
        let placements = random_placements(&mut rng, &world, 16);
        let events = play(&mut world, &placements);

        let mut arrivals: Vec<u32> = events
            .iter()
            .filter_map(|event| match event {
                Event::CatFinished { arrival, .. } => Some(*arrival),
                _ => None,
            })
            .collect();
        let finished = query::cat_view(&world)
            .iter()
            .filter(|cat| cat.status == CatStatus::Finished)
            .count();

        assert_eq!(arrivals.len(), finished);
        assert_eq!(query::arrivals(&world) as usize, finished);
        arrivals.sort_unstable();
        assert!(arrivals.iter().copied().eq(1..=query::arrivals(&world)));
    }
}
