//! Full battles on the canonical maps.

use skirmish_core::prelude::*;
use skirmish_test_utils::determinism::{replay_on_threads, snapshot_resumes_identically};
use skirmish_test_utils::fixtures::{ALL_BATTLES, CORRIDOR_DUEL, OPENING};

#[test]
fn test_canonical_outcomes() {
    for battle in ALL_BATTLES {
        let mut sim = battle.simulation();
        let outcome = sim.run().unwrap();

        assert_eq!(outcome.rounds_completed, battle.rounds, "{} rounds", battle.name);
        assert_eq!(
            outcome.remaining_hit_points, battle.hit_points,
            "{} hit points",
            battle.name
        );
        assert_eq!(outcome.score, battle.score, "{} score", battle.name);
        sim.validate().unwrap();
    }
}

#[test]
fn test_canonical_flawless_powers() {
    for battle in ALL_BATTLES {
        let Some((power, score)) = battle.flawless else {
            continue;
        };
        let result = minimum_flawless_power(battle.rows, &CombatConfig::default()).unwrap();

        assert_eq!(result.attack_power, power, "{} power", battle.name);
        assert_eq!(result.outcome.score, score, "{} score", battle.name);
        assert_eq!(result.outcome.winner, Some(Faction::Elf));
    }
}

#[test]
fn test_opening_final_board() {
    let mut sim = OPENING.simulation();
    let outcome = sim.run().unwrap();

    assert_eq!(outcome.winner, Some(Faction::Goblin));
    assert_eq!(
        sim.render_with_hit_points(),
        [
            "#######",
            "#G....#   G(200)",
            "#.G...#   G(131)",
            "#.#.#G#   G(59)",
            "#...#.#",
            "#....G#   G(200)",
            "#######",
        ]
        .join("\n")
    );
}

#[test]
fn test_opening_early_rounds() {
    let mut sim = OPENING.simulation();

    sim.step_round().unwrap();
    assert_eq!(
        sim.render_with_hit_points(),
        [
            "#######",
            "#..G..#   G(200)",
            "#...EG#   E(197), G(197)",
            "#.#G#G#   G(200), G(197)",
            "#...#E#   E(197)",
            "#.....#",
            "#######",
        ]
        .join("\n")
    );

    sim.step_round().unwrap();
    assert_eq!(
        sim.render_with_hit_points(),
        [
            "#######",
            "#...G.#   G(200)",
            "#..GEG#   G(200), E(188), G(194)",
            "#.#.#G#   G(194)",
            "#...#E#   E(194)",
            "#.....#",
            "#######",
        ]
        .join("\n")
    );
}

#[test]
fn test_corridor_duel_end_to_end() {
    let mut sim = Simulation::from_rows(CORRIDOR_DUEL).unwrap();

    let first = sim.step_round().unwrap();
    let steps: Vec<_> = first.turns.iter().filter_map(|t| t.step).collect();
    assert_eq!(
        steps,
        vec![Step {
            from: Coord::new(1, 1),
            to: Coord::new(1, 2)
        }]
    );

    let outcome = sim.run().unwrap();
    assert_eq!(outcome.rounds_completed, 67);
    assert_eq!(outcome.remaining_hit_points, 2);
    assert_eq!(outcome.score, 134);
    assert_eq!(sim.living_units().count(), 1);
}

#[test]
fn test_completed_rounds_only_count_full_rounds() {
    for battle in ALL_BATTLES {
        let mut sim = battle.simulation();
        let mut full_rounds = 0;

        loop {
            let events = sim.step_round().unwrap();
            if events.completed {
                full_rounds += 1;
                assert!(sim.is_running());
            } else {
                assert!(!sim.is_running());
                break;
            }
        }

        assert_eq!(sim.rounds_completed(), full_rounds, "{}", battle.name);
    }
}

#[test]
fn test_battles_replay_identically() {
    for battle in ALL_BATTLES {
        replay_on_threads(|| battle.simulation(), 3, 100).assert_deterministic();
        assert!(
            snapshot_resumes_identically(|| battle.simulation(), battle.rounds.into()),
            "{} snapshot",
            battle.name
        );
    }
}
