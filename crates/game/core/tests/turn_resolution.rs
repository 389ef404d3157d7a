use std::collections::{HashMap, HashSet};

use arena_core::{
    Action, ArenaMap, ArenaState, DamageRange, DamageTable, Observer, PlayerId, Position, Robot,
    RobotId, RobotInfo, TileKind, TurnView,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Spawn(RobotId),
    Kill(RobotId),
    Move(RobotId, Position, Position),
    Attack(RobotId, Position),
    Suicide(RobotId),
    TurnEnd(u64, usize),
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    fn kills(&self, id: RobotId) -> usize {
        self.events
            .iter()
            .filter(|event| **event == Event::Kill(id))
            .count()
    }
}

impl Observer for Recorder {
    fn on_spawn(&mut self, robot: &RobotInfo) {
        self.events.push(Event::Spawn(robot.robot_id));
    }

    fn on_kill(&mut self, robot: &RobotInfo) {
        self.events.push(Event::Kill(robot.robot_id));
    }

    fn on_move(&mut self, robot: &RobotInfo, to: Position) {
        self.events
            .push(Event::Move(robot.robot_id, robot.location, to));
    }

    fn on_attack(&mut self, robot: &RobotInfo, target: Position) {
        self.events.push(Event::Attack(robot.robot_id, target));
    }

    fn on_suicide(&mut self, robot: &RobotInfo) {
        self.events.push(Event::Suicide(robot.robot_id));
    }

    fn on_turn_end(&mut self, view: &TurnView<'_>) {
        self.events.push(Event::TurnEnd(view.turn, view.robots.len()));
    }
}

const ATTACK: u32 = 9;
const COLLISION: u32 = 5;
const SUICIDE: u32 = 15;

fn fixed_damage() -> DamageTable {
    DamageTable::new(
        DamageRange::fixed(ATTACK),
        DamageRange::fixed(COLLISION),
        DamageRange::fixed(SUICIDE),
    )
}

/// 12x12 open field with one spawn in the corner and a wall at (7, 5).
fn field() -> ArenaMap {
    ArenaMap::new(
        12,
        12,
        [
            (Position::new(0, 0), TileKind::Spawn),
            (Position::new(7, 5), TileKind::Blocked),
        ],
    )
    .unwrap()
}

fn robot(id: u32, player: u32, hp: u32) -> Robot {
    Robot::new(RobotId(id), PlayerId(player), hp)
}

fn arena_with(robots: Vec<(Robot, Position)>) -> (ArenaState<Robot>, Recorder) {
    let mut arena = ArenaState::new(field(), fixed_damage());
    let mut recorder = Recorder::default();
    for (robot, at) in robots {
        let evicted = arena.place_at(robot, at, &mut recorder).unwrap();
        assert!(evicted.is_none());
    }
    recorder.events.clear();
    (arena, recorder)
}

fn hp_of(arena: &ArenaState<Robot>, id: u32) -> Option<u32> {
    arena.board().find(RobotId(id)).map(Robot::hp)
}

fn location_of(arena: &ArenaState<Robot>, id: u32) -> Option<Position> {
    arena.board().find(RobotId(id)).and_then(Robot::location)
}

fn actions(entries: &[(u32, Action)]) -> HashMap<RobotId, Action> {
    entries
        .iter()
        .map(|(id, action)| (RobotId(*id), *action))
        .collect()
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(0xA4E7A)
}

// ============================================================================
// Movement
// ============================================================================

#[test]
fn both_moving_into_the_same_cell_cancels_and_damages_both() {
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(5, 5)),
        (robot(2, 2, 50), Position::new(6, 5)),
    ]);

    let outcome = arena.resolve_turn(
        actions(&[
            (1, Action::Move(Position::new(5, 5))),
            (2, Action::Move(Position::new(5, 5))),
        ]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(outcome.passes, 2);
    assert_eq!(hp_of(&arena, 1), Some(50 - COLLISION));
    assert_eq!(hp_of(&arena, 2), Some(50 - COLLISION));
    assert_eq!(location_of(&arena, 1), Some(Position::new(5, 5)));
    assert_eq!(location_of(&arena, 2), Some(Position::new(6, 5)));
    assert!(
        !recorder
            .events
            .iter()
            .any(|event| matches!(event, Event::Move(..)))
    );
}

#[test]
fn converging_movers_stay_home() {
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(4, 5)),
        (robot(2, 2, 50), Position::new(6, 5)),
    ]);

    arena.resolve_turn(
        actions(&[
            (1, Action::Move(Position::new(5, 5))),
            (2, Action::Move(Position::new(5, 5))),
        ]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(location_of(&arena, 1), Some(Position::new(4, 5)));
    assert_eq!(location_of(&arena, 2), Some(Position::new(6, 5)));
    assert_eq!(hp_of(&arena, 1), Some(50 - COLLISION));
    assert_eq!(hp_of(&arena, 2), Some(50 - COLLISION));
}

#[test]
fn guarding_grants_full_collision_immunity() {
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(5, 5)),
        (robot(2, 2, 50), Position::new(6, 5)),
    ]);

    arena.resolve_turn(
        actions(&[(1, Action::Guard), (2, Action::Move(Position::new(5, 5)))]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(hp_of(&arena, 1), Some(50));
    assert_eq!(hp_of(&arena, 2), Some(50 - COLLISION));
    assert_eq!(location_of(&arena, 2), Some(Position::new(6, 5)));
}

#[test]
fn combatants_without_an_action_guard() {
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(5, 5)),
        (robot(2, 2, 50), Position::new(6, 5)),
    ]);

    arena.resolve_turn(
        actions(&[(2, Action::Move(Position::new(5, 5)))]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(hp_of(&arena, 1), Some(50));
    assert_eq!(hp_of(&arena, 2), Some(50 - COLLISION));
}

#[test]
fn friendly_collisions_cancel_without_damage() {
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 7, 50), Position::new(4, 5)),
        (robot(2, 7, 50), Position::new(6, 5)),
    ]);

    arena.resolve_turn(
        actions(&[
            (1, Action::Move(Position::new(5, 5))),
            (2, Action::Move(Position::new(5, 5))),
        ]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(hp_of(&arena, 1), Some(50));
    assert_eq!(hp_of(&arena, 2), Some(50));
    assert_eq!(location_of(&arena, 1), Some(Position::new(4, 5)));
    assert_eq!(location_of(&arena, 2), Some(Position::new(6, 5)));
}

#[test]
fn mixed_owner_collision_damages_the_whole_group() {
    // Two teammates and one opponent: not every member shares an owner.
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(4, 5)),
        (robot(2, 1, 50), Position::new(6, 5)),
        (robot(3, 2, 50), Position::new(5, 4)),
    ]);

    arena.resolve_turn(
        actions(&[
            (1, Action::Move(Position::new(5, 5))),
            (2, Action::Move(Position::new(5, 5))),
            (3, Action::Move(Position::new(5, 5))),
        ]),
        &mut rng(),
        &mut recorder,
    );

    for id in 1..=3 {
        assert_eq!(hp_of(&arena, id), Some(50 - COLLISION), "robot {id}");
    }
}

#[test]
fn cancellations_cascade_until_a_fixed_point() {
    // 1 follows 2 into (4,5); 2 and 3 both want (5,5).
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(3, 5)),
        (robot(2, 2, 50), Position::new(4, 5)),
        (robot(3, 3, 50), Position::new(6, 5)),
    ]);

    let outcome = arena.resolve_turn(
        actions(&[
            (1, Action::Move(Position::new(4, 5))),
            (2, Action::Move(Position::new(5, 5))),
            (3, Action::Move(Position::new(5, 5))),
        ]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(outcome.passes, 3);
    assert_eq!(location_of(&arena, 1), Some(Position::new(3, 5)));
    assert_eq!(location_of(&arena, 2), Some(Position::new(4, 5)));
    assert_eq!(location_of(&arena, 3), Some(Position::new(6, 5)));
    assert_eq!(hp_of(&arena, 1), Some(50 - COLLISION));
    // Collided twice: once at (5,5), once when pushed back onto (4,5).
    assert_eq!(hp_of(&arena, 2), Some(50 - 2 * COLLISION));
    assert_eq!(hp_of(&arena, 3), Some(50 - COLLISION));
}

#[test]
fn swaps_and_trains_move_freely() {
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(4, 5)),
        (robot(2, 2, 50), Position::new(5, 5)),
        (robot(3, 1, 50), Position::new(2, 2)),
        (robot(4, 2, 50), Position::new(3, 2)),
    ]);

    let outcome = arena.resolve_turn(
        actions(&[
            (1, Action::Move(Position::new(5, 5))),
            (2, Action::Move(Position::new(4, 5))),
            (3, Action::Move(Position::new(3, 2))),
            (4, Action::Move(Position::new(4, 2))),
        ]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(outcome.passes, 1);
    assert_eq!(location_of(&arena, 1), Some(Position::new(5, 5)));
    assert_eq!(location_of(&arena, 2), Some(Position::new(4, 5)));
    assert_eq!(location_of(&arena, 3), Some(Position::new(3, 2)));
    assert_eq!(location_of(&arena, 4), Some(Position::new(4, 2)));
    for id in 1..=4 {
        assert_eq!(hp_of(&arena, id), Some(50));
    }
    assert!(recorder.events.contains(&Event::Move(
        RobotId(1),
        Position::new(4, 5),
        Position::new(5, 5)
    )));
    assert_eq!(
        recorder
            .events
            .iter()
            .filter(|event| matches!(event, Event::Move(..)))
            .count(),
        4
    );
}

#[test]
fn moves_into_walls_or_off_the_map_are_cancelled_without_damage() {
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(6, 5)),
        (robot(2, 2, 50), Position::new(0, 3)),
    ]);

    arena.resolve_turn(
        actions(&[
            (1, Action::Move(Position::new(7, 5))),
            (2, Action::Move(Position::new(-1, 3))),
        ]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(location_of(&arena, 1), Some(Position::new(6, 5)));
    assert_eq!(location_of(&arena, 2), Some(Position::new(0, 3)));
    assert_eq!(hp_of(&arena, 1), Some(50));
    assert_eq!(hp_of(&arena, 2), Some(50));
}

// ============================================================================
// Combat
// ============================================================================

#[test]
fn attack_against_a_guard_is_halved() {
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(5, 5)),
        (robot(2, 2, 50), Position::new(6, 5)),
    ]);

    arena.resolve_turn(
        actions(&[(1, Action::Attack(Position::new(6, 5))), (2, Action::Guard)]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(hp_of(&arena, 1), Some(50));
    assert_eq!(hp_of(&arena, 2), Some(50 - ATTACK / 2));
    assert!(
        recorder
            .events
            .contains(&Event::Attack(RobotId(1), Position::new(6, 5)))
    );
}

#[test]
fn attack_lands_in_full_on_a_non_guarding_enemy() {
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(5, 5)),
        (robot(2, 2, 50), Position::new(6, 5)),
    ]);

    arena.resolve_turn(
        actions(&[
            (1, Action::Attack(Position::new(6, 5))),
            (2, Action::Attack(Position::new(5, 5))),
        ]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(hp_of(&arena, 1), Some(50 - ATTACK));
    assert_eq!(hp_of(&arena, 2), Some(50 - ATTACK));
}

#[test]
fn attacks_hit_the_post_movement_board() {
    // 2 steps into the cell 1 is attacking.
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(5, 5)),
        (robot(2, 2, 50), Position::new(6, 6)),
    ]);

    arena.resolve_turn(
        actions(&[
            (1, Action::Attack(Position::new(6, 5))),
            (2, Action::Move(Position::new(6, 5))),
        ]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(location_of(&arena, 2), Some(Position::new(6, 5)));
    assert_eq!(hp_of(&arena, 2), Some(50 - ATTACK));
}

#[test]
fn friendly_and_empty_attacks_do_nothing() {
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(5, 5)),
        (robot(2, 1, 50), Position::new(6, 5)),
    ]);

    arena.resolve_turn(
        actions(&[
            (1, Action::Attack(Position::new(6, 5))),
            (2, Action::Attack(Position::new(6, 4))),
        ]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(hp_of(&arena, 1), Some(50));
    assert_eq!(hp_of(&arena, 2), Some(50));
    // The attempt is still reported.
    assert!(
        recorder
            .events
            .contains(&Event::Attack(RobotId(2), Position::new(6, 4)))
    );
}

#[test]
fn suicide_damages_enemy_neighbours_and_always_kills_the_actor() {
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(5, 5)),
        (robot(2, 2, 50), Position::new(6, 5)),
        (robot(3, 1, 50), Position::new(4, 5)),
        (robot(4, 2, 50), Position::new(5, 6)),
        (robot(5, 2, 50), Position::new(6, 6)),
    ]);

    let outcome = arena.resolve_turn(
        actions(&[
            (1, Action::Suicide),
            (2, Action::Attack(Position::new(6, 4))),
            (4, Action::Guard),
        ]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(hp_of(&arena, 1), None);
    assert_eq!(hp_of(&arena, 2), Some(50 - SUICIDE));
    assert_eq!(hp_of(&arena, 3), Some(50));
    assert_eq!(hp_of(&arena, 4), Some(50 - SUICIDE / 2));
    // Diagonal cells are out of reach.
    assert_eq!(hp_of(&arena, 5), Some(50));

    assert_eq!(outcome.dead.len(), 1);
    assert_eq!(outcome.dead[0].robot_id(), RobotId(1));
    assert_eq!(outcome.dead[0].hp(), 0);
    assert!(recorder.events.contains(&Event::Suicide(RobotId(1))));
    assert_eq!(recorder.kills(RobotId(1)), 1);
}

// ============================================================================
// Cleanup & lifecycle
// ============================================================================

#[test]
fn lethal_damage_removes_the_victim_exactly_once() {
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(5, 5)),
        (robot(2, 2, 5), Position::new(6, 5)),
        (robot(3, 1, 50), Position::new(7, 6)),
        (robot(4, 1, 50), Position::new(6, 6)),
    ]);

    let outcome = arena.resolve_turn(
        actions(&[
            (1, Action::Attack(Position::new(6, 5))),
            (4, Action::Attack(Position::new(6, 5))),
        ]),
        &mut rng(),
        &mut recorder,
    );

    assert_eq!(outcome.dead.len(), 1);
    assert_eq!(outcome.dead[0].robot_id(), RobotId(2));
    assert_eq!(recorder.kills(RobotId(2)), 1);
    assert!(!arena.board().is_occupied(Position::new(6, 5)));
    assert_eq!(outcome.remaining, 3);
    assert!(outcome.has_survivors());
}

#[test]
fn turn_counter_advances_and_reports_the_completed_turn() {
    let (mut arena, mut recorder) = arena_with(vec![(robot(1, 1, 50), Position::new(5, 5))]);

    let first = arena.resolve_turn(HashMap::new(), &mut rng(), &mut recorder);
    let second = arena.resolve_turn(HashMap::new(), &mut rng(), &mut recorder);

    assert_eq!(first.turn, 0);
    assert_eq!(second.turn, 1);
    assert_eq!(arena.turn(), 2);
    assert_eq!(
        recorder.events,
        vec![Event::TurnEnd(0, 1), Event::TurnEnd(1, 1)]
    );
}

#[test]
fn last_combatant_dying_empties_the_arena() {
    let (mut arena, mut recorder) = arena_with(vec![(robot(1, 1, 50), Position::new(5, 5))]);

    let outcome = arena.resolve_turn(
        actions(&[(1, Action::Suicide)]),
        &mut rng(),
        &mut recorder,
    );

    assert!(!outcome.has_survivors());
    assert!(arena.is_empty());
}

#[test]
fn spawning_onto_an_occupied_spawn_evicts_the_occupant() {
    // `field()` has exactly one spawn tile.
    let mut arena = ArenaState::new(field(), fixed_damage());
    let mut recorder = Recorder::default();
    let mut rng = rng();

    assert!(arena.spawn(robot(1, 1, 50), &mut rng, &mut recorder).is_none());
    assert_eq!(location_of(&arena, 1), Some(Position::new(0, 0)));

    let evicted = arena
        .spawn(robot(2, 1, 50), &mut rng, &mut recorder)
        .expect("the first robot should be evicted");

    assert_eq!(evicted.robot_id(), RobotId(1));
    assert_eq!(evicted.hp(), 0);
    assert_eq!(location_of(&arena, 2), Some(Position::new(0, 0)));
    assert_eq!(arena.len(), 1);
    assert_eq!(
        recorder.events,
        vec![
            Event::Spawn(RobotId(1)),
            Event::Kill(RobotId(1)),
            Event::Spawn(RobotId(2)),
        ]
    );
}

#[test]
fn placing_on_a_wall_hands_the_robot_back() {
    let mut arena = ArenaState::new(field(), fixed_damage());
    let mut recorder = Recorder::default();

    let err = arena
        .place_at(robot(1, 1, 50), Position::new(7, 5), &mut recorder)
        .unwrap_err();

    assert_eq!(err.position, Position::new(7, 5));
    assert_eq!(err.occupant.robot_id(), RobotId(1));
    assert!(arena.is_empty());
    assert!(recorder.events.is_empty());
}

#[test]
fn clear_reports_every_remaining_robot() {
    let (mut arena, mut recorder) = arena_with(vec![
        (robot(1, 1, 50), Position::new(5, 5)),
        (robot(2, 2, 50), Position::new(8, 8)),
    ]);

    let removed = arena.clear(&mut recorder);

    assert_eq!(removed.len(), 2);
    assert!(removed.iter().all(|robot| robot.hp() == 0));
    assert!(arena.is_empty());
    assert_eq!(recorder.kills(RobotId(1)), 1);
    assert_eq!(recorder.kills(RobotId(2)), 1);
}

// ============================================================================
// Invariants under random play
// ============================================================================

#[test]
fn random_play_never_stacks_robots_or_enters_walls() {
    let map = ArenaMap::default();
    let mut arena: ArenaState<Robot> = ArenaState::new(map.clone(), DamageTable::default());
    let mut observer = Recorder::default();
    let mut rng = StdRng::seed_from_u64(1234);

    let open: Vec<Position> = (0..map.height() as i32)
        .flat_map(|y| (0..map.width() as i32).map(move |x| Position::new(x, y)))
        .filter(|p| map.tile(*p) == Some(TileKind::Open))
        .collect();
    let mut cells = open.clone();
    cells.shuffle(&mut rng);
    for (index, at) in cells.into_iter().take(40).enumerate() {
        let id = index as u32 + 1;
        arena
            .place_at(robot(id, id % 3, 50), at, &mut observer)
            .unwrap();
    }

    for _ in 0..60 {
        let mut intents = HashMap::new();
        let mut movers = 0;
        for info in arena.robots() {
            let neighbour = *info.location.neighbors().choose(&mut rng).unwrap();
            let action = match rng.gen_range(0..10) {
                0..=4 => {
                    movers += 1;
                    Action::Move(neighbour)
                }
                5..=7 => Action::Attack(neighbour),
                8 => Action::Guard,
                _ if rng.gen_bool(0.2) => Action::Suicide,
                _ => Action::Guard,
            };
            intents.insert(info.robot_id, action);
        }

        let outcome = arena.resolve_turn(intents, &mut rng, &mut observer);
        assert!(outcome.passes <= movers + 1);

        let robots = arena.robots();
        let unique: HashSet<Position> = robots.iter().map(|r| r.location).collect();
        assert_eq!(unique.len(), robots.len());
        for info in &robots {
            assert!(map.is_walkable(info.location));
            assert!(info.hp > 0);
        }
        for fallen in &outcome.dead {
            assert_eq!(observer.kills(fallen.robot_id()), 1);
        }
        if arena.is_empty() {
            break;
        }
    }
}
