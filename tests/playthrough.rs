use maze_runner::entity::{CollectibleKind, Point};
use maze_runner::game::WIN_DELAY_FRAMES;
use maze_runner::{Dir, GameEvent, GameState, HeldDirections};

fn quiet(seed: u64) -> GameState {
    let mut state = GameState::new(seed);
    state.enemies.clear();
    state
}

fn cell_of(p: Point) -> (usize, usize) {
    let (x, y) = p.cell();
    (x as usize, y as usize)
}

fn finish_move(state: &mut GameState) {
    while state.animation.moving {
        state.tick();
    }
}

/// Walks the shortest path to `goal`, one animated cell at a time.
fn walk_to(state: &mut GameState, goal: (usize, usize)) {
    let from = cell_of(state.player.pos);
    let path = state.maze.path(from, goal).expect("maze is connected");
    for pair in path.windows(2) {
        let (here, next) = (pair[0], pair[1]);
        let dir = Dir::ALL
            .into_iter()
            .find(|d| state.maze.neighbor(here.0, here.1, *d) == Some(next))
            .expect("path steps are adjacent");
        assert!(state.request_move(HeldDirections::only(dir)), "blocked at {here:?} going {dir:?}");
        assert_eq!(cell_of(state.player.pos), next);
        finish_move(state);
    }
}

fn key_cells(state: &GameState) -> Vec<(usize, usize)> {
    state
        .collectibles
        .iter()
        .filter(|c| c.kind == CollectibleKind::Key && !c.collected)
        .map(|c| cell_of(c.pos))
        .collect()
}

#[test]
fn clearing_the_first_level() {
    let mut state = quiet(2024);
    assert_eq!(state.keys_required(), 1);

    for key in key_cells(&state) {
        walk_to(&mut state, key);
    }
    assert_eq!(state.keys, 1);
    assert!(state.exit_unlocked());
    assert!(!state.game_over);

    let before = state.score;
    let exit = cell_of(state.exit);
    walk_to(&mut state, exit);
    assert!(state.game_over);
    assert_eq!(state.score, before + 100);

    let events = state.drain_events();
    assert!(events.iter().any(|e| matches!(e, GameEvent::KeyCollected { .. })));
    assert!(events.contains(&GameEvent::Won { at: state.exit }));

    while state.transition_pending() {
        state.tick();
    }
    assert!(!state.game_over);
    assert_eq!(state.level, 2);
    assert_eq!(state.maze_size, 17);
    assert_eq!(state.score, before + 100);
    assert_eq!(state.keys, 0);
    assert_eq!(state.player.pos, Point::new(0.5, 0.5));
    assert_eq!(state.keys_required(), 2);
}

#[test]
fn transition_waits_three_seconds() {
    let mut state = quiet(7);
    for key in key_cells(&state) {
        walk_to(&mut state, key);
    }
    let exit = cell_of(state.exit);
    let path = state.maze.path(cell_of(state.player.pos), exit).expect("maze is connected");
    let last = path[path.len() - 2];
    walk_to(&mut state, last);

    let dir = Dir::ALL
        .into_iter()
        .find(|d| state.maze.neighbor(last.0, last.1, *d) == Some(exit))
        .expect("adjacent");
    state.request_move(HeldDirections::only(dir));
    state.tick();
    assert!(state.game_over);
    for _ in 1..WIN_DELAY_FRAMES {
        state.tick();
        assert_eq!(state.level, 1);
    }
    state.tick();
    assert_eq!(state.level, 2);
}

#[test]
fn locked_exit_does_not_end_the_level() {
    let mut state = quiet(99);
    state.collectibles.retain(|c| c.kind == CollectibleKind::Treasure);
    let exit = cell_of(state.exit);
    walk_to(&mut state, exit);
    for _ in 0..WIN_DELAY_FRAMES + 10 {
        state.tick();
    }
    assert!(!state.game_over);
    assert_eq!(state.level, 1);
    assert!(!state.exit_unlocked());
}

#[test]
fn same_seed_same_level() {
    let a = GameState::new(555);
    let b = GameState::new(555);
    for y in 0..a.maze_size {
        for x in 0..a.maze_size {
            for dir in Dir::ALL {
                assert_eq!(a.maze.has_wall(x, y, dir), b.maze.has_wall(x, y, dir));
            }
        }
    }
    let place = |s: &GameState| s.collectibles.iter().map(|c| c.pos).collect::<Vec<_>>();
    assert_eq!(place(&a), place(&b));
    assert_eq!(
        a.enemies.iter().map(|e| e.pos).collect::<Vec<_>>(),
        b.enemies.iter().map(|e| e.pos).collect::<Vec<_>>()
    );
}

#[test]
fn later_starting_levels_grow_and_cap() {
    assert_eq!(GameState::starting_at(5, 1).maze_size, 20);
    let deep = GameState::starting_at(30, 1);
    assert_eq!(deep.maze_size, 25);
    assert_eq!(deep.keys_required(), 3);
    assert_eq!(deep.power_ups.len(), 2);
}
