//! Terminal view of a [`GameState`].
//!
//! The maze is drawn on a glyph grid twice as fine as the cell grid plus one:
//! odd coordinates are cell interiors, even ones are walls or wall gaps. Only
//! glyphs that changed since the previous frame are written.

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Stdout, Write};
use unicode_width::UnicodeWidthStr;

use crate::entity::{CollectibleKind, Point, PowerUpKind};
use crate::events::{Rgb, ENEMY_RED, GOLD, PLAYER_BLUE, POWER_GREEN};
use crate::game::GameState;
use crate::maze::Dir;
use crate::particles::ParticleField;

const CELL_W: usize = 2;
const MIN_VIEW: usize = 5;
const WALL: Color = Color::Rgb {
    r: 0x4a,
    g: 0x4a,
    b: 0x8a,
};
const FLOOR: Color = Color::Rgb {
    r: 0x2a,
    g: 0x2a,
    b: 0x6a,
};

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Wall,
    Floor,
    Visited,
    Player,
    Enemy,
    Key,
    Treasure,
    Power(PowerUpKind),
    Exit { unlocked: bool },
    Spark,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

impl Cell {
    const fn new(glyph: Glyph, color: Color) -> Self {
        Cell { glyph, color }
    }
}

fn rgb(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Visible window of the glyph grid.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
struct Viewport {
    x0: usize,
    y0: usize,
    w: usize,
    h: usize,
}

impl Viewport {
    fn index(&self, g: (i64, i64)) -> Option<usize> {
        let x = g.0 - self.x0 as i64;
        let y = g.1 - self.y0 as i64;
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            return None;
        }
        Some(y as usize * self.w + x as usize)
    }
}

pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    last_status: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
    view: Viewport,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last: Vec::new(),
            last_hud: String::new(),
            last_status: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
            view: Viewport::default(),
        }
    }

    /// Forces the next frame to repaint everything.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }
}

fn glyph_of(p: Point) -> (i64, i64) {
    ((p.x * 2.0).round() as i64, (p.y * 2.0).round() as i64)
}

fn base_cell(state: &GameState, gx: usize, gy: usize) -> Cell {
    let maze = &state.maze;
    let wall = Cell::new(Glyph::Wall, WALL);
    let blocked = match (gx % 2, gy % 2) {
        (1, 1) => {
            let cell = ((gx - 1) / 2, (gy - 1) / 2);
            return if state.visited.contains(&cell) {
                Cell::new(Glyph::Visited, FLOOR)
            } else {
                Cell::new(Glyph::Floor, Color::Reset)
            };
        }
        (0, 1) => {
            let cy = (gy - 1) / 2;
            if gx == 0 {
                maze.has_wall(0, cy, Dir::Left)
            } else {
                maze.has_wall(gx / 2 - 1, cy, Dir::Right)
            }
        }
        (1, 0) => {
            let cx = (gx - 1) / 2;
            if gy == 0 {
                maze.has_wall(cx, 0, Dir::Up)
            } else {
                maze.has_wall(cx, gy / 2 - 1, Dir::Down)
            }
        }
        _ => true,
    };
    if blocked {
        wall
    } else {
        Cell::new(Glyph::Floor, Color::Reset)
    }
}

fn compose(state: &GameState, particles: &ParticleField, view: Viewport) -> Vec<Cell> {
    let mut buf = Vec::with_capacity(view.w * view.h);
    for gy in view.y0..view.y0 + view.h {
        for gx in view.x0..view.x0 + view.w {
            buf.push(base_cell(state, gx, gy));
        }
    }

    let mut put = |p: Point, cell: Cell| {
        if let Some(i) = view.index(glyph_of(p)) {
            buf[i] = cell;
        }
    };

    let unlocked = state.exit_unlocked();
    let exit_color = if unlocked {
        rgb(GOLD)
    } else {
        Color::DarkGrey
    };
    put(state.exit, Cell::new(Glyph::Exit { unlocked }, exit_color));
    for item in state.collectibles.iter().filter(|i| !i.collected) {
        let cell = match item.kind {
            CollectibleKind::Key => Cell::new(Glyph::Key, rgb(GOLD)),
            CollectibleKind::Treasure => Cell::new(Glyph::Treasure, rgb(ENEMY_RED)),
        };
        put(item.pos, cell);
    }
    for power_up in state.power_ups.iter().filter(|p| !p.collected) {
        put(power_up.pos, Cell::new(Glyph::Power(power_up.kind), rgb(POWER_GREEN)));
    }
    for p in particles.iter() {
        put(p.pos, Cell::new(Glyph::Spark, rgb(p.color)));
    }
    for enemy in &state.enemies {
        put(enemy.pos, Cell::new(Glyph::Enemy, rgb(ENEMY_RED)));
    }
    put(state.animation.pos, Cell::new(Glyph::Player, rgb(PLAYER_BLUE)));
    buf
}

fn hud_line(state: &GameState) -> String {
    let power = match state.power_up {
        Some(p) => format!("{} {:.0}s", p.kind.label(), p.remaining.ceil()),
        None => "-".to_string(),
    };
    format!(
        "Level: {}  Score: {}  Keys: {}/{}  Treasures: {}  Time: {}s  Explored: {:.0}%  Power: {}",
        state.level,
        state.score,
        state.keys,
        state.keys_required(),
        state.treasures,
        state.elapsed_seconds(),
        state.progress(),
        power
    )
}

fn status_line(state: &GameState) -> String {
    if state.game_over {
        return "You found the artifact! Next level coming up...".to_string();
    }
    let (x, y) = state.player.pos.cell();
    let exit = if state.exit_unlocked() {
        "exit open"
    } else {
        "exit locked"
    };
    format!("Position: ({}, {})  {}  (arrows/hjkl to move, q to quit)", x, y, exit)
}

/// Centers the window on the camera, clamped to the grid edges.
fn viewport(state: &GameState, term_w: u16, term_h: u16) -> Viewport {
    let grid = state.maze_size * 2 + 1;
    let w = grid.min(term_w as usize / CELL_W);
    let h = grid.min((term_h as usize).saturating_sub(2));
    let (cx, cy) = glyph_of(state.camera.pos);
    let x0 = (cx - w as i64 / 2).clamp(0, (grid - w) as i64) as usize;
    let y0 = (cy - h as i64 / 2).clamp(0, (grid - h) as i64) as usize;
    Viewport { x0, y0, w, h }
}

pub fn render(
    stdout: &mut Stdout,
    state: &GameState,
    particles: &ParticleField,
    renderer: &mut Renderer,
) -> io::Result<()> {
    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if (term_w as usize) < MIN_VIEW * CELL_W || (term_h as usize) < MIN_VIEW + 2 {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            MIN_VIEW * CELL_W,
            MIN_VIEW + 2,
            term_w,
            term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let view = viewport(state, term_w, term_h);
    let shake = if state.shaking() && state.frame() % 2 == 0 {
        1
    } else {
        0
    };
    let origin_x = (term_w - (view.w * CELL_W) as u16) / 2 + shake;
    let origin_y = (term_h - 2 - view.h as u16) / 2 + 1;
    if view != renderer.view || origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.view = view;
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    let hud = hud_line(state);
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(0, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    let cells = compose(state, particles, view);
    if renderer.last.len() != cells.len() {
        renderer.needs_full = true;
    }
    for (idx, cell) in cells.iter().enumerate() {
        if renderer.needs_full || *cell != renderer.last[idx] {
            draw_cell(stdout, renderer, idx % view.w, idx / view.w, *cell)?;
        }
    }
    renderer.last = cells;

    let status = status_line(state);
    if renderer.needs_full || status != renderer.last_status {
        stdout.queue(MoveTo(0, renderer.origin_y + view.h as u16))?;
        stdout.queue(SetForegroundColor(if state.game_over {
            rgb(GOLD)
        } else {
            Color::Grey
        }))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&status))?;
        stdout.queue(ResetColor)?;
        renderer.last_status = status;
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, cell: Cell) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Wall => "██",
        Glyph::Floor => "  ",
        Glyph::Visited => "· ",
        Glyph::Player => "😃",
        Glyph::Enemy => "👾",
        Glyph::Key => "🔑",
        Glyph::Treasure => "💎",
        Glyph::Power(PowerUpKind::Speed) => "⚡",
        Glyph::Power(PowerUpKind::Ghost) => "👻",
        Glyph::Power(PowerUpKind::Freeze) => "❄",
        Glyph::Exit { unlocked: true } => "🏆",
        Glyph::Exit { unlocked: false } => "🔒",
        Glyph::Spark => "*",
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Maze;

    #[test]
    fn glyph_grid_maps_cells_to_odd_coordinates() {
        assert_eq!(glyph_of(Point::new(0.5, 0.5)), (1, 1));
        assert_eq!(glyph_of(Point::new(7.5, 2.5)), (15, 5));
        assert_eq!(glyph_of(Point::new(1.0, 0.5)), (2, 1));
    }

    #[test]
    fn walls_follow_the_maze() {
        let mut state = GameState::new(1);
        let mut maze = Maze::closed(15, 15);
        maze.open(0, 0, Dir::Right);
        state.maze = maze;
        assert!(base_cell(&state, 2, 1) == Cell::new(Glyph::Floor, Color::Reset));
        assert!(base_cell(&state, 0, 1).glyph == Glyph::Wall);
        assert!(base_cell(&state, 1, 2).glyph == Glyph::Wall);
        assert!(base_cell(&state, 2, 2).glyph == Glyph::Wall);
        assert!(base_cell(&state, 1, 1).glyph == Glyph::Visited);
        assert!(base_cell(&state, 3, 1).glyph == Glyph::Floor);
    }

    #[test]
    fn viewport_fits_and_follows_the_camera() {
        let mut state = GameState::starting_at(10, 3);
        let view = viewport(&state, 200, 80);
        assert_eq!((view.x0, view.y0, view.w, view.h), (0, 0, 51, 51));

        let view = viewport(&state, 40, 22);
        assert_eq!((view.w, view.h), (20, 20));
        assert_eq!((view.x0, view.y0), (0, 0));

        state.camera.pos = Point::new(24.5, 24.5);
        let view = viewport(&state, 40, 22);
        assert_eq!((view.x0, view.y0), (31, 31));
    }

    #[test]
    fn player_is_drawn_on_top() {
        let mut state = GameState::new(2);
        state.enemies.clear();
        let particles = ParticleField::new();
        let view = Viewport {
            x0: 0,
            y0: 0,
            w: 31,
            h: 31,
        };
        let cells = compose(&state, &particles, view);
        assert!(cells[view.w + 1].glyph == Glyph::Player);
        let exit = view.index((15, 15)).unwrap();
        assert!(cells[exit].glyph == Glyph::Exit { unlocked: false });
    }

    #[test]
    fn hud_reports_the_counters() {
        let state = GameState::new(2);
        let hud = hud_line(&state);
        assert!(hud.starts_with("Level: 1  Score: 0  Keys: 0/1"));
        assert!(hud.contains("Power: -"));
        assert!(status_line(&state).contains("exit locked"));
    }
}
