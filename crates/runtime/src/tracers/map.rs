use std::collections::HashMap;
use std::io::Write;

use arena_core::{ArenaMap, Observer, PlayerId, Position, RobotInfo, TileKind, TurnView};

/// Draws the board after every turn.
///
/// Each cell is four characters: `XXX ` blocked, `--- ` spawn, blank when
/// open, otherwise the owner's team letter and the last two digits of hp.
#[derive(Debug)]
pub struct MapTracer<W> {
    out: W,
}

impl<W: Write> MapTracer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Observer for MapTracer<W> {
    fn on_turn_end(&mut self, view: &TurnView<'_>) {
        let frame = format!("turn {}\n{}\n", view.turn, render(view.map, &view.robots));
        if let Err(err) = self
            .out
            .write_all(frame.as_bytes())
            .and_then(|()| self.out.flush())
        {
            tracing::warn!(error = %err, "failed to draw the board");
        }
    }
}

/// Renders `robots` on `map`, one text row per map row.
pub fn render(map: &ArenaMap, robots: &[RobotInfo]) -> String {
    let occupants: HashMap<Position, &RobotInfo> =
        robots.iter().map(|robot| (robot.location, robot)).collect();

    let mut grid = String::with_capacity((map.width() as usize * 4 + 1) * map.height() as usize);
    for y in 0..map.height() as i32 {
        for x in 0..map.width() as i32 {
            let at = Position::new(x, y);
            match occupants.get(&at) {
                Some(robot) => {
                    grid.push(team_letter(robot.player_id));
                    grid.push_str(&format!("{:02} ", robot.hp % 100));
                }
                None => grid.push_str(match map.tile(at) {
                    Some(TileKind::Blocked) => "XXX ",
                    Some(TileKind::Spawn) => "--- ",
                    _ => "    ",
                }),
            }
        }
        grid.push('\n');
    }
    grid
}

/// `a` for player 1, `b` for player 2, wrapping after `z`.
fn team_letter(player: PlayerId) -> char {
    let offset = (player.0.wrapping_sub(1) % 26) as u8;
    char::from(b'a' + offset)
}
