//! Round rules: board layout and tap judgement
//!
//! Two game types share the same 4-tile board:
//! - `ColorOnly`: a tile is correct iff its background differs from the announced color
//! - `ColorAndText`: the background must differ AND the printed label must not name it
//!
//! Boards are rejection-sampled (up to `MAX_BOARD_ATTEMPTS`) so that both right and
//! wrong answers are always present and the layout changes between rounds. If sampling
//! runs dry we build a valid board by hand and accept a possible repeat.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::color::GameColor;
use crate::consts::{BOARD_SIZE, MAX_BOARD_ATTEMPTS};

/// Which judgement rule applies to taps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameType {
    #[default]
    ColorOnly,
    ColorAndText,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::ColorOnly => "color",
            GameType::ColorAndText => "color+text",
        }
    }
}

/// One tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub background: GameColor,
    /// Printed color word (ColorAndText only)
    pub text: Option<GameColor>,
}

impl Tile {
    pub fn plain(background: GameColor) -> Self {
        Self {
            background,
            text: None,
        }
    }

    pub fn labelled(background: GameColor, text: GameColor) -> Self {
        Self {
            background,
            text: Some(text),
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        self.text.map(|t| t.label())
    }

    fn names(&self, color: GameColor) -> bool {
        self.label().is_some_and(|l| color.is_named_by(l))
    }
}

/// The 4-tile board for a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub tiles: [Tile; BOARD_SIZE],
}

impl Board {
    pub fn new(tiles: [Tile; BOARD_SIZE]) -> Self {
        Self { tiles }
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Indices a player may tap for credit
    pub fn correct_indices(&self, game_type: GameType, announced: GameColor) -> Vec<usize> {
        (0..BOARD_SIZE)
            .filter(|&i| is_correct_tap(game_type, self, i, announced))
            .collect()
    }
}

/// Judge a single tile
pub fn is_correct_tile(game_type: GameType, tile: &Tile, announced: GameColor) -> bool {
    match game_type {
        GameType::ColorOnly => tile.background != announced,
        GameType::ColorAndText => tile.background != announced && !tile.names(announced),
    }
}

/// Judge a tap on `index` (out-of-range taps are never correct)
pub fn is_correct_tap(
    game_type: GameType,
    board: &Board,
    index: usize,
    announced: GameColor,
) -> bool {
    board
        .tile(index)
        .is_some_and(|t| is_correct_tile(game_type, t, announced))
}

/// Check the placement constraints for a game type
pub fn satisfies_constraints(game_type: GameType, board: &Board, announced: GameColor) -> bool {
    let tiles = &board.tiles;
    let matches_background = tiles.iter().any(|t| t.background == announced);
    match game_type {
        GameType::ColorOnly => {
            matches_background && tiles.iter().any(|t| t.background != announced)
        }
        GameType::ColorAndText => {
            let wrong_by_text = tiles
                .iter()
                .any(|t| t.background != announced && t.names(announced));
            let correct = tiles
                .iter()
                .any(|t| is_correct_tile(GameType::ColorAndText, t, announced));
            matches_background && wrong_by_text && correct
        }
    }
}

fn random_color<R: Rng + ?Sized>(rng: &mut R) -> GameColor {
    GameColor::ALL[rng.random_range(0..GameColor::ALL.len())]
}

fn random_tile<R: Rng + ?Sized>(rng: &mut R, game_type: GameType) -> Tile {
    match game_type {
        GameType::ColorOnly => Tile::plain(random_color(rng)),
        GameType::ColorAndText => Tile::labelled(random_color(rng), random_color(rng)),
    }
}

fn random_board<R: Rng + ?Sized>(rng: &mut R, game_type: GameType) -> Board {
    Board::new(std::array::from_fn(|_| random_tile(rng, game_type)))
}

/// Build a board for the announced color, different from `previous` when possible
pub fn generate_board<R: Rng + ?Sized>(
    rng: &mut R,
    game_type: GameType,
    announced: GameColor,
    previous: Option<&Board>,
) -> Board {
    for _ in 0..MAX_BOARD_ATTEMPTS {
        let candidate = random_board(rng, game_type);
        if satisfies_constraints(game_type, &candidate, announced) && previous != Some(&candidate)
        {
            return candidate;
        }
    }

    log::debug!(
        "Board sampling exhausted ({} {}), using constructed board",
        game_type.as_str(),
        announced
    );
    fallback_board(rng, game_type, announced)
}

/// One tile of every required kind, remaining tiles random, positions shuffled
pub fn fallback_board<R: Rng + ?Sized>(
    rng: &mut R,
    game_type: GameType,
    announced: GameColor,
) -> Board {
    let mut others = announced.others();
    others.shuffle(rng);

    let mut tiles = match game_type {
        GameType::ColorOnly => [
            Tile::plain(announced),
            Tile::plain(others[0]),
            random_tile(rng, game_type),
            random_tile(rng, game_type),
        ],
        GameType::ColorAndText => [
            // wrong by background
            Tile::labelled(announced, random_color(rng)),
            // wrong by text
            Tile::labelled(others[0], announced),
            // correct
            Tile::labelled(others[1], others[2]),
            random_tile(rng, game_type),
        ],
    };
    tiles.shuffle(rng);
    Board::new(tiles)
}

/// Picks announced colors, never the same one three times running
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorAnnouncer {
    /// Two most recent announcements, oldest first
    recent: [Option<GameColor>; 2],
}

impl ColorAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameColor {
        let pick = match self.recent {
            [Some(a), Some(b)] if a == b => {
                let others = a.others();
                others[rng.random_range(0..others.len())]
            }
            _ => random_color(rng),
        };
        self.recent = [self.recent[1], Some(pick)];
        pick
    }

    /// Most recent announcement
    pub fn current(&self) -> Option<GameColor> {
        self.recent[1]
    }

    pub fn reset(&mut self) {
        self.recent = [None, None];
    }
}
