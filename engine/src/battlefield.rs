use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::UNITS_PER_CELL;

/// Grid coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Straight-line distance in game distance units.
    pub fn distance_units(self, other: Position) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt() * f64::from(UNITS_PER_CELL)
    }

    /// Chess-style label, `A1` for the top-left cell.
    pub fn label(self) -> String {
        let column = u8::try_from(self.x)
            .ok()
            .filter(|x| *x < 26)
            .map(|x| char::from(b'A' + x).to_string())
            .unwrap_or_else(|| format!("#{}", self.x));
        format!("{}{}", column, self.y + 1)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Terrain kind of a single cell, serialized as its map code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Terrain {
    Grass,
    Water,
    Mountain,
    Forest,
}

impl Terrain {
    pub fn code(self) -> u8 {
        match self {
            Terrain::Grass => 0,
            Terrain::Water => 1,
            Terrain::Mountain => 2,
            Terrain::Forest => 3,
        }
    }

    /// Movement multiplier used when a map does not override it.
    pub fn base_cost(self) -> f64 {
        match self {
            Terrain::Grass => 1.0,
            Terrain::Water => 2.0,
            Terrain::Mountain => 3.0,
            Terrain::Forest => 1.5,
        }
    }
}

impl TryFrom<u8> for Terrain {
    type Error = ContentError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Terrain::Grass),
            1 => Ok(Terrain::Water),
            2 => Ok(Terrain::Mountain),
            3 => Ok(Terrain::Forest),
            other => Err(ContentError::UnknownTerrain(other)),
        }
    }
}

impl From<Terrain> for u8 {
    fn from(terrain: Terrain) -> Self {
        terrain.code()
    }
}

/// A named map as authored in content files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub grid: Vec<Vec<Terrain>>,
    #[serde(default)]
    pub movement_costs: IndexMap<Terrain, f64>,
}

impl MapDefinition {
    pub fn to_battlefield(&self) -> Result<Battlefield, ContentError> {
        Battlefield::with_costs(self.grid.clone(), self.movement_costs.clone())
    }
}

/// The match grid. Read-only once a match starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battlefield {
    pub rows: i32,
    pub cols: i32,
    pub grid: Vec<Vec<Terrain>>,
    #[serde(default)]
    pub movement_costs: IndexMap<Terrain, f64>,
}

impl Battlefield {
    pub fn new(grid: Vec<Vec<Terrain>>) -> Result<Self, ContentError> {
        Self::with_costs(grid, IndexMap::new())
    }

    pub fn with_costs(
        grid: Vec<Vec<Terrain>>,
        movement_costs: IndexMap<Terrain, f64>,
    ) -> Result<Self, ContentError> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(ContentError::EmptyGrid);
        }
        if let Some(row) = grid.iter().position(|r| r.len() != cols) {
            return Err(ContentError::RaggedGrid {
                row,
                expected: cols,
                found: grid[row].len(),
            });
        }
        let rows = i32::try_from(rows).map_err(|_| ContentError::GridTooLarge)?;
        let cols = i32::try_from(cols).map_err(|_| ContentError::GridTooLarge)?;
        Ok(Self {
            rows,
            cols,
            grid,
            movement_costs,
        })
    }

    /// An all-grass field.
    pub fn open(rows: usize, cols: usize) -> Result<Self, ContentError> {
        Self::new(vec![vec![Terrain::Grass; cols]; rows])
    }

    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }

    /// `None` outside the grid, which callers treat as impassable.
    pub fn terrain_at(&self, pos: Position) -> Option<Terrain> {
        if !self.is_in_bounds(pos) {
            return None;
        }
        self.grid
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
            .copied()
    }

    pub fn movement_cost_at(&self, pos: Position) -> f64 {
        match self.terrain_at(pos) {
            Some(terrain) => self
                .movement_costs
                .get(&terrain)
                .copied()
                .unwrap_or_else(|| terrain.base_cost()),
            None => f64::INFINITY,
        }
    }

    /// Every in-bounds cell within `reach` cells of `center` on both axes.
    pub(crate) fn cells_around(
        &self,
        center: Position,
        reach: i32,
    ) -> impl Iterator<Item = Position> + '_ {
        let y_lo = (center.y - reach).max(0);
        let y_hi = (center.y + reach).min(self.rows - 1);
        let x_lo = (center.x - reach).max(0);
        let x_hi = (center.x + reach).min(self.cols - 1);
        (y_lo..=y_hi).flat_map(move |y| (x_lo..=x_hi).map(move |x| Position::new(x, y)))
    }
}
