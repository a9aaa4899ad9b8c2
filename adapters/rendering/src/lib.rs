#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for manifold net adapters.

use anyhow::Result as AnyResult;
use glam::{Mat4, Vec3};
use manifold_net_core::{
    Cell, Direction, FoldFactor, HingeRotation, HingeTree, PieceColor, SeedTrail, Tiling,
};
use manifold_net_system_folding::FoldPose;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Smallest distance the folded-view camera keeps from the root cell.
pub const MIN_CAMERA_DISTANCE: f32 = 5.0;

/// Camera distance gained per unit of `sqrt(cell_count)`.
pub const CAMERA_DISTANCE_PER_CELL: f32 = 2.5;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl From<PieceColor> for Color {
    fn from(color: PieceColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Sides of a cell that border an unoccupied cell and are drawn as thick outline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct OpenEdges {
    /// Upper side is exposed.
    pub north: bool,
    /// Right side is exposed.
    pub east: bool,
    /// Lower side is exposed.
    pub south: bool,
    /// Left side is exposed.
    pub west: bool,
}

impl OpenEdges {
    /// Determines which sides of `cell` face empty space within `tiling`.
    #[must_use]
    pub fn of(tiling: &Tiling, cell: Cell) -> Self {
        let open = |direction| !tiling.is_occupied(cell.neighbor(direction));
        Self {
            north: open(Direction::North),
            east: open(Direction::East),
            south: open(Direction::South),
            west: open(Direction::West),
        }
    }

    /// Reports whether the side facing `direction` is exposed.
    #[must_use]
    pub const fn is_open(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Number of exposed sides.
    #[must_use]
    pub fn count(&self) -> usize {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.is_open(*direction))
            .count()
    }
}

/// Grid rectangle framing the flat net, one empty cell wider than the net on every side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct BoardBounds {
    /// Leftmost column, inclusive.
    pub min_x: i32,
    /// Topmost row, inclusive.
    pub min_y: i32,
    /// Rightmost column, inclusive.
    pub max_x: i32,
    /// Bottom row, inclusive.
    pub max_y: i32,
}

impl BoardBounds {
    /// Frames the occupied cells of `tiling`; an empty tiling yields a 2x2 board at the origin.
    #[must_use]
    pub fn of(tiling: &Tiling) -> Self {
        let Some(first) = tiling.occupied().first() else {
            return Self {
                min_x: 0,
                min_y: 0,
                max_x: 1,
                max_y: 1,
            };
        };

        let tight = tiling.occupied().iter().fold(
            Self {
                min_x: first.x(),
                min_y: first.y(),
                max_x: first.x(),
                max_y: first.y(),
            },
            |bounds, cell| Self {
                min_x: bounds.min_x.min(cell.x()),
                min_y: bounds.min_y.min(cell.y()),
                max_x: bounds.max_x.max(cell.x()),
                max_y: bounds.max_y.max(cell.y()),
            },
        );

        Self {
            min_x: tight.min_x - 1,
            min_y: tight.min_y - 1,
            max_x: tight.max_x + 1,
            max_y: tight.max_y + 1,
        }
    }

    /// Number of columns covered by the board.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.max_x.abs_diff(self.min_x) + 1
    }

    /// Number of rows covered by the board.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.max_y.abs_diff(self.min_y) + 1
    }

    /// Reports whether `cell` lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x() >= self.min_x
            && cell.x() <= self.max_x
            && cell.y() >= self.min_y
            && cell.y() <= self.max_y
    }
}

/// Occupied cell of the flat board.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BoardCell {
    /// Grid position of the cell.
    pub cell: Cell,
    /// Index of the owning piece in placement order.
    pub piece: usize,
    /// Fill color of the owning piece.
    pub color: Color,
    /// Sides drawn with the thick outline.
    pub open_edges: OpenEdges,
    /// Piece name, present only on the first cell of each piece.
    pub label: Option<&'static str>,
}

/// Flat, top-down view of the net.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardPresentation {
    /// Rectangle framing the net.
    pub bounds: BoardBounds,
    /// Occupied cells in placement order.
    pub cells: Vec<BoardCell>,
}

impl BoardPresentation {
    /// Lays out every placed cell of `tiling`.
    #[must_use]
    pub fn new(tiling: &Tiling) -> Self {
        let cells = tiling
            .pieces()
            .iter()
            .enumerate()
            .flat_map(|(piece, placed)| {
                placed
                    .cells()
                    .iter()
                    .enumerate()
                    .map(move |(position, cell)| BoardCell {
                        cell: *cell,
                        piece,
                        color: placed.color().into(),
                        open_edges: OpenEdges::of(tiling, *cell),
                        label: (position == 0).then(|| placed.name()),
                    })
            })
            .collect();

        Self {
            bounds: BoardBounds::of(tiling),
            cells,
        }
    }

    /// Board cell drawn at `cell`, if occupied.
    #[must_use]
    pub fn cell_at(&self, cell: Cell) -> Option<&BoardCell> {
        self.cells.iter().find(|candidate| candidate.cell == cell)
    }

    /// Width and height in pixels when every cell is drawn `cell_size` pixels wide.
    pub fn pixel_size(&self, cell_size: f32) -> Result<(f32, f32), RenderingError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }

        Ok((
            self.bounds.width() as f32 * cell_size,
            self.bounds.height() as f32 * cell_size,
        ))
    }
}

/// Cell of the folded view posed in the root cell's frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FoldedCell {
    /// Grid position the cell occupies in the flat net.
    pub cell: Cell,
    /// Fill color of the owning piece.
    pub color: Color,
    /// Sides drawn with the thick outline.
    pub open_edges: OpenEdges,
    /// Transform from the cell's own frame into the root's frame.
    pub transform: Mat4,
    /// Posed centre of the cell.
    pub centre: Vec3,
    /// Posed face normal of the cell.
    pub normal: Vec3,
}

/// Hinge of the folded view.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FoldedHinge {
    /// Parent cell on the root side of the hinge.
    pub parent: Cell,
    /// Child cell rotated by the hinge.
    pub child: Cell,
    /// Direction from parent to child.
    pub direction: Direction,
    /// Rotation currently applied.
    pub rotation: HingeRotation,
}

/// Three-dimensional view of the net folded along its hinge tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FoldedPresentation {
    /// Factor the cells are posed for.
    pub factor: FoldFactor,
    /// Cells in hinge-tree order, root first.
    pub cells: Vec<FoldedCell>,
    /// Hinges in discovery order.
    pub hinges: Vec<FoldedHinge>,
    /// Distance the camera keeps from the root along each axis.
    pub camera_distance: f32,
}

impl FoldedPresentation {
    /// Poses every cell of `tree` using the transforms from `pose`.
    #[must_use]
    pub fn new(tiling: &Tiling, tree: &HingeTree, pose: &FoldPose) -> Self {
        let cells = tree
            .nodes()
            .iter()
            .zip(pose.transforms())
            .map(|(node, transform)| FoldedCell {
                cell: node.cell,
                color: node.color.into(),
                open_edges: OpenEdges::of(tiling, node.cell),
                transform: *transform,
                centre: transform.transform_point3(Vec3::ZERO),
                normal: transform.transform_vector3(Vec3::Z),
            })
            .collect();

        let hinges = tree
            .edges()
            .iter()
            .zip(pose.rotations())
            .filter_map(|(edge, rotation)| {
                let (parent, child) = tree.edge_cells(edge)?;
                Some(FoldedHinge {
                    parent,
                    child,
                    direction: edge.direction,
                    rotation: *rotation,
                })
            })
            .collect();

        Self {
            factor: pose.factor(),
            cells,
            hinges,
            camera_distance: camera_distance(tree.len()),
        }
    }

    /// Root cell of the folded view.
    #[must_use]
    pub fn root(&self) -> Option<Cell> {
        self.cells.first().map(|folded| folded.cell)
    }
}

/// Camera distance that keeps a net of `cell_count` cells in view.
#[must_use]
pub fn camera_distance(cell_count: usize) -> f32 {
    ((cell_count as f32).sqrt() * CAMERA_DISTANCE_PER_CELL).max(MIN_CAMERA_DISTANCE)
}

/// Row of the piece inventory.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct InventoryEntry {
    /// One-based position in placement order.
    pub index: usize,
    /// Template name of the piece.
    pub name: &'static str,
    /// Fill color of the piece.
    pub color: Color,
    /// Hex notation of the fill color.
    pub hex: PieceHex,
    /// Number of cells the piece covers.
    pub cells: usize,
}

/// `#rrggbb` notation of a piece color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PieceHex(PieceColor);

impl fmt::Display for PieceHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.hex())
    }
}

impl Serialize for PieceHex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Lists the placed pieces in placement order.
#[must_use]
pub fn inventory(tiling: &Tiling) -> Vec<InventoryEntry> {
    tiling
        .pieces()
        .iter()
        .enumerate()
        .map(|(index, piece)| InventoryEntry {
            index: index + 1,
            name: piece.name(),
            color: piece.color().into(),
            hex: PieceHex(piece.color()),
            cells: piece.cells().len(),
        })
        .collect()
}

/// Human-readable fold factor shown next to the fold control.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FoldReadout {
    /// Factor being described.
    pub factor: FoldFactor,
    /// Rounded magnitude in percent.
    pub percent: u32,
}

impl FoldReadout {
    /// Describes `factor`.
    #[must_use]
    pub fn new(factor: FoldFactor) -> Self {
        // Halves round toward positive infinity before the sign is dropped.
        let percent = (factor.get() * 100.0 + 0.5).floor().abs() as u32;
        Self { factor, percent }
    }
}

impl fmt::Display for FoldReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.factor.get();
        if value > 0.0 {
            write!(f, "In: {}%", self.percent)
        } else if value < 0.0 {
            write!(f, "Out: {}%", self.percent)
        } else {
            write!(f, "{}%", self.percent)
        }
    }
}

/// Scene description combining every view of the current net.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    /// Seeds that produced the net.
    pub seeds: SeedTrail,
    /// Flat view of the net.
    pub board: BoardPresentation,
    /// Placed pieces in order.
    pub inventory: Vec<InventoryEntry>,
    /// Folded view of the net.
    pub folded: FoldedPresentation,
    /// Readout of the active fold factor.
    pub fold: FoldReadout,
}

impl Scene {
    /// Builds every view of `tiling` posed by `pose`.
    #[must_use]
    pub fn new(tiling: &Tiling, tree: &HingeTree, pose: &FoldPose) -> Self {
        Self {
            seeds: tiling.seeds(),
            board: BoardPresentation::new(tiling),
            inventory: inventory(tiling),
            folded: FoldedPresentation::new(tiling, tree, pose),
            fold: FoldReadout::new(pose.factor()),
        }
    }
}

/// Rendering backend capable of presenting manifold net scenes.
pub trait RenderingBackend {
    /// Presents a single scene.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// Cells must be drawn with a positive, finite size.
    #[error("cell size must be positive (received {cell_size})")]
    InvalidCellSize {
        /// Provided size that failed validation.
        cell_size: f32,
    },
}
