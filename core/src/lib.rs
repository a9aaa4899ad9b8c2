#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the manifold net generator.
//!
//! This crate defines the data model that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing the desired net, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. Systems never own state: they turn a [`GenerationRequest`] into a
//! [`Tiling`], a tiling into a [`HingeTree`], and a tree plus a [`FoldFactor`]
//! into per-hinge rotations.

use std::collections::BTreeSet;
use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seed used when no seed was supplied by the control surface.
pub const DEFAULT_SEED: u32 = 1234;

/// Piece count used when no count was supplied by the control surface.
pub const DEFAULT_PIECE_COUNT: usize = 6;

/// Exclusive upper bound for seeds drawn when the user asks for a fresh net.
pub const RANDOM_SEED_CEILING: u32 = 1_000_000;

/// Offset added to the seed whenever a whole generation attempt is discarded.
pub const RESEED_STEP: u32 = 777;

/// Number of randomized placement trials granted to every template.
pub const DEFAULT_PLACEMENT_TRIALS: u32 = 100;

/// Number of reseeds tolerated before generation is reported as failed.
pub const DEFAULT_MAX_RESEEDS: u32 = 256;

/// Smallest piece count accepted by interactive control surfaces.
pub const MIN_INTERACTIVE_PIECES: usize = 2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the current net with a freshly generated one.
    Generate {
        /// Seed, piece count and limits driving the assembler.
        request: GenerationRequest,
    },
    /// Updates how far every hinge of the current net is folded.
    SetFoldFactor {
        /// Fold factor that should become active.
        factor: FoldFactor,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new net was assembled and its hinge tree derived.
    TilingGenerated {
        /// Seed that was originally requested.
        requested_seed: u32,
        /// Seed of the attempt that produced the net.
        seed: u32,
        /// Number of discarded attempts before the successful one.
        reseeds: u32,
        /// Number of pieces placed.
        pieces: usize,
        /// Number of occupied cells.
        cells: usize,
    },
    /// Reports that a generation request could not be satisfied.
    GenerationRejected {
        /// Specific reason generation failed.
        error: GenerationError,
    },
    /// Announces the fold factor that is now active.
    FoldFactorChanged {
        /// Fold factor applied to every hinge.
        factor: FoldFactor,
    },
}

/// Cardinal directions on the grid, listed in the fixed visit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing `y`.
    North,
    /// Toward increasing `x`.
    East,
    /// Toward increasing `y`.
    South,
    /// Toward decreasing `x`.
    West,
}

impl Direction {
    /// Every direction in the order used for port derivation and traversal.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit grid step taken when moving one cell in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Direction after a quarter turn, matching [`Cell::rotated_quarter`].
    #[must_use]
    pub const fn rotated_quarter(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Single-letter label used in textual output.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::North => 'N',
            Self::East => 'E',
            Self::South => 'S',
            Self::West => 'W',
        }
    }
}

/// Location of a single cell on the unbounded grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the cell; `y` grows southwards.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Cell shifted by the provided offsets.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Adjacent cell one step away in `direction`.
    #[must_use]
    pub const fn neighbor(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.translated(dx, dy)
    }

    /// Quarter turn about the origin, mapping `(x, y)` to `(-y, x)`.
    #[must_use]
    pub const fn rotated_quarter(self) -> Self {
        Self::new(-self.y, self.x)
    }
}

/// Open edge of a shape: a cell side with no same-shape neighbour behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    cell: Cell,
    direction: Direction,
}

impl Port {
    /// Creates a port on `cell` facing `direction`.
    #[must_use]
    pub const fn new(cell: Cell, direction: Direction) -> Self {
        Self { cell, direction }
    }

    /// Cell that owns the open edge.
    #[must_use]
    pub const fn cell(&self) -> Cell {
        self.cell
    }

    /// Side of the cell the edge lies on.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Cell on the far side of the open edge.
    #[must_use]
    pub const fn facing(&self) -> Cell {
        self.cell.neighbor(self.direction)
    }

    /// Port shifted by the provided offsets.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.cell.translated(dx, dy), self.direction)
    }
}

/// Names of the fixed polyomino templates, in catalogue order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TemplateKind {
    /// Straight tromino.
    I3,
    /// Bent tromino.
    L3,
    /// Square tetromino.
    O4,
    /// T tetromino.
    T4,
    /// S tetromino.
    S4,
    /// Z tetromino.
    Z4,
    /// J tetromino.
    J4,
    /// L tetromino.
    L4,
    /// Plus-shaped pentomino.
    P5,
    /// U pentomino.
    U5,
}

impl TemplateKind {
    /// Complete catalogue in its canonical order.
    pub const ALL: [TemplateKind; 10] = [
        TemplateKind::I3,
        TemplateKind::L3,
        TemplateKind::O4,
        TemplateKind::T4,
        TemplateKind::S4,
        TemplateKind::Z4,
        TemplateKind::J4,
        TemplateKind::L4,
        TemplateKind::P5,
        TemplateKind::U5,
    ];

    /// Number of templates in the catalogue.
    pub const COUNT: usize = Self::ALL.len();

    /// Display name of the template.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::I3 => "I3",
            Self::L3 => "L3",
            Self::O4 => "O4",
            Self::T4 => "T4",
            Self::S4 => "S4",
            Self::Z4 => "Z4",
            Self::J4 => "J4",
            Self::L4 => "L4",
            Self::P5 => "P5",
            Self::U5 => "U5",
        }
    }
}

/// Display color assigned to a placed piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl PieceColor {
    /// Palette cycled through by placement index.
    pub const PALETTE: [PieceColor; 8] = [
        PieceColor::from_rgb(0x63, 0x66, 0xf1),
        PieceColor::from_rgb(0xf4, 0x3f, 0x5e),
        PieceColor::from_rgb(0xf5, 0x9e, 0x0b),
        PieceColor::from_rgb(0x10, 0xb9, 0x81),
        PieceColor::from_rgb(0x0e, 0xa5, 0xe9),
        PieceColor::from_rgb(0x8b, 0x5c, 0xf6),
        PieceColor::from_rgb(0xd9, 0x46, 0xef),
        PieceColor::from_rgb(0xf9, 0x73, 0x16),
    ];

    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Palette entry for the piece placed at `index`.
    #[must_use]
    pub const fn for_placement(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// CSS-style `#rrggbb` representation.
    #[must_use]
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Template instantiated at world coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    kind: TemplateKind,
    cells: Vec<Cell>,
    color: PieceColor,
}

impl Piece {
    /// Creates a piece from its template, world cells and color.
    #[must_use]
    pub fn new(kind: TemplateKind, cells: Vec<Cell>, color: PieceColor) -> Self {
        Self { kind, cells, color }
    }

    /// Template the piece was cut from.
    #[must_use]
    pub const fn kind(&self) -> TemplateKind {
        self.kind
    }

    /// Display name of the piece.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// World cells covered by the piece, in template order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Color assigned at placement time.
    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.color
    }
}

/// Matched port pair recorded when a piece was attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Joint {
    /// Index of the piece that was attached.
    pub piece: usize,
    /// Open port of the existing net the piece was attached to.
    pub target: Port,
    /// Port of the attached piece, expressed in world coordinates.
    pub mate: Port,
}

/// Seeds consumed while producing a tiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedTrail {
    /// Seed that was originally requested.
    pub requested: u32,
    /// Seed of the attempt that succeeded.
    pub effective: u32,
    /// Number of discarded attempts.
    pub reseeds: u32,
}

/// Assembled net: ordered pieces plus the set of cells they cover.
///
/// Every cell of every piece appears exactly once in the occupied set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tiling {
    pieces: Vec<Piece>,
    occupied: BTreeSet<Cell>,
    joints: Vec<Joint>,
    open_ports: Vec<Port>,
    seeds: SeedTrail,
}

impl Tiling {
    /// Assembles a tiling from already validated parts.
    #[must_use]
    pub fn from_parts(
        pieces: Vec<Piece>,
        occupied: BTreeSet<Cell>,
        joints: Vec<Joint>,
        open_ports: Vec<Port>,
        seeds: SeedTrail,
    ) -> Self {
        Self {
            pieces,
            occupied,
            joints,
            open_ports,
            seeds,
        }
    }

    /// Pieces in placement order.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// All occupied cells.
    #[must_use]
    pub fn occupied(&self) -> &BTreeSet<Cell> {
        &self.occupied
    }

    /// Port pairs matched while attaching pieces, one per piece after the first.
    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Ports still facing empty cells after the last placement.
    #[must_use]
    pub fn open_ports(&self) -> &[Port] {
        &self.open_ports
    }

    /// Seeds consumed while producing the tiling.
    #[must_use]
    pub const fn seeds(&self) -> SeedTrail {
        self.seeds
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.occupied.len()
    }

    /// Reports whether the tiling holds no pieces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Reports whether `cell` is covered by any piece.
    #[must_use]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupied.contains(&cell)
    }

    /// Cells paired with the index of their piece, in placement order.
    pub fn placed_cells(&self) -> impl Iterator<Item = (usize, Cell)> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .flat_map(|(index, piece)| piece.cells().iter().map(move |cell| (index, *cell)))
    }
}

/// Number of pieces requested for a net, validated against the catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceCount(usize);

impl PieceCount {
    /// Validates the requested count.
    ///
    /// Every piece uses a distinct template, so counts above the catalogue
    /// size are as degenerate as a count of zero.
    pub fn new(requested: usize) -> Result<Self, GenerationError> {
        if requested == 0 || requested > TemplateKind::COUNT {
            return Err(GenerationError::InvalidPieceCount {
                requested,
                max: TemplateKind::COUNT,
            });
        }
        Ok(Self(requested))
    }

    /// Retrieves the validated count.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Tunables bounding the assembler's search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssemblyLimits {
    /// Placement trials granted to each template before the attempt is discarded.
    pub placement_trials: u32,
    /// Discarded attempts tolerated before generation fails.
    pub max_reseeds: u32,
}

impl Default for AssemblyLimits {
    fn default() -> Self {
        Self {
            placement_trials: DEFAULT_PLACEMENT_TRIALS,
            max_reseeds: DEFAULT_MAX_RESEEDS,
        }
    }
}

/// Complete input of one generation call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GenerationRequest {
    /// Seed of the first attempt.
    pub seed: u32,
    /// Number of pieces to place.
    pub piece_count: PieceCount,
    /// Search bounds.
    pub limits: AssemblyLimits,
}

impl GenerationRequest {
    /// Creates a request using the default search bounds.
    #[must_use]
    pub fn new(seed: u32, piece_count: PieceCount) -> Self {
        Self {
            seed,
            piece_count,
            limits: AssemblyLimits::default(),
        }
    }

    /// Replaces the search bounds.
    #[must_use]
    pub const fn with_limits(mut self, limits: AssemblyLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Reasons a generation request may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum GenerationError {
    /// The piece count is zero or exceeds the template catalogue.
    #[error("piece count {requested} is outside the supported range 1..={max}")]
    InvalidPieceCount {
        /// Count that failed validation.
        requested: usize,
        /// Largest count the catalogue can satisfy.
        max: usize,
    },
    /// Every attempt up to the retry ceiling failed to place all pieces.
    #[error("no net could be assembled after {attempts} attempts (last seed {last_seed})")]
    Exhausted {
        /// Seed of the final attempt.
        last_seed: u32,
        /// Total attempts made, including the first.
        attempts: u32,
    },
}

/// Scalar controlling how far every hinge is folded.
///
/// Positive values fold toward the closed form, negative values toward the
/// spiked form, and zero is the flat net.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct FoldFactor(f32);

impl FoldFactor {
    /// Flat, unfolded net.
    pub const FLAT: FoldFactor = FoldFactor(0.0);

    /// Fully folded toward the closed form.
    pub const CLOSED: FoldFactor = FoldFactor(1.0);

    /// Fully folded toward the spiked form.
    pub const SPIKED: FoldFactor = FoldFactor(-1.0);

    /// Validates a fold factor.
    pub fn new(value: f32) -> Result<Self, FoldError> {
        if !value.is_finite() {
            return Err(FoldError::NotFinite);
        }
        if !(-1.0..=1.0).contains(&value) {
            return Err(FoldError::OutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Clamps arbitrary input into range; non-finite input yields the flat net.
    #[must_use]
    pub fn saturating(value: f32) -> Self {
        if value.is_nan() {
            return Self::FLAT;
        }
        Self(value.clamp(-1.0, 1.0))
    }

    /// Retrieves the raw factor.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }

    /// Hinge angle in radians: a quarter turn at either extreme.
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.0 * FRAC_PI_2
    }
}

impl TryFrom<f32> for FoldFactor {
    type Error = FoldError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FoldFactor> for f32 {
    fn from(factor: FoldFactor) -> Self {
        factor.0
    }
}

/// Reasons a fold factor may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum FoldError {
    /// The factor was NaN or infinite.
    #[error("fold factor must be a finite number")]
    NotFinite,
    /// The factor lies outside `-1.0..=1.0`.
    #[error("fold factor {value} is outside -1..=1")]
    OutOfRange {
        /// Value that failed validation.
        value: f32,
    },
}

/// Local axis a hinge rotates about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HingeAxis {
    /// Lateral axis, used by north and south hinges.
    X,
    /// Other in-plane axis, used by east and west hinges.
    Y,
}

/// Rotation applied at a single hinge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HingeRotation {
    /// Axis of rotation in the parent cell's frame.
    pub axis: HingeAxis,
    /// Signed rotation angle.
    pub radians: f32,
}

/// Cell in the hinge tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HingeNode {
    /// Grid cell represented by the node.
    pub cell: Cell,
    /// Index of the piece that owns the cell.
    pub piece: usize,
    /// Color of the owning piece.
    pub color: PieceColor,
    /// Number of hinges between the node and the root.
    pub depth: u32,
    /// Index of the hinge connecting the node to its parent; `None` for the root.
    pub parent_edge: Option<usize>,
}

/// Parent-to-child hinge between two adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HingeEdge {
    /// Node index of the parent.
    pub parent: usize,
    /// Node index of the child.
    pub child: usize,
    /// Direction from the parent cell to the child cell.
    pub direction: Direction,
}

/// Spanning tree over the occupied cells of a tiling.
///
/// Nodes are stored in breadth-first order so every parent precedes its
/// children and the root, when present, is node zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HingeTree {
    nodes: Vec<HingeNode>,
    edges: Vec<HingeEdge>,
}

impl HingeTree {
    /// Wraps breadth-first ordered nodes and their hinges.
    #[must_use]
    pub fn from_parts(nodes: Vec<HingeNode>, edges: Vec<HingeEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Root node, absent for an empty tiling.
    #[must_use]
    pub fn root(&self) -> Option<&HingeNode> {
        self.nodes.first()
    }

    /// Nodes in breadth-first order.
    #[must_use]
    pub fn nodes(&self) -> &[HingeNode] {
        &self.nodes
    }

    /// Hinges in the order they were discovered.
    #[must_use]
    pub fn edges(&self) -> &[HingeEdge] {
        &self.edges
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Reports whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index of the node representing `cell`, if any.
    #[must_use]
    pub fn node_index(&self, cell: Cell) -> Option<usize> {
        self.nodes.iter().position(|node| node.cell == cell)
    }

    /// Parent and child cells joined by `edge`.
    #[must_use]
    pub fn edge_cells(&self, edge: &HingeEdge) -> Option<(Cell, Cell)> {
        let parent = self.nodes.get(edge.parent)?;
        let child = self.nodes.get(edge.child)?;
        Some((parent.cell, child.cell))
    }

    /// Hinges leaving the node at `index`.
    pub fn children(&self, index: usize) -> impl Iterator<Item = &HingeEdge> + '_ {
        self.edges.iter().filter(move |edge| edge.parent == index)
    }
}
