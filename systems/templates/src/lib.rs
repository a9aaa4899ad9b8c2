#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed polyomino catalogue, port derivation and quarter-turn transforms.

use std::collections::HashSet;

use manifold_net_core::{Cell, Direction, Port, TemplateKind};

const I3_CELLS: &[Cell] = &[Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)];
const L3_CELLS: &[Cell] = &[Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)];
const O4_CELLS: &[Cell] = &[
    Cell::new(0, 0),
    Cell::new(1, 0),
    Cell::new(0, 1),
    Cell::new(1, 1),
];
const T4_CELLS: &[Cell] = &[
    Cell::new(0, 0),
    Cell::new(1, 0),
    Cell::new(2, 0),
    Cell::new(1, 1),
];
const S4_CELLS: &[Cell] = &[
    Cell::new(1, 0),
    Cell::new(2, 0),
    Cell::new(0, 1),
    Cell::new(1, 1),
];
const Z4_CELLS: &[Cell] = &[
    Cell::new(0, 0),
    Cell::new(1, 0),
    Cell::new(1, 1),
    Cell::new(2, 1),
];
const J4_CELLS: &[Cell] = &[
    Cell::new(0, 0),
    Cell::new(0, 1),
    Cell::new(0, 2),
    Cell::new(1, 2),
];
const L4_CELLS: &[Cell] = &[
    Cell::new(1, 0),
    Cell::new(1, 1),
    Cell::new(1, 2),
    Cell::new(0, 2),
];
const P5_CELLS: &[Cell] = &[
    Cell::new(1, 0),
    Cell::new(0, 1),
    Cell::new(1, 1),
    Cell::new(2, 1),
    Cell::new(1, 2),
];
const U5_CELLS: &[Cell] = &[
    Cell::new(0, 0),
    Cell::new(2, 0),
    Cell::new(0, 1),
    Cell::new(1, 1),
    Cell::new(2, 1),
];

/// Canonical local cells of a template, in their defining order.
#[must_use]
pub fn template_cells(kind: TemplateKind) -> &'static [Cell] {
    match kind {
        TemplateKind::I3 => I3_CELLS,
        TemplateKind::L3 => L3_CELLS,
        TemplateKind::O4 => O4_CELLS,
        TemplateKind::T4 => T4_CELLS,
        TemplateKind::S4 => S4_CELLS,
        TemplateKind::Z4 => Z4_CELLS,
        TemplateKind::J4 => J4_CELLS,
        TemplateKind::L4 => L4_CELLS,
        TemplateKind::P5 => P5_CELLS,
        TemplateKind::U5 => U5_CELLS,
    }
}

/// Emits one port for every cell side that does not touch another cell of the shape.
///
/// Ports are ordered by cell, then by [`Direction::ALL`].
#[must_use]
pub fn derive_ports(cells: &[Cell]) -> Vec<Port> {
    let members: HashSet<Cell> = cells.iter().copied().collect();
    cells
        .iter()
        .flat_map(|cell| {
            Direction::ALL
                .into_iter()
                .map(move |direction| Port::new(*cell, direction))
        })
        .filter(|port| !members.contains(&port.facing()))
        .collect()
}

/// Cells and open ports of a shape in local coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    cells: Vec<Cell>,
    ports: Vec<Port>,
}

impl Shape {
    /// Builds a shape from its cells, deriving the ports.
    #[must_use]
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        let ports = derive_ports(&cells);
        Self { cells, ports }
    }

    /// Cells of the shape.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Open ports of the shape.
    #[must_use]
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Ports lying on the `direction` side of their cell.
    pub fn ports_facing(&self, direction: Direction) -> impl Iterator<Item = &Port> + '_ {
        self.ports
            .iter()
            .filter(move |port| port.direction() == direction)
    }

    /// Quarter turn about the origin, renormalized so the minimum `x` and `y` are zero.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let cells: Vec<Cell> = self.cells.iter().map(|cell| cell.rotated_quarter()).collect();
        let min_x = cells.iter().map(Cell::x).min().unwrap_or(0);
        let min_y = cells.iter().map(Cell::y).min().unwrap_or(0);

        Self {
            cells: cells
                .into_iter()
                .map(|cell| cell.translated(-min_x, -min_y))
                .collect(),
            ports: self
                .ports
                .iter()
                .map(|port| {
                    Port::new(
                        port.cell().rotated_quarter().translated(-min_x, -min_y),
                        port.direction().rotated_quarter(),
                    )
                })
                .collect(),
        }
    }

    /// Applies [`Shape::rotated`] `quarter_turns` times.
    #[must_use]
    pub fn rotated_by(&self, quarter_turns: u8) -> Self {
        (0..quarter_turns % 4).fold(self.clone(), |shape, _| shape.rotated())
    }

    /// Shape shifted by the provided offsets.
    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            cells: self
                .cells
                .iter()
                .map(|cell| cell.translated(dx, dy))
                .collect(),
            ports: self
                .ports
                .iter()
                .map(|port| port.translated(dx, dy))
                .collect(),
        }
    }
}

/// Catalogue template in a particular orientation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Template {
    kind: TemplateKind,
    shape: Shape,
}

impl Template {
    /// Template in its canonical orientation.
    #[must_use]
    pub fn new(kind: TemplateKind) -> Self {
        Self {
            kind,
            shape: Shape::from_cells(template_cells(kind).to_vec()),
        }
    }

    /// Same template turned by `quarter_turns`.
    #[must_use]
    pub fn oriented(&self, quarter_turns: u8) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape.rotated_by(quarter_turns),
        }
    }

    /// Name of the template.
    #[must_use]
    pub const fn kind(&self) -> TemplateKind {
        self.kind
    }

    /// Cells and ports of the template.
    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }
}

/// Every template in catalogue order, canonically oriented.
#[must_use]
pub fn catalogue() -> Vec<Template> {
    TemplateKind::ALL.into_iter().map(Template::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports_follow_cell_then_direction_order() {
        let ports = derive_ports(template_cells(TemplateKind::I3));
        let expected = vec![
            Port::new(Cell::new(0, 0), Direction::North),
            Port::new(Cell::new(0, 0), Direction::South),
            Port::new(Cell::new(0, 0), Direction::West),
            Port::new(Cell::new(1, 0), Direction::North),
            Port::new(Cell::new(1, 0), Direction::South),
            Port::new(Cell::new(2, 0), Direction::North),
            Port::new(Cell::new(2, 0), Direction::East),
            Port::new(Cell::new(2, 0), Direction::South),
        ];
        assert_eq!(ports, expected);
    }

    #[test]
    fn port_count_matches_perimeter() {
        let counts: Vec<(TemplateKind, usize)> = catalogue()
            .iter()
            .map(|template| (template.kind(), template.shape().ports().len()))
            .collect();
        assert_eq!(
            counts,
            vec![
                (TemplateKind::I3, 8),
                (TemplateKind::L3, 8),
                (TemplateKind::O4, 8),
                (TemplateKind::T4, 10),
                (TemplateKind::S4, 10),
                (TemplateKind::Z4, 10),
                (TemplateKind::J4, 10),
                (TemplateKind::L4, 10),
                (TemplateKind::P5, 12),
                (TemplateKind::U5, 12),
            ]
        );
    }

    #[test]
    fn single_turn_stands_i3_upright() {
        let turned = Template::new(TemplateKind::I3).oriented(1);
        assert_eq!(
            turned.shape().cells(),
            &[Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)]
        );
        assert_eq!(turned.shape().ports_facing(Direction::East).count(), 3);
        assert_eq!(turned.shape().ports_facing(Direction::South).count(), 1);
    }

    #[test]
    fn empty_shape_rotates_to_empty_shape() {
        let shape = Shape::from_cells(Vec::new());
        assert_eq!(shape.rotated(), shape);
    }
}
