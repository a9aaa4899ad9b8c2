#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system deriving the hinge tree that folding animates.
//!
//! The tree is a breadth-first spanning tree over the 4-neighbour adjacency of
//! the occupied cells. It is rooted at the cell closest to the centroid and
//! every hinge records the direction from parent to child. The tree is a view
//! over the tiling and is rebuilt, never patched, when the tiling changes.

use std::collections::{HashMap, VecDeque};

use manifold_net_core::{Cell, Direction, HingeEdge, HingeNode, HingeTree, PieceColor, Tiling};

/// Builds the hinge tree spanning every occupied cell of `tiling`.
#[must_use]
pub fn build(tiling: &Tiling) -> HingeTree {
    let owners: HashMap<Cell, (usize, PieceColor)> = tiling
        .pieces()
        .iter()
        .enumerate()
        .flat_map(|(index, piece)| {
            piece
                .cells()
                .iter()
                .map(move |cell| (*cell, (index, piece.color())))
        })
        .collect();

    let Some(root) = select_root(tiling.placed_cells().map(|(_, cell)| cell)) else {
        return HingeTree::default();
    };
    let Some(&(root_piece, root_color)) = owners.get(&root) else {
        return HingeTree::default();
    };

    let mut nodes = vec![HingeNode {
        cell: root,
        piece: root_piece,
        color: root_color,
        depth: 0,
        parent_edge: None,
    }];
    let mut edges = Vec::with_capacity(owners.len().saturating_sub(1));
    let mut visited = HashMap::with_capacity(owners.len());
    let _ = visited.insert(root, 0_usize);
    let mut queue = VecDeque::from([0_usize]);

    while let Some(current) = queue.pop_front() {
        let Some(parent) = nodes.get(current).copied() else {
            continue;
        };

        for direction in Direction::ALL {
            let cell = parent.cell.neighbor(direction);
            let Some(&(piece, color)) = owners.get(&cell) else {
                continue;
            };
            if visited.contains_key(&cell) {
                continue;
            }

            let child = nodes.len();
            let _ = visited.insert(cell, child);
            edges.push(HingeEdge {
                parent: current,
                child,
                direction,
            });
            nodes.push(HingeNode {
                cell,
                piece,
                color,
                depth: parent.depth + 1,
                parent_edge: Some(edges.len() - 1),
            });
            queue.push_back(child);
        }
    }

    HingeTree::from_parts(nodes, edges)
}

/// Picks the cell nearest the centroid of `cells`.
///
/// Distances are compared exactly as `(n·x − Σx)² + (n·y − Σy)²`, which orders
/// cells like their Euclidean distance to the centroid. Ties go to the cell
/// that appears first, i.e. the earliest placed.
#[must_use]
pub fn select_root<I>(cells: I) -> Option<Cell>
where
    I: IntoIterator<Item = Cell>,
{
    let cells: Vec<Cell> = cells.into_iter().collect();
    let count = i64::try_from(cells.len()).ok()?;
    let sum_x: i64 = cells.iter().map(|cell| i64::from(cell.x())).sum();
    let sum_y: i64 = cells.iter().map(|cell| i64::from(cell.y())).sum();

    cells.into_iter().min_by_key(|cell| {
        let dx = count * i64::from(cell.x()) - sum_x;
        let dy = count * i64::from(cell.y()) - sum_y;
        dx * dx + dy * dy
    })
}
