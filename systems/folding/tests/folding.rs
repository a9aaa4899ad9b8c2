use glam::{Mat4, Vec3};
use manifold_net_core::{
    Cell, Direction, FoldFactor, GenerationRequest, HingeEdge, HingeNode, HingeTree, PieceColor,
    PieceCount,
};
use manifold_net_system_assembly::assemble;
use manifold_net_system_folding::{edge_offset, pose};
use manifold_net_system_hinge_tree::build;

const EPSILON: f32 = 1e-5;

fn generated_tree(seed: u32, pieces: usize) -> HingeTree {
    let count = PieceCount::new(pieces).expect("valid piece count");
    let tiling = assemble(&GenerationRequest::new(seed, count)).expect("generation succeeds");
    build(&tiling)
}

fn pair(direction: Direction) -> HingeTree {
    let root = Cell::new(0, 0);
    let node = |cell: Cell, depth: u32, parent_edge: Option<usize>| HingeNode {
        cell,
        piece: 0,
        color: PieceColor::for_placement(0),
        depth,
        parent_edge,
    };
    HingeTree::from_parts(
        vec![node(root, 0, None), node(root.neighbor(direction), 1, Some(0))],
        vec![HingeEdge {
            parent: 0,
            child: 1,
            direction,
        }],
    )
}

fn assert_close(actual: Vec3, expected: Vec3) {
    assert!(
        actual.abs_diff_eq(expected, EPSILON),
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn flat_pose_is_pure_translation_from_root() {
    let tree = generated_tree(1234, 6);
    let flat = pose(&tree, FoldFactor::FLAT);
    let root = tree.root().expect("tree has a root").cell;

    assert_eq!(flat.transforms().len(), tree.len());
    for (index, node) in tree.nodes().iter().enumerate() {
        let offset = Vec3::new(
            (node.cell.x() - root.x()) as f32,
            (node.cell.y() - root.y()) as f32,
            0.0,
        );
        assert!(flat.transforms()[index].abs_diff_eq(Mat4::from_translation(offset), EPSILON));
        assert_close(flat.normal(index).expect("node exists"), Vec3::Z);
    }
}

#[test]
fn closed_fold_lifts_children_off_the_plane() {
    let expectations = [
        (Direction::East, Vec3::new(0.5, 0.0, -0.5)),
        (Direction::West, Vec3::new(-0.5, 0.0, -0.5)),
        (Direction::South, Vec3::new(0.0, 0.5, 0.5)),
        (Direction::North, Vec3::new(0.0, -0.5, 0.5)),
    ];

    for (direction, centre) in expectations {
        let closed = pose(&pair(direction), FoldFactor::CLOSED);
        assert_close(closed.centre(0).expect("root exists"), Vec3::ZERO);
        assert_close(closed.centre(1).expect("child exists"), centre);
    }
}

#[test]
fn spiked_fold_mirrors_closed_fold_through_the_plane() {
    for direction in Direction::ALL {
        let tree = pair(direction);
        let closed = pose(&tree, FoldFactor::CLOSED).centre(1).expect("child exists");
        let spiked = pose(&tree, FoldFactor::SPIKED).centre(1).expect("child exists");
        assert_close(spiked, Vec3::new(closed.x, closed.y, -closed.z));
    }
}

#[test]
fn shared_edges_stay_shared_at_every_factor() {
    let tree = generated_tree(42, 10);

    for step in -10..=10 {
        let factor = FoldFactor::saturating(step as f32 / 10.0);
        let folded = pose(&tree, factor);

        for edge in tree.edges() {
            let offset = edge_offset(edge.direction);
            let from_parent = folded.transforms()[edge.parent].transform_point3(offset);
            let from_child = folded.transforms()[edge.child].transform_point3(-offset);
            assert_close(from_parent, from_child);
        }
    }
}

#[test]
fn poses_depend_only_on_the_current_factor() {
    let tree = generated_tree(1234, 6);
    let factor = FoldFactor::new(0.3).expect("in range");

    let first = pose(&tree, factor);
    let _ = pose(&tree, FoldFactor::new(-0.7).expect("in range"));
    let again = pose(&tree, factor);

    assert_eq!(first, again);
    assert_eq!(first.rotations().len(), tree.edges().len());
}

#[test]
fn world_transforms_compose_local_hinges() {
    let tree = generated_tree(7, 8);
    let folded = pose(&tree, FoldFactor::new(0.55).expect("in range"));

    for edge in tree.edges() {
        let composed = folded.transforms()[edge.parent] * folded.locals()[edge.child];
        assert!(composed.abs_diff_eq(folded.transforms()[edge.child], EPSILON));
    }
    assert_eq!(folded.locals()[0], Mat4::IDENTITY);
}
