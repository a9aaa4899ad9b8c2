#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fold transform turning a fold factor into per-hinge rotations and per-cell poses.
//!
//! Every hinge rotates the subtree below it about an axis chosen by the
//! hinge's direction. Poses are computed from scratch for each factor by
//! composing ancestor transforms along the path from the root, so nothing
//! about a previous factor leaks into the next one.

use glam::{Mat4, Quat, Vec3};
use manifold_net_core::{Direction, FoldFactor, HingeAxis, HingeRotation, HingeTree};

/// Distance from a cell's centre to any of its edges.
pub const HALF_CELL: f32 = 0.5;

/// Rotation of a single hinge for the provided factor.
///
/// North hinges turn about the lateral axis by `-angle`, south hinges by
/// `+angle`; east hinges turn about the other in-plane axis by `+angle` and
/// west hinges by `-angle`.
#[must_use]
pub fn hinge_rotation(direction: Direction, factor: FoldFactor) -> HingeRotation {
    let angle = factor.angle();
    let (axis, radians) = match direction {
        Direction::North => (HingeAxis::X, -angle),
        Direction::South => (HingeAxis::X, angle),
        Direction::East => (HingeAxis::Y, angle),
        Direction::West => (HingeAxis::Y, -angle),
    };
    HingeRotation { axis, radians }
}

/// Quaternion equivalent of a hinge rotation.
#[must_use]
pub fn rotation_quat(rotation: HingeRotation) -> Quat {
    match rotation.axis {
        HingeAxis::X => Quat::from_rotation_x(rotation.radians),
        HingeAxis::Y => Quat::from_rotation_y(rotation.radians),
    }
}

/// Offset from a cell centre to the middle of its `direction` edge.
#[must_use]
pub fn edge_offset(direction: Direction) -> Vec3 {
    let (dx, dy) = direction.delta();
    Vec3::new(dx as f32 * HALF_CELL, dy as f32 * HALF_CELL, 0.0)
}

/// Child frame expressed in its parent's frame: move to the shared edge,
/// rotate, then move on to the child's centre.
#[must_use]
pub fn hinge_transform(direction: Direction, rotation: HingeRotation) -> Mat4 {
    let offset = Mat4::from_translation(edge_offset(direction));
    offset * Mat4::from_quat(rotation_quat(rotation)) * offset
}

/// Transforms of every node of a hinge tree for one fold factor.
#[derive(Clone, Debug, PartialEq)]
pub struct FoldPose {
    factor: FoldFactor,
    rotations: Vec<HingeRotation>,
    locals: Vec<Mat4>,
    transforms: Vec<Mat4>,
}

impl FoldPose {
    /// Factor the pose was computed for.
    #[must_use]
    pub const fn factor(&self) -> FoldFactor {
        self.factor
    }

    /// Rotation of every hinge, indexed like [`HingeTree::edges`].
    #[must_use]
    pub fn rotations(&self) -> &[HingeRotation] {
        &self.rotations
    }

    /// Node transforms relative to their parent node, indexed like [`HingeTree::nodes`].
    ///
    /// The root's entry is the identity. Renderers that keep a nested scene
    /// graph consume these.
    #[must_use]
    pub fn locals(&self) -> &[Mat4] {
        &self.locals
    }

    /// Node transforms relative to the root cell's frame, indexed like [`HingeTree::nodes`].
    #[must_use]
    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    /// Centre of the node at `index` in the root's frame.
    #[must_use]
    pub fn centre(&self, index: usize) -> Option<Vec3> {
        self.transforms
            .get(index)
            .map(|transform| transform.transform_point3(Vec3::ZERO))
    }

    /// Face normal of the node at `index` in the root's frame.
    #[must_use]
    pub fn normal(&self, index: usize) -> Option<Vec3> {
        self.transforms
            .get(index)
            .map(|transform| transform.transform_vector3(Vec3::Z))
    }
}

/// Computes the pose of `tree` folded by `factor`.
#[must_use]
pub fn pose(tree: &HingeTree, factor: FoldFactor) -> FoldPose {
    let rotations: Vec<HingeRotation> = tree
        .edges()
        .iter()
        .map(|edge| hinge_rotation(edge.direction, factor))
        .collect();

    let mut locals = Vec::with_capacity(tree.len());
    let mut transforms: Vec<Mat4> = Vec::with_capacity(tree.len());

    for node in tree.nodes() {
        let hinge = node
            .parent_edge
            .and_then(|index| Some((tree.edges().get(index)?, rotations.get(index)?)));

        let (local, transform) = match hinge {
            Some((edge, rotation)) => {
                let local = hinge_transform(edge.direction, *rotation);
                let parent = transforms
                    .get(edge.parent)
                    .copied()
                    .unwrap_or(Mat4::IDENTITY);
                (local, parent * local)
            }
            None => (Mat4::IDENTITY, Mat4::IDENTITY),
        };

        locals.push(local);
        transforms.push(transform);
    }

    FoldPose {
        factor,
        rotations,
        locals,
        transforms,
    }
}
