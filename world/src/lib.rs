#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative state for the manifold net generator.
//!
//! The world owns the currently displayed net: the request that produced it,
//! the placed pieces, the hinge tree derived from them, and the active fold
//! factor. Adapters mutate it exclusively through [`apply`] and read it
//! through the [`query`] module.

use log::info;
use manifold_net_core::{Command, Event, FoldFactor, GenerationRequest, HingeTree, Tiling};
use manifold_net_system_assembly::assemble;
use manifold_net_system_hinge_tree::build;

/// Net currently installed in the world together with its derived hinge tree.
#[derive(Clone, Debug, PartialEq)]
struct Layout {
    request: GenerationRequest,
    tiling: Tiling,
    hinge_tree: HingeTree,
}

/// Represents the authoritative manifold net state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct World {
    layout: Option<Layout>,
    fold_factor: FoldFactor,
}

impl World {
    /// Creates an empty world with no net and a flat fold factor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn install(&mut self, request: GenerationRequest, tiling: Tiling) {
        let hinge_tree = build(&tiling);
        let seeds = tiling.seeds();
        info!(
            "installed net from seed {} (effective {}, {} reseeds): {} pieces, {} cells",
            seeds.requested,
            seeds.effective,
            seeds.reseeds,
            tiling.pieces().len(),
            tiling.cell_count()
        );

        self.layout = Some(Layout {
            request,
            tiling,
            hinge_tree,
        });
        self.fold_factor = FoldFactor::FLAT;
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Generate { request } => match assemble(&request) {
            Ok(tiling) => {
                let seeds = tiling.seeds();
                let pieces = tiling.pieces().len();
                let cells = tiling.cell_count();
                world.install(request, tiling);

                out_events.push(Event::TilingGenerated {
                    requested_seed: seeds.requested,
                    seed: seeds.effective,
                    reseeds: seeds.reseeds,
                    pieces,
                    cells,
                });
                out_events.push(Event::FoldFactorChanged {
                    factor: world.fold_factor,
                });
            }
            Err(error) => out_events.push(Event::GenerationRejected { error }),
        },
        Command::SetFoldFactor { factor } => {
            world.fold_factor = factor;
            out_events.push(Event::FoldFactorChanged { factor });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use manifold_net_core::{FoldFactor, GenerationRequest, HingeTree, Tiling};
    use manifold_net_system_folding::{pose, FoldPose};

    /// Request that produced the current net, if any.
    #[must_use]
    pub fn request(world: &World) -> Option<GenerationRequest> {
        world.layout.as_ref().map(|layout| layout.request)
    }

    /// Pieces and ports of the current net.
    #[must_use]
    pub fn tiling(world: &World) -> Option<&Tiling> {
        world.layout.as_ref().map(|layout| &layout.tiling)
    }

    /// Hinge tree spanning the current net.
    #[must_use]
    pub fn hinge_tree(world: &World) -> Option<&HingeTree> {
        world.layout.as_ref().map(|layout| &layout.hinge_tree)
    }

    /// Fold factor currently applied to every hinge.
    #[must_use]
    pub const fn fold_factor(world: &World) -> FoldFactor {
        world.fold_factor
    }

    /// Per-cell transforms of the current net at the active fold factor.
    #[must_use]
    pub fn fold_pose(world: &World) -> Option<FoldPose> {
        hinge_tree(world).map(|tree| pose(tree, world.fold_factor))
    }
}
