#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized assembler that grows a connected net from catalogue templates.
//!
//! Each attempt shuffles the catalogue, orients every chosen template with a
//! random quarter-turn count and attaches templates one at a time at randomly
//! chosen open ports. A template that cannot be attached within the trial
//! budget discards the whole attempt, which is then retried with the seed
//! advanced by [`RESEED_STEP`] until the retry ceiling is reached.

pub mod random;

use std::collections::BTreeSet;

use log::{debug, warn};
use manifold_net_core::{
    Cell, GenerationError, GenerationRequest, Joint, Piece, PieceColor, PieceCount, Port,
    SeedTrail, TemplateKind, Tiling, RESEED_STEP,
};
use manifold_net_system_templates::Template;

pub use random::Mulberry32;

/// Generates a net for `request`, reseeding after every failed attempt.
pub fn assemble(request: &GenerationRequest) -> Result<Tiling, GenerationError> {
    let mut seed = request.seed;

    for reseeds in 0..=request.limits.max_reseeds {
        if let Some(assembly) = attempt(
            seed,
            request.piece_count,
            request.limits.placement_trials,
        ) {
            return Ok(assembly.into_tiling(SeedTrail {
                requested: request.seed,
                effective: seed,
                reseeds,
            }));
        }

        if reseeds == request.limits.max_reseeds {
            break;
        }

        let next = seed.wrapping_add(RESEED_STEP);
        debug!("attempt with seed {seed} failed; reseeding with {next}");
        seed = next;
    }

    let attempts = request.limits.max_reseeds.saturating_add(1);
    warn!(
        "giving up after {attempts} attempts starting from seed {}",
        request.seed
    );
    Err(GenerationError::Exhausted {
        last_seed: seed,
        attempts,
    })
}

/// Single generation attempt; `None` when some template could not be attached.
fn attempt(seed: u32, piece_count: PieceCount, trials: u32) -> Option<Assembly> {
    let mut random = Mulberry32::new(seed);

    let mut order = TemplateKind::ALL;
    random.shuffle(&mut order);

    let mut chosen = order.into_iter().take(piece_count.get());
    let first = orient(chosen.next()?, &mut random);
    let mut assembly = Assembly::seeded(&first);

    for kind in chosen {
        let template = orient(kind, &mut random);
        assembly = assembly.attach(&template, trials, &mut random)?;
    }

    Some(assembly)
}

fn orient(kind: TemplateKind, random: &mut Mulberry32) -> Template {
    let quarter_turns = random.next_index(4) as u8;
    Template::new(kind).oriented(quarter_turns)
}

/// Accumulated state of one attempt, threaded by value through each placement.
#[derive(Clone, Debug)]
struct Assembly {
    pieces: Vec<Piece>,
    occupied: BTreeSet<Cell>,
    open_ports: Vec<Port>,
    joints: Vec<Joint>,
}

/// Translation that docks a template's port against an open port of the net.
#[derive(Clone, Copy, Debug)]
struct Placement {
    target_index: usize,
    target: Port,
    mate: Port,
    dx: i32,
    dy: i32,
}

impl Assembly {
    fn seeded(template: &Template) -> Self {
        let shape = template.shape();
        let cells = shape.cells().to_vec();

        Self {
            occupied: cells.iter().copied().collect(),
            open_ports: shape.ports().to_vec(),
            pieces: vec![Piece::new(
                template.kind(),
                cells,
                PieceColor::for_placement(0),
            )],
            joints: Vec::new(),
        }
    }

    fn attach(self, template: &Template, trials: u32, random: &mut Mulberry32) -> Option<Self> {
        for _ in 0..trials {
            if self.open_ports.is_empty() {
                return None;
            }

            if let Some(placement) = self.trial(template, random) {
                return Some(self.commit(template, placement));
            }
        }

        None
    }

    /// Draws a target port and a matching template port; `None` on no candidate or overlap.
    fn trial(&self, template: &Template, random: &mut Mulberry32) -> Option<Placement> {
        let target_index = random.next_index(self.open_ports.len());
        let target = *self.open_ports.get(target_index)?;
        let needed = target.direction().opposite();

        let candidates: Vec<&Port> = template.shape().ports_facing(needed).collect();
        if candidates.is_empty() {
            return None;
        }
        let mate = **candidates.get(random.next_index(candidates.len()))?;

        let anchor = target.facing();
        let dx = anchor.x() - mate.cell().x();
        let dy = anchor.y() - mate.cell().y();

        let overlaps = template
            .shape()
            .cells()
            .iter()
            .any(|cell| self.occupied.contains(&cell.translated(dx, dy)));
        if overlaps {
            return None;
        }

        Some(Placement {
            target_index,
            target,
            mate: mate.translated(dx, dy),
            dx,
            dy,
        })
    }

    fn commit(self, template: &Template, placement: Placement) -> Self {
        let placed = template.shape().translated(placement.dx, placement.dy);
        let index = self.pieces.len();

        let mut occupied = self.occupied;
        occupied.extend(placed.cells().iter().copied());

        let open_ports = self
            .open_ports
            .into_iter()
            .enumerate()
            .filter(|(position, _)| *position != placement.target_index)
            .map(|(_, port)| port)
            .chain(placed.ports().iter().copied())
            .filter(|port| !occupied.contains(&port.facing()))
            .collect();

        let mut pieces = self.pieces;
        pieces.push(Piece::new(
            template.kind(),
            placed.cells().to_vec(),
            PieceColor::for_placement(index),
        ));

        let mut joints = self.joints;
        joints.push(Joint {
            piece: index,
            target: placement.target,
            mate: placement.mate,
        });

        debug!(
            "placed {} as piece {index} at offset ({}, {})",
            template.kind().name(),
            placement.dx,
            placement.dy
        );

        Self {
            pieces,
            occupied,
            open_ports,
            joints,
        }
    }

    fn into_tiling(self, seeds: SeedTrail) -> Tiling {
        Tiling::from_parts(
            self.pieces,
            self.occupied,
            self.joints,
            self.open_ports,
            seeds,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifold_net_core::{AssemblyLimits, Direction};

    fn request(seed: u32, pieces: usize) -> GenerationRequest {
        GenerationRequest::new(seed, PieceCount::new(pieces).expect("valid piece count"))
    }

    #[test]
    fn single_piece_sits_at_origin_with_all_ports_open() {
        let tiling = assemble(&request(5, 1)).expect("one piece always fits");
        let piece = &tiling.pieces()[0];

        assert_eq!(tiling.pieces().len(), 1);
        assert!(tiling.joints().is_empty());
        assert_eq!(piece.color(), PieceColor::for_placement(0));
        assert_eq!(piece.cells().iter().map(Cell::x).min(), Some(0));
        assert_eq!(piece.cells().iter().map(Cell::y).min(), Some(0));
        assert!(tiling
            .open_ports()
            .iter()
            .all(|port| !tiling.is_occupied(port.facing())));
    }

    #[test]
    fn zero_trials_exhaust_every_attempt() {
        let limits = AssemblyLimits {
            placement_trials: 0,
            max_reseeds: 2,
        };
        let result = assemble(&request(10, 3).with_limits(limits));

        assert_eq!(
            result,
            Err(GenerationError::Exhausted {
                last_seed: 10 + 2 * RESEED_STEP,
                attempts: 3,
            })
        );
    }

    #[test]
    fn committed_ports_face_each_other() {
        let tiling = assemble(&request(99, 8)).expect("generation succeeds");
        for joint in tiling.joints() {
            assert_eq!(joint.mate.direction(), joint.target.direction().opposite());
            assert_eq!(joint.mate.cell(), joint.target.facing());
            assert!(Direction::ALL.contains(&joint.target.direction()));
        }
    }
}
