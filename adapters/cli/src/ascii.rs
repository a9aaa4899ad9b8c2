//! Plain-text rendering backend.

use std::io::{self, Write};

use anyhow::{Context, Result};
use manifold_net_core::Cell;
use manifold_net_rendering::{RenderingBackend, Scene};

/// Writes scenes as a letter grid followed by inventory, hinge and fold listings.
pub(crate) struct AsciiBackend<W> {
    out: W,
}

impl<W: Write> AsciiBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderingBackend for AsciiBackend<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        write_scene(&mut self.out, scene).context("failed to write ascii scene")?;
        self.out.flush().context("failed to flush ascii scene")
    }
}

fn write_scene(out: &mut impl Write, scene: &Scene) -> io::Result<()> {
    let seeds = scene.seeds;
    writeln!(
        out,
        "seed {} (effective {}, {} reseeds)",
        seeds.requested, seeds.effective, seeds.reseeds
    )?;

    let bounds = scene.board.bounds;
    writeln!(out)?;
    writeln!(out, "board {}x{}", bounds.width(), bounds.height())?;
    for y in bounds.min_y..=bounds.max_y {
        let row: String = (bounds.min_x..=bounds.max_x)
            .map(|x| {
                scene
                    .board
                    .cell_at(Cell::new(x, y))
                    .map_or('.', |cell| piece_letter(cell.piece))
            })
            .collect();
        writeln!(out, "{row}")?;
    }

    writeln!(out)?;
    writeln!(out, "pieces")?;
    for entry in &scene.inventory {
        writeln!(
            out,
            "  {} #{} {} {} ({} cells)",
            piece_letter(entry.index - 1),
            entry.index,
            entry.name,
            entry.hex,
            entry.cells
        )?;
    }

    writeln!(out)?;
    match scene.folded.root() {
        Some(root) => writeln!(out, "hinges rooted at {}", coordinates(root))?,
        None => writeln!(out, "hinges")?,
    }
    for hinge in &scene.folded.hinges {
        writeln!(
            out,
            "  {} {} {}",
            coordinates(hinge.parent),
            hinge.direction.symbol(),
            coordinates(hinge.child)
        )?;
    }

    if scene.fold.factor.get() != 0.0 {
        writeln!(out)?;
        writeln!(out, "fold {}", scene.fold)?;
        for folded in &scene.folded.cells {
            writeln!(
                out,
                "  {} -> ({:.3}, {:.3}, {:.3})",
                coordinates(folded.cell),
                folded.centre.x,
                folded.centre.y,
                folded.centre.z
            )?;
        }
    }

    Ok(())
}

fn piece_letter(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

fn coordinates(cell: Cell) -> String {
    format!("({}, {})", cell.x(), cell.y())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Overrides, config::Settings, scene_for};

    fn render(overrides: Overrides) -> String {
        let settings = Settings::resolve(overrides, None).expect("valid settings");
        let scene = scene_for(settings).expect("generation succeeds");
        let mut out = Vec::new();
        AsciiBackend::new(&mut out)
            .present(&scene)
            .expect("writing to memory succeeds");
        String::from_utf8(out).expect("ascii output is utf-8")
    }

    #[test]
    fn two_piece_board_matches_fixture() {
        let text = render(Overrides {
            seed: Some(1234),
            pieces: Some(2),
            ..Overrides::default()
        });

        let expected_board = "board 7x4\n.......\n..B.A..\n.BBBAA.\n.......\n";
        assert!(text.starts_with("seed 1234 (effective 1234, 0 reseeds)\n"));
        assert!(text.contains(expected_board), "{text}");
        assert!(text.contains("  A #1 L3 #6366f1 (3 cells)\n"));
        assert!(text.contains("  B #2 T4 #f43f5e (4 cells)\n"));
        assert!(text.contains("hinges rooted at (-1, 1)\n"));
        assert!(!text.contains("fold"));
    }

    #[test]
    fn folded_output_lists_centres() {
        let text = render(Overrides {
            seed: Some(1234),
            pieces: Some(2),
            fold: Some(-0.5),
            ..Overrides::default()
        });

        assert!(text.contains("fold Out: 50%\n"));
        assert!(text.contains("  (-1, 1) -> (0.000, 0.000, 0.000)\n"));
        assert_eq!(text.matches(" -> (").count(), 7);
    }

    #[test]
    fn letters_follow_placement_order() {
        assert_eq!(piece_letter(0), 'A');
        assert_eq!(piece_letter(9), 'J');
    }
}
