//! JSON rendering backend.

use std::io::Write;

use anyhow::{Context, Result};
use manifold_net_rendering::{RenderingBackend, Scene};

/// Writes scenes as pretty-printed JSON documents.
pub(crate) struct JsonBackend<W> {
    out: W,
}

impl<W: Write> JsonBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderingBackend for JsonBackend<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, scene).context("failed to serialise scene")?;
        writeln!(self.out).context("failed to terminate json scene")?;
        self.out.flush().context("failed to flush json scene")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Overrides, config::Settings, scene_for};
    use serde_json::Value;

    #[test]
    fn scene_serialises_every_view() {
        let overrides = Overrides {
            seed: Some(42),
            pieces: Some(10),
            fold: Some(1.0),
            ..Overrides::default()
        };
        let settings = Settings::resolve(overrides, None).expect("valid settings");
        let scene = scene_for(settings).expect("generation succeeds");

        let mut out = Vec::new();
        JsonBackend::new(&mut out)
            .present(&scene)
            .expect("writing to memory succeeds");
        let document: Value = serde_json::from_slice(&out).expect("output is json");

        assert_eq!(document["seeds"]["requested"], 42);
        assert_eq!(document["board"]["cells"].as_array().map(Vec::len), Some(40));
        assert_eq!(document["inventory"][0]["name"], "I3");
        assert_eq!(document["inventory"][9]["index"], 10);
        assert_eq!(document["folded"]["factor"], 1.0);
        assert_eq!(
            document["folded"]["hinges"].as_array().map(Vec::len),
            Some(39)
        );
        assert_eq!(document["fold"]["percent"], 100);
    }
}
