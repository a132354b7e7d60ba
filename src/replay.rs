//! Headless session replay.
//!
//! A replay script describes an image, a viewport and a list of pointer and
//! tool steps. Replaying it drives an [`InteractionController`] exactly as a
//! host view would, which makes annotation sessions reproducible outside the
//! viewer.
//!
//! ```json
//! {
//!   "image": { "width": 512, "height": 512, "pixel_spacing": 0.3 },
//!   "viewport": { "width": 800, "height": 600 },
//!   "steps": [
//!     { "tool": "distance" },
//!     { "down": [100, 100] },
//!     { "move": [300, 100] },
//!     { "up": [300, 100] }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use sonoview_annotate::{
    AnnotationEvent, AnnotationFile, CoordinateConverter, ImageInfo, InteractionController,
};
use sonoview_core::EventBus;
use sonoview_settings::Config;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Select a tool by name, or `"none"`.
    Tool(String),
    Down([f64; 2]),
    Move([f64; 2]),
    Up([f64; 2]),
    DoubleClick([f64; 2]),
    Cancel,
    /// Select the topmost shape under a screen point.
    SelectAt([f64; 2]),
    DeleteSelected,
    Resize([f64; 2]),
    Spacing(Option<f64>),
    ToggleAll,
    Clear,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    pub image: ImageInfo,
    pub viewport: ViewportSize,
    /// Annotation file to start from, relative to the script.
    #[serde(default)]
    pub load: Option<PathBuf>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl ReplayScript {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).context("Failed to read replay script")?;
        let mut script: ReplayScript =
            serde_json::from_str(&content).context("Failed to parse replay script")?;
        if let (Some(load), Some(dir)) = (script.load.as_mut(), path.parent()) {
            if load.is_relative() {
                *load = dir.join(&*load);
            }
        }
        Ok(script)
    }

    /// Runs every step, publishing the controller's events on `bus`.
    pub fn run(
        &self,
        config: &Config,
        bus: &EventBus<AnnotationEvent>,
    ) -> Result<InteractionController> {
        let converter = CoordinateConverter::new(
            self.image.width,
            self.image.height,
            self.viewport.width,
            self.viewport.height,
        );
        let mut controller = InteractionController::new(converter).with_config(config);

        if let Some(path) = &self.load {
            let file = AnnotationFile::load_from_file(path)?;
            let restored = file.apply_to(&mut controller)?;
            tracing::info!("Restored {} shapes from {}", restored, path.display());
        }
        // The script's image geometry wins over the loaded file's
        controller
            .converter_mut()
            .set_image_size(self.image.width, self.image.height);
        controller.set_pixel_spacing(self.image.pixel_spacing);
        bus.publish_all(controller.drain_events());

        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!("Step {}: {:?}", index, step);
            apply_step(&mut controller, step).with_context(|| format!("Step {} failed", index))?;
            bus.publish_all(controller.drain_events());
        }
        Ok(controller)
    }
}

fn apply_step(controller: &mut InteractionController, step: &Step) -> Result<()> {
    match step {
        Step::Tool(name) => controller.select_tool(name)?,
        Step::Down([x, y]) => controller.pointer_down(*x, *y),
        Step::Move([x, y]) => controller.pointer_move(*x, *y),
        Step::Up([x, y]) => controller.pointer_up(*x, *y),
        Step::DoubleClick([x, y]) => controller.double_click(*x, *y),
        Step::Cancel => controller.cancel(),
        Step::SelectAt([x, y]) => {
            controller.select_at(*x, *y);
        }
        Step::DeleteSelected => {
            if let Some(id) = controller.selected() {
                controller.delete(id);
            }
        }
        Step::Resize([w, h]) => controller.converter_mut().set_widget_size(*w, *h),
        Step::Spacing(spacing) => controller.set_pixel_spacing(*spacing),
        Step::ToggleAll => {
            controller.toggle_all_visibility();
        }
        Step::Clear => controller.clear_all(),
    }
    Ok(())
}
