//! Application wiring.

use crate::script::Script;
use inkmark_core::{ConfigError, Engine, EngineOptions, HeadlessSurfaceFactory, ToolConfig};
use inkmark_render::{DrawCommand, RenderContext, RenderError, RendererRegistry, Scene};
use std::path::PathBuf;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Usage: inkmark [--config <tool-config.json>] [--script <script.json>] ({0})")]
    Usage(String),
}

/// Application configuration, taken from the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// JSON tool configuration; defaults apply when absent.
    pub config_path: Option<PathBuf>,
    /// JSON script; the built-in demo runs when absent.
    pub script_path: Option<PathBuf>,
}

impl AppConfig {
    /// Parse arguments (without the program name).
    pub fn from_args<I>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let slot = match arg.as_str() {
                "--config" => &mut config.config_path,
                "--script" => &mut config.script_path,
                other => return Err(AppError::Usage(format!("unexpected argument '{other}'"))),
            };
            let value = args
                .next()
                .ok_or_else(|| AppError::Usage(format!("{arg} needs a path")))?;
            *slot = Some(PathBuf::from(value));
        }
        Ok(config)
    }
}

/// Summary of the final frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub elements: usize,
    pub strokes: usize,
    pub texts: usize,
    pub snapshots: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl FrameReport {
    fn new(engine: &Engine, scene: &Scene) -> Self {
        let texts = scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
            .count();
        Self {
            elements: engine.elements().len(),
            strokes: scene.len() - texts,
            texts,
            snapshots: engine.history().len(),
            can_undo: engine.can_undo(),
            can_redo: engine.can_redo(),
        }
    }
}

/// One engine plus the renderers that draw it.
#[derive(Debug)]
pub struct App {
    engine: Engine,
    registry: RendererRegistry,
}

impl App {
    pub fn new(tools: ToolConfig) -> Self {
        Self {
            engine: Engine::new(
                tools,
                EngineOptions::default(),
                Box::new(HeadlessSurfaceFactory::new()),
            ),
            registry: RendererRegistry::with_defaults(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Load inputs, replay the script and build the final frame.
    pub fn run(config: &AppConfig) -> Result<(Self, Scene), AppError> {
        let tools = match &config.config_path {
            Some(path) => ToolConfig::from_file(path)?,
            None => ToolConfig::default(),
        };
        let script = match &config.script_path {
            Some(path) => Script::from_json(&std::fs::read_to_string(path)?)?,
            None => Script::demo(),
        };

        let mut app = Self::new(tools);
        let applied = script.replay(&mut app.engine);
        log::info!("Replayed {applied}/{} steps", script.steps.len());
        let scene = app.frame()?;
        Ok((app, scene))
    }

    /// Build the current frame; fails if any element cannot be drawn.
    pub fn frame(&self) -> Result<Scene, RenderError> {
        RenderContext::from_engine(&self.engine).try_build_scene(&self.registry)
    }

    pub fn report(&self, scene: &Scene) -> FrameReport {
        FrameReport::new(&self.engine, scene)
    }
}
