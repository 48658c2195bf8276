//! Session runner: applies scripted commands to a map store.

use crate::script::{ScriptCommand, parse_line};
use geoscribe_core::drawing::DrawNotice;
use geoscribe_core::persist::DEFAULT_STORAGE_KEY;
use geoscribe_core::storage::{FileStorage, create_default_storage};
use geoscribe_core::{
    DrawCommand, DrawingController, Feature, FeatureKind, MapStore, Storage, StorageError,
    StoreConfig,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "GEOSCRIBE_DATA_DIR";

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Script line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding persisted state. `None` picks the platform default.
    pub data_dir: Option<PathBuf>,
    /// Key the persisted subset is stored under.
    pub storage_key: String,
    /// Keep everything in memory; nothing survives the run.
    pub ephemeral: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            ephemeral: false,
        }
    }
}

impl AppConfig {
    /// File-backed storage in the configured directory, or the platform
    /// data directory when none is set.
    pub fn file_storage(&self) -> Result<FileStorage, AppError> {
        let storage = match &self.data_dir {
            Some(dir) => FileStorage::new(dir.clone())?,
            None => create_default_storage()?,
        };
        Ok(storage)
    }

    fn store_config(&self) -> StoreConfig {
        StoreConfig {
            storage_key: self.storage_key.clone(),
            ..StoreConfig::default()
        }
    }
}

/// A running session: the store plus the drawing controller.
pub struct App<S: Storage> {
    store: MapStore<S>,
    drawing: DrawingController,
}

impl<S: Storage> App<S> {
    pub fn new(storage: Arc<S>, config: &AppConfig) -> Self {
        Self {
            store: MapStore::open_with_config(storage, config.store_config()),
            drawing: DrawingController::new(),
        }
    }

    pub fn store(&self) -> &MapStore<S> {
        &self.store
    }

    pub fn drawing(&self) -> &DrawingController {
        &self.drawing
    }

    /// Run every command in `input`, writing `list` output to `out`.
    pub fn run_script<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), AppError> {
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let command = parse_line(&line).map_err(|source| AppError::Script {
                line: index + 1,
                source,
            })?;
            if let Some(command) = command {
                self.execute(&command, out)?;
            }
        }
        log::info!(
            "Session finished with {} features",
            self.store.feature_count()
        );
        Ok(())
    }

    /// Apply one command.
    pub fn execute<W: Write>(&mut self, command: &ScriptCommand, out: &mut W) -> Result<(), AppError> {
        if let Some(event) = command.pointer_event() {
            let commands = self.drawing.handle(&mut self.store, event);
            report(&commands);
            return Ok(());
        }

        match command {
            ScriptCommand::SelectTool { tool } => {
                let commands = self.drawing.select_tool(&mut self.store, *tool);
                report(&commands);
            }
            ScriptCommand::ToggleTool { tool } => {
                self.store.toggle_tool(*tool);
                let commands = self.drawing.sync_tool(self.store.selected_tool());
                report(&commands);
            }
            ScriptCommand::ToggleLayer { layer } => self.store.toggle_layer(*layer),
            ScriptCommand::Remove { id } => {
                self.store.remove_feature(*id);
            }
            ScriptCommand::RemoveAt { index } => {
                let id = self.store.features().get(*index).map(|f| f.id);
                match id {
                    Some(id) => {
                        self.store.remove_feature(id);
                    }
                    None => log::warn!("No feature at position {}", index),
                }
            }
            ScriptCommand::Clear => self.store.clear_all_features(),
            ScriptCommand::Center { lat, lng } => {
                self.store.set_center(geoscribe_core::LatLng::new(*lat, *lng))
            }
            ScriptCommand::Zoom { level } => self.store.set_zoom(*level),
            ScriptCommand::ZoomIn => self.store.zoom_in(),
            ScriptCommand::ZoomOut => self.store.zoom_out(),
            ScriptCommand::SearchResult { .. } => {
                if let Some(result) = command.search_result() {
                    self.store.focus_search_result(&result);
                }
            }
            ScriptCommand::List => self.write_listing(out)?,
            ScriptCommand::Click { .. }
            | ScriptCommand::DoubleClick { .. }
            | ScriptCommand::Secondary { .. } => {}
        }
        Ok(())
    }

    /// Print the view, layers and feature list.
    pub fn write_listing<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        let view = self.store.view();
        let layers = self.store.layers();
        writeln!(
            out,
            "view: center ({:.4}, {:.4}) zoom {}",
            view.center.lat, view.center.lng, view.zoom
        )?;
        writeln!(
            out,
            "layers: satellite={} drawnFeatures={}",
            layers.satellite, layers.drawn_features
        )?;

        let features = self.store.features();
        writeln!(out, "features ({}):", features.len())?;
        for (index, feature) in features.iter().enumerate() {
            writeln!(out, "  {}. {}", index + 1, describe(feature))?;
        }
        Ok(())
    }
}

/// One-line summary of a feature.
pub fn describe(feature: &Feature) -> String {
    let created = feature.properties.created_at.format("%Y-%m-%d");
    match feature.kind() {
        FeatureKind::Point => {
            let pos = feature.geometry.vertices()[0];
            format!(
                "{} [point] ({:.4}, {:.4}) {} {}",
                feature.name(),
                pos.lat,
                pos.lng,
                created,
                feature.id
            )
        }
        FeatureKind::Polygon => format!(
            "{} [polygon] {} vertices, area {:.6} sq deg, perimeter {:.2} km {} {}",
            feature.name(),
            feature.vertex_count(),
            feature.area().unwrap_or_default(),
            feature.perimeter_km().unwrap_or_default(),
            created,
            feature.id
        ),
    }
}

fn report(commands: &[DrawCommand]) {
    for command in commands {
        match command {
            DrawCommand::Notify(DrawNotice::PolygonCreated { vertices }) => {
                log::info!("Polygon created ({} points)", vertices)
            }
            DrawCommand::Notify(DrawNotice::PolygonCancelled) => {
                log::info!("Polygon drawing cancelled")
            }
            DrawCommand::Notify(DrawNotice::NotEnoughVertices { have, need }) => {
                log::warn!("Polygon needs at least {} points, has {}", need, have)
            }
            DrawCommand::Preview(vertices) => {
                log::debug!("preview outline through {} points", vertices.len())
            }
            DrawCommand::ClearPreview => log::debug!("preview cleared"),
            DrawCommand::Commit(_) | DrawCommand::SelectTool(_) => {}
        }
    }
}
