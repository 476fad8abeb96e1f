use std::path::Path;

use image::RgbImage;

use super::loader::{DocumentReady, LoadTicket};
use super::messages::{Msg, Tool, ViewMsg};
use crate::annotations::handlers;
use crate::annotations::history::{EditKind, UndoEntry, UndoLog};
use crate::annotations::store::AnnotationStore;
use crate::config::{MarkColor, PagemarkConfig};
use crate::domain::{Annotation, HighlightAnnotation, LineAnnotation, StoredAnnotation};
use crate::error::Result;
use crate::raster::{PageDecoder, RasterStore};
use crate::render::{self, geometry};

/// Current tool, its settings, and any gesture in progress
#[derive(Clone, Debug)]
pub struct ToolState {
    pub tool: Option<Tool>,
    pub highlight_color: MarkColor,
    pub alpha: u8,
    pub line_color: MarkColor,
    pub line_width: u32,
    /// Press position of an in-progress drag
    pub drawing: Option<(f32, f32)>,
    /// Latest drag position, for previews
    pub cursor: Option<(f32, f32)>,
}

impl ToolState {
    pub fn from_config(config: &PagemarkConfig) -> Self {
        Self {
            tool: None,
            highlight_color: config.default_highlight_color,
            alpha: config.default_alpha,
            line_color: config.default_line_color,
            line_width: config.default_line_width.max(1),
            drawing: None,
            cursor: None,
        }
    }

    pub fn cancel_drawing(&mut self) {
        self.drawing = None;
        self.cursor = None;
    }

    /// Build the annotation a drag from `start` to `end` would produce
    pub fn shape_between(
        &self,
        start: (f32, f32),
        end: (f32, f32),
        zoom: f32,
    ) -> Option<Annotation> {
        let (x1, y1) = start;
        let (x2, y2) = end;
        match self.tool? {
            Tool::Highlighter => {
                let (min_x, min_y, max_x, max_y) = geometry::normalize_rect(x1, y1, x2, y2);
                Some(Annotation::Highlight(HighlightAnnotation {
                    x1: min_x,
                    y1: min_y,
                    x2: max_x,
                    y2: max_y,
                    color: self.highlight_color,
                    alpha: self.alpha,
                    creation_zoom: zoom,
                }))
            }
            Tool::Line => Some(Annotation::Line(LineAnnotation {
                x1,
                y1,
                x2,
                y2,
                color: self.line_color,
                width: self.line_width,
                creation_zoom: zoom,
            })),
            Tool::Eraser => None,
        }
    }
}

/// A loaded document with its markup, undo history, and view state
///
/// All mutation happens on one owner; only decoding is moved off-thread
/// (see [`super::loader`]).
#[derive(Clone, Debug)]
pub struct Session {
    pub config: PagemarkConfig,
    pub tools: ToolState,
    rasters: RasterStore,
    annotations: AnnotationStore,
    history: UndoLog,
    current_page: usize,
    zoom_level: f32,
    generation: u64,
}

impl Session {
    pub fn new(config: PagemarkConfig) -> Self {
        let config = config.sanitized();
        let tools = ToolState::from_config(&config);
        Self {
            config,
            tools,
            rasters: RasterStore::default(),
            annotations: AnnotationStore::new(),
            history: UndoLog::new(),
            current_page: 0,
            zoom_level: 1.0,
            generation: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Document lifecycle
    // ------------------------------------------------------------------------

    /// Start a new load; any result from an earlier load becomes stale
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Install a finished load
    ///
    /// Returns `Ok(false)` when the result is stale and was discarded. A decode
    /// error leaves the current document untouched.
    pub fn finish_load(&mut self, ready: DocumentReady) -> Result<bool> {
        if ready.generation != self.generation {
            log::warn!(
                "Discarding stale document load {} (current {})",
                ready.generation,
                self.generation
            );
            return Ok(false);
        }
        let rasters = ready.result?;
        self.install(rasters);
        Ok(true)
    }

    /// Decode and install a document on the calling thread
    pub fn load_document(&mut self, decoder: &dyn PageDecoder, bytes: &[u8]) -> Result<()> {
        let ticket = self.begin_load();
        let result = RasterStore::load(decoder, bytes, self.config.render_scale);
        self.finish_load(DocumentReady {
            generation: ticket.generation,
            result,
        })
        .map(|_| ())
    }

    fn install(&mut self, rasters: RasterStore) {
        log::info!("Document ready: {} page(s)", rasters.page_count());
        if !self.annotations.is_empty() {
            log::info!(
                "Discarding {} annotation(s) from the previous document",
                self.annotations.len()
            );
        }
        self.rasters = rasters;
        self.annotations.reset();
        self.history.clear();
        self.tools.cancel_drawing();
        self.current_page = 0;
        self.zoom_level = 1.0;
    }

    pub fn has_document(&self) -> bool {
        !self.rasters.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.rasters.page_count()
    }

    fn check_page(&self, page: usize) -> Result<()> {
        self.rasters.get(page).map(|_| ())
    }

    // ------------------------------------------------------------------------
    // Navigation and zoom
    // ------------------------------------------------------------------------

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn set_page(&mut self, page: usize) -> Result<()> {
        self.check_page(page)?;
        if page != self.current_page {
            self.tools.cancel_drawing();
            self.current_page = page;
        }
        Ok(())
    }

    pub fn next_page(&mut self) -> bool {
        self.current_page + 1 < self.page_count() && self.set_page(self.current_page + 1).is_ok()
    }

    pub fn prev_page(&mut self) -> bool {
        self.current_page > 0 && self.set_page(self.current_page - 1).is_ok()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom_level
    }

    /// Set the display zoom, clamped to the configured range
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        let zoom = self.config.clamp_zoom(zoom);
        if zoom == self.zoom_level {
            return false;
        }
        self.tools.cancel_drawing();
        self.zoom_level = zoom;
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_level < self.config.zoom_max
            && self.set_zoom(self.zoom_level + self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_level > self.config.zoom_min
            && self.set_zoom(self.zoom_level - self.config.zoom_step)
    }

    // ------------------------------------------------------------------------
    // Rendering and export
    // ------------------------------------------------------------------------

    /// Composite `page` at `zoom`; the zoom is not clamped here
    pub fn render(&self, page: usize, zoom: f32) -> Result<RgbImage> {
        let raster = self.rasters.get(page)?;
        Ok(render::render_page(raster, zoom, self.annotations.list(page)))
    }

    pub fn render_current(&self) -> Result<RgbImage> {
        self.render(self.current_page, self.zoom_level)
    }

    /// Save a composited page as PNG, reporting failure as `false`
    pub fn save_page_image(&self, path: &Path, page: usize, zoom: f32) -> bool {
        let saved = self
            .render(page, zoom)
            .and_then(|image| render::export::save_png(path, &image));
        match saved {
            Ok(()) => true,
            Err(err) => {
                log::error!("Failed to save page {} to {}: {}", page, path.display(), err);
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Annotation edits
    // ------------------------------------------------------------------------

    pub fn annotations(&self, page: usize) -> &[StoredAnnotation] {
        self.annotations.list(page)
    }

    pub fn history(&self) -> &UndoLog {
        &self.history
    }

    /// Add an annotation and record it for undo
    pub fn add_annotation(
        &mut self,
        page: usize,
        annotation: Annotation,
    ) -> Result<StoredAnnotation> {
        self.check_page(page)?;
        annotation.validate()?;
        let stored = self.annotations.add(page, annotation);
        self.history.push(page, stored.clone(), EditKind::WasAdded);
        Ok(stored)
    }

    /// Add an annotation without an undo entry (programmatic import)
    pub fn import_annotation(
        &mut self,
        page: usize,
        annotation: Annotation,
    ) -> Result<StoredAnnotation> {
        self.check_page(page)?;
        annotation.validate()?;
        Ok(self.annotations.add(page, annotation))
    }

    /// Erase the topmost annotation under a display-space point
    pub fn erase_at(
        &mut self,
        page: usize,
        x: f32,
        y: f32,
        zoom: f32,
    ) -> Result<Option<StoredAnnotation>> {
        self.check_page(page)?;
        let threshold = self.config.erase_threshold;
        let Some(id) = self
            .annotations
            .find_at(page, x, y, zoom, threshold)
            .map(|hit| hit.id)
        else {
            return Ok(None);
        };
        let removed = self.annotations.remove(page, id);
        if let Some(record) = &removed {
            self.history.push(page, record.clone(), EditKind::WasRemoved);
        }
        Ok(removed)
    }

    /// Remove every annotation on `page`, one undo entry per record
    pub fn clear_page(&mut self, page: usize) -> Result<usize> {
        self.check_page(page)?;
        let cleared = self.annotations.clear(page);
        let count = cleared.len();
        for record in cleared {
            self.history.push(page, record, EditKind::WasRemoved);
        }
        Ok(count)
    }

    /// Reverse the most recent edit on any page
    pub fn undo(&mut self) -> Result<UndoEntry> {
        let annotations = &mut self.annotations;
        self.history.pop_and_apply(|entry| {
            if !entry.revert(annotations) {
                log::warn!("Undo found no annotation {:?} on page {}", entry.record.id, entry.page);
            }
        })
    }

    /// Replay the most recently undone edit
    pub fn redo(&mut self) -> Result<UndoEntry> {
        let annotations = &mut self.annotations;
        self.history.redo_and_apply(|entry| {
            if !entry.reapply(annotations) {
                log::warn!("Redo found no annotation {:?} on page {}", entry.record.id, entry.page);
            }
        })
    }

    /// Shape of the drag in progress, for live preview
    pub fn pending_annotation(&self) -> Option<Annotation> {
        let start = self.tools.drawing?;
        let end = self.tools.cursor?;
        self.tools.shape_between(start, end, self.zoom_level)
    }

    /// Dispatch a viewer message
    pub fn update(&mut self, msg: Msg) {
        match msg {
            Msg::Edit(edit) => handlers::handle_edit_msg(self, edit),
            Msg::View(view) => {
                let changed = match view {
                    ViewMsg::NextPage => self.next_page(),
                    ViewMsg::PrevPage => self.prev_page(),
                    ViewMsg::ZoomIn => self.zoom_in(),
                    ViewMsg::ZoomOut => self.zoom_out(),
                    ViewMsg::SetZoom(zoom) => self.set_zoom(zoom),
                };
                if changed {
                    log::debug!("View: page {} at zoom {}", self.current_page, self.zoom_level);
                }
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PagemarkConfig::default())
    }
}
