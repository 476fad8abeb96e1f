//! Annotation message handlers
//!
//! Turns EditMsg pointer gestures and tool settings into session edits.

use crate::error::PagemarkError;
use crate::session::messages::{EditMsg, PointerAction, Tool};
use crate::session::state::Session;

/// Handle an EditMsg against the current page and zoom
pub fn handle_edit_msg(session: &mut Session, msg: EditMsg) {
    match msg {
        EditMsg::SelectTool(tool) => {
            session.tools.cancel_drawing();
            session.tools.tool = tool;
        }
        EditMsg::Pointer(action) => handle_pointer(session, action),
        EditMsg::SetHighlightColor(color) => {
            if session.config.allows_highlight_color(color) {
                session.tools.highlight_color = color;
            } else {
                log::warn!("Ignoring highlight color {} not in presets", color);
            }
        }
        EditMsg::SetLineColor(color) => {
            if session.config.allows_line_color(color) {
                session.tools.line_color = color;
            } else {
                log::warn!("Ignoring line color {} not in presets", color);
            }
        }
        EditMsg::SetAlpha(alpha) => {
            if session.config.allows_alpha(alpha) {
                session.tools.alpha = alpha;
            } else {
                log::warn!("Ignoring alpha {} not in presets", alpha);
            }
        }
        EditMsg::SetLineWidth(width) => {
            if session.config.allows_line_width(width) {
                session.tools.line_width = width;
            } else {
                log::warn!("Ignoring line width {} not in presets", width);
            }
        }
        EditMsg::Undo => log_edit_error("undo", session.undo().map(|_| ())),
        EditMsg::Redo => log_edit_error("redo", session.redo().map(|_| ())),
        EditMsg::ClearPage => {
            let page = session.current_page();
            log_edit_error("clear", session.clear_page(page).map(|_| ()));
        }
    }
}

// ============================================================================
// Pointer gestures
// ============================================================================

fn handle_pointer(session: &mut Session, action: PointerAction) {
    let Some(tool) = session.tools.tool else {
        return;
    };
    if !session.has_document() {
        return;
    }

    match action {
        PointerAction::Press(x, y) => {
            if tool == Tool::Eraser {
                let page = session.current_page();
                let zoom = session.zoom();
                match session.erase_at(page, x, y, zoom) {
                    Ok(Some(erased)) => log::debug!("Erased {:?} on page {}", erased.id, page),
                    Ok(None) => {}
                    Err(err) => log::warn!("Erase failed: {}", err),
                }
            } else {
                session.tools.drawing = Some((x, y));
                session.tools.cursor = Some((x, y));
            }
        }
        PointerAction::Drag(x, y) => {
            if session.tools.drawing.is_some() {
                session.tools.cursor = Some((x, y));
            }
        }
        PointerAction::Release(x, y) => {
            session.tools.cursor = None;
            let Some(start) = session.tools.drawing.take() else {
                return;
            };
            if !exceeds_minimum(session, tool, start, (x, y)) {
                return;
            }
            let Some(annotation) = session.tools.shape_between(start, (x, y), session.zoom())
            else {
                return;
            };
            let page = session.current_page();
            log_edit_error("add", session.add_annotation(page, annotation).map(|_| ()));
        }
    }
}

/// Drags below the configured extent are treated as stray clicks
fn exceeds_minimum(session: &Session, tool: Tool, start: (f32, f32), end: (f32, f32)) -> bool {
    let dx = (end.0 - start.0).abs();
    let dy = (end.1 - start.1).abs();
    match tool {
        Tool::Highlighter => {
            let min = session.config.min_highlight_extent;
            dx > min && dy > min
        }
        Tool::Line => {
            let min = session.config.min_line_extent;
            dx > min || dy > min
        }
        Tool::Eraser => false,
    }
}

fn log_edit_error(what: &str, result: crate::error::Result<()>) {
    match result {
        Ok(()) => {}
        Err(PagemarkError::EmptyLog) => log::debug!("Nothing to {}", what),
        Err(err) => log::warn!("Failed to {} annotation: {}", what, err),
    }
}
