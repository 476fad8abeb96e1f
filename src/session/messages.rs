//! Message types for a viewing session
//!
//! This module contains:
//! - Msg enum with nested sub-enums for organized message handling
//! - Tool and pointer types driven by the viewer's input layer

use crate::config::MarkColor;

// ============================================================================
// Drawing Action Types
// ============================================================================

/// Markup tool selected in the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Drag to fill a translucent rectangle
    Highlighter,
    /// Drag to stroke an opaque segment
    Line,
    /// Click to remove the topmost annotation under the pointer
    Eraser,
}

/// Pointer input in page-local display pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Press(f32, f32),
    Drag(f32, f32),
    Release(f32, f32),
}

/// All annotation editing messages
#[derive(Debug, Clone, PartialEq)]
pub enum EditMsg {
    /// Select a tool, or `None` to leave drawing mode
    SelectTool(Option<Tool>),
    Pointer(PointerAction),
    SetHighlightColor(MarkColor),
    SetLineColor(MarkColor),
    /// Highlight opacity (0-255)
    SetAlpha(u8),
    SetLineWidth(u32),
    /// Undo last edit on any page
    Undo,
    /// Redo undone edit
    Redo,
    /// Remove every annotation on the current page
    ClearPage,
}

// ============================================================================
// View Types
// ============================================================================

/// Page navigation and zoom messages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMsg {
    NextPage,
    PrevPage,
    ZoomIn,
    ZoomOut,
    SetZoom(f32),
}

// ============================================================================
// Main Message Enum
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Edit(EditMsg),
    View(ViewMsg),
}

impl From<EditMsg> for Msg {
    fn from(msg: EditMsg) -> Self {
        Msg::Edit(msg)
    }
}

impl From<ViewMsg> for Msg {
    fn from(msg: ViewMsg) -> Self {
        Msg::View(msg)
    }
}
