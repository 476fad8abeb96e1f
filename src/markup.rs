//! Markup files for the command-line renderer
//!
//! A markup file is a JSON array of `{ "page": N, "annotation": { ... } }`
//! entries, using the same tagged annotation encoding as the rest of the crate.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::Annotation;
use crate::session::Session;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkupEntry {
    pub page: usize,
    pub annotation: Annotation,
}

pub fn parse_markup(json: &str) -> Result<Vec<MarkupEntry>> {
    serde_json::from_str(json).context("Invalid markup JSON")
}

pub fn load_markup(path: &Path) -> Result<Vec<MarkupEntry>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read markup file: {}", path.display()))?;
    parse_markup(&json).with_context(|| format!("In {}", path.display()))
}

/// Import every entry into `session` without creating undo entries
pub fn apply_markup(session: &mut Session, entries: Vec<MarkupEntry>) -> Result<usize> {
    let count = entries.len();
    for (index, entry) in entries.into_iter().enumerate() {
        session
            .import_annotation(entry.page, entry.annotation)
            .with_context(|| format!("Markup entry {index}"))?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarkColor;
    use crate::raster::ImageDecoder;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    const MARKUP: &str = r##"[
        { "page": 0, "annotation": { "type": "highlight", "x1": 10, "y1": 10,
          "x2": 40, "y2": 30, "color": "#00FF00", "alpha": 128 } },
        { "page": 0, "annotation": { "type": "line", "x1": 0, "y1": 50,
          "x2": 60, "y2": 50, "color": "#0000FF", "width": 5,
          "creation_zoom": 2.0 } }
    ]"##;

    fn session() -> Session {
        let page = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
        let mut bytes = Vec::new();
        page.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        let mut session = Session::default();
        session.load_document(&ImageDecoder, &bytes).unwrap();
        session
    }

    #[test]
    fn test_parse_defaults_creation_zoom() {
        let entries = parse_markup(MARKUP).unwrap();
        assert_eq!(entries.len(), 2);
        let Annotation::Highlight(h) = &entries[0].annotation else {
            panic!("expected highlight");
        };
        assert_eq!(h.creation_zoom, 1.0);
        assert_eq!(h.color, MarkColor::rgb(0, 255, 0));
        assert_eq!(entries[1].annotation.creation_zoom(), 2.0);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let json = r##"[{ "page": 0, "annotation": { "type": "line", "x1": 0,
            "y1": 0, "x2": 1, "y2": 1, "color": "#GG0000", "width": 2 } }]"##;
        assert!(parse_markup(json).is_err());
    }

    #[test]
    fn test_apply_imports_without_history() {
        let mut session = session();
        let entries = parse_markup(MARKUP).unwrap();
        assert_eq!(apply_markup(&mut session, entries).unwrap(), 2);
        assert_eq!(session.annotations(0).len(), 2);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_apply_rejects_missing_page() {
        let mut session = session();
        let entries = vec![MarkupEntry {
            page: 4,
            annotation: parse_markup(MARKUP).unwrap().remove(0).annotation,
        }];
        assert!(apply_markup(&mut session, entries).is_err());
    }

    #[test]
    fn test_apply_rejects_unscalable_records() {
        let bad = [
            r##"[{ "page": 0, "annotation": { "type": "line", "x1": 0, "y1": 0,
                "x2": 10, "y2": 10, "color": "#FF0000", "width": 0 } }]"##,
            r##"[{ "page": 0, "annotation": { "type": "highlight", "x1": 0, "y1": 0,
                "x2": 10, "y2": 10, "color": "#FFFF00", "alpha": 77,
                "creation_zoom": 0.0 } }]"##,
            r##"[{ "page": 0, "annotation": { "type": "highlight", "x1": 0, "y1": 0,
                "x2": 10, "y2": 10, "color": "#FFFF00", "alpha": 77,
                "creation_zoom": -1.0 } }]"##,
        ];
        for json in bad {
            let mut session = session();
            let entries = parse_markup(json).unwrap();
            assert!(apply_markup(&mut session, entries).is_err(), "{json}");
            assert!(session.annotations(0).is_empty());
        }
    }

    #[test]
    fn test_load_markup_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markup.json");
        std::fs::write(&path, MARKUP).unwrap();
        assert_eq!(load_markup(&path).unwrap().len(), 2);
        assert!(load_markup(&dir.path().join("missing.json")).is_err());
    }
}
