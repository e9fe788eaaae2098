// document.rs
//
// Copyright (c) 2026  gifprobe developers
//
//! Metadata aggregation: the structured record produced by one parse.
use crate::block::{Block, Frame, GlobalColorTable, GraphicControl, Preamble};
use crate::decode::Decoder;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// One named value with a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub value: String,
    pub description: &'static str,
}

/// Ordered group of fields under a section name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: &'static str,
    pub fields: Vec<Field>,
}

impl Section {
    fn new(name: &'static str) -> Self {
        Section {
            name,
            fields: Vec::new(),
        }
    }
    fn push(
        &mut self,
        key: &'static str,
        value: String,
        description: &'static str,
    ) {
        self.fields.push(Field {
            key,
            value,
            description,
        });
    }
    /// Look up a field value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }
}

/// Structural metadata extracted from one GIF file.
///
/// Built once per parse invocation and immutable afterwards.  A parse
/// never fails once the preamble has been read: an error inside the
/// frame / extension stream truncates the result instead (the frames and
/// sections gathered so far are kept).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
    frames: Vec<Frame>,
    global_color_table: Option<GlobalColorTable>,
    width: u16,
    height: u16,
}

impl Document {
    /// Parse a GIF file on disk.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let buf = fs::read(path)?;
        Document::parse(&buf)
    }

    /// Parse a complete GIF byte stream.
    pub fn parse(buf: &[u8]) -> Result<Document> {
        let mut decoder = Decoder::new(buf);
        let preamble = decoder.preamble()?;
        let mut frames: Vec<Frame> = Vec::new();
        let mut total_duration_ms: u64 = 0;
        let mut pending: Option<GraphicControl> = None;
        let mut loop_count: Option<u16> = None;
        let mut comment: Option<String> = None;
        for block in decoder.into_blocks() {
            match block {
                Ok(Block::GraphicControl(g)) => {
                    // counted once per extension encountered, whether or
                    // not a frame ever claims it
                    total_duration_ms += g.delay_ms();
                    pending = Some(g);
                }
                Ok(Block::ImageDesc(desc)) => {
                    frames.push(Frame::new(pending.take(), desc));
                }
                Ok(Block::Application(app)) => {
                    if let Some(n) = app.loop_count() {
                        loop_count = Some(n);
                    }
                }
                Ok(Block::Comment(c)) => {
                    if !c.is_empty() {
                        comment = Some(c);
                    }
                }
                Ok(Block::Unknown(_)) => {}
                Ok(Block::Trailer) => break,
                Err(e) => {
                    // partial result: everything gathered so far is kept
                    warn!("frame parsing stopped early: {}", e);
                    break;
                }
            }
        }
        Ok(Document::assemble(
            preamble,
            frames,
            total_duration_ms,
            loop_count,
            comment,
            buf.len() as u64,
        ))
    }

    fn assemble(
        preamble: Preamble,
        frames: Vec<Frame>,
        total_duration_ms: u64,
        loop_count: Option<u16>,
        comment: Option<String>,
        file_size: u64,
    ) -> Document {
        let Preamble {
            header,
            logical_screen_desc: lsd,
            global_color_table,
        } = preamble;
        let width = lsd.screen_width();
        let height = lsd.screen_height();
        let mut sections = Vec::with_capacity(4);
        // the synthesized summary goes ahead of all parsed sections
        let mut s = Section::new("Summary");
        s.push(
            "Resolution",
            format!("{}x{}", width, height),
            "Image dimensions",
        );
        s.push(
            "Frame Count",
            frames.len().to_string(),
            "Total number of frames",
        );
        s.push("File Size", format_size(file_size), "Size on disk");
        s.push(
            "Duration",
            format!("{}ms", total_duration_ms),
            "Total animation duration",
        );
        s.push(
            "Frame Rate",
            frame_rate(frames.len(), total_duration_ms),
            "Average frame rate",
        );
        sections.push(s);
        let mut s = Section::new("Header");
        s.push("Signature", header.signature().to_string(), "GIF signature");
        s.push("Version", header.version().to_string(), "GIF version");
        sections.push(s);
        let mut s = Section::new("Logical Screen Descriptor");
        s.push(
            "Canvas Size",
            format!("{}x{}", width, height),
            "Image dimensions",
        );
        s.push(
            "Global Color Table",
            lsd.has_color_table().to_string(),
            "Whether global color table exists",
        );
        s.push(
            "Color Resolution",
            lsd.color_resolution().to_string(),
            "Bits per primary color",
        );
        s.push(
            "Sort Flag",
            lsd.color_table_sorted().to_string(),
            "Whether colors are sorted",
        );
        s.push(
            "Color Table Size",
            lsd.color_table_len().to_string(),
            "Number of entries in global color table",
        );
        s.push(
            "Background Color",
            lsd.background_color_idx().to_string(),
            "Background color index",
        );
        s.push(
            "Aspect Ratio",
            lsd.pixel_aspect_ratio().to_string(),
            "Pixel aspect ratio",
        );
        sections.push(s);
        if loop_count.is_some() || comment.is_some() {
            let mut s = Section::new("Metadata");
            if let Some(n) = loop_count {
                s.push(
                    "Loop Count",
                    n.to_string(),
                    "Number of animation iterations (0 = infinite)",
                );
            }
            if let Some(c) = comment {
                s.push("Comment", c, "GIF comment data");
            }
            sections.push(s);
        }
        Document {
            sections,
            frames,
            global_color_table,
            width,
            height,
        }
    }

    /// Header sections in output order, Summary first.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a section by name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Frames in file order, which is also display order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Canvas dimensions declared by the Logical Screen Descriptor.
    pub fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn global_color_table(&self) -> Option<&GlobalColorTable> {
        self.global_color_table.as_ref()
    }
}

/// Average frame rate, or "N/A" when there is no timing information.
fn frame_rate(frames: usize, duration_ms: u64) -> String {
    if duration_ms > 0 {
        format!("{:.1} FPS", 1000.0 * frames as f64 / duration_ms as f64)
    } else {
        "N/A".to_string()
    }
}

/// Human-scaled size, dividing by 1024 per step, one decimal place.
fn format_size(size: u64) -> String {
    let mut size = size as f64;
    for unit in &["B", "KB", "MB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} GB", size)
}

#[cfg(test)]
mod test {
    use super::*;

    fn gif(body: &[u8]) -> Vec<u8> {
        let mut v = b"GIF89a".to_vec();
        v.extend_from_slice(&[0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]);
        v.extend_from_slice(body);
        v
    }

    // 1x1 image descriptor with an empty data chain
    const FRAME: &[u8] = &[
        0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02,
        0x00,
    ];

    #[test]
    fn single_frame_no_extensions() {
        let mut body = FRAME.to_vec();
        body.push(0x3B);
        let doc = Document::parse(&gif(&body)).unwrap();
        assert_eq!(doc.frame_count(), 1);
        assert_eq!(doc.frames().len(), doc.frame_count());
        assert_eq!(doc.dimensions(), (1, 1));
        let summary = doc.section("Summary").unwrap();
        assert_eq!(summary.get("Resolution"), Some("1x1"));
        assert_eq!(summary.get("Frame Count"), Some("1"));
        assert_eq!(summary.get("Duration"), Some("0ms"));
        assert_eq!(summary.get("Frame Rate"), Some("N/A"));
    }

    #[test]
    fn summary_precedes_parsed_sections() {
        let doc = Document::parse(&gif(&[0x3B])).unwrap();
        let names: Vec<_> = doc.sections().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            ["Summary", "Header", "Logical Screen Descriptor"]
        );
    }

    #[test]
    fn delay_accumulates_per_graphic_control() {
        // raw delay value of 50 -> 500 ms added to the running total
        let mut body =
            vec![0x21, 0xF9, 0x04, 0x00, 0x32, 0x00, 0x00, 0x00];
        body.extend_from_slice(FRAME);
        body.push(0x3B);
        let doc = Document::parse(&gif(&body)).unwrap();
        let summary = doc.section("Summary").unwrap();
        assert_eq!(summary.get("Duration"), Some("500ms"));
        assert_eq!(summary.get("Frame Rate"), Some("2.0 FPS"));
    }

    #[test]
    fn frame_carries_graphic_control() {
        // the pending graphic control is merged into the next frame
        // rather than being discarded when the image descriptor arrives
        let mut body =
            vec![0x21, 0xF9, 0x04, 0x09, 0x32, 0x00, 0x05, 0x00];
        body.extend_from_slice(FRAME);
        body.push(0x3B);
        let doc = Document::parse(&gif(&body)).unwrap();
        let frame = &doc.frames()[0];
        let g = frame.graphic_control.unwrap();
        assert_eq!(g.delay_ms(), 500);
        assert_eq!(g.transparent_color(), Some(5));
        assert_eq!(frame.delay_ms(), 500);
        let fields = frame.fields();
        assert!(fields.contains(&("Delay", "500ms".to_string())));
    }

    #[test]
    fn netscape_loop_count_recorded() {
        let mut body = vec![0x21, 0xFF, 0x0B];
        body.extend_from_slice(b"NETSCAPE2.0");
        body.extend_from_slice(&[0x03, 0x01, 0x05, 0x00, 0x00, 0x3B]);
        let doc = Document::parse(&gif(&body)).unwrap();
        let meta = doc.section("Metadata").unwrap();
        assert_eq!(meta.get("Loop Count"), Some("5"));
    }

    #[test]
    fn comment_recorded_under_metadata() {
        let mut body = FRAME.to_vec();
        body.extend_from_slice(&[
            0x21, 0xFE, 0x02, b'A', b'B', 0x02, b'C', b'D', 0x00, 0x3B,
        ]);
        let doc = Document::parse(&gif(&body)).unwrap();
        let meta = doc.section("Metadata").unwrap();
        assert_eq!(meta.get("Comment"), Some("ABCD"));
        assert_eq!(doc.frame_count(), 1);
    }

    #[test]
    fn empty_comment_leaves_no_metadata() {
        let mut body = vec![0x21, 0xFE, 0x00];
        body.extend_from_slice(FRAME);
        let doc = Document::parse(&gif(&body)).unwrap();
        assert!(doc.section("Metadata").is_none());
    }

    #[test]
    fn truncated_image_descriptor_keeps_prior_frames() {
        let mut body = FRAME.to_vec();
        body.extend_from_slice(&[0x2C, 0x00, 0x00, 0x00]);
        let doc = Document::parse(&gif(&body)).unwrap();
        assert_eq!(doc.frame_count(), 1);
        assert_eq!(doc.dimensions(), (1, 1));
        assert!(doc.section("Summary").is_some());
    }

    #[test]
    fn global_color_table_materialized() {
        let data = [
            0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00,
            0x80, 0x00, 0x00, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x3B,
        ];
        let doc = Document::parse(&data).unwrap();
        let tbl = doc.global_color_table().unwrap();
        assert_eq!(tbl.len(), 2);
        assert_eq!(tbl.colors()[0], [0x10, 0x20, 0x30]);
        assert_eq!(tbl.colors()[1], [0x40, 0x50, 0x60]);
    }

    #[test]
    fn reparse_is_idempotent() {
        let mut body =
            vec![0x21, 0xF9, 0x04, 0x09, 0x14, 0x00, 0x01, 0x00];
        body.extend_from_slice(FRAME);
        body.extend_from_slice(&[0x21, 0xFE, 0x02, b'h', b'i', 0x00, 0x3B]);
        let data = gif(&body);
        let a = Document::parse(&data).unwrap();
        let b = Document::parse(&data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_file_reported_before_parsing() {
        match Document::parse_file("no/such/file.gif") {
            Err(Error::FileNotFound(_)) => {}
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(13), "13.0 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[test]
    fn frame_rate_rounding() {
        assert_eq!(frame_rate(3, 1000), "3.0 FPS");
        assert_eq!(frame_rate(1, 30), "33.3 FPS");
        assert_eq!(frame_rate(0, 0), "N/A");
    }
}
