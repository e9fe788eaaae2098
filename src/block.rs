// block.rs
//
// Copyright (c) 2026  gifprobe developers
//
//! GIF block types and their packed-flag decoding.
use std::fmt;

/// Block tag codes handled by the dispatcher loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BlockCode {
    Extension_,
    ImageDesc_,
    Trailer_,
}

impl BlockCode {
    pub fn from_u8(t: u8) -> Option<Self> {
        use self::BlockCode::*;
        match t {
            b',' => Some(ImageDesc_), // (0x2C) Image separator
            b'!' => Some(Extension_), // (0x21) Extension introducer
            b';' => Some(Trailer_),   // (0x3B) GIF trailer
            _ => None,
        }
    }
}

/// Extension label codes (second byte after an extension introducer).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ExtensionCode {
    GraphicControl_,
    Comment_,
    Application_,
    Unknown_(u8),
}

impl From<u8> for ExtensionCode {
    fn from(n: u8) -> Self {
        use self::ExtensionCode::*;
        match n {
            0xF9 => GraphicControl_,
            0xFE => Comment_,
            0xFF => Application_,
            _ => Unknown_(n),
        }
    }
}

/// GIF file header: 3-byte signature plus 3-byte version, both ASCII.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    signature: String,
    version: String,
}

impl Header {
    pub(crate) fn new(signature: String, version: String) -> Self {
        Header { signature, version }
    }
    pub fn signature(&self) -> &str {
        &self.signature
    }
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Logical Screen Descriptor: canvas geometry and global color table
/// parameters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LogicalScreenDesc {
    screen_width: u16,
    screen_height: u16,
    flags: u8,
    background_color_idx: u8, // index into global color table
    pixel_aspect_ratio: u8,
}

impl LogicalScreenDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_RESOLUTION: u8 = 0b0111_0000;
    const COLOR_TABLE_ORDERING: u8 = 0b0000_1000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    pub(crate) fn new(
        screen_width: u16,
        screen_height: u16,
        flags: u8,
        background_color_idx: u8,
        pixel_aspect_ratio: u8,
    ) -> Self {
        LogicalScreenDesc {
            screen_width,
            screen_height,
            flags,
            background_color_idx,
            pixel_aspect_ratio,
        }
    }
    pub fn screen_width(&self) -> u16 {
        self.screen_width
    }
    pub fn screen_height(&self) -> u16 {
        self.screen_height
    }
    pub fn flags(&self) -> u8 {
        self.flags
    }
    pub fn has_color_table(&self) -> bool {
        self.flags & Self::COLOR_TABLE_PRESENT != 0
    }
    /// Bits per primary color (stored 3-bit field, plus one).
    pub fn color_resolution(&self) -> u16 {
        (((self.flags & Self::COLOR_RESOLUTION) >> 4) + 1) as u16
    }
    pub fn color_table_sorted(&self) -> bool {
        self.flags & Self::COLOR_TABLE_ORDERING != 0
    }
    /// Declared table length: always a power of two in 2..=256.
    pub fn color_table_len(&self) -> usize {
        2 << ((self.flags & Self::COLOR_TABLE_SIZE) as usize)
    }
    pub fn background_color_idx(&self) -> u8 {
        self.background_color_idx
    }
    pub fn pixel_aspect_ratio(&self) -> u8 {
        self.pixel_aspect_ratio
    }
}

/// Global color table, as RGB triples in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalColorTable {
    colors: Vec<[u8; 3]>,
}

impl GlobalColorTable {
    pub(crate) fn with_colors(colors: Vec<[u8; 3]>) -> Self {
        GlobalColorTable { colors }
    }
    pub fn len(&self) -> usize {
        self.colors.len()
    }
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }
}

/// How a frame's canvas area is treated before the next frame is drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DisposalMethod {
    NoAction,
    Keep,
    Background,
    Previous,
    Reserved(u8),
}

impl From<u8> for DisposalMethod {
    fn from(n: u8) -> Self {
        use self::DisposalMethod::*;
        match n {
            0 => NoAction,
            1 => Keep,
            2 => Background,
            3 => Previous,
            _ => Reserved(n),
        }
    }
}

impl fmt::Display for DisposalMethod {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        use self::DisposalMethod::*;
        match self {
            NoAction => write!(fmt, "No disposal specified"),
            Keep => write!(fmt, "Do not dispose"),
            Background => write!(fmt, "Restore to background"),
            Previous => write!(fmt, "Restore to previous"),
            Reserved(n) => write!(fmt, "Unknown ({})", n),
        }
    }
}

/// Graphic Control Extension: per-frame timing, disposal and transparency.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GraphicControl {
    flags: u8,
    delay_time_cs: u16, // delay in centiseconds (hundredths of a second)
    transparent_color_idx: u8,
}

impl GraphicControl {
    const DISPOSAL_METHOD: u8 = 0b0001_1100;
    const USER_INPUT: u8 = 0b0000_0010;
    const TRANSPARENT_COLOR: u8 = 0b0000_0001;

    pub(crate) fn new(
        flags: u8,
        delay_time_cs: u16,
        transparent_color_idx: u8,
    ) -> Self {
        GraphicControl {
            flags,
            delay_time_cs,
            transparent_color_idx,
        }
    }
    pub fn flags(&self) -> u8 {
        self.flags
    }
    pub fn disposal_method(&self) -> DisposalMethod {
        ((self.flags & Self::DISPOSAL_METHOD) >> 2).into()
    }
    pub fn user_input(&self) -> bool {
        self.flags & Self::USER_INPUT != 0
    }
    pub fn transparency(&self) -> bool {
        self.flags & Self::TRANSPARENT_COLOR != 0
    }
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }
    /// Frame delay in milliseconds (stored delay unit times ten).
    pub fn delay_ms(&self) -> u64 {
        self.delay_time_cs as u64 * 10
    }
    /// Transparent color index, only when the transparency flag is set.
    pub fn transparent_color(&self) -> Option<u8> {
        if self.transparency() {
            Some(self.transparent_color_idx)
        } else {
            None
        }
    }
}

/// Application Extension.  Loop count is populated only for the
/// `NETSCAPE2.0` animation convention (zero means loop forever).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Application {
    ident: Vec<u8>,
    loop_count: Option<u16>,
}

impl Application {
    pub(crate) fn new(ident: Vec<u8>, loop_count: Option<u16>) -> Self {
        Application { ident, loop_count }
    }
    pub fn ident(&self) -> &[u8] {
        &self.ident
    }
    pub fn is_netscape(&self) -> bool {
        self.ident == b"NETSCAPE2.0"
    }
    pub fn loop_count(&self) -> Option<u16> {
        self.loop_count
    }
}

/// Image Descriptor: placement and local color table parameters for one
/// frame.  Local color table contents are skipped, never materialized.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageDesc {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    flags: u8,
}

impl ImageDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const INTERLACED: u8 = 0b0100_0000;
    const COLOR_TABLE_ORDERING: u8 = 0b0010_0000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    pub(crate) fn new(
        left: u16,
        top: u16,
        width: u16,
        height: u16,
        flags: u8,
    ) -> Self {
        ImageDesc {
            left,
            top,
            width,
            height,
            flags,
        }
    }
    pub fn left(&self) -> u16 {
        self.left
    }
    pub fn top(&self) -> u16 {
        self.top
    }
    pub fn width(&self) -> u16 {
        self.width
    }
    pub fn height(&self) -> u16 {
        self.height
    }
    pub fn flags(&self) -> u8 {
        self.flags
    }
    pub fn has_color_table(&self) -> bool {
        self.flags & Self::COLOR_TABLE_PRESENT != 0
    }
    pub fn interlaced(&self) -> bool {
        self.flags & Self::INTERLACED != 0
    }
    pub fn color_table_sorted(&self) -> bool {
        self.flags & Self::COLOR_TABLE_ORDERING != 0
    }
    pub fn color_table_len(&self) -> usize {
        2 << ((self.flags & Self::COLOR_TABLE_SIZE) as usize)
    }
}

/// One block from the frame / extension stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    ImageDesc(ImageDesc),
    GraphicControl(GraphicControl),
    Application(Application),
    Comment(String),
    Unknown(u8),
    Trailer,
}

/// Blocks at the beginning of the file, before any frame blocks.
#[derive(Debug)]
pub struct Preamble {
    pub header: Header,
    pub logical_screen_desc: LogicalScreenDesc,
    pub global_color_table: Option<GlobalColorTable>,
}

/// One animation frame: placement from its Image Descriptor, plus the
/// Graphic Control Extension that preceded it, when there was one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub image_desc: ImageDesc,
    pub graphic_control: Option<GraphicControl>,
}

impl Frame {
    pub(crate) fn new(
        graphic_control: Option<GraphicControl>,
        image_desc: ImageDesc,
    ) -> Self {
        Frame {
            image_desc,
            graphic_control,
        }
    }
    /// Frame delay in milliseconds; zero without a graphic control.
    pub fn delay_ms(&self) -> u64 {
        self.graphic_control.map(|g| g.delay_ms()).unwrap_or(0)
    }
    /// Ordered key / value view of the frame record.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let d = &self.image_desc;
        let mut f = vec![
            ("Position", format!("({}, {})", d.left(), d.top())),
            ("Size", format!("{}x{}", d.width(), d.height())),
            ("Local Color Table", d.has_color_table().to_string()),
            ("Interlaced", d.interlaced().to_string()),
            ("Sort Flag", d.color_table_sorted().to_string()),
            ("Color Table Size", d.color_table_len().to_string()),
        ];
        if let Some(g) = &self.graphic_control {
            f.push(("Delay", format!("{}ms", g.delay_ms())));
            f.push(("Disposal Method", g.disposal_method().to_string()));
            f.push(("User Input", g.user_input().to_string()));
            f.push(("Transparency", g.transparency().to_string()));
            if let Some(t) = g.transparent_color() {
                f.push(("Transparent Color", t.to_string()));
            }
        }
        f
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn screen_desc_flags() {
        let d = LogicalScreenDesc::new(640, 480, 0b1111_0111, 3, 0);
        assert!(d.has_color_table());
        assert_eq!(d.color_resolution(), 8);
        assert!(!d.color_table_sorted());
        assert_eq!(d.color_table_len(), 256);
        assert_eq!(d.background_color_idx(), 3);
        let d = LogicalScreenDesc::new(2, 2, 0b0000_1000, 0, 0);
        assert!(!d.has_color_table());
        assert_eq!(d.color_resolution(), 1);
        assert!(d.color_table_sorted());
        assert_eq!(d.color_table_len(), 2);
    }

    #[test]
    fn color_table_len_powers_of_two() {
        for exp in 0..8u8 {
            let d = LogicalScreenDesc::new(1, 1, exp, 0, 0);
            let len = d.color_table_len();
            assert_eq!(len, 2 << exp as usize);
            assert!(len.is_power_of_two());
            assert!(len >= 2 && len <= 256);
        }
        let d = LogicalScreenDesc::new(1, 1, 0, 0, 0);
        assert_eq!(d.color_table_len(), 2);
        let d = LogicalScreenDesc::new(1, 1, 7, 0, 0);
        assert_eq!(d.color_table_len(), 256);
    }

    #[test]
    fn graphic_control_flags() {
        // disposal 2, user input clear, transparency set
        let g = GraphicControl::new(0b0000_1001, 50, 7);
        assert_eq!(g.disposal_method(), DisposalMethod::Background);
        assert!(!g.user_input());
        assert!(g.transparency());
        assert_eq!(g.transparent_color(), Some(7));
        assert_eq!(g.delay_ms(), 500);
        // transparency clear: index recorded as absent
        let g = GraphicControl::new(0b0000_0110, 0, 7);
        assert_eq!(g.disposal_method(), DisposalMethod::Keep);
        assert!(g.user_input());
        assert_eq!(g.transparent_color(), None);
    }

    #[test]
    fn disposal_method_names() {
        assert_eq!(
            DisposalMethod::from(0).to_string(),
            "No disposal specified"
        );
        assert_eq!(DisposalMethod::from(3).to_string(), "Restore to previous");
        assert_eq!(DisposalMethod::from(5).to_string(), "Unknown (5)");
    }

    #[test]
    fn image_desc_flags() {
        let d = ImageDesc::new(4, 8, 16, 32, 0b1100_0010);
        assert!(d.has_color_table());
        assert!(d.interlaced());
        assert!(!d.color_table_sorted());
        assert_eq!(d.color_table_len(), 8);
    }

    #[test]
    fn frame_fields_without_graphic_control() {
        let f = Frame::new(None, ImageDesc::new(0, 0, 1, 1, 0));
        let keys: Vec<_> = f.fields().iter().map(|(k, _)| *k).collect();
        assert!(!keys.contains(&"Delay"));
        assert_eq!(f.delay_ms(), 0);
    }
}
