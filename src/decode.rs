// decode.rs
//
// Copyright (c) 2026  gifprobe developers
//
use crate::block::*;
use crate::cursor::Cursor;
use crate::error::{Error, Result};

/// GIF metadata decoder.
///
/// Reads the fixed prologue with [preamble](struct.Decoder.html#method.preamble),
/// then iterates the frame / extension stream as [Block](block/enum.Block.html)s.
///
/// ## Example
/// ```
/// # fn main() -> Result<(), gifprobe::Error> {
/// # let gif = &[
/// #   0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00,
/// #   0x02, 0x00, 0x80, 0x01, 0x00, 0x00, 0x00, 0x00,
/// #   0xff, 0xff, 0xff, 0x2c, 0x00, 0x00, 0x00, 0x00,
/// #   0x02, 0x00, 0x02, 0x00, 0x00, 0x02, 0x03, 0x0c,
/// #   0x10, 0x05, 0x00, 0x3b,
/// # ][..];
/// let mut decoder = gifprobe::Decoder::new(gif);
/// let preamble = decoder.preamble()?;
/// println!("canvas: {:?}", preamble.logical_screen_desc);
/// for block in decoder.into_blocks() {
///     println!("block: {:?}", block?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Decoder<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Decoder<'a> {
    /// Create a new decoder over a complete GIF byte stream.
    pub fn new(buf: &'a [u8]) -> Self {
        Decoder {
            cursor: Cursor::new(buf),
        }
    }

    /// Read the preamble blocks: Header, Logical Screen Descriptor and,
    /// when declared, the Global Color Table.  Failures here are fatal.
    pub fn preamble(&mut self) -> Result<Preamble> {
        let header = self.header()?;
        let logical_screen_desc = self.logical_screen_desc()?;
        let global_color_table = if logical_screen_desc.has_color_table() {
            let len = logical_screen_desc.color_table_len();
            Some(self.global_color_table(len)?)
        } else {
            None
        };
        Ok(Preamble {
            header,
            logical_screen_desc,
            global_color_table,
        })
    }

    /// Convert into a block `Iterator` over the frame / extension stream.
    pub fn into_blocks(self) -> Blocks<'a> {
        Blocks {
            cursor: self.cursor,
            done: false,
        }
    }

    fn header(&mut self) -> Result<Header> {
        let buf = self.cursor.read(6)?;
        let signature = ascii_str(&buf[..3])?;
        let version = ascii_str(&buf[3..])?;
        Ok(Header::new(signature, version))
    }

    fn logical_screen_desc(&mut self) -> Result<LogicalScreenDesc> {
        let width = self.cursor.read_u16_le()?;
        let height = self.cursor.read_u16_le()?;
        let flags = self.cursor.read_u8()?;
        let bg_color = self.cursor.read_u8()?;
        let aspect = self.cursor.read_u8()?;
        Ok(LogicalScreenDesc::new(width, height, flags, bg_color, aspect))
    }

    fn global_color_table(&mut self, len: usize) -> Result<GlobalColorTable> {
        let buf = self.cursor.read(len * 3)?;
        let colors = buf
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Ok(GlobalColorTable::with_colors(colors))
    }
}

/// Strict ASCII decoding, used for the header only.  Comment text goes
/// through the tolerant path in `Blocks::comment` instead.
fn ascii_str(buf: &[u8]) -> Result<String> {
    if buf.is_ascii() {
        Ok(buf.iter().map(|&b| char::from(b)).collect())
    } else {
        Err(Error::InvalidEncoding)
    }
}

/// Iterator over the [Block](block/enum.Block.html)s following the preamble.
///
/// Unrecognized tag bytes are discarded and iteration continues; this is a
/// resynchronization policy, so a malformed stream lacking a Trailer can
/// only terminate at end-of-stream, never with an error on a bad tag.
/// The first decode error fuses the iterator.
pub struct Blocks<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        use self::BlockCode::*;
        while !self.done {
            let t = match self.cursor.read_u8() {
                Ok(t) => t,
                Err(_) => break, // empty read ends the stream
            };
            let res = match BlockCode::from_u8(t) {
                Some(ImageDesc_) => self.image_desc(),
                Some(Extension_) => self.extension(),
                Some(Trailer_) => {
                    self.done = true;
                    return Some(Ok(Block::Trailer));
                }
                None => {
                    debug!("discarding unrecognized byte {:02X}", t);
                    continue;
                }
            };
            if res.is_err() {
                self.done = true;
            }
            return Some(res);
        }
        self.done = true;
        None
    }
}

impl<'a> Blocks<'a> {
    /// Parse an Image Descriptor.  Local color table contents and the
    /// compressed image data are skipped, not materialized.
    fn image_desc(&mut self) -> Result<Block> {
        let left = self.cursor.read_u16_le()?;
        let top = self.cursor.read_u16_le()?;
        let width = self.cursor.read_u16_le()?;
        let height = self.cursor.read_u16_le()?;
        let flags = self.cursor.read_u8()?;
        let desc = ImageDesc::new(left, top, width, height, flags);
        debug!("  block  : {:?}", desc);
        if desc.has_color_table() {
            self.cursor.skip(desc.color_table_len() * 3)?;
        }
        self.cursor.skip(1)?; // LZW minimum code size
        self.skip_sub_blocks();
        Ok(Block::ImageDesc(desc))
    }

    /// Dispatch on the extension label.  Every arm is followed by a
    /// generic sub-block skip, even when the handler already consumed
    /// its own chain terminator.
    fn extension(&mut self) -> Result<Block> {
        use self::ExtensionCode::*;
        let label = self.cursor.read_u8()?;
        let block = match label.into() {
            GraphicControl_ => Block::GraphicControl(self.graphic_control()?),
            Application_ => Block::Application(self.application()?),
            Comment_ => Block::Comment(self.comment()?),
            Unknown_(n) => {
                debug!("unknown extension {:02X}", n);
                Block::Unknown(n)
            }
        };
        self.skip_sub_blocks();
        Ok(block)
    }

    fn graphic_control(&mut self) -> Result<GraphicControl> {
        self.cursor.skip(1)?; // block size, always 4, unvalidated
        let flags = self.cursor.read_u8()?;
        let delay = self.cursor.read_u16_le()?;
        let transparent_idx = self.cursor.read_u8()?;
        Ok(GraphicControl::new(flags, delay, transparent_idx))
    }

    fn application(&mut self) -> Result<Application> {
        let sz = self.cursor.read_u8()? as usize;
        let ident = self.cursor.read(sz)?.to_vec();
        let loop_count = if ident == b"NETSCAPE2.0" {
            self.netscape()?
        } else {
            self.skip_sub_blocks();
            None
        };
        Ok(Application::new(ident, loop_count))
    }

    /// Netscape loop sub-extension: a size-3 sub-block carries the
    /// animation iteration count (zero means loop forever).
    fn netscape(&mut self) -> Result<Option<u16>> {
        let mut count = None;
        loop {
            let sz = self.cursor.read_u8()? as usize;
            if sz == 0 {
                break;
            }
            if sz == 3 {
                self.cursor.skip(1)?; // sub-block ID, expected 1, unvalidated
                count = Some(self.cursor.read_u16_le()?);
            } else {
                self.cursor.skip(sz)?;
            }
        }
        Ok(count)
    }

    /// Comment text is decoded best-effort: non-ASCII bytes are dropped,
    /// never an error.
    fn comment(&mut self) -> Result<String> {
        let mut comment = String::new();
        loop {
            let sz = self.cursor.read_u8()? as usize;
            if sz == 0 {
                break;
            }
            for &b in self.cursor.read(sz)? {
                if b.is_ascii() {
                    comment.push(char::from(b));
                }
            }
        }
        Ok(comment)
    }

    /// The canonical data sub-block chain: one length byte plus payload,
    /// repeated, terminated by a zero length or an empty read.  Skips are
    /// clamped to the bytes remaining, so a truncated chain simply ends
    /// at end-of-stream.
    fn skip_sub_blocks(&mut self) {
        while let Ok(sz) = self.cursor.read_u8() {
            if sz == 0 {
                break;
            }
            let n = (sz as usize).min(self.cursor.remaining());
            if self.cursor.skip(n).is_err() {
                break;
            }
        }
    }
}
