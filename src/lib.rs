// lib.rs      gifprobe crate.
//
// Copyright (c) 2026  gifprobe developers
//
#[macro_use]
extern crate log;

pub mod block;
mod cursor;
mod decode;
mod document;
mod error;

pub use crate::cursor::Cursor;
pub use crate::decode::{Blocks, Decoder};
pub use crate::document::{Document, Field, Section};
pub use crate::error::{Error, Result};
