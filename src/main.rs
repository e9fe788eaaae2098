// main.rs      gifprobe command
//
// Copyright (c) 2026  gifprobe developers
//
#![forbid(unsafe_code)]

use clap::{App, AppSettings, Arg};
use gifprobe::Document;
use std::error::Error;
use std::fs;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Crate version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main entry point
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().format_timestamp(None).init();
    let matches = App::new("gifprobe")
        .version(VERSION)
        .about("Extract metadata from GIF files")
        .setting(AppSettings::ArgRequiredElseHelp)
        .arg(
            Arg::with_name("file")
                .required(true)
                .help("GIF file to inspect"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("save the report to a file"),
        )
        .get_matches();
    let mut out = StandardStream::stdout(ColorChoice::Always);
    if let Some(path) = matches.value_of("file") {
        let doc = Document::parse_file(path)?;
        match matches.value_of("output") {
            Some(dest) => {
                fs::write(dest, report(&doc))?;
                writeln!(out, "Result saved to {}", dest)?;
            }
            None => show(&mut out, path, &doc)?,
        }
    }
    out.reset()?;
    Ok(())
}

/// Flat text report: section / key / value / description lines, then
/// per-frame key / value lines.
fn report(doc: &Document) -> String {
    let mut text = vec!["=== GIF Information ===".to_string()];
    for section in doc.sections() {
        text.push(format!("\n{}:", section.name));
        for f in &section.fields {
            text.push(format!("{}: {} ({})", f.key, f.value, f.description));
        }
    }
    text.push("\n=== Frame Information ===".to_string());
    for (i, frame) in doc.frames().iter().enumerate() {
        text.push(format!("\nFrame {}:", i + 1));
        for (key, value) in frame.fields() {
            text.push(format!("{}: {}", key, value));
        }
    }
    text.join("\n")
}

/// Colored report on stdout.
fn show(
    out: &mut StandardStream,
    path: &str,
    doc: &Document,
) -> Result<(), Box<dyn Error>> {
    let mut magenta = ColorSpec::new();
    magenta.set_fg(Some(Color::Magenta));
    let mut yellow = ColorSpec::new();
    yellow.set_fg(Some(Color::Yellow)).set_intense(true);
    let mut bold = ColorSpec::new();
    bold.set_fg(Some(Color::White))
        .set_intense(true)
        .set_bold(true);
    let mut dflt = ColorSpec::new();
    dflt.set_fg(Some(Color::White));
    out.set_color(&magenta)?;
    writeln!(out, "{}", path)?;
    for section in doc.sections() {
        out.set_color(&yellow)?;
        writeln!(out, "{}:", section.name)?;
        for f in &section.fields {
            out.set_color(&bold)?;
            write!(out, "  {}: ", f.key)?;
            out.set_color(&dflt)?;
            writeln!(out, "{} ({})", f.value, f.description)?;
        }
    }
    for (i, frame) in doc.frames().iter().enumerate() {
        out.set_color(&yellow)?;
        writeln!(out, "Frame {}:", i + 1)?;
        for (key, value) in frame.fields() {
            out.set_color(&bold)?;
            write!(out, "  {}: ", key)?;
            out.set_color(&dflt)?;
            writeln!(out, "{}", value)?;
        }
    }
    Ok(())
}
