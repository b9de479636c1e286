//! Plain-text graymap (PGM `P2`) encoding
//!
//! # Format
//!
//! ```text
//! P2
//! # dpi=300 background=255
//! W H
//! 255
//! v v v ...        (one image row per line)
//! ```
//!
//! The metadata comment is optional when reading; resolution and
//! background then fall back to 300 and 255. Other comments are ignored.
//! A `maxval` other than 255 is rescaled to the 0..=255 range.

use crate::{IoError, IoResult, checked_area};
use sheetscan_core::{Canvas, CanvasMut, DEFAULT_BACKGROUND, DEFAULT_DPI};
use std::io::Write;

/// Magic token of the plain graymap format.
pub const PGM_MAGIC: &str = "P2";

const MAX_VALUE: u32 = 255;

/// Write a canvas as a plain graymap.
pub fn write_pgm<W: Write>(canvas: &Canvas, mut writer: W) -> IoResult<()> {
    writeln!(writer, "{PGM_MAGIC}")?;
    writeln!(
        writer,
        "# dpi={} background={}",
        canvas.dpi(),
        canvas.background()
    )?;
    writeln!(writer, "{} {}", canvas.width(), canvas.height())?;
    writeln!(writer, "{MAX_VALUE}")?;

    let mut line = String::new();
    for row in canvas.data().chunks(canvas.width() as usize) {
        line.clear();
        for (i, v) in row.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(&v.to_string());
        }
        line.push('\n');
        writer.write_all(line.as_bytes())?;
    }
    Ok(())
}

/// Metadata carried in `key=value` comment tokens
struct Metadata {
    dpi: u32,
    background: u8,
}

fn parse_comment(comment: &str, meta: &mut Metadata) -> IoResult<()> {
    for token in comment.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        match key {
            "dpi" => {
                meta.dpi = value
                    .parse()
                    .ok()
                    .filter(|&d| d > 0)
                    .ok_or_else(|| IoError::MalformedImage(format!("bad dpi '{value}'")))?;
            }
            "background" => {
                meta.background = value
                    .parse()
                    .map_err(|_| IoError::MalformedImage(format!("bad background '{value}'")))?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_number(token: &str, what: &str) -> IoResult<u32> {
    token
        .parse()
        .map_err(|_| IoError::MalformedImage(format!("non-numeric {what} '{token}'")))
}

/// Read a canvas from a plain graymap.
///
/// # Errors
///
/// Returns [`IoError::MalformedImage`] on a wrong magic token, a
/// non-numeric token, a value above `maxval`, or a pixel count that
/// differs from `width * height`.
pub fn read_pgm(data: &[u8]) -> IoResult<Canvas> {
    let text = std::str::from_utf8(data)
        .map_err(|_| IoError::MalformedImage("graymap is not valid text".into()))?;

    let mut meta = Metadata {
        dpi: DEFAULT_DPI,
        background: DEFAULT_BACKGROUND,
    };
    let mut tokens = Vec::new();
    for line in text.lines() {
        let (body, comment) = match line.split_once('#') {
            Some((body, comment)) => (body, Some(comment)),
            None => (line, None),
        };
        tokens.extend(body.split_whitespace());
        if let Some(comment) = comment {
            parse_comment(comment, &mut meta)?;
        }
    }

    let mut iter = tokens.into_iter();
    match iter.next() {
        Some(PGM_MAGIC) => {}
        Some(other) => {
            return Err(IoError::MalformedImage(format!(
                "magic '{other}', expected '{PGM_MAGIC}'"
            )));
        }
        None => return Err(IoError::MalformedImage("empty graymap".into())),
    }

    let mut header = [0u32; 3];
    for (slot, what) in header.iter_mut().zip(["width", "height", "maxval"]) {
        let token = iter
            .next()
            .ok_or_else(|| IoError::MalformedImage(format!("missing {what}")))?;
        *slot = parse_number(token, what)?;
    }
    let [width, height, maxval] = header;
    let expected = checked_area(width, height)?;
    if maxval == 0 || maxval > u16::MAX as u32 {
        return Err(IoError::MalformedImage(format!("invalid maxval {maxval}")));
    }

    let values: Vec<&str> = iter.collect();
    if values.len() != expected {
        return Err(IoError::MalformedImage(format!(
            "expected {expected} pixels for {width}x{height}, found {}",
            values.len()
        )));
    }

    let mut canvas = CanvasMut::new(width, height, meta.background)?;
    canvas.set_dpi(meta.dpi)?;
    for (dst, token) in canvas.data_mut().iter_mut().zip(values) {
        let v = parse_number(token, "pixel")?;
        if v > maxval {
            return Err(IoError::MalformedImage(format!(
                "pixel value {v} exceeds maxval {maxval}"
            )));
        }
        *dst = if maxval == MAX_VALUE {
            v as u8
        } else {
            ((v * MAX_VALUE + maxval / 2) / maxval) as u8
        };
    }

    Ok(canvas.into())
}
