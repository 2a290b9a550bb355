//! Multi-frame XYZ trajectory reader
//!
//! Each frame is an atom count line, a comment line carrying the box edge
//! lengths, and `count` lines `symbol x y z`. The box is read from an extended
//! XYZ `Lattice="..."` entry when present (diagonal of the 3×3 matrix),
//! otherwise from the first three numbers on the comment line.

use crate::error::{PressureError, PressureResult};
use crate::frame::{Frame, FrameLayout, SimBox};
use nalgebra::Vector3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Which frames of the file are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSelection {
    pub first: usize,
    pub stride: usize,
    pub max_frames: Option<usize>,
}

impl Default for FrameSelection {
    fn default() -> Self {
        Self {
            first: 0,
            stride: 1,
            max_frames: None,
        }
    }
}

impl FrameSelection {
    fn keeps(&self, index: usize) -> bool {
        index >= self.first && (index - self.first) % self.stride.max(1) == 0
    }
}

/// One frame as stored in the file, before molecules are assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    pub box_lengths: Vector3<f64>,
    pub symbols: Vec<String>,
    pub coords: Vec<Vector3<f64>>,
}

pub struct XyzReader<R: BufRead> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> XyzReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    fn next_line(&mut self) -> PressureResult<Option<String>> {
        match self.lines.next() {
            Some(line) => {
                self.line_no += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    fn expect_line(&mut self, what: &str) -> PressureResult<String> {
        self.next_line()?.ok_or_else(|| PressureError::Parse {
            line: self.line_no + 1,
            message: format!("unexpected end of file, expected {}", what),
        })
    }

    fn parse_error(&self, message: String) -> PressureError {
        PressureError::Parse {
            line: self.line_no,
            message,
        }
    }

    /// Next frame, or `None` at a clean end of file.
    pub fn next_frame(&mut self) -> PressureResult<Option<RawFrame>> {
        let count_line = loop {
            match self.next_line()? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
            }
        };
        let n_atoms: usize = count_line
            .trim()
            .parse()
            .map_err(|_| self.parse_error(format!("invalid atom count '{}'", count_line.trim())))?;

        let comment = self.expect_line("comment line")?;
        let box_lengths = parse_box(&comment).ok_or_else(|| {
            self.parse_error(format!("no box lengths on comment line '{}'", comment.trim()))
        })?;

        let mut symbols = Vec::with_capacity(n_atoms);
        let mut coords = Vec::with_capacity(n_atoms);
        for _ in 0..n_atoms {
            let line = self.expect_line("atom line")?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return Err(self.parse_error(format!(
                    "atom line needs 'symbol x y z', got '{}'",
                    line.trim()
                )));
            }
            let mut xyz = [0.0; 3];
            for (value, field) in xyz.iter_mut().zip(&parts[1..4]) {
                *value = field
                    .parse()
                    .map_err(|_| self.parse_error(format!("bad coordinate '{}'", field)))?;
            }
            symbols.push(parts[0].to_string());
            coords.push(Vector3::from(xyz));
        }

        Ok(Some(RawFrame {
            box_lengths,
            symbols,
            coords,
        }))
    }
}

fn parse_box(comment: &str) -> Option<Vector3<f64>> {
    if let Some(start) = comment.find("Lattice=\"") {
        let rest = &comment[start + 9..];
        let matrix: Vec<f64> = rest[..rest.find('"')?]
            .split_whitespace()
            .map(|s| s.parse().ok())
            .collect::<Option<_>>()?;
        if matrix.len() != 9 {
            return None;
        }
        return Some(Vector3::new(matrix[0], matrix[4], matrix[8]));
    }

    let numbers: Vec<f64> = comment
        .split(|c: char| c.is_whitespace() || c == ',' || c == '=' || c == ';')
        .filter_map(|s| s.parse().ok())
        .take(3)
        .collect();
    (numbers.len() == 3).then(|| Vector3::new(numbers[0], numbers[1], numbers[2]))
}

fn water_order_matches(raw: &RawFrame, layout: &FrameLayout) -> bool {
    raw.symbols
        .chunks(3)
        .take(layout.n_molecules)
        .all(|names| {
            let element = |s: &String| {
                s.trim_start_matches(|c: char| c.is_ascii_digit())
                    .chars()
                    .next()
            };
            names.len() == 3
                && element(&names[0]) == Some('O')
                && names[1..].iter().all(|h| element(h) == Some('H'))
        })
}

/// Read every selected frame and assemble its molecules.
pub fn read_frames<R: BufRead>(
    reader: R,
    layout: &FrameLayout,
    cell_center: &Vector3<f64>,
    selection: &FrameSelection,
) -> PressureResult<Vec<Frame>> {
    let mut xyz = XyzReader::new(reader);
    let mut frames = Vec::new();
    let mut index = 0;
    loop {
        if selection.max_frames.is_some_and(|max| frames.len() >= max) {
            break;
        }
        let Some(raw) = xyz.next_frame()? else {
            break;
        };
        if selection.keeps(index) {
            if frames.is_empty() && !water_order_matches(&raw, layout) {
                warn!(
                    "frame {}: water sites are not listed as O, H, H; check system.n_molecules",
                    index
                );
            }
            let sim_box = SimBox::new(raw.box_lengths)?;
            frames.push(Frame::from_coordinates(index, sim_box, &raw.coords, layout, cell_center)?);
            debug!("frame {} loaded ({} atoms)", index, raw.coords.len());
        }
        index += 1;
    }

    if frames.is_empty() {
        return Err(PressureError::NoFrames);
    }
    Ok(frames)
}

pub fn load_frames(
    path: &Path,
    layout: &FrameLayout,
    cell_center: &Vector3<f64>,
    selection: &FrameSelection,
) -> PressureResult<Vec<Frame>> {
    info!("Reading trajectory {}", path.display());
    let frames = read_frames(BufReader::new(File::open(path)?), layout, cell_center, selection)?;
    info!("Loaded {} frames", frames.len());
    Ok(frames)
}
