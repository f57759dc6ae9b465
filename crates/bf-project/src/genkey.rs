//! Import of OLGA `.genkey` pipeline geometry.
//!
//! Only the `GEOMETRY` line (the inlet) and the `PIPE` lines are read; every
//! other keyword is ignored. Lengths and diameters given in `km` or `mm` are
//! converted to metres. A pipe longer than [`MAX_SEGMENT_LENGTH_M`] becomes a
//! `pipeseries` whose segments are no longer than that.
//!
//! ```text
//! GEOMETRY LABEL="Pipeline", XSTART=0 m, YSTART=12 m
//! PIPE LABEL="Landfall", XEND=150 m, YEND=10 m, DIAMETER=914.4 mm
//! PIPE LABEL="Offshore", NSEGMENT=4, LSEGMENT=(0.1, 0.2, 0.2, 0.1) km, XEND=0.75 km, YEND=-90 m, DIAMETER=914.4 mm
//! ```

use bf_core::round_to;

use crate::schema::{Instruction, NetworkFile};
use crate::validate::LATEST_VERSION;

/// Longest pipe segment produced by the import [m].
pub const MAX_SEGMENT_LENGTH_M: f64 = 200.0;

/// Decimal digits kept for imported lengths and elevations.
const PRECISION: u32 = 4;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GenkeyError {
    #[error("Missing {keyword} line")]
    MissingLine { keyword: &'static str },

    #[error("Line {line}: {what}")]
    Syntax { line: usize, what: String },
}

pub type GenkeyResult<T> = Result<T, GenkeyError>;

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Text(String),
    /// Converted to metres when the unit was `km` or `mm`.
    Number(f64),
}

/// One keyword line: `KEYWORD KEY=value, KEY=value, ...`.
#[derive(Debug)]
struct KeyLine {
    line: usize,
    keyword: String,
    params: Vec<(String, Value)>,
}

impl KeyLine {
    fn parse(line: usize, text: &str) -> Self {
        let text = text.trim();
        let (keyword, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        let params = split_top_level(rest)
            .into_iter()
            .filter_map(|param| {
                let (key, value) = param.split_once('=')?;
                Some((key.trim().to_uppercase(), parse_value(value.trim())?))
            })
            .collect();
        Self {
            line,
            keyword: keyword.to_uppercase(),
            params,
        }
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn number(&self, key: &str) -> GenkeyResult<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(*n)),
            Some(Value::Text(t)) => Err(self.error(format!("{key} must be a number, got \"{t}\""))),
        }
    }

    fn required_number(&self, key: &str) -> GenkeyResult<f64> {
        self.number(key)?
            .ok_or_else(|| self.error(format!("{} has no {key}", self.keyword)))
    }

    fn label(&self) -> GenkeyResult<String> {
        match self.get("LABEL") {
            Some(Value::Text(t)) => Ok(t.clone()),
            _ => Err(self.error(format!("{} has no LABEL", self.keyword))),
        }
    }

    fn error(&self, what: String) -> GenkeyError {
        GenkeyError::Syntax {
            line: self.line,
            what,
        }
    }
}

/// Split on commas outside parentheses, so `LSEGMENT=(1, 2) m` stays whole.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts.into_iter().map(str::trim).filter(|p| !p.is_empty()).collect()
}

/// Quoted text, or a leading number with an optional unit. Lists and bare
/// words yield `None`.
fn parse_value(raw: &str) -> Option<Value> {
    if let Some(quoted) = raw.strip_prefix('"') {
        let end = quoted.find('"')?;
        return Some(Value::Text(quoted[..end].to_string()));
    }

    let numeric_len = raw
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || c == '.' || (i == 0 && c == '-'))
        .count();
    let number: f64 = raw[..numeric_len].parse().ok()?;
    let scale = match raw[numeric_len..].trim() {
        "km" => 1000.0,
        "mm" => 1e-3,
        _ => 1.0,
    };
    Some(Value::Number(round_to(number * scale, PRECISION)))
}

/// Lengths of the pieces a pipe is cut into.
pub fn segment_lengths(total: f64) -> Vec<f64> {
    if total <= MAX_SEGMENT_LENGTH_M {
        return vec![total];
    }
    let mut lengths = Vec::new();
    let mut remainder = total;
    while remainder >= MAX_SEGMENT_LENGTH_M {
        lengths.push(MAX_SEGMENT_LENGTH_M);
        remainder = round_to(remainder - MAX_SEGMENT_LENGTH_M, PRECISION);
    }
    if remainder > 0.0 {
        lengths.push(remainder);
    }
    lengths
}

/// Translate genkey text into a network file named `name`.
///
/// The result holds an inlet followed by the pipeline. It still needs the
/// downstream elements and a `setfluid` before it can be simulated.
pub fn import_genkey(name: &str, source: &str) -> GenkeyResult<NetworkFile> {
    let lines: Vec<KeyLine> = source
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(i, text)| KeyLine::parse(i + 1, text))
        .collect();

    let geometry = lines
        .iter()
        .find(|l| l.keyword == "GEOMETRY")
        .ok_or(GenkeyError::MissingLine { keyword: "GEOMETRY" })?;

    let mut elevation = geometry.number("YSTART")?.unwrap_or(0.0);
    let mut x = geometry.number("XSTART")?.unwrap_or(0.0);
    let mut instructions = vec![Instruction::Inlet {
        name: geometry.label()?,
        elevation_m: elevation,
    }];

    for pipe in lines.iter().filter(|l| l.keyword == "PIPE") {
        let x_end = pipe.required_number("XEND")?;
        let end_elevation = pipe.number("YEND")?.unwrap_or(elevation);
        let diameter = pipe.required_number("DIAMETER")?;

        let rise = end_elevation - elevation;
        let length = round_to((x_end - x).hypot(rise), PRECISION);
        instructions.push(pipe_instruction(
            pipe.label()?,
            length,
            diameter,
            elevation,
            rise,
        ));

        x = x_end;
        elevation = end_elevation;
    }

    if instructions.len() == 1 {
        return Err(GenkeyError::MissingLine { keyword: "PIPE" });
    }

    Ok(NetworkFile {
        version: LATEST_VERSION,
        name: name.to_string(),
        settings: None,
        instructions,
    })
}

fn pipe_instruction(name: String, length: f64, diameter: f64, start: f64, rise: f64) -> Instruction {
    if length <= MAX_SEGMENT_LENGTH_M {
        return Instruction::PipeSeg {
            name,
            length_m: length,
            diameters_m: vec![diameter],
            elevation_m: start,
        };
    }

    let lengths = segment_lengths(length);
    let mut covered = 0.0;
    let elevations = lengths
        .iter()
        .map(|piece| {
            let at = round_to(start + rise * covered / length, PRECISION);
            covered += piece;
            at
        })
        .collect();

    Instruction::PipeSeries {
        name,
        count: lengths.len(),
        length_m: length,
        diameters_m: vec![diameter],
        elevation_m: start,
        elevations_m: elevations,
        lengths_m: lengths,
    }
}
