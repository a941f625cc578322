//! Reading point sets from delimited text.
use crate::{Result, SymNmfError};
use std::fs;
use std::path::Path;

/// Reads a point file: one point per line, coordinates separated by commas or whitespace.
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    let contents = fs::read_to_string(path)?;
    parse_points(&contents)
}

/// Parses one point per line. Blank lines are skipped; any token that is not a float, or a file
/// with no points, is a `MalformedInput` error.
///
/// # Examples
/// ```
///use symnmf::io::parse_points;
///
///let points = parse_points("1.0,2.0\n3.5, -4\n\n").unwrap();
///assert_eq!(points, vec![vec![1.0, 2.0], vec![3.5, -4.0]]);
///assert!(parse_points("1.0,abc\n").is_err());
/// ```
pub fn parse_points(contents: &str) -> Result<Vec<Vec<f64>>> {
    let points = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| parse_line(n, line))
        .collect::<Result<Vec<_>>>()?;
    if points.is_empty() {
        return Err(SymNmfError::MalformedInput(String::from(
            "Input contains no points",
        )));
    }
    Ok(points)
}

fn parse_line(n: usize, line: &str) -> Result<Vec<f64>> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<f64>().map_err(|e| {
                SymNmfError::MalformedInput(format!("line {}: {token:?}: {e}", n + 1))
            })
        })
        .collect()
}
