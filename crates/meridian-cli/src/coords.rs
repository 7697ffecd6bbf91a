//! Reading and writing coordinate tuples as text, one tuple per line.

use std::io::BufRead;

use anyhow::{Context, Result, bail};

/// Parse one line into a tuple of `dimension` values.
///
/// Components are separated by whitespace and/or commas. Missing trailing
/// components are filled with 0. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str, dimension: usize) -> Result<Option<Vec<f64>>> {
    let content = line.split('#').next().unwrap_or_default().trim();
    if content.is_empty() {
        return Ok(None);
    }

    let mut values = content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .with_context(|| format!("`{s}` is not a number"))
        })
        .collect::<Result<Vec<_>>>()?;

    if values.len() < 2 {
        bail!("expected at least 2 components, found {}", values.len());
    }
    if values.len() > dimension {
        bail!(
            "expected at most {dimension} components, found {}",
            values.len()
        );
    }
    values.resize(dimension, 0.0);
    Ok(Some(values))
}

/// Read every tuple from `reader` into one flat buffer.
pub fn read_tuples(reader: impl BufRead, dimension: usize) -> Result<Vec<f64>> {
    let mut buffer = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        if let Some(tuple) =
            parse_line(&line, dimension).with_context(|| format!("line {}", index + 1))?
        {
            buffer.extend_from_slice(&tuple);
        }
    }
    Ok(buffer)
}

pub fn format_tuple(tuple: &[f64], precision: usize) -> String {
    tuple
        .iter()
        .map(|v| format!("{v:.precision$}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_and_commas_both_separate() {
        assert_eq!(
            parse_line("-75.0, 45.0", 2).unwrap(),
            Some(vec![-75.0, 45.0])
        );
        assert_eq!(
            parse_line("  -75 45\t100 ", 3).unwrap(),
            Some(vec![-75.0, 45.0, 100.0])
        );
    }

    #[test]
    fn short_tuples_are_padded() {
        assert_eq!(
            parse_line("1 2", 4).unwrap(),
            Some(vec![1.0, 2.0, 0.0, 0.0])
        );
    }

    #[test]
    fn blanks_and_comments_are_skipped() {
        assert_eq!(parse_line("", 2).unwrap(), None);
        assert_eq!(parse_line("   # origin", 2).unwrap(), None);
        assert_eq!(
            parse_line("1 2 # trailing", 2).unwrap(),
            Some(vec![1.0, 2.0])
        );
    }

    #[test]
    fn malformed_lines_are_errors() {
        assert!(parse_line("1", 2).is_err());
        assert!(parse_line("1 2 3", 2).is_err());
        assert!(parse_line("1 north", 2).is_err());
    }

    #[test]
    fn read_tuples_flattens_and_reports_line_numbers() {
        let input = "1 2\n\n3,4\n";
        assert_eq!(
            read_tuples(input.as_bytes(), 2).unwrap(),
            vec![1.0, 2.0, 3.0, 4.0]
        );

        let err = read_tuples("1 2\nx y\n".as_bytes(), 2).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn format_uses_fixed_precision() {
        assert_eq!(format_tuple(&[500000.0, 4983436.7686], 2), "500000.00 4983436.77");
        assert_eq!(format_tuple(&[-75.0, 45.0], 0), "-75 45");
    }
}
