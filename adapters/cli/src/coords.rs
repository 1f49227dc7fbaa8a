//! Parsing of `COLUMN,ROW` cell arguments.

use std::num::ParseIntError;

use pellet_maze_core::CellCoord;
use thiserror::Error;

/// Errors produced while parsing a `COLUMN,ROW` cell argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum CoordParseError {
    /// The value did not contain the `,` separator.
    #[error("expected COLUMN,ROW but found `{0}`")]
    MissingSeparator(String),
    /// One of the components was not a non-negative integer.
    #[error("invalid {axis} `{value}`: {source}")]
    InvalidComponent {
        /// Name of the offending component.
        axis: &'static str,
        /// Text that failed to parse.
        value: String,
        /// Underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },
}

/// Parses `COLUMN,ROW` into a cell coordinate; used as a clap value parser.
pub(crate) fn parse_cell(value: &str) -> Result<CellCoord, CoordParseError> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| CoordParseError::MissingSeparator(value.to_owned()))?;

    Ok(CellCoord::new(
        parse_component("column", column)?,
        parse_component("row", row)?,
    ))
}

fn parse_component(axis: &'static str, value: &str) -> Result<u32, CoordParseError> {
    let trimmed = value.trim();
    trimmed
        .parse()
        .map_err(|source| CoordParseError::InvalidComponent {
            axis,
            value: trimmed.to_owned(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_column_then_row() {
        assert_eq!(parse_cell("3,7"), Ok(CellCoord::new(3, 7)));
        assert_eq!(parse_cell(" 0 , 12 "), Ok(CellCoord::new(0, 12)));
    }

    #[test]
    fn reports_missing_separator() {
        assert_eq!(
            parse_cell("37"),
            Err(CoordParseError::MissingSeparator("37".to_owned()))
        );
    }

    #[test]
    fn reports_the_failing_axis() {
        let error = parse_cell("2,-1").expect_err("negative row rejected");

        assert!(matches!(
            error,
            CoordParseError::InvalidComponent { axis: "row", .. }
        ));
        assert!(error.to_string().starts_with("invalid row `-1`"));
    }
}
