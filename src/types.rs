//! Public types shared by the facade, the backends and the CLI.

use std::fmt;
use std::str::FromStr;

/// Chart kinds supported by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Time-keyed line chart.
    Line,
    /// Time-keyed stacked area chart.
    Area,
    /// Category-keyed vertical bars.
    Column,
    /// Category-keyed horizontal bars.
    Bar,
    /// Labelled slices of a single series.
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Line,
        ChartKind::Area,
        ChartKind::Column,
        ChartKind::Bar,
        ChartKind::Pie,
    ];

    /// Line and area charts key their points by timestamp.
    pub fn is_time(self) -> bool {
        matches!(self, ChartKind::Line | ChartKind::Area)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Column => "column",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown chart kind: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(" Column ".parse::<ChartKind>(), Ok(ChartKind::Column));
        assert!("donut".parse::<ChartKind>().is_err());
        assert!(ChartKind::ALL.iter().all(|k| k.as_str().parse::<ChartKind>() == Ok(*k)));
    }

    #[test]
    fn only_line_and_area_are_time_keyed() {
        let time: Vec<_> = ChartKind::ALL.into_iter().filter(|k| k.is_time()).collect();
        assert_eq!(time, [ChartKind::Line, ChartKind::Area]);
    }
}
