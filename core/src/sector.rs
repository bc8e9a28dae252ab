//! World coordinate to map sector conversion.
//!
//! The game map is a 5x5 grid. Rows are lettered north to south by the Y
//! coordinate, columns are numbered west to east by the X coordinate. Each
//! axis is a list of closed intervals scanned in order; the first interval
//! containing the value wins, so a value sitting exactly on a shared bound
//! belongs to the band listed first.

use std::fmt;

/// A closed interval `[min, max]` on one axis mapped to a label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band<T> {
    pub label: T,
    pub max: f64,
    pub min: f64,
}

impl<T: Copy> Band<T> {
    pub const fn new(label: T, max: f64, min: f64) -> Self {
        Self { label, max, min }
    }

    #[inline]
    fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

const SCUM_ROWS: [Band<char>; 5] = [
    Band::new('D', 619_200.0, 315_274.0),
    Band::new('C', 315_274.0, 10_507.0),
    Band::new('B', 10_507.0, -293_418.0),
    Band::new('A', -293_418.0, -598_214.0),
    Band::new('Z', -598_214.0, -904_205.0),
];

const SCUM_COLUMNS: [Band<u8>; 5] = [
    Band::new(4, 617_516.0, 316_116.0),
    Band::new(3, 316_116.0, 11_349.0),
    Band::new(2, 11_349.0, -294_260.0),
    Band::new(1, -294_260.0, -599_028.0),
    Band::new(0, -599_028.0, -904_205.0),
];

/// Result of a sector lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    Grid { row: char, column: u8 },
    /// At least one axis fell outside every band
    Unknown,
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid { row, column } => write!(f, "{}{}", row, column),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Immutable lookup table built once at startup and shared by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorMap {
    rows: Vec<Band<char>>,
    columns: Vec<Band<u8>>,
}

impl Default for SectorMap {
    fn default() -> Self {
        Self::scum()
    }
}

impl SectorMap {
    pub fn new(rows: Vec<Band<char>>, columns: Vec<Band<u8>>) -> Self {
        Self { rows, columns }
    }

    /// The SCUM island grid
    pub fn scum() -> Self {
        Self::new(SCUM_ROWS.to_vec(), SCUM_COLUMNS.to_vec())
    }

    /// Row letter for a Y coordinate
    pub fn row(&self, y: f64) -> Option<char> {
        lookup(&self.rows, y)
    }

    /// Column number for an X coordinate
    pub fn column(&self, x: f64) -> Option<u8> {
        lookup(&self.columns, x)
    }

    /// Convert a world position to its sector.
    ///
    /// # Examples
    /// ```
    /// use dropwatch_core::sector::SectorMap;
    /// let map = SectorMap::scum();
    /// assert_eq!(map.sector(100.0, 200.0).to_string(), "B2");
    /// assert_eq!(map.sector(2_000_000.0, 200.0).to_string(), "Unknown");
    /// ```
    pub fn sector(&self, x: f64, y: f64) -> Sector {
        match (self.row(y), self.column(x)) {
            (Some(row), Some(column)) => Sector::Grid { row, column },
            _ => Sector::Unknown,
        }
    }
}

fn lookup<T: Copy>(bands: &[Band<T>], value: f64) -> Option<T> {
    bands.iter().find(|band| band.contains(value)).map(|band| band.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_interiors() {
        let map = SectorMap::scum();
        assert_eq!(map.sector(400_000.0, 400_000.0).to_string(), "D4");
        assert_eq!(map.sector(100_000.0, 100_000.0).to_string(), "C3");
        assert_eq!(map.sector(-100_000.0, -100_000.0).to_string(), "B2");
        assert_eq!(map.sector(-400_000.0, -400_000.0).to_string(), "A1");
        assert_eq!(map.sector(-700_000.0, -700_000.0).to_string(), "Z0");
        assert_eq!(map.sector(-700_000.0, 500_000.0).to_string(), "D0");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let map = SectorMap::scum();
        assert_eq!(map.row(619_200.0), Some('D'));
        assert_eq!(map.row(-904_205.0), Some('Z'));
        assert_eq!(map.column(617_516.0), Some(4));
        assert_eq!(map.column(-904_205.0), Some(0));
    }

    #[test]
    fn test_shared_bound_goes_to_first_band() {
        let map = SectorMap::scum();
        assert_eq!(map.row(315_274.0), Some('D'));
        assert_eq!(map.row(10_507.0), Some('C'));
        assert_eq!(map.column(11_349.0), Some(3));
    }

    #[test]
    fn test_outside_either_axis_is_unknown() {
        let map = SectorMap::scum();
        assert_eq!(map.sector(0.0, 619_200.5), Sector::Unknown);
        assert_eq!(map.sector(-904_205.5, 0.0), Sector::Unknown);
        assert_eq!(map.sector(f64::NAN, 0.0), Sector::Unknown);
        assert_eq!(Sector::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_custom_map() {
        let map = SectorMap::new(
            vec![Band::new('N', 10.0, 0.0), Band::new('S', 0.0, -10.0)],
            vec![Band::new(1, 0.0, -10.0), Band::new(2, 10.0, 0.0)],
        );
        assert_eq!(map.sector(0.0, 0.0), Sector::Grid { row: 'N', column: 1 });
        assert_eq!(map.sector(5.0, -5.0).to_string(), "S2");
    }
}
