//! Centralized display formatting utilities.
//!
//! Notification text in every language goes through this module so
//! coordinates read the same in spawn and disappearance messages.

/// Format world coordinates with three decimal places, comma separated.
///
/// # Examples
/// ```
/// use dropwatch_types::formatting::format_coordinates;
/// assert_eq!(format_coordinates(100.0, 200.0, 0.0), "100.000, 200.000, 0.000");
/// assert_eq!(format_coordinates(-1.23456, 2.5, 7.0), "-1.235, 2.500, 7.000");
/// ```
pub fn format_coordinates(x: f64, y: f64, z: f64) -> String {
    format!("{:.3}, {:.3}, {:.3}", x, y, z)
}
