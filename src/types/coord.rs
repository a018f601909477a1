//! Point coordinates read from a `lat,lon` field.

/// A point position, kept as the text found in the input.
///
/// The input stores latitude first; KML wants longitude first, which is what
/// `Display` renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate<'a> {
    pub latitude: &'a str,
    pub longitude: &'a str,
}

impl<'a> Coordinate<'a> {
    /// Parse a `"<lat>,<lon>"` field.
    ///
    /// Returns `None` unless the field splits into exactly two non-empty parts.
    pub fn parse(field: &'a str) -> Option<Self> {
        let mut parts = field.split(',');
        let latitude = parts.next()?.trim();
        let longitude = parts.next()?.trim();

        if parts.next().is_some() || latitude.is_empty() || longitude.is_empty() {
            return None;
        }

        Some(Self {
            latitude,
            longitude,
        })
    }
}

impl std::fmt::Display for Coordinate<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.longitude, self.latitude)
    }
}
