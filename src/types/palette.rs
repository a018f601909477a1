//! Ordered marker palette.

use crate::error::{ConvertError, Result};

use super::Colour;

/// Marker colours from the built-in palette, in assignment order.
const DEFAULT_COLOURS: [Colour; 4] = [
    Colour::rgb(24, 77, 71),
    Colour::rgb(150, 187, 124),
    Colour::rgb(250, 213, 134),
    Colour::rgb(198, 71, 86),
];

/// Colour painted in the built-in marker icon.
const DEFAULT_PAINT: Colour = Colour::rgb(226, 76, 75);

/// An ordered, non-empty set of distinct marker colours.
///
/// The `paint` colour is the sentinel looked for in the reference marker; it
/// never appears among the palette entries, so a recoloured marker cannot be
/// confused with the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colours: Vec<Colour>,
    paint: Colour,
}

impl Palette {
    /// Create a palette, checking that it is usable for marker assignment.
    pub fn new(colours: Vec<Colour>, paint: Colour) -> Result<Self> {
        if colours.is_empty() {
            return Err(ConvertError::Parse {
                message: "Palette has no colours".to_string(),
                help: Some("List at least one colour under `palette`".to_string()),
            });
        }

        for (i, colour) in colours.iter().enumerate() {
            if !colour.is_opaque() {
                return Err(ConvertError::Parse {
                    message: format!("Palette colour {} is not opaque", colour),
                    help: Some("Use #RGB or #RRGGBB palette colours".to_string()),
                });
            }
            if *colour == paint {
                return Err(ConvertError::Parse {
                    message: format!("Palette entry {} equals the paint colour {}", i, paint),
                    help: Some("Pick a paint colour that is not a marker colour".to_string()),
                });
            }
            if colours[..i].contains(colour) {
                return Err(ConvertError::Parse {
                    message: format!("Palette colour {} is listed twice", colour),
                    help: None,
                });
            }
        }

        Ok(Self { colours, paint })
    }

    /// The built-in four colour palette.
    pub fn default_palette() -> Self {
        Self {
            colours: DEFAULT_COLOURS.to_vec(),
            paint: DEFAULT_PAINT,
        }
    }

    /// Get the colour at a palette index.
    pub fn get(&self, index: usize) -> Option<Colour> {
        self.colours.get(index).copied()
    }

    /// The sentinel colour replaced when recolouring markers.
    pub fn paint(&self) -> Colour {
        self.paint
    }

    /// Iterate over the marker colours in order.
    pub fn iter(&self) -> impl Iterator<Item = Colour> + '_ {
        self.colours.iter().copied()
    }

    /// Get the number of colours.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Check if the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::default_palette()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let palette = Palette::default_palette();
        assert_eq!(palette.len(), 4);
        assert_eq!(palette.get(0), Some(Colour::rgb(24, 77, 71)));
        assert_eq!(palette.get(4), None);
        assert_eq!(palette.paint(), Colour::rgb(226, 76, 75));
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(Palette::new(vec![], Colour::rgb(1, 2, 3)).is_err());
    }

    #[test]
    fn test_new_rejects_paint_in_palette() {
        let paint = Colour::rgb(1, 2, 3);
        assert!(Palette::new(vec![Colour::rgb(9, 9, 9), paint], paint).is_err());
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let red = Colour::rgb(255, 0, 0);
        assert!(Palette::new(vec![red, red], Colour::rgb(0, 0, 1)).is_err());
    }

    #[test]
    fn test_new_rejects_translucent_colours() {
        let paint = Colour::rgb(226, 76, 75);
        assert!(Palette::new(vec![Colour::new(10, 20, 30, 0)], paint).is_err());
        assert!(Palette::new(vec![Colour::rgb(10, 20, 30), Colour::new(1, 2, 3, 254)], paint).is_err());
        assert!(Palette::new(vec![Colour::new(10, 20, 30, 255)], paint).is_ok());
    }

    #[test]
    fn test_iter_keeps_order() {
        let colours = vec![Colour::rgb(3, 0, 0), Colour::rgb(1, 0, 0), Colour::rgb(2, 0, 0)];
        let palette = Palette::new(colours.clone(), Colour::rgb(0, 0, 9)).unwrap();
        assert_eq!(palette.iter().collect::<Vec<_>>(), colours);
    }
}
