//! Paper formats for the PDF Assembler. Dimensions are in PDF points (1/72in).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

const MM_PER_INCH: f32 = 25.4;
const POINTS_PER_INCH: f32 = 72.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperFormat {
    #[default]
    A4,
    Letter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page width and height in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PaperFormat {
    /// Portrait page size.
    fn portrait(self) -> PageSize {
        match self {
            PaperFormat::A4 => PageSize {
                width_pt: mm_to_pt(210.0),
                height_pt: mm_to_pt(297.0),
            },
            PaperFormat::Letter => PageSize {
                width_pt: 8.5 * POINTS_PER_INCH,
                height_pt: 11.0 * POINTS_PER_INCH,
            },
        }
    }

    pub fn page_size(self, orientation: Orientation) -> PageSize {
        let portrait = self.portrait();
        match orientation {
            Orientation::Portrait => portrait,
            Orientation::Landscape => PageSize {
                width_pt: portrait.height_pt,
                height_pt: portrait.width_pt,
            },
        }
    }
}

fn mm_to_pt(mm: f32) -> f32 {
    mm / MM_PER_INCH * POINTS_PER_INCH
}

impl FromStr for PaperFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PaperFormat::A4),
            "letter" => Ok(PaperFormat::Letter),
            other => Err(format!("unknown paper format '{other}' (expected a4 or letter)")),
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => Err(format!(
                "unknown orientation '{other}' (expected portrait or landscape)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_portrait_in_points() {
        let size = PaperFormat::A4.page_size(Orientation::Portrait);
        assert!((size.width_pt - 595.28).abs() < 0.01);
        assert!((size.height_pt - 841.89).abs() < 0.01);
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let size = PaperFormat::Letter.page_size(Orientation::Landscape);
        assert_eq!(size.width_pt, 792.0);
        assert_eq!(size.height_pt, 612.0);
    }

    #[test]
    fn test_parse_from_env_strings() {
        assert_eq!("A4".parse::<PaperFormat>(), Ok(PaperFormat::A4));
        assert_eq!(" letter ".parse::<PaperFormat>(), Ok(PaperFormat::Letter));
        assert!("a5".parse::<PaperFormat>().is_err());
        assert_eq!("Landscape".parse::<Orientation>(), Ok(Orientation::Landscape));
    }
}
