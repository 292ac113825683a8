//! # Location Decomposer
//! Splits the scraped free-text location into (neighborhood, city, state)
//! by positional convention: the last comma segment is the state, the
//! second-to-last the city, and all leading segments joined with ", "
//! form the neighborhood.

use serde::{Deserialize, Serialize};

/// Outcome of decomposing a raw location string.
///
/// The positional convention needs at least two segments; anything
/// shorter is tagged `Incomplete` instead of guessing which field the
/// remaining text belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationParts {
    Parsed {
        /// Empty when the location had exactly two segments.
        neighborhood: String,
        city: String,
        state: String,
    },
    Incomplete {
        /// The trimmed input, kept for diagnostics.
        text: String,
    },
}

impl LocationParts {
    pub fn state(&self) -> &str {
        match self {
            LocationParts::Parsed { state, .. } => state,
            LocationParts::Incomplete { .. } => "",
        }
    }

    pub fn city(&self) -> &str {
        match self {
            LocationParts::Parsed { city, .. } => city,
            LocationParts::Incomplete { .. } => "",
        }
    }

    pub fn neighborhood(&self) -> &str {
        match self {
            LocationParts::Parsed { neighborhood, .. } => neighborhood,
            LocationParts::Incomplete { .. } => "",
        }
    }
}

/// Decompose a raw location; `None` is treated as an empty string.
///
/// Segments are trimmed but interior empties are kept: `"a,,b"` still
/// has three positions. Never errors.
pub fn decompose(raw: Option<&str>) -> LocationParts {
    let raw = raw.unwrap_or_default();
    let segments: Vec<&str> = raw.split(',').map(str::trim).collect();

    if segments.len() < 2 {
        return LocationParts::Incomplete {
            text: raw.trim().to_string(),
        };
    }

    let state = segments[segments.len() - 1].to_string();
    let city = segments[segments.len() - 2].to_string();
    let neighborhood = segments[..segments.len() - 2].join(", ");

    LocationParts::Parsed {
        neighborhood,
        city,
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_segments_split_positionally() {
        let parts = decompose(Some("Alvalade, Lisboa, Lisboa"));
        assert_eq!(
            parts,
            LocationParts::Parsed {
                neighborhood: "Alvalade".to_string(),
                city: "Lisboa".to_string(),
                state: "Lisboa".to_string(),
            }
        );
    }

    #[test]
    fn leading_segments_join_into_neighborhood() {
        let parts = decompose(Some("Bairro Alto, Misericórdia, Lisboa, Lisboa"));
        assert_eq!(parts.neighborhood(), "Bairro Alto, Misericórdia");
        assert_eq!(parts.city(), "Lisboa");
        assert_eq!(parts.state(), "Lisboa");
    }

    #[test]
    fn two_segments_leave_neighborhood_empty() {
        let parts = decompose(Some("Porto, Porto"));
        assert_eq!(parts.neighborhood(), "");
        assert_eq!(parts.city(), "Porto");
        assert_eq!(parts.state(), "Porto");
    }

    #[test]
    fn single_segment_is_incomplete() {
        let parts = decompose(Some("Faro"));
        assert_eq!(
            parts,
            LocationParts::Incomplete {
                text: "Faro".to_string()
            }
        );
        assert_eq!(parts.state(), "");
        assert_eq!(parts.city(), "");
    }

    #[test]
    fn missing_location_is_incomplete() {
        assert_eq!(
            decompose(None),
            LocationParts::Incomplete {
                text: String::new()
            }
        );
        assert_eq!(
            decompose(Some("  ")),
            LocationParts::Incomplete {
                text: String::new()
            }
        );
    }

    #[test]
    fn interior_empty_segments_keep_their_position() {
        let parts = decompose(Some("Alvalade,, Lisboa"));
        assert_eq!(parts.neighborhood(), "Alvalade");
        assert_eq!(parts.city(), "");
        assert_eq!(parts.state(), "Lisboa");
    }
}
