use molt_types::Outline;
use serde::Deserialize;

use crate::errors::LoadError;

/// The outline document structure for deserialization.
#[derive(Debug, Clone, Deserialize)]
struct OutlineDoc {
    points: Vec<[f64; 2]>,
}

/// Deserialize a board outline from a JSON string.
///
/// The document is an object with a single `points` list tracing the board
/// edge in order. The outline comes back centered on its bounding box, so
/// every bearing-valued parameter downstream works against one predictable
/// origin no matter where the source drawing sat.
pub fn load_outline(json: &str) -> Result<Outline, LoadError> {
    let doc: OutlineDoc =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;
    Ok(Outline::new(doc.points)?.recentered())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn outline_is_recentered_on_load() {
        let json = r#"{"points": [[10, 10], [40, 10], [40, 30], [10, 30]]}"#;
        let outline = load_outline(json).unwrap();
        let (min, max) = outline.bounds();
        assert_relative_eq!(min[0], -15.0, epsilon = 1e-9);
        assert_relative_eq!(max[0], 15.0, epsilon = 1e-9);
        assert_relative_eq!(min[1], -10.0, epsilon = 1e-9);
        assert_relative_eq!(max[1], 10.0, epsilon = 1e-9);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            load_outline("not json"),
            Err(LoadError::ParseError(_))
        ));
    }

    #[test]
    fn degenerate_outline_is_rejected() {
        let json = r#"{"points": [[0, 0], [10, 0]]}"#;
        assert!(matches!(
            load_outline(json),
            Err(LoadError::BadOutline(_))
        ));
    }
}
