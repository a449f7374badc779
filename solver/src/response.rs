use cube_core::notation::{is_move_notation, parse_moves};
use cube_core::Move;
use serde_json::Value;

const SOLUTION_FIELDS: [&str; 3] = ["solution", "moves", "alg"];

/// Extracts a move sequence from a solving service's response body.
///
/// A JSON object is searched for the first usable `solution`, `moves` or
/// `alg` field (a string, or for `moves` also an array of tokens). A body
/// that is not usable JSON is taken as plain text if it matches the move
/// notation pattern. Anything that does not parse into at least one move,
/// or that mentions "error", is rejected.
pub fn parse_solver_response(body: &str) -> Option<Vec<Move>> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(candidate) = structured_solution(&value) {
            return accept(&candidate);
        }
    }

    let text = body.trim();
    if is_move_notation(text) {
        return accept(text);
    }
    None
}

fn structured_solution(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => SOLUTION_FIELDS.iter().find_map(|field| match map.get(*field)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Array(items) if !items.is_empty() => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(|tokens| tokens.join(" ")),
            _ => None,
        }),
        _ => None,
    }
}

fn accept(text: &str) -> Option<Vec<Move>> {
    if text.to_ascii_lowercase().contains("error") {
        return None;
    }
    let moves = parse_moves(text).ok()?;
    if moves.is_empty() { None } else { Some(moves) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cube_core::notation::format_moves;

    fn parsed(body: &str) -> Option<String> {
        parse_solver_response(body).map(|moves| format_moves(&moves))
    }

    #[test]
    fn test_json_fields_in_priority_order() {
        assert_eq!(parsed(r#"{"solution": "R U R' U'"}"#), Some("R U R' U'".to_string()));
        assert_eq!(parsed(r#"{"moves": "F2 D"}"#), Some("F2 D".to_string()));
        assert_eq!(parsed(r#"{"alg": " B' "}"#), Some("B'".to_string()));
        assert_eq!(parsed(r#"{"solution": "", "alg": "L2"}"#), Some("L2".to_string()));
        assert_eq!(parsed(r#"{"solution": "U", "alg": "L2"}"#), Some("U".to_string()));
    }

    #[test]
    fn test_json_move_array() {
        assert_eq!(parsed(r#"{"moves": ["R", "U'", "F2"]}"#), Some("R U' F2".to_string()));
        assert_eq!(parsed(r#"{"moves": ["R", 3]}"#), None);
    }

    #[test]
    fn test_json_string_body() {
        assert_eq!(parsed(r#""D L""#), Some("D L".to_string()));
    }

    #[test]
    fn test_plain_text_body() {
        assert_eq!(parsed("R U R' U'\n"), Some("R U R' U'".to_string()));
        assert_eq!(parsed("R2 U2 F2"), Some("R2 U2 F2".to_string()));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(parsed(r#"{"solution": "Error: invalid cube"}"#), None);
        assert_eq!(parsed(r#"{"error": "bad cube"}"#), None);
        assert_eq!(parsed(r#"{"solution": "R X"}"#), None);
        assert_eq!(parsed("<html>Service Unavailable</html>"), None);
        assert_eq!(parsed("2"), None);
        assert_eq!(parsed(""), None);
        assert_eq!(parsed("   "), None);
        assert_eq!(parsed("R U2'"), None);
    }
}
