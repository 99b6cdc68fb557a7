use crate::error::{ParseError, ParseErrorKind};
use serde_json::Value;

/// Parse YAML or JSON text into an unvalidated value tree.
///
/// JSON documents are accepted through the YAML parser. Only a single document
/// is allowed per input. No schema checks are applied here.
pub fn parse_document(input: &str) -> Result<Value, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError {
            kind: ParseErrorKind::Empty,
            message: "empty input".to_string(),
        });
    }

    check_multi_document(input)?;

    serde_saphyr::from_str(input).map_err(|e| ParseError {
        kind: ParseErrorKind::Syntax,
        message: e.to_string(),
    })
}

/// Reject a second document marker, or any marker that follows content.
/// Markers count only at column 0 so block scalars may contain `---`.
fn check_multi_document(input: &str) -> Result<(), ParseError> {
    let mut seen_marker = false;
    let mut seen_content = false;
    for line in input.lines() {
        let is_marker = line
            .strip_prefix("---")
            .is_some_and(|rest| rest.trim().is_empty());
        if is_marker {
            if seen_marker || seen_content {
                return Err(ParseError {
                    kind: ParseErrorKind::MultiDocument,
                    message: "a test plan file must contain exactly one document".to_string(),
                });
            }
            seen_marker = true;
            continue;
        }
        let trimmed = line.trim_start();
        if !(trimmed.is_empty() || trimmed.starts_with('#') || line.starts_with('%')) {
            seen_content = true;
        }
    }
    Ok(())
}
