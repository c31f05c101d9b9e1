//! JSON-lines signal traces.
//!
//! One step per line, tagged by `op`:
//!
//! ```text
//! {"op":"element","id":"feed"}
//! {"op":"geometry","element":"feed","content":300,"visible":300,"offset":0}
//! {"op":"register","listener":1,"element":"feed"}
//! {"op":"signal","element":"feed","signal":"mouse-enter"}
//! {"op":"signal","element":"feed","signal":"wheel"}
//! {"op":"advance","ms":250}
//! {"op":"unregister","listener":1,"element":"feed"}
//! ```
//!
//! A missing `element` means the viewport. Blank lines and lines starting
//! with `#` are skipped.

use crate::model::error::TraceError;
use crate::model::{ElementId, ListenerId, Signal};
use serde::Deserialize;
use std::io::BufRead;

/// One step of a recorded or hand-written trace.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TraceStep {
    /// Make an element exist in the simulated page.
    Element {
        /// Identifier to register the element under.
        id: ElementId,
    },
    /// Set the geometry of a region.
    Geometry {
        /// Target element; viewport when absent.
        #[serde(default)]
        element: Option<ElementId>,
        /// Content height.
        content: i64,
        /// Visible height.
        visible: i64,
        /// Scroll offset.
        offset: i64,
    },
    /// Register a listener (`set_reference`).
    Register {
        /// Listener id.
        listener: ListenerId,
        /// Raw element id; absent or empty means the viewport.
        #[serde(default)]
        element: Option<String>,
    },
    /// Unregister a listener (`unset_reference`).
    Unregister {
        /// Listener id.
        listener: ListenerId,
        /// Raw element id; absent or empty means the viewport.
        #[serde(default)]
        element: Option<String>,
    },
    /// Deliver a signal to a region.
    Signal {
        /// Target element; viewport when absent.
        #[serde(default)]
        element: Option<ElementId>,
        /// Signal name.
        signal: Signal,
    },
    /// Let virtual time pass.
    Advance {
        /// Milliseconds to advance.
        ms: u64,
    },
}

/// Parse a whole trace.
///
/// # Errors
///
/// * `TraceError::Io` if reading fails
/// * `TraceError::InvalidStep` for the first malformed line
/// * `TraceError::Empty` if no steps were found
pub fn parse_trace(reader: impl BufRead) -> Result<Vec<TraceStep>, TraceError> {
    let mut steps = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let step = serde_json::from_str(trimmed).map_err(|e| TraceError::InvalidStep {
            line: index + 1,
            message: e.to_string(),
        })?;
        steps.push(step);
    }

    if steps.is_empty() {
        return Err(TraceError::Empty);
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_step_kind() {
        let input = r#"
{"op":"element","id":"feed"}
{"op":"geometry","content":1000,"visible":800,"offset":150}
{"op":"register","listener":3,"element":"feed"}
{"op":"signal","element":"feed","signal":"touch-start"}
{"op":"advance","ms":200}
{"op":"unregister","listener":3}
"#;

        let steps = parse_trace(input.as_bytes()).expect("valid trace");

        assert_eq!(steps.len(), 6);
        assert_eq!(
            steps[0],
            TraceStep::Element {
                id: ElementId::new("feed").unwrap()
            }
        );
        assert_eq!(
            steps[1],
            TraceStep::Geometry {
                element: None,
                content: 1000,
                visible: 800,
                offset: 150
            }
        );
        assert_eq!(
            steps[3],
            TraceStep::Signal {
                element: Some(ElementId::new("feed").unwrap()),
                signal: Signal::TouchStart
            }
        );
        assert_eq!(
            steps[5],
            TraceStep::Unregister {
                listener: ListenerId::new(3),
                element: None
            }
        );
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let input = "# viewport only\n\n{\"op\":\"advance\",\"ms\":5}\n";
        let steps = parse_trace(input.as_bytes()).unwrap();
        assert_eq!(steps, vec![TraceStep::Advance { ms: 5 }]);
    }

    #[test]
    fn reports_line_number_of_bad_step() {
        let input = "{\"op\":\"advance\",\"ms\":5}\n{\"op\":\"signal\",\"signal\":\"click\"}\n";

        let err = parse_trace(input.as_bytes()).unwrap_err();

        assert!(
            matches!(err, TraceError::InvalidStep { line: 2, .. }),
            "got: {:?}",
            err
        );
    }

    #[test]
    fn empty_element_id_in_signal_is_rejected() {
        let input = r#"{"op":"signal","element":"","signal":"scroll"}"#;
        assert!(matches!(
            parse_trace(input.as_bytes()),
            Err(TraceError::InvalidStep { line: 1, .. })
        ));
    }

    #[test]
    fn empty_register_element_is_allowed() {
        let input = r#"{"op":"register","listener":1,"element":""}"#;
        let steps = parse_trace(input.as_bytes()).unwrap();
        assert_eq!(
            steps,
            vec![TraceStep::Register {
                listener: ListenerId::new(1),
                element: Some(String::new())
            }]
        );
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            parse_trace("\n# nothing\n".as_bytes()),
            Err(TraceError::Empty)
        ));
    }
}
