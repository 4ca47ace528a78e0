//! JSON Lines dump of the collected event stream.

use std::io::Write;

use crate::events::EventRecord;
use crate::github::IntakeError;

use super::io_error;

/// Writes one JSON object per event.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] if serialisation or writing fails.
pub fn write_events_jsonl<W: Write>(
    writer: &mut W,
    events: &[EventRecord],
) -> Result<(), IntakeError> {
    for event in events {
        serde_json::to_writer(&mut *writer, event).map_err(|e| IntakeError::Io {
            message: format!("JSON serialization failed: {e}"),
        })?;
        writeln!(writer).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::write_events_jsonl;
    use crate::events::EventRecord;

    #[rstest]
    fn writes_one_line_per_event() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .expect("test timestamp should be valid");
        let events = vec![
            EventRecord::pr_created("alice", "octo/repo", at, 3, 1),
            EventRecord::comment("bob", "octo/repo", at),
        ];

        let mut buffer = Vec::new();
        write_events_jsonl(&mut buffer, &events).expect("should write JSONL");
        let output = String::from_utf8(buffer).expect("valid UTF-8");

        let parsed: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).expect("should be valid JSON"))
            .collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed.first().and_then(|value| value.get("additions")),
            Some(&serde_json::json!(3))
        );
        assert_eq!(
            parsed.get(1).and_then(|value| value.get("user")),
            Some(&serde_json::json!("bob"))
        );
    }
}
