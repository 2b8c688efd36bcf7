use std::fmt;

use chrono::NaiveDateTime;

use crate::gaze::domain::gaze_direction::GazeDirection;

/// `YYYY-MM-DD HH:MM:SS`, the persisted timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A frame-level condition worth recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Violation {
    MultipleFaces,
    /// Head pose left or right of center.
    HeadTurned(GazeDirection),
    /// Iris position left or right of center.
    IrisAway(GazeDirection),
}

impl Violation {
    /// Reason text as written to the violation log.
    pub fn reason(&self) -> String {
        match self {
            Violation::MultipleFaces => "Multiple faces detected".to_string(),
            Violation::HeadTurned(direction) => format!("Eye Gaze: Looking {direction}"),
            Violation::IrisAway(direction) => format!("Iris Gaze: Looking {direction}"),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason())
    }
}

/// One persisted row. Rows have no identity beyond insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct ViolationRecord {
    pub timestamp: NaiveDateTime,
    pub reason: String,
}

impl ViolationRecord {
    pub fn new(timestamp: NaiveDateTime, violation: &Violation) -> Self {
        Self {
            timestamp,
            reason: violation.reason(),
        }
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    #[case(Violation::MultipleFaces, "Multiple faces detected")]
    #[case(Violation::HeadTurned(GazeDirection::Left), "Eye Gaze: Looking LEFT")]
    #[case(Violation::HeadTurned(GazeDirection::Right), "Eye Gaze: Looking RIGHT")]
    #[case(Violation::IrisAway(GazeDirection::Left), "Iris Gaze: Looking LEFT")]
    #[case(Violation::IrisAway(GazeDirection::Right), "Iris Gaze: Looking RIGHT")]
    fn test_reason_text(#[case] violation: Violation, #[case] expected: &str) {
        assert_eq!(violation.reason(), expected);
        assert_eq!(violation.to_string(), expected);
    }

    #[test]
    fn test_record_timestamp_format() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(9, 3, 7)
            .unwrap();
        let record = ViolationRecord::new(ts, &Violation::MultipleFaces);
        assert_eq!(record.formatted_timestamp(), "2024-01-05 09:03:07");
        assert_eq!(record.reason, "Multiple faces detected");
    }
}
