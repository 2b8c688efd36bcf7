use std::fmt;

/// Discrete gaze label shared by the head-pose and iris classifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GazeDirection {
    Left,
    Right,
    Center,
}

impl GazeDirection {
    pub fn is_away(self) -> bool {
        self != GazeDirection::Center
    }
}

impl fmt::Display for GazeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GazeDirection::Left => write!(f, "LEFT"),
            GazeDirection::Right => write!(f, "RIGHT"),
            GazeDirection::Center => write!(f, "CENTER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(GazeDirection::Left, "LEFT", true)]
    #[case(GazeDirection::Right, "RIGHT", true)]
    #[case(GazeDirection::Center, "CENTER", false)]
    fn test_display_and_away(
        #[case] direction: GazeDirection,
        #[case] text: &str,
        #[case] away: bool,
    ) {
        assert_eq!(direction.to_string(), text);
        assert_eq!(direction.is_away(), away);
    }
}
