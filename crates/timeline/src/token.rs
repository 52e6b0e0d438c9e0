//! Timeline actions and their serialized form.
//!
//! The player reads each event as a JSON-ish array:
//! `[<moment>, "<token>", "<token>"]`. Tokens render as the canonical tags
//! `goto:<secs>`, `rate:<factor>`, `mute`, `unmute`, `pause` or a verbatim
//! `point...` literal.

use std::fmt;

use crate::time::Moment;

/// A canonical action at a moment.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Seek to the given time.
    Goto(Moment),
    /// Playback rate, kept as written (`"2"`, `"1.2"`, `"0.5"`).
    Rate(String),
    Mute,
    Unmute,
    Pause,
    /// Zoom/rotate literal, opaque to the compiler (`point:[0,0,2]`).
    Point(String),
}

impl Token {
    pub fn goto(moment: Moment) -> Self {
        Self::Goto(moment)
    }

    pub fn rate(factor: impl Into<String>) -> Self {
        Self::Rate(factor.into())
    }

    /// Token for a `M`/`U` suffix or keyword.
    pub fn from_audio_flag(flag: &str) -> Option<Self> {
        match flag {
            "M" | "mute" => Some(Self::Mute),
            "U" | "unmute" => Some(Self::Unmute),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Goto(moment) => write!(f, "goto:{moment}"),
            Self::Rate(factor) => write!(f, "rate:{factor}"),
            Self::Mute => f.write_str("mute"),
            Self::Unmute => f.write_str("unmute"),
            Self::Pause => f.write_str("pause"),
            Self::Point(literal) => f.write_str(literal),
        }
    }
}

/// One `(moment, actions)` entry of a timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub moment: Moment,
    pub tokens: Vec<Token>,
}

impl TimelineEvent {
    pub fn new(moment: Moment, tokens: Vec<Token>) -> Self {
        Self { moment, tokens }
    }

    /// Token tags in order, e.g. `["rate:4", "mute"]`.
    pub fn tags(&self) -> Vec<String> {
        self.tokens.iter().map(Token::to_string).collect()
    }
}

impl fmt::Display for TimelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, ", self.moment)?;
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            let quoted = serde_json::to_string(&token.to_string()).map_err(|_| fmt::Error)?;
            f.write_str(&quoted)?;
        }
        f.write_str("]")
    }
}

/// Compiled events of one media row, in row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    pub events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Comma-joined events, the content of the `data-video-points` array.
    pub fn points(&self) -> String {
        self.events
            .iter()
            .map(TimelineEvent::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_tags() {
        assert_eq!(Token::goto(Moment::Text("60.5".into())).to_string(), "goto:60.5");
        assert_eq!(Token::goto(Moment::Seconds(90.0)).to_string(), "goto:90.0");
        assert_eq!(Token::rate("1.2").to_string(), "rate:1.2");
        assert_eq!(Token::Pause.to_string(), "pause");
        assert_eq!(
            Token::Point("point:[0,0,2,null,null,270]".into()).to_string(),
            "point:[0,0,2,null,null,270]"
        );
    }

    #[test]
    fn test_event_format() {
        let event = TimelineEvent::new(
            Moment::Text("15".into()),
            vec![Token::rate("2"), Token::Unmute],
        );
        assert_eq!(event.to_string(), r#"[15, "rate:2","unmute"]"#);
    }

    #[test]
    fn test_points_join_events() {
        let timeline = Timeline {
            events: vec![
                TimelineEvent::new(Moment::Text("15".into()), vec![Token::rate("2")]),
                TimelineEvent::new(Moment::Text("30".into()), vec![Token::Pause]),
            ],
        };
        assert_eq!(timeline.points(), r#"[15, "rate:2"],[30, "pause"]"#);
    }

    #[test]
    fn test_audio_flags() {
        assert_eq!(Token::from_audio_flag("M"), Some(Token::Mute));
        assert_eq!(Token::from_audio_flag("unmute"), Some(Token::Unmute));
        assert_eq!(Token::from_audio_flag("X"), None);
    }
}
