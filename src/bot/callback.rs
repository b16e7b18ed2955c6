//! Callback data codec for inline keyboard buttons.
//!
//! The wire format is `<kind>[_<index>...]`, e.g. `section_0`,
//! `topic_0_2`, `subtopic_0_2_1`, `back_main`.

use super::menu::MenuLevel;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Telegram rejects callback data longer than this many bytes.
pub const CALLBACK_DATA_MAX_BYTES: usize = 64;

/// Reasons a callback payload could not be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackDataError {
    /// Prefix is not one of the known kinds
    #[error("unknown callback kind: {0}")]
    UnknownKind(String),
    /// Known kind with the wrong number of indices
    #[error("callback {kind} expects {expected} indices, got {actual}")]
    Arity {
        /// Callback kind
        kind: &'static str,
        /// Required number of indices
        expected: usize,
        /// Supplied number of indices
        actual: usize,
    },
    /// An index is not a non-negative integer
    #[error("invalid index {0:?}")]
    InvalidIndex(String),
}

/// Action encoded in an inline button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavCallback {
    /// `back_main`
    BackMain,
    /// `section_{s}`
    Section(usize),
    /// `topic_{s}_{t}`
    Topic(usize, usize),
    /// `subtopic_{s}_{t}_{st}`
    Subtopic(usize, usize, usize),
    /// `back_topic_{s}`, also accepted as `back_section_{s}`
    BackToTopics(usize),
    /// `back_subtopic_{s}_{t}`
    BackToSubtopics(usize, usize),
}

impl NavCallback {
    /// Screen this button leads to
    #[must_use]
    pub const fn destination(self) -> MenuLevel {
        match self {
            Self::BackMain => MenuLevel::Main,
            Self::Section(section) | Self::BackToTopics(section) => MenuLevel::Topics { section },
            Self::Topic(section, topic) | Self::BackToSubtopics(section, topic) => {
                MenuLevel::Subtopics { section, topic }
            }
            Self::Subtopic(section, topic, subtopic) => MenuLevel::Article {
                section,
                topic,
                subtopic,
            },
        }
    }

    /// Encoded callback data
    #[must_use]
    pub fn encode(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NavCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackMain => f.write_str("back_main"),
            Self::Section(s) => write!(f, "section_{s}"),
            Self::Topic(s, t) => write!(f, "topic_{s}_{t}"),
            Self::Subtopic(s, t, st) => write!(f, "subtopic_{s}_{t}_{st}"),
            Self::BackToTopics(s) => write!(f, "back_topic_{s}"),
            Self::BackToSubtopics(s, t) => write!(f, "back_subtopic_{s}_{t}"),
        }
    }
}

fn parse_indices<const N: usize>(
    kind: &'static str,
    rest: &str,
) -> Result<[usize; N], CallbackDataError> {
    let parts: Vec<&str> = rest.split('_').collect();
    if parts.len() != N {
        return Err(CallbackDataError::Arity {
            kind,
            expected: N,
            actual: parts.len(),
        });
    }

    let mut indices = [0usize; N];
    for (slot, part) in indices.iter_mut().zip(parts) {
        // `usize::from_str` accepts a leading '+', which we never emit
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CallbackDataError::InvalidIndex(part.to_string()));
        }
        *slot = part
            .parse()
            .map_err(|_| CallbackDataError::InvalidIndex(part.to_string()))?;
    }
    Ok(indices)
}

impl FromStr for NavCallback {
    type Err = CallbackDataError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        if data == "back_main" {
            return Ok(Self::BackMain);
        }
        // Longer prefixes first: "back_subtopic_" must not be read as "subtopic_"
        if let Some(rest) = data.strip_prefix("back_subtopic_") {
            let [s, t] = parse_indices("back_subtopic", rest)?;
            return Ok(Self::BackToSubtopics(s, t));
        }
        if let Some(rest) = data.strip_prefix("back_topic_") {
            let [s] = parse_indices("back_topic", rest)?;
            return Ok(Self::BackToTopics(s));
        }
        if let Some(rest) = data.strip_prefix("back_section_") {
            let [s] = parse_indices("back_section", rest)?;
            return Ok(Self::BackToTopics(s));
        }
        if let Some(rest) = data.strip_prefix("section_") {
            let [s] = parse_indices("section", rest)?;
            return Ok(Self::Section(s));
        }
        if let Some(rest) = data.strip_prefix("topic_") {
            let [s, t] = parse_indices("topic", rest)?;
            return Ok(Self::Topic(s, t));
        }
        if let Some(rest) = data.strip_prefix("subtopic_") {
            let [s, t, st] = parse_indices("subtopic", rest)?;
            return Ok(Self::Subtopic(s, t, st));
        }
        Err(CallbackDataError::UnknownKind(data.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_forward_navigation() {
        assert_eq!("section_3".parse(), Ok(NavCallback::Section(3)));
        assert_eq!("topic_3_1".parse(), Ok(NavCallback::Topic(3, 1)));
        assert_eq!("subtopic_3_1_0".parse(), Ok(NavCallback::Subtopic(3, 1, 0)));
    }

    #[test]
    fn test_decode_back_navigation() {
        assert_eq!("back_main".parse(), Ok(NavCallback::BackMain));
        assert_eq!("back_topic_2".parse(), Ok(NavCallback::BackToTopics(2)));
        assert_eq!("back_section_2".parse(), Ok(NavCallback::BackToTopics(2)));
        assert_eq!(
            "back_subtopic_2_4".parse(),
            Ok(NavCallback::BackToSubtopics(2, 4))
        );
    }

    #[test]
    fn test_encode_matches_wire_format() {
        assert_eq!(NavCallback::BackMain.encode(), "back_main");
        assert_eq!(NavCallback::Section(0).encode(), "section_0");
        assert_eq!(NavCallback::Topic(0, 12).encode(), "topic_0_12");
        assert_eq!(NavCallback::Subtopic(1, 2, 3).encode(), "subtopic_1_2_3");
        assert_eq!(NavCallback::BackToTopics(5).encode(), "back_topic_5");
        assert_eq!(NavCallback::BackToSubtopics(5, 6).encode(), "back_subtopic_5_6");
    }

    #[test]
    fn test_malformed_payloads_rejected() {
        assert!(matches!(
            "unknown".parse::<NavCallback>(),
            Err(CallbackDataError::UnknownKind(_))
        ));
        assert!(matches!(
            "topic_1".parse::<NavCallback>(),
            Err(CallbackDataError::Arity { expected: 2, actual: 1, .. })
        ));
        assert!(matches!(
            "subtopic_1_2_3_4".parse::<NavCallback>(),
            Err(CallbackDataError::Arity { .. })
        ));
        assert!(matches!(
            "section_abc".parse::<NavCallback>(),
            Err(CallbackDataError::InvalidIndex(_))
        ));
        assert!(matches!(
            "section_-1".parse::<NavCallback>(),
            Err(CallbackDataError::InvalidIndex(_))
        ));
        assert!(matches!(
            "section_+1".parse::<NavCallback>(),
            Err(CallbackDataError::InvalidIndex(_))
        ));
        assert!(matches!(
            "section_".parse::<NavCallback>(),
            Err(CallbackDataError::InvalidIndex(_))
        ));
    }

    #[test]
    fn test_destinations() {
        assert_eq!(NavCallback::BackMain.destination(), MenuLevel::Main);
        assert_eq!(
            NavCallback::BackToTopics(1).destination(),
            NavCallback::Section(1).destination()
        );
        assert_eq!(
            NavCallback::BackToSubtopics(1, 2).destination(),
            MenuLevel::Subtopics { section: 1, topic: 2 }
        );
        assert_eq!(
            NavCallback::Subtopic(1, 2, 3).destination(),
            MenuLevel::Article {
                section: 1,
                topic: 2,
                subtopic: 3
            }
        );
    }

    #[test]
    fn test_worst_case_fits_telegram_limit() {
        let max = usize::from(u16::MAX);
        let worst = NavCallback::Subtopic(max, max, max).encode();
        assert!(worst.len() <= CALLBACK_DATA_MAX_BYTES);
    }
}
