use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Furthest completed wizard checkpoint, in percent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Progress {
    #[default]
    PersonalInfo = 25,
    Education = 50,
    Experience = 75,
    Complete = 100,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("'{0}' is not a progress value (expected 25, 50, 75 or 100)")]
    Invalid(String),
    #[error("unknown page '{0}'")]
    UnknownPage(String),
}

impl Progress {
    pub const ALL: [Progress; 4] = [
        Progress::PersonalInfo,
        Progress::Education,
        Progress::Experience,
        Progress::Complete,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Option<Progress> {
        match self {
            Progress::PersonalInfo => Some(Progress::Education),
            Progress::Education => Some(Progress::Experience),
            Progress::Experience => Some(Progress::Complete),
            Progress::Complete => None,
        }
    }

    pub fn previous(self) -> Option<Progress> {
        match self {
            Progress::PersonalInfo => None,
            Progress::Education => Some(Progress::PersonalInfo),
            Progress::Experience => Some(Progress::Education),
            Progress::Complete => Some(Progress::Experience),
        }
    }

    /// Form rendered for this checkpoint; `None` once every form is done.
    pub fn step(self) -> Option<Step> {
        match self {
            Progress::PersonalInfo => Some(Step::PersonalInfo),
            Progress::Education => Some(Step::Education),
            Progress::Experience => Some(Step::Experience),
            Progress::Complete => None,
        }
    }
}

impl TryFrom<u8> for Progress {
    type Error = ProgressError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Progress::ALL
            .into_iter()
            .find(|progress| progress.value() == value)
            .ok_or_else(|| ProgressError::Invalid(value.to_string()))
    }
}

impl From<Progress> for u8 {
    fn from(progress: Progress) -> Self {
        progress.value()
    }
}

impl FromStr for Progress {
    type Err = ProgressError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .parse::<u8>()
            .map_err(|_| ProgressError::Invalid(raw.to_string()))
            .and_then(Progress::try_from)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// One of the three data-entry forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    PersonalInfo,
    Education,
    Experience,
}

impl Step {
    pub fn id(self) -> &'static str {
        match self {
            Step::PersonalInfo => "personal",
            Step::Education => "education",
            Step::Experience => "experience",
        }
    }

    pub fn title_key(self) -> &'static str {
        match self {
            Step::PersonalInfo => "step.personal.title",
            Step::Education => "step.education.title",
            Step::Experience => "step.experience.title",
        }
    }

    pub fn progress(self) -> Progress {
        match self {
            Step::PersonalInfo => Progress::PersonalInfo,
            Step::Education => Progress::Education,
            Step::Experience => Progress::Experience,
        }
    }
}

/// Where the user currently is. Held in memory, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Landing,
    Input,
    Preview,
    Final,
}

impl Page {
    pub fn as_str(self) -> &'static str {
        match self {
            Page::Landing => "landing",
            Page::Input => "input",
            Page::Preview => "preview",
            Page::Final => "final",
        }
    }
}

impl FromStr for Page {
    type Err = ProgressError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "landing" | "index" | "home" => Ok(Page::Landing),
            "input" => Ok(Page::Input),
            "preview" => Ok(Page::Preview),
            "final" => Ok(Page::Final),
            other => Err(ProgressError::UnknownPage(other.to_string())),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_known_checkpoints() {
        assert_eq!("50".parse::<Progress>(), Ok(Progress::Education));
        assert_eq!(" 100 ".parse::<Progress>(), Ok(Progress::Complete));
        assert!("60".parse::<Progress>().is_err());
        assert!("abc".parse::<Progress>().is_err());
    }

    #[test]
    fn next_and_previous_walk_the_cycle() {
        assert_eq!(Progress::PersonalInfo.next(), Some(Progress::Education));
        assert_eq!(Progress::Complete.next(), None);
        assert_eq!(Progress::Complete.previous(), Some(Progress::Experience));
        assert_eq!(Progress::PersonalInfo.previous(), None);
    }

    #[test]
    fn serde_uses_the_integer() {
        assert_eq!(serde_json::to_string(&Progress::Experience).unwrap(), "75");
        assert!(serde_json::from_str::<Progress>("30").is_err());
    }

    #[test]
    fn steps_map_back_to_their_checkpoint() {
        for progress in Progress::ALL {
            if let Some(step) = progress.step() {
                assert_eq!(step.progress(), progress);
            }
        }
    }
}
