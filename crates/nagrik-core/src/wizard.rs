//! Seven-step eligibility questionnaire.
//!
//! The answers are collected but do not filter anything: submitting (or skipping) shows the
//! whole scheme dataset the wizard was built with.

use crate::Result;
use crate::schemes::{Scheme, mock_schemes};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const TOTAL_STEPS: u8 = 7;
/// The step value once results are showing.
pub const RESULTS_STEP: u8 = TOTAL_STEPS + 1;
pub const MIN_AGE: u8 = 18;
pub const MAX_AGE: u8 = 100;

pub const STATES: [&str; 36] = [
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub value: &'static str,
    pub label: &'static str,
    /// Whether the form offers an explainer for this category.
    pub info: bool,
}

pub const CATEGORIES: [Category; 6] = [
    Category {
        value: "general",
        label: "General",
        info: false,
    },
    Category {
        value: "obc",
        label: "Other Backward Class (OBC)",
        info: true,
    },
    Category {
        value: "pvtg",
        label: "Particularly Vulnerable Tribal Group (PVTG)",
        info: true,
    },
    Category {
        value: "sc",
        label: "Scheduled Caste (SC)",
        info: true,
    },
    Category {
        value: "st",
        label: "Scheduled Tribe (ST)",
        info: true,
    },
    Category {
        value: "dnt",
        label: "De-Notified, Nomadic, and Semi-Nomadic (DNT) communities",
        info: false,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("unknown wizard field `{0}`")]
    UnknownField(String),
    #[error("`{value}` is not a valid {field}")]
    InvalidValue { field: &'static str, value: String },
    #[error("age {0} is outside 18..=100")]
    AgeOutOfRange(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Urban,
    Rural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Transgender,
}

/// Answers collected so far; `None` means the question has not been answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardData {
    pub state: Option<String>,
    pub area: Option<Area>,
    pub gender: Option<Gender>,
    pub age: Option<u8>,
    pub disability: Option<bool>,
    pub student: Option<bool>,
    pub category: Option<String>,
    pub bpl: Option<bool>,
}

/// A single answer to one wizard question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    State(String),
    Area(Area),
    Gender(Gender),
    Age(u8),
    Disability(bool),
    Student(bool),
    Category(String),
    Bpl(bool),
}

fn parse_yes_no(field: &'static str, value: &str) -> std::result::Result<bool, WizardError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        _ => Err(WizardError::InvalidValue {
            field,
            value: value.to_string(),
        }),
    }
}

impl Answer {
    /// Parses `key=value` pairs such as `state=Kerala`, `age=34` or `bpl=yes`.
    pub fn parse_pair(pair: &str) -> std::result::Result<Self, WizardError> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| WizardError::UnknownField(pair.to_string()))?;
        let value = value.trim();
        let invalid = |field: &'static str| WizardError::InvalidValue {
            field,
            value: value.to_string(),
        };
        match key.trim() {
            "state" => Ok(Self::State(value.to_string())),
            "area" => match value.to_ascii_lowercase().as_str() {
                "urban" => Ok(Self::Area(Area::Urban)),
                "rural" => Ok(Self::Area(Area::Rural)),
                _ => Err(invalid("area")),
            },
            "gender" => match value.to_ascii_lowercase().as_str() {
                "male" => Ok(Self::Gender(Gender::Male)),
                "female" => Ok(Self::Gender(Gender::Female)),
                "transgender" => Ok(Self::Gender(Gender::Transgender)),
                _ => Err(invalid("gender")),
            },
            "age" => value
                .parse::<u8>()
                .map(Self::Age)
                .map_err(|_| invalid("age")),
            "disability" => parse_yes_no("disability", value).map(Self::Disability),
            "student" => parse_yes_no("student", value).map(Self::Student),
            "category" => Ok(Self::Category(value.to_ascii_lowercase())),
            "bpl" => parse_yes_no("bpl", value).map(Self::Bpl),
            other => Err(WizardError::UnknownField(other.to_string())),
        }
    }
}

impl FromStr for Answer {
    type Err = WizardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse_pair(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Current,
    Pending,
}

pub fn step_title(step: u8) -> Option<&'static str> {
    match step {
        1 => Some("Where do you live?"),
        2 => Some("Gender and age"),
        3 => Some("Disability"),
        4 => Some("Student"),
        5 => Some("Social category"),
        6 => Some("Below poverty line"),
        7 => Some("Review"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct EligibilityWizard {
    step: u8,
    data: WizardData,
    dataset: Vec<Scheme>,
    results: Option<Vec<Scheme>>,
}

impl EligibilityWizard {
    pub fn new(dataset: Vec<Scheme>) -> Self {
        Self {
            step: 1,
            data: WizardData::default(),
            dataset,
            results: None,
        }
    }

    /// A wizard over the bundled sample schemes.
    pub fn with_mock_schemes() -> Result<Self> {
        Ok(Self::new(mock_schemes()?))
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn data(&self) -> &WizardData {
        &self.data
    }

    pub fn update(&mut self, answer: Answer) -> std::result::Result<(), WizardError> {
        match answer {
            Answer::State(state) => {
                let Some(known) = STATES.iter().find(|s| s.eq_ignore_ascii_case(&state)) else {
                    return Err(WizardError::InvalidValue {
                        field: "state",
                        value: state,
                    });
                };
                self.data.state = Some((*known).to_string());
            }
            Answer::Area(area) => self.data.area = Some(area),
            Answer::Gender(gender) => self.data.gender = Some(gender),
            Answer::Age(age) => {
                if !(MIN_AGE..=MAX_AGE).contains(&age) {
                    return Err(WizardError::AgeOutOfRange(age));
                }
                self.data.age = Some(age);
            }
            Answer::Disability(v) => self.data.disability = Some(v),
            Answer::Student(v) => self.data.student = Some(v),
            Answer::Category(value) => {
                if !CATEGORIES.iter().any(|c| c.value == value) {
                    return Err(WizardError::InvalidValue {
                        field: "category",
                        value,
                    });
                }
                self.data.category = Some(value);
            }
            Answer::Bpl(v) => self.data.bpl = Some(v),
        }
        Ok(())
    }

    pub fn go_back(&mut self) {
        if self.step > 1 && self.step <= TOTAL_STEPS {
            self.step -= 1;
        }
    }

    pub fn go_next(&mut self) {
        if self.step < TOTAL_STEPS {
            self.step += 1;
        }
    }

    /// Advances, or on the last step submits and shows results.
    pub fn handle_next(&mut self) {
        if self.step == TOTAL_STEPS {
            self.show_results();
        } else {
            self.go_next();
        }
    }

    pub fn skip_to_results(&mut self) {
        self.show_results();
    }

    fn show_results(&mut self) {
        self.results = Some(self.dataset.clone());
        self.step = RESULTS_STEP;
        tracing::debug!(answers = ?self.data, "eligibility wizard submitted");
    }

    pub fn reset(&mut self) {
        self.step = 1;
        self.data = WizardData::default();
        self.results = None;
    }

    pub fn is_showing_results(&self) -> bool {
        self.results.is_some() && self.step > TOTAL_STEPS
    }

    pub fn results(&self) -> Option<&[Scheme]> {
        if self.step > TOTAL_STEPS {
            self.results.as_deref()
        } else {
            None
        }
    }

    pub fn next_label(&self) -> &'static str {
        if self.step == TOTAL_STEPS {
            "View Results"
        } else {
            "Next"
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.step > 1 && self.step <= TOTAL_STEPS
    }

    pub fn progress(&self) -> Vec<StepStatus> {
        (1..=TOTAL_STEPS)
            .map(|s| {
                if s < self.step {
                    StepStatus::Completed
                } else if s == self.step {
                    StepStatus::Current
                } else {
                    StepStatus::Pending
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard() -> EligibilityWizard {
        EligibilityWizard::with_mock_schemes().unwrap()
    }

    #[test]
    fn option_lists_match_the_form() {
        assert_eq!(STATES.len(), 36);
        assert_eq!(STATES[35], "Puducherry");
        let values: Vec<_> = CATEGORIES.iter().map(|c| c.value).collect();
        assert_eq!(values, ["general", "obc", "pvtg", "sc", "st", "dnt"]);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut w = wizard();
        w.go_back();
        assert_eq!(w.step(), 1);
        for _ in 0..10 {
            w.go_next();
        }
        assert_eq!(w.step(), TOTAL_STEPS);
        assert_eq!(w.next_label(), "View Results");
        assert!(!w.is_showing_results());
        w.go_back();
        assert_eq!(w.step(), 6);
        assert_eq!(w.next_label(), "Next");
    }

    #[test]
    fn handle_next_submits_on_last_step() {
        let mut w = wizard();
        for _ in 1..TOTAL_STEPS {
            w.handle_next();
        }
        assert!(w.results().is_none());
        w.handle_next();
        assert_eq!(w.step(), RESULTS_STEP);
        assert_eq!(w.results().map(<[Scheme]>::len), Some(3));
        assert!(w.progress().iter().all(|s| *s == StepStatus::Completed));
    }

    #[test]
    fn skip_and_reset() {
        let mut w = wizard();
        w.update(Answer::parse_pair("state=kerala").unwrap()).unwrap();
        w.update(Answer::parse_pair("bpl=yes").unwrap()).unwrap();
        assert_eq!(w.data().state.as_deref(), Some("Kerala"));
        w.skip_to_results();
        assert!(w.is_showing_results());
        w.reset();
        assert_eq!(w.step(), 1);
        assert_eq!(w.data(), &WizardData::default());
        assert!(w.results().is_none());
    }

    #[test]
    fn answers_are_validated() {
        let mut w = wizard();
        assert_eq!(
            w.update(Answer::Age(17)),
            Err(WizardError::AgeOutOfRange(17))
        );
        assert!(w.update(Answer::Age(100)).is_ok());
        assert!(w.update(Answer::Category("xyz".into())).is_err());
        assert!(w.update(Answer::State("Atlantis".into())).is_err());
        assert!(matches!(
            "colour=red".parse::<Answer>(),
            Err(WizardError::UnknownField(_))
        ));
        assert!("student=maybe".parse::<Answer>().is_err());
    }

    #[test]
    fn progress_marks_current_step() {
        let mut w = wizard();
        w.go_next();
        w.go_next();
        let p = w.progress();
        assert_eq!(p[..2], [StepStatus::Completed, StepStatus::Completed]);
        assert_eq!(p[2], StepStatus::Current);
        assert!(p[3..].iter().all(|s| *s == StepStatus::Pending));
    }
}
