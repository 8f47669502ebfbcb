use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_TRAINING_DAYS: u8 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurveyError {
    #[error("unknown {field} option: {value}")]
    UnknownOption { field: &'static str, value: String },
    #[error("{selected} preferred days selected but only {allowed} training days per week")]
    TooManyPreferredDays { selected: usize, allowed: u8 },
    #[error("preferred day {0} selected more than once")]
    DuplicatePreferredDay(Weekday),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FitnessGoal {
    BuildMuscle,
    LoseWeight,
    GetStronger,
    ImproveEndurance,
    GeneralFitness,
}

impl FitnessGoal {
    pub const ALL: [Self; 5] = [
        Self::BuildMuscle,
        Self::LoseWeight,
        Self::GetStronger,
        Self::ImproveEndurance,
        Self::GeneralFitness,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::BuildMuscle => "Build Muscle",
            Self::LoseWeight => "Lose Weight",
            Self::GetStronger => "Get Stronger",
            Self::ImproveEndurance => "Improve Endurance",
            Self::GeneralFitness => "General Fitness",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Equipment {
    FullGym,
    HomeGym,
    BodyweightOnly,
    LimitedEquipment,
}

impl Equipment {
    pub const ALL: [Self; 4] = [
        Self::FullGym,
        Self::HomeGym,
        Self::BodyweightOnly,
        Self::LimitedEquipment,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::FullGym => "Full Gym",
            Self::HomeGym => "Home Gym (Dumbbells/Bands)",
            Self::BodyweightOnly => "Bodyweight Only",
            Self::LimitedEquipment => "Limited Equipment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SessionDuration {
    ThirtyMinutes,
    FortyFiveMinutes,
    SixtyMinutes,
    NinetyPlusMinutes,
}

impl SessionDuration {
    pub const ALL: [Self; 4] = [
        Self::ThirtyMinutes,
        Self::FortyFiveMinutes,
        Self::SixtyMinutes,
        Self::NinetyPlusMinutes,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::ThirtyMinutes => "30 minutes",
            Self::FortyFiveMinutes => "45 minutes",
            Self::SixtyMinutes => "60 minutes",
            Self::NinetyPlusMinutes => "90+ minutes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

// Labels are matched case-insensitively after trimming; serde decodes
// through `FromStr` and always encodes the canonical label.
macro_rules! impl_label_traits {
    ($ty:ty, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = SurveyError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let trimmed = value.trim();
                Self::ALL
                    .into_iter()
                    .find(|option| option.label().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| SurveyError::UnknownOption {
                        field: $field,
                        value: value.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $ty {
            type Error = SurveyError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(option: $ty) -> Self {
                option.label().to_string()
            }
        }
    };
}

impl_label_traits!(FitnessLevel, "fitness level");
impl_label_traits!(FitnessGoal, "goal");
impl_label_traits!(Equipment, "equipment");
impl_label_traits!(SessionDuration, "duration");
impl_label_traits!(Weekday, "weekday");

/// Training days per week as chosen in the survey.
///
/// The numeric count drives generation; the label is kept for display and
/// prompts exactly as the user saw it (e.g. `"3 days"`). A label without a
/// leading integer carries a count of zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DaysPerWeek {
    count: u8,
    label: String,
}

impl DaysPerWeek {
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        let count = leading_day_count(&label)
            .map(|count| count.min(u32::from(MAX_TRAINING_DAYS)) as u8)
            .unwrap_or(0);

        Self { count, label }
    }

    pub const fn count(&self) -> u8 {
        self.count
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl From<String> for DaysPerWeek {
    fn from(label: String) -> Self {
        Self::from_label(label)
    }
}

impl From<DaysPerWeek> for String {
    fn from(days: DaysPerWeek) -> Self {
        days.label
    }
}

impl fmt::Display for DaysPerWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn leading_day_count(label: &str) -> Option<u32> {
    let first_token = label.split(' ').next().unwrap_or("");
    let digits = first_token
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>();

    digits.parse::<u32>().ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyAnswers {
    pub fitness_level: FitnessLevel,
    pub goal: FitnessGoal,
    pub days_per_week: DaysPerWeek,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_days: Vec<Weekday>,
    pub equipment: Equipment,
    pub duration: SessionDuration,
}

impl SurveyAnswers {
    pub fn validate(&self) -> Result<(), SurveyError> {
        let allowed = self.days_per_week.count();
        if self.preferred_days.len() > usize::from(allowed) {
            return Err(SurveyError::TooManyPreferredDays {
                selected: self.preferred_days.len(),
                allowed,
            });
        }

        let mut seen = BTreeSet::new();
        for day in &self.preferred_days {
            if !seen.insert(*day) {
                return Err(SurveyError::DuplicatePreferredDay(*day));
            }
        }

        Ok(())
    }
}
