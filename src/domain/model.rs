use crate::utils::error::{HydroError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, validate_positive_real};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Liters per resident per day.
pub const LITERS_PER_RESIDENT: u64 = 110;

/// Severity band of a single day's reading, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassificationLabel {
    Ideal,
    High,
    VeryHigh,
    ExtremelyHigh,
    Alert,
}

impl ClassificationLabel {
    /// Maps a rounded excess percent onto its band. Upper bounds are inclusive.
    pub fn from_excess_percent(excess_percent: f64) -> Self {
        if excess_percent <= 0.0 {
            ClassificationLabel::Ideal
        } else if excess_percent <= 25.0 {
            ClassificationLabel::High
        } else if excess_percent <= 50.0 {
            ClassificationLabel::VeryHigh
        } else if excess_percent <= 75.0 {
            ClassificationLabel::ExtremelyHigh
        } else {
            ClassificationLabel::Alert
        }
    }

    pub fn band_index(self) -> usize {
        match self {
            ClassificationLabel::Ideal => 0,
            ClassificationLabel::High => 1,
            ClassificationLabel::VeryHigh => 2,
            ClassificationLabel::ExtremelyHigh => 3,
            ClassificationLabel::Alert => 4,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ClassificationLabel::Ideal => "Ideal consumption. You are within the limit!",
            ClassificationLabel::High => "High consumption. Try to reduce water usage!",
            ClassificationLabel::VeryHigh => "Very high consumption. Saving measures are needed!",
            ClassificationLabel::ExtremelyHigh => {
                "Extremely high consumption! Urgent reduction required!"
            }
            ClassificationLabel::Alert => "Neighborhood on alert! Excessive water consumption!",
        }
    }
}

impl fmt::Display for ClassificationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClassificationLabel::Ideal => "Ideal",
            ClassificationLabel::High => "High",
            ClassificationLabel::VeryHigh => "VeryHigh",
            ClassificationLabel::ExtremelyHigh => "ExtremelyHigh",
            ClassificationLabel::Alert => "Alert",
        };
        f.write_str(name)
    }
}

/// Outcome of checking one reading against the daily limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub liters: f64,
    pub excess_percent: f64,
    pub label: ClassificationLabel,
}

/// Rounds to two decimals, halves going toward positive infinity.
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// A neighborhood's population, derived daily limit and the readings taken so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionTracker {
    name: String,
    population: u64,
    daily_limit: u64,
    daily_readings: Vec<f64>,
}

impl ConsumptionTracker {
    pub fn create(name: impl Into<String>, population: i64) -> Result<Self> {
        let name = name.into();
        validate_non_empty_string("name", &name)?;
        validate_positive_number("population", population)?;

        let population = population as u64;
        let daily_limit = population.checked_mul(LITERS_PER_RESIDENT).ok_or_else(|| {
            HydroError::invalid_argument("population", population, "Daily limit would overflow")
        })?;

        Ok(Self {
            name,
            population,
            daily_limit,
            daily_readings: Vec::new(),
        })
    }

    pub fn add_reading(&mut self, value: f64) -> Result<()> {
        validate_positive_real("reading", value)?;
        self.daily_readings.push(value);
        Ok(())
    }

    /// Appends the reading and evaluates that same value.
    pub fn record(&mut self, value: f64) -> Result<Evaluation> {
        self.add_reading(value)?;
        Ok(self.evaluate(value))
    }

    pub fn total_consumption(&self) -> f64 {
        self.daily_readings.iter().sum()
    }

    pub fn evaluate(&self, value: f64) -> Evaluation {
        let limit = self.daily_limit as f64;
        let excess_percent = round2(((value - limit) / limit) * 100.0);
        Evaluation {
            liters: value,
            excess_percent,
            label: ClassificationLabel::from_excess_percent(excess_percent),
        }
    }

    pub fn classify(&self, value: f64) -> ClassificationLabel {
        self.evaluate(value).label
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn daily_limit(&self) -> u64 {
        self.daily_limit
    }

    pub fn readings(&self) -> &[f64] {
        &self.daily_readings
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeighborhoodId(pub i64);

impl fmt::Display for NeighborhoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredNeighborhood {
    pub id: NeighborhoodId,
    pub name: String,
    pub population: i64,
    pub daily_limit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredReading {
    pub liters: f64,
    pub captured_on: NaiveDate,
}
