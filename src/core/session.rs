use crate::core::prompt::Prompter;
use crate::domain::model::ConsumptionTracker;
use crate::domain::ports::{NeighborhoodStore, SessionSettings};
use crate::utils::error::{HydroError, Result};
use crate::utils::validation::parse_positive_integer;
use chrono::{Local, NaiveDate};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub tracked: usize,
    pub persisted: usize,
    pub persistence_failures: usize,
}

/// Interactive operator loop: one neighborhood at a time, classifying each reading as it
/// is typed and saving the neighborhood once all of its days are in.
pub struct ConsoleSession<S> {
    store: Option<S>,
    population_unit: i64,
    capture_date: Option<NaiveDate>,
}

impl<S: NeighborhoodStore> ConsoleSession<S> {
    pub fn new<C: SessionSettings + ?Sized>(settings: &C, store: Option<S>) -> Self {
        Self {
            store: store.filter(|_| settings.persist_enabled()),
            population_unit: settings.population_unit(),
            capture_date: None,
        }
    }

    /// Pins the capture date instead of using today's local date.
    pub fn with_capture_date(mut self, date: NaiveDate) -> Self {
        self.capture_date = Some(date);
        self
    }

    pub async fn run<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();

        prompter.say("Welcome to the Water Control System!")?;
        prompter.say("Here you can monitor and improve water consumption in your city's neighborhoods.")?;
        if self.store.is_none() {
            prompter.say("(Readings will not be saved in this session.)")?;
        }

        loop {
            let Some(tracker) = self.collect_neighborhood(prompter)? else {
                tracing::debug!("Input closed while collecting a neighborhood");
                break;
            };
            summary.tracked += 1;

            prompter.say(&format!(
                "Total consumption for {}: {:.2} L over {} days (daily limit {} L)",
                tracker.name(),
                tracker.total_consumption(),
                tracker.readings().len(),
                tracker.daily_limit()
            ))?;

            if let Some(store) = &self.store {
                let captured_on = self.capture_date.unwrap_or_else(|| Local::now().date_naive());
                match store.save(&tracker, captured_on).await {
                    Ok(id) => {
                        summary.persisted += 1;
                        prompter.say(&format!(
                            "\nData for neighborhood {} saved to the database (id {})!",
                            tracker.name(),
                            id
                        ))?;
                    }
                    Err(e) => {
                        // 讀數已經顯示給操作員，存檔失敗只回報不中斷
                        summary.persistence_failures += 1;
                        tracing::error!("❌ Failed to save '{}': {}", tracker.name(), e);
                        prompter.say(&e.user_friendly_message())?;
                    }
                }
            }

            match prompter.ask_yes_no("\nTrack another neighborhood? (y/n): ")? {
                Some(true) => continue,
                _ => break,
            }
        }

        prompter.say("\nThank you for using the Water Control System!")?;
        tracing::info!(
            "Session finished: {} tracked, {} saved, {} save failures",
            summary.tracked,
            summary.persisted,
            summary.persistence_failures
        );
        Ok(summary)
    }

    fn collect_neighborhood<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<Option<ConsumptionTracker>> {
        let Some(name) =
            prompter.ask_text("Enter the neighborhood name: ", "The name cannot be empty.")?
        else {
            return Ok(None);
        };

        let unit = self.population_unit;
        let population_prompt = if unit == 1 {
            format!("Enter the population of {}: ", name)
        } else {
            format!("Enter the population of {} (in units of {}): ", name, unit)
        };
        let Some(mut tracker) = prompter.ask_parsed(
            &population_prompt,
            "The population must be a positive number.",
            |line| {
                let units = parse_positive_integer("population", line)?;
                let population = units.checked_mul(unit).ok_or_else(|| {
                    HydroError::invalid_argument("population", units, "The population is too large.")
                })?;
                ConsumptionTracker::create(name.as_str(), population)
            },
        )?
        else {
            return Ok(None);
        };

        let Some(days) = prompter.ask_positive_integer(
            &format!("How many days do you want to record for {}? ", name),
            "days",
            "The number of days must be positive.",
        )?
        else {
            return Ok(None);
        };

        for day in 1..=days {
            let Some(liters) = prompter.ask_positive_real(
                &format!(
                    "Enter the water consumption in liters for day {} of {}: ",
                    day, name
                ),
                "reading",
                "The daily consumption must be a positive value.",
            )?
            else {
                return Ok(None);
            };

            let evaluation = tracker.record(liters)?;
            tracing::debug!(
                "{} day {}: {} L, excess {}% -> {}",
                name,
                day,
                liters,
                evaluation.excess_percent,
                evaluation.label
            );
            prompter.say(&format!(
                "Day {}: {:?} L - {}",
                day,
                liters,
                evaluation.label.message()
            ))?;
        }

        Ok(Some(tracker))
    }
}
