use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

// --- Declare modules ---
mod config;
pub mod db;
pub mod prescription;
pub mod units;

// --- Expose public types ---
pub use config::{
    get_config_path as get_config_path_util, load_config as load_config_util, parse_color,
    save_config as save_config_util, Config, Error as ConfigError, StandardColor, Theme, Units,
};

pub use db::{
    get_db_path as get_db_path_util, Error as DbError, Lift, LiftStore, MemoryStore, SqliteStore,
    TrackingLift,
};

pub use prescription::{
    compute_prescription, compute_prescription_for_label, Prescription, TrainingCycle, WarmUp,
    WorkSet,
};

pub use units::{Direction, Step, WeightError};

pub struct AppService {
    pub config: Config,
    pub store: Box<dyn LiftStore>,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
}

impl AppService {
    /// Initializes the application service with the on-disk SQLite store.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load_config(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let db_path = db::get_db_path().context("Failed to determine database path")?;
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;

        Ok(Self {
            config,
            store: Box::new(store),
            db_path,
            config_path,
        })
    }

    pub fn with_store(
        config: Config,
        store: Box<dyn LiftStore>,
        db_path: PathBuf,
        config_path: PathBuf,
    ) -> Self {
        Self {
            config,
            store,
            db_path,
            config_path,
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save_config(&self.config_path, &self.config)
    }

    /// Sets the display unit.
    /// # Errors
    /// Returns `ConfigError` variants if saving fails.
    pub fn set_units(&mut self, units: Units) -> Result<(), ConfigError> {
        self.config.units = units;
        self.save_config()
    }

    /// Sets the cycle `plan` uses by default. Unlike plan lookups, a bad label is rejected here.
    /// # Errors
    /// - `ConfigError::InvalidCycle` if the label is not a known cycle.
    /// - `ConfigError` variants if saving fails.
    pub fn set_default_cycle(&mut self, label: &str) -> Result<TrainingCycle, ConfigError> {
        let cycle = TrainingCycle::try_from_label(label)
            .ok_or_else(|| ConfigError::InvalidCycle(label.to_string()))?;
        self.config.default_cycle = cycle.label().to_string();
        self.save_config()?;
        Ok(cycle)
    }

    pub fn default_cycle(&self) -> TrainingCycle {
        TrainingCycle::from_label(&self.config.default_cycle)
    }

    /// Adds a lift dated today. `raw_weight` is in the configured display unit.
    /// # Errors
    /// - `WeightError` if the weight is not a positive number.
    /// - `DbError` if the store rejects the insert.
    pub fn add_lift(&mut self, name: &str, raw_weight: &str) -> Result<TrackingLift> {
        self.add_lift_on(name, raw_weight, Local::now().date_naive())
    }

    /// Adds a lift with an explicit creation date.
    /// # Errors
    /// See [`AppService::add_lift`].
    pub fn add_lift_on(
        &mut self,
        name: &str,
        raw_weight: &str,
        date: NaiveDate,
    ) -> Result<TrackingLift> {
        let trimmed_name = name.trim();
        if trimmed_name.is_empty() {
            bail!("Lift name cannot be empty.");
        }
        let max_weight = units::parse_weight_input(raw_weight, self.config.units)?;

        let id = self
            .store
            .create(trimmed_name, max_weight, date)
            .with_context(|| format!("Failed to add lift '{trimmed_name}'"))?;

        Ok(TrackingLift {
            id: Some(id),
            lift: Lift {
                name: trimmed_name.to_string(),
                max_weight,
            },
            date,
        })
    }

    /// Lists all tracked lifts, oldest first.
    /// # Errors
    /// Returns `DbError` if the store cannot be read.
    pub fn list_lifts(&self) -> Result<Vec<TrackingLift>, DbError> {
        self.store.list_all()
    }

    /// Looks up one lift.
    /// # Errors
    /// Returns `DbError::LiftNotFound` if no lift has this id.
    pub fn get_lift(&self, id: i64) -> Result<TrackingLift, DbError> {
        self.store.find_by_id(id)?.ok_or(DbError::LiftNotFound(id))
    }

    /// Overwrites a lift's max weight. `raw_weight` is in the display unit; the date is left alone.
    /// # Errors
    /// - `WeightError` if the weight is not a positive number.
    /// - `DbError::LiftNotFound` if no lift has this id.
    pub fn edit_max_weight(&mut self, id: i64, raw_weight: &str) -> Result<f64> {
        let max_weight = units::parse_weight_input(raw_weight, self.config.units)?;
        self.store_max_weight(id, max_weight)?;
        Ok(max_weight)
    }

    /// Steps a lift's max weight up or down in display units, then stores it as pounds.
    /// Returns the new max in pounds.
    /// # Errors
    /// - `WeightError::NotPositive` if stepping down reaches zero.
    /// - `WeightError::OutOfRange` if stepping up overflows.
    /// - `DbError::LiftNotFound` if no lift has this id.
    pub fn step_max_weight(&mut self, id: i64, step: Step, direction: Direction) -> Result<f64> {
        let units = self.config.units;
        let tracked = self.get_lift(id)?;
        let current = units::to_display(tracked.lift.max_weight, units);
        let stepped = units::step_weight(current, units, step, direction);
        units::validate_weight(stepped)?;

        let max_weight = units::validate_weight(units::from_display(stepped, units))?;
        self.store_max_weight(id, max_weight)?;
        Ok(max_weight)
    }

    fn store_max_weight(&mut self, id: i64, max_weight: f64) -> Result<()> {
        let updated = self
            .store
            .update_max_weight(id, max_weight)
            .with_context(|| format!("Failed to update lift ID {id}"))?;
        if !updated {
            return Err(DbError::LiftNotFound(id).into());
        }
        Ok(())
    }

    /// Deletes a lift.
    /// # Errors
    /// Returns `DbError::LiftNotFound` if no lift has this id.
    pub fn delete_lift(&mut self, id: i64) -> Result<()> {
        let deleted = self
            .store
            .delete_by_id(id)
            .with_context(|| format!("Failed to delete lift ID {id}"))?;
        if !deleted {
            return Err(DbError::LiftNotFound(id).into());
        }
        Ok(())
    }

    /// Computes the prescription for a stored lift. `cycle_label` of `None` uses the
    /// configured default; an unknown label falls back to 5/3/1.
    /// # Errors
    /// Returns `DbError::LiftNotFound` if no lift has this id.
    pub fn prescription_for(
        &self,
        id: i64,
        cycle_label: Option<&str>,
    ) -> Result<(TrackingLift, Prescription)> {
        let tracked = self.get_lift(id)?;
        let cycle = cycle_label.map_or_else(|| self.default_cycle(), TrainingCycle::from_label);
        let prescription = compute_prescription(tracked.lift.max_weight, cycle);
        Ok((tracked, prescription))
    }
}
