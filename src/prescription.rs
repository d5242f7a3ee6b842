//src/prescription.rs
use serde::Serialize;
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// (percentage of max, reps) for each of the three sets.
pub type SetTable = [(f64, u32); 3];

const WARM_UP_TABLE: SetTable = [(40.0, 5), (50.0, 5), (60.0, 3)];
// Deload reuses the warm-up numbers for its working sets.
const DELOAD_TABLE: SetTable = WARM_UP_TABLE;
const FIVES_TABLE: SetTable = [(65.0, 5), (75.0, 5), (85.0, 5)];
const TRIPLES_TABLE: SetTable = [(70.0, 3), (80.0, 3), (90.0, 3)];
const FIVE_THREE_ONE_TABLE: SetTable = [(75.0, 5), (85.0, 3), (95.0, 1)];

/// Serializes as its label, e.g. `"5/3/1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, Serialize)]
pub enum TrainingCycle {
    Deload,
    #[serde(rename = "5/5/5")]
    FiveFiveFive,
    #[serde(rename = "3/3/3")]
    ThreeThreeThree,
    #[default]
    #[serde(rename = "5/3/1")]
    FiveThreeOne,
}

impl TrainingCycle {
    pub const fn label(self) -> &'static str {
        match self {
            TrainingCycle::Deload => "Deload",
            TrainingCycle::FiveFiveFive => "5/5/5",
            TrainingCycle::ThreeThreeThree => "3/3/3",
            TrainingCycle::FiveThreeOne => "5/3/1",
        }
    }

    /// Parses a cycle label. Unrecognised labels fall back to 5/3/1 rather than failing.
    pub fn from_label(label: &str) -> Self {
        Self::try_from_label(label).unwrap_or_else(|| {
            log::warn!("Unknown training cycle '{label}', falling back to 5/3/1");
            TrainingCycle::FiveThreeOne
        })
    }

    /// Strict variant of [`TrainingCycle::from_label`], used where a typo should be reported.
    pub fn try_from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "deload" => Some(TrainingCycle::Deload),
            "5/5/5" | "555" => Some(TrainingCycle::FiveFiveFive),
            "3/3/3" | "333" => Some(TrainingCycle::ThreeThreeThree),
            "5/3/1" | "531" => Some(TrainingCycle::FiveThreeOne),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Percentage and rep table used for this cycle's working sets.
    pub const fn working_table(self) -> SetTable {
        match self {
            TrainingCycle::Deload => DELOAD_TABLE,
            TrainingCycle::FiveFiveFive => FIVES_TABLE,
            TrainingCycle::ThreeThreeThree => TRIPLES_TABLE,
            TrainingCycle::FiveThreeOne => FIVE_THREE_ONE_TABLE,
        }
    }

    pub const fn has_warm_up(self) -> bool {
        !matches!(self, TrainingCycle::Deload)
    }
}

impl fmt::Display for TrainingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Three prescribed working sets, weights in pounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkSet {
    pub rep_lift1: f64,
    pub rep_lift2: f64,
    pub rep_lift3: f64,
    pub reps1: u32,
    pub reps2: u32,
    pub reps3: u32,
}

impl WorkSet {
    fn from_table(max_weight: f64, table: SetTable) -> Self {
        let weight = |i: usize| max_weight * (table[i].0 / 100.0);
        Self {
            rep_lift1: weight(0),
            rep_lift2: weight(1),
            rep_lift3: weight(2),
            reps1: table[0].1,
            reps2: table[1].1,
            reps3: table[2].1,
        }
    }

    /// (weight, reps) pairs in set order.
    pub const fn rows(&self) -> [(f64, u32); 3] {
        [
            (self.rep_lift1, self.reps1),
            (self.rep_lift2, self.reps2),
            (self.rep_lift3, self.reps3),
        ]
    }

    pub const fn weights(&self) -> [f64; 3] {
        [self.rep_lift1, self.rep_lift2, self.rep_lift3]
    }

    pub const fn reps(&self) -> [u32; 3] {
        [self.reps1, self.reps2, self.reps3]
    }
}

/// Warm-up sets share the working-set shape; only the table differs.
pub type WarmUp = WorkSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prescription {
    pub cycle: TrainingCycle,
    /// `None` for Deload, where no warm-up is prescribed at all.
    pub warm_up: Option<WarmUp>,
    pub working_sets: WorkSet,
}

/// Computes warm-up and working sets for `max_weight` (pounds).
///
/// No rounding happens here; values are rounded when displayed.
/// `max_weight` is expected to be validated as positive by the caller.
pub fn compute_prescription(max_weight: f64, cycle: TrainingCycle) -> Prescription {
    let warm_up = cycle
        .has_warm_up()
        .then(|| WorkSet::from_table(max_weight, WARM_UP_TABLE));

    Prescription {
        cycle,
        warm_up,
        working_sets: WorkSet::from_table(max_weight, cycle.working_table()),
    }
}

/// Same as [`compute_prescription`] but takes the cycle as free text.
pub fn compute_prescription_for_label(max_weight: f64, cycle_label: &str) -> Prescription {
    compute_prescription(max_weight, TrainingCycle::from_label(cycle_label))
}
