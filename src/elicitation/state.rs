// Workflow state and the per-field merge policy
//
// Stages never touch `WorkflowState` directly. They return a `StateUpdate`
// and the engine folds it in with `WorkflowState::apply`, which consults the
// reducer table in `Field::reducer`.

use serde::{Deserialize, Serialize};

use super::types::{EvaluationResult, Interview, Persona};

/// How a field absorbs an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    /// Extend the sequence; existing elements are kept in place
    Append,
    /// Replace the value
    Overwrite,
    /// Add the delta to the counter
    Increment,
}

/// Every mergeable field of `WorkflowState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Personas,
    LatestBatch,
    Interviews,
    RequirementsDoc,
    Iteration,
    Sufficient,
    Reason,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Personas,
        Field::LatestBatch,
        Field::Interviews,
        Field::RequirementsDoc,
        Field::Iteration,
        Field::Sufficient,
        Field::Reason,
    ];

    /// The reducer table
    pub const fn reducer(self) -> Reducer {
        match self {
            Field::Personas | Field::Interviews => Reducer::Append,
            Field::LatestBatch | Field::Sufficient | Field::Reason => Reducer::Overwrite,
            // Written once, by the document stage
            Field::RequirementsDoc => Reducer::Overwrite,
            Field::Iteration => Reducer::Increment,
        }
    }
}

/// The single record threaded through one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub user_request: String,
    pub personas: Vec<Persona>,
    /// Personas appended by the most recent generation
    #[serde(default)]
    pub latest_batch: usize,
    pub interviews: Vec<Interview>,
    pub requirements_doc: String,
    pub iteration: u32,
    pub sufficient: bool,
    pub reason: String,
}

impl WorkflowState {
    pub fn new(user_request: impl Into<String>) -> Self {
        Self {
            user_request: user_request.into(),
            personas: Vec::new(),
            latest_batch: 0,
            interviews: Vec::new(),
            requirements_doc: String::new(),
            iteration: 0,
            sufficient: false,
            reason: String::new(),
        }
    }

    /// Personas from the most recent generation, at most the newest `cap`.
    ///
    /// Earlier generations are never returned, so nobody is interviewed twice.
    pub fn latest_personas(&self, cap: usize) -> &[Persona] {
        let take = self.latest_batch.min(cap).min(self.personas.len());
        &self.personas[self.personas.len() - take..]
    }

    /// Merge a partial update using each field's reducer.
    pub fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            personas,
            latest_batch,
            interviews,
            requirements_doc,
            iteration,
            sufficient,
            reason,
        } = update;

        if let Some(v) = personas {
            merge_seq(Field::Personas.reducer(), &mut self.personas, v);
        }
        if let Some(v) = latest_batch {
            merge_scalar(Field::LatestBatch.reducer(), &mut self.latest_batch, v);
        }
        if let Some(v) = interviews {
            merge_seq(Field::Interviews.reducer(), &mut self.interviews, v);
        }
        if let Some(v) = requirements_doc {
            debug_assert!(
                self.requirements_doc.is_empty(),
                "requirements_doc is written once"
            );
            merge_scalar(Field::RequirementsDoc.reducer(), &mut self.requirements_doc, v);
        }
        if let Some(delta) = iteration {
            merge_counter(Field::Iteration.reducer(), &mut self.iteration, delta);
        }
        if let Some(v) = sufficient {
            merge_scalar(Field::Sufficient.reducer(), &mut self.sufficient, v);
        }
        if let Some(v) = reason {
            merge_scalar(Field::Reason.reducer(), &mut self.reason, v);
        }
    }
}

/// A stage's partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateUpdate {
    pub personas: Option<Vec<Persona>>,
    pub latest_batch: Option<usize>,
    pub interviews: Option<Vec<Interview>>,
    pub requirements_doc: Option<String>,
    /// Delta for the iteration counter
    pub iteration: Option<u32>,
    pub sufficient: Option<bool>,
    pub reason: Option<String>,
}

impl StateUpdate {
    /// New personas plus one more iteration
    pub fn personas(personas: Vec<Persona>) -> Self {
        Self {
            latest_batch: Some(personas.len()),
            personas: Some(personas),
            iteration: Some(1),
            ..Self::default()
        }
    }

    pub fn interviews(interviews: Vec<Interview>) -> Self {
        Self {
            interviews: Some(interviews),
            ..Self::default()
        }
    }

    pub fn evaluation(result: EvaluationResult) -> Self {
        Self {
            sufficient: Some(result.sufficient),
            reason: Some(result.reason),
            ..Self::default()
        }
    }

    pub fn document(document: String) -> Self {
        Self {
            requirements_doc: Some(document),
            ..Self::default()
        }
    }

    /// Fields this update touches
    pub fn fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| match f {
                Field::Personas => self.personas.is_some(),
                Field::LatestBatch => self.latest_batch.is_some(),
                Field::Interviews => self.interviews.is_some(),
                Field::RequirementsDoc => self.requirements_doc.is_some(),
                Field::Iteration => self.iteration.is_some(),
                Field::Sufficient => self.sufficient.is_some(),
                Field::Reason => self.reason.is_some(),
            })
            .collect()
    }
}

fn merge_seq<T>(reducer: Reducer, target: &mut Vec<T>, value: Vec<T>) {
    match reducer {
        Reducer::Append => target.extend(value),
        Reducer::Overwrite => *target = value,
        Reducer::Increment => unreachable!("sequence fields are never counters"),
    }
}

fn merge_scalar<T>(reducer: Reducer, target: &mut T, value: T) {
    match reducer {
        Reducer::Overwrite => *target = value,
        Reducer::Append | Reducer::Increment => {
            unreachable!("scalar fields are always overwritten")
        }
    }
}

fn merge_counter(reducer: Reducer, target: &mut u32, delta: u32) {
    match reducer {
        Reducer::Increment => *target += delta,
        Reducer::Overwrite => *target = delta,
        Reducer::Append => unreachable!("counters cannot be appended to"),
    }
}
