use crate::state::Integrable;

/// Step counters of one solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Substeps that met the tolerances.
    pub accepted: usize,
    /// Substeps that were retried with a smaller step.
    pub rejected: usize,
    /// Right-hand side evaluations.
    pub evaluations: usize,
}

/// A preallocated result container used for in-memory storage of ODE solver outputs.
/// Each entry stores the time and state value at that time.
#[derive(Debug)]
pub struct MemoryResult<State>
where
    State: Integrable,
{
    /// Recorded times.
    pub t: Vec<f64>,
    /// Recorded states.
    pub y: Vec<State>,
    /// Counters of the solve that produced this result.
    pub stats: SolveStats,
}

impl<State: Integrable> MemoryResult<State> {
    /// Constructs a new memory result buffer with an initial capacity `n`.
    pub fn new(n: usize) -> Self {
        Self {
            t: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            stats: SolveStats::default(),
        }
    }

    /// Appends a new result `(t, x)`.
    pub(crate) fn insert(&mut self, t: f64, x: &State) {
        self.t.push(t);
        self.y.push(x.clone());
    }

    /// Number of saved entries.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Splits the result into its time and state columns.
    pub fn into_parts(self) -> (Vec<f64>, Vec<State>) {
        (self.t, self.y)
    }
}
