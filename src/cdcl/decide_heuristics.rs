use super::assignment::Assignment;
use super::literal::Literal;

/// RSAT phase-selection threshold: the activity gap that overrides the saved
/// phase of a variable.
const PHASE_GAP: i64 = 32;

/// Variable State Independent Decaying Sum (VSIDS) state:
/// (1) Each variable in each polarity has a counter. At construction the
///     counters are seeded with the literal's occurrence count, so initial
///     scores reflect frequency (and the bootstrap reads them as occurrence
///     counts for pure-literal detection).
/// (2) Conflict analysis bumps the counter of every literal it touches.
/// (3) Every HALFLIFE conflicts all counters are halved by a right shift.
/// (4) Decisions walk `order`, a vector of variables sorted once by score;
///     it is never re-sorted, the `next_var` cursor just rewinds whenever a
///     variable below it is unassigned again.
pub struct Vsids {
    activity: Vec<[u32; 2]>, // [negative, positive] counters per variable
    phase: Vec<bool>,
    order: Vec<usize>,
    position: Vec<usize>,
    next_var: usize,
}

impl Vsids {
    pub fn new(variables: usize) -> Self {
        Vsids {
            activity: vec![[0, 0]; variables + 1],
            phase: vec![false; variables + 1],
            order: Vec::new(),
            position: vec![usize::MAX; variables + 1],
            next_var: 0,
        }
    }

    pub fn bump(&mut self, lit: Literal) {
        self.activity[lit.variable][lit.polarity as usize] += 1;
    }

    /// (negative, positive) counters of a variable.
    pub fn occurrences(&self, variable: usize) -> (u32, u32) {
        let [nega, posi] = self.activity[variable];
        (nega, posi)
    }

    pub fn score(&self, variable: usize) -> u32 {
        let [nega, posi] = self.activity[variable];
        nega + posi
    }

    /// Halves every counter. Integer halving may disturb the relative order
    /// of equal scores, e.g. (7 + 7) => (3 + 3) whereas (6 + 8) => (3 + 4);
    /// the perturbation is deliberate and left uncorrected.
    pub fn decay(&mut self) {
        for counters in &mut self.activity {
            counters[0] >>= 1;
            counters[1] >>= 1;
        }
    }

    /// Builds `order` from the unassigned variables with a positive score,
    /// best first, and initializes each saved phase to the more frequent
    /// polarity. Called once, after the unit/pure bootstrap.
    pub fn init_order(&mut self, model: &[Option<Assignment>]) {
        let mut order: Vec<usize> = (1..model.len())
            .filter(|&v| model[v].is_none() && self.score(v) > 0)
            .collect();
        order.sort_by(|&a, &b| {
            let score = |v: usize| self.activity[v][0] + self.activity[v][1];
            score(b).cmp(&score(a))
        });
        self.order = order;
        for i in 0..self.order.len() {
            let v = self.order[i];
            self.position[v] = i;
            self.phase[v] = self.activity[v][1] > self.activity[v][0];
        }
        self.next_var = 0;
    }

    /// VSIDS fallback: the first unassigned variable at or after the cursor.
    pub fn next_decision(&mut self, model: &[Option<Assignment>]) -> Option<usize> {
        while self.next_var < self.order.len() {
            let v = self.order[self.next_var];
            self.next_var += 1;
            if model[v].is_none() {
                return Some(v);
            }
        }
        None
    }

    /// Rewinds the cursor so an unassigned variable is considered again.
    pub fn on_unassign(&mut self, variable: usize) {
        if self.position[variable] < self.next_var {
            self.next_var = self.position[variable];
        }
    }

    pub fn save_phase(&mut self, variable: usize, value: bool) {
        self.phase[variable] = value;
    }

    /// RSAT phase selection: follow the activity gap when it is decisive,
    /// otherwise the saved phase.
    pub fn select_phase(&self, variable: usize) -> Literal {
        let [nega, posi] = self.activity[variable];
        let gap = posi as i64 - nega as i64;
        let polarity = if gap > PHASE_GAP {
            true
        } else if gap < -PHASE_GAP {
            false
        } else {
            self.phase[variable]
        };
        Literal {
            variable,
            polarity,
        }
    }

    #[cfg(test)]
    pub fn order_and_position(&self) -> (&[usize], &[usize]) {
        (&self.order, &self.position)
    }
}
