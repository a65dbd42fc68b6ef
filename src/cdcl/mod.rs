use std::collections::VecDeque;
use std::fmt;

use self::assignment::{Antecedent, Assignment};
use self::clause::{ClauseArena, ClauseRef};
use self::decide_heuristics::Vsids;
use self::literal::Literal;
use self::occurlist::OccurLists;
use self::restart::RestartPolicy;

pub mod assignment;
pub mod clause;
pub mod decide_heuristics;
pub mod literal;
pub mod occurlist;
pub mod restart;
pub mod utils;

/// Conflicts between two halvings of the activity counters.
const HALFLIFE: u64 = 128;
/// How many recent learned clauses the clause-guided decision scan visits.
const CLAUSE_WINDOW: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum SatResult {
    /// Satisfiable; carries every assigned literal, already re-checked by the
    /// verifier against the original clauses.
    Sat(Vec<Literal>),
    Unsat,
    /// The verifier rejected the model the search produced.
    Unknown,
}

impl fmt::Display for SatResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SatResult::Sat(_) => write!(f, "SATISFIABLE"),
            SatResult::Unsat => write!(f, "UNSATISFIABLE"),
            SatResult::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub decisions: u64,
    pub conflicts: u64,
    pub restarts: u64,
}

/// The clause that went false during propagation. Binary clauses are not in
/// the arena, so a binary conflict carries its two (falsified) literals.
#[derive(Clone, Copy, Debug)]
enum ConflictCause {
    Clause(ClauseRef),
    Binary(Literal, Literal),
}

enum Propagation {
    Quiescent,
    Conflict(ConflictCause),
}

enum WatchOutcome {
    Moved(Literal),
    Satisfied,
    Unit(Literal),
    Conflicting,
}

pub struct Cdcl<R: RestartPolicy> {
    vc: usize, // variable count
    model: Vec<Option<Assignment>>,
    trail: Vec<Literal>,
    current_level: usize,
    arena: ClauseArena,
    watches: OccurLists<ClauseRef>,
    implications: OccurLists<Literal>,
    units: Vec<Literal>,
    heuristic: Vsids,
    restarts: R,
    // scratch state for conflict analysis, reused between conflicts
    mark: Vec<bool>,
    conflict_lits: VecDeque<Literal>,
    tmp_lits: Vec<Literal>,
    conflict_clause: Option<ClauseRef>,
    a_level: usize, // assertion level of the last learned clause
    next_clause: usize,
    next_restart: u64,
    next_decay: u64,
    stats: Stats,
}

impl<R: RestartPolicy> Cdcl<R> {
    /// Consumes the clause list and runs the unit/pure bootstrap. On return
    /// either `current_level == 1` and the trail reflects every level-0
    /// forcing, or `current_level == 0` and the formula was refuted by unit
    /// propagation alone.
    #[must_use]
    pub fn new(raw_cnf: &[Vec<i64>], number_of_atoms: usize, restarts: R) -> Self {
        let mut vc = number_of_atoms;
        for clause in raw_cnf {
            for lit in clause {
                vc = vc.max(lit.unsigned_abs() as usize);
            }
        }

        let mut solver = Cdcl {
            vc,
            model: vec![None; vc + 1],
            trail: Vec::with_capacity(vc),
            current_level: 0,
            arena: ClauseArena::new(),
            watches: OccurLists::new(vc),
            implications: OccurLists::new(vc),
            units: Vec::new(),
            heuristic: Vsids::new(vc),
            restarts,
            mark: vec![false; vc + 1],
            conflict_lits: VecDeque::new(),
            tmp_lits: Vec::new(),
            conflict_clause: None,
            a_level: 0,
            next_clause: 0,
            next_restart: 0,
            next_decay: HALFLIFE,
            stats: Stats::default(),
        };
        solver.next_restart = solver.restarts.next_interval();

        // Distribuímos as cláusulas originais: unitárias para o bootstrap,
        // binárias para as listas de implicação, o resto para a arena.
        let mut contradiction = false;
        for clause in raw_cnf {
            let mut literals: Vec<Literal> = Vec::with_capacity(clause.len());
            let mut tautology = false;
            for &raw in clause {
                let lit = Literal::from_dimacs(raw);
                if literals.contains(&lit) {
                    continue;
                }
                if literals.contains(&lit.negate()) {
                    tautology = true;
                    break;
                }
                literals.push(lit);
            }
            if tautology {
                continue;
            }
            for &lit in &literals {
                // activity doubles as the occurrence count until the first
                // conflict bumps it; the pure-literal pass relies on that
                solver.heuristic.bump(lit);
            }
            match literals.len() {
                0 => contradiction = true,
                1 => solver.units.push(literals[0]),
                2 => {
                    solver
                        .implications
                        .add_to_lit(literals[0].negate(), literals[1]);
                    solver
                        .implications
                        .add_to_lit(literals[1].negate(), literals[0]);
                }
                _ => {
                    let clause = solver.arena.add_original(&literals);
                    solver.watches.add_to_lit(literals[0], clause);
                    solver.watches.add_to_lit(literals[1], clause);
                }
            }
        }
        if contradiction {
            return solver; // current_level == 0: refuted before any search
        }

        // assert unit clauses at level 0
        for i in 0..solver.units.len() {
            let unit = solver.units[i];
            match Self::value_in(&solver.model, unit) {
                Some(true) => continue,
                Some(false) => return solver,
                None => {}
            }
            if let Propagation::Conflict(_) = solver.assert_literal(unit, None) {
                return solver;
            }
        }

        // assert pure literals, free assignments with no antecedent
        for variable in 1..=vc {
            if solver.model[variable].is_some() {
                continue;
            }
            let (nega, posi) = solver.heuristic.occurrences(variable);
            let lit = if posi == 0 && nega > 0 {
                Literal {
                    variable,
                    polarity: false,
                }
            } else if nega == 0 && posi > 0 {
                Literal {
                    variable,
                    polarity: true,
                }
            } else {
                continue;
            };
            // nothing watches the unused polarity, so this cannot conflict
            if let Propagation::Conflict(_) = solver.assert_literal(lit, None) {
                return solver;
            }
        }

        solver.heuristic.init_order(&solver.model);
        solver.current_level = 1;
        solver
    }

    //Some(true) se satisfeito, Some(false) se falseado, None se não atribuído
    fn value_in(model: &[Option<Assignment>], lit: Literal) -> Option<bool> {
        model[lit.variable].map(|record| record.polarity == lit.polarity)
    }

    /// Records the assignment and pushes the literal onto the trail. Does not
    /// propagate.
    fn set_literal(&mut self, lit: Literal, antecedent: Option<Antecedent>) {
        debug_assert!(self.model[lit.variable].is_none());
        self.model[lit.variable] =
            Some(Assignment::new(lit.polarity, self.current_level, antecedent));
        self.trail.push(lit);
    }

    /// Sets the literal and runs unit propagation over the new trail suffix
    /// until it is exhausted or a clause goes false.
    fn assert_literal(&mut self, lit: Literal, antecedent: Option<Antecedent>) -> Propagation {
        let mut head = self.trail.len();
        self.set_literal(lit, antecedent);

        while head < self.trail.len() {
            let source = self.trail[head];
            head += 1;

            // fast path: partners of the binary clauses falsified by `source`
            let n_partners = self.implications.get(source).len();
            for k in 0..n_partners {
                let partner = self.implications.get(source)[k];
                match Self::value_in(&self.model, partner) {
                    Some(true) => {}
                    None => self.set_literal(partner, Some(Antecedent::Binary(source.negate()))),
                    Some(false) => {
                        return Propagation::Conflict(ConflictCause::Binary(
                            source.negate(),
                            partner,
                        ));
                    }
                }
            }

            // clauses watching the literal that just became false
            let falsified = source.negate();
            let mut list = self.watches.take(falsified);
            let mut kept = 0;
            let mut index = 0;
            while index < list.len() {
                let clause = list[index];
                index += 1;
                let outcome = {
                    let lits = self.arena.lits_mut(clause);
                    // keep the falsified watch in the second slot
                    if lits[0] == falsified {
                        lits.swap(0, 1);
                    }
                    let mut moved = None;
                    for k in 2..lits.len() {
                        if Self::value_in(&self.model, lits[k]) != Some(false) {
                            lits.swap(1, k);
                            moved = Some(lits[1]);
                            break;
                        }
                    }
                    match moved {
                        Some(new_watch) => WatchOutcome::Moved(new_watch),
                        None => match Self::value_in(&self.model, lits[0]) {
                            Some(true) => WatchOutcome::Satisfied,
                            None => WatchOutcome::Unit(lits[0]),
                            Some(false) => WatchOutcome::Conflicting,
                        },
                    }
                };
                match outcome {
                    WatchOutcome::Moved(new_watch) => {
                        self.watches.add_to_lit(new_watch, clause);
                    }
                    WatchOutcome::Satisfied => {
                        list[kept] = clause;
                        kept += 1;
                    }
                    WatchOutcome::Unit(implied) => {
                        list[kept] = clause;
                        kept += 1;
                        self.set_literal(implied, Some(Antecedent::Clause(clause)));
                    }
                    WatchOutcome::Conflicting => {
                        // the clause and the unvisited suffix stay watched here
                        let tail = list.len() - (index - 1);
                        list.copy_within(index - 1.., kept);
                        list.truncate(kept + tail);
                        self.watches.give_to(list, falsified);
                        return Propagation::Conflict(ConflictCause::Clause(clause));
                    }
                }
            }
            list.truncate(kept);
            self.watches.give_to(list, falsified);
        }
        Propagation::Quiescent
    }

    fn decide(&mut self, lit: Literal) -> Propagation {
        self.stats.decisions += 1;
        self.current_level += 1;
        self.assert_literal(lit, None)
    }

    /// Asserts the literal implied by the last learned clause.
    fn assert_cl(&mut self) -> Propagation {
        let clause = self
            .conflict_clause
            .expect("no learned clause pending assertion");
        let lit = self.arena.lits(clause)[0];
        self.assert_literal(lit, Some(Antecedent::Clause(clause)))
    }

    /// Marks the variable, bumps its polarity activity, and routes the
    /// literal: conflict-level literals are counted as pending, the rest go
    /// to the learned-clause buffer. Level-0 literals are globally false and
    /// resolve away. Returns the pending increment.
    fn mark_literal(&mut self, lit: Literal, conflict_level: usize) -> usize {
        let variable = lit.variable;
        let record = self.model[variable].expect("conflict literal must be assigned");
        if record.dl == 0 || self.mark[variable] {
            return 0;
        }
        self.mark[variable] = true;
        self.heuristic.bump(lit);
        if record.dl == conflict_level {
            1
        } else {
            self.conflict_lits.push_back(lit);
            0
        }
    }

    /// 1-UIP learning: resolves the conflicting clause against antecedents
    /// down the trail until a single literal of the conflict level remains,
    /// then stores the learned clause and its assertion level.
    fn learn_clause(&mut self, conflict: ConflictCause) {
        self.stats.conflicts += 1;
        let conflict_level = self.current_level;
        self.conflict_lits.clear();
        let mut pending = 0;

        match conflict {
            ConflictCause::Binary(a, b) => {
                for lit in [a, b] {
                    pending += self.mark_literal(lit, conflict_level);
                }
            }
            ConflictCause::Clause(clause) => {
                self.tmp_lits.clear();
                self.tmp_lits.extend_from_slice(self.arena.lits(clause));
                for i in 0..self.tmp_lits.len() {
                    let lit = self.tmp_lits[i];
                    pending += self.mark_literal(lit, conflict_level);
                }
            }
        }

        // Descemos a trilha resolvendo os antecedentes até sobrar um único
        // literal pendente do nível do conflito: o 1-UIP.
        let mut cursor = self.trail.len();
        loop {
            cursor -= 1;
            let lit = self.trail[cursor];
            let variable = lit.variable;
            if !self.mark[variable] {
                continue;
            }
            if pending == 1 {
                self.conflict_lits.push_front(lit.negate());
                self.mark[variable] = false;
                break;
            }
            match self.model[variable].and_then(|record| record.antecedent) {
                Some(Antecedent::Binary(other)) => {
                    pending += self.mark_literal(other, conflict_level);
                }
                Some(Antecedent::Clause(clause)) => {
                    self.tmp_lits.clear();
                    self.tmp_lits.extend_from_slice(self.arena.lits(clause));
                    for i in 0..self.tmp_lits.len() {
                        let other = self.tmp_lits[i];
                        if other.variable == variable {
                            continue;
                        }
                        pending += self.mark_literal(other, conflict_level);
                    }
                }
                None => {}
            }
            pending -= 1;
            self.mark[variable] = false;
        }

        // assertion level: deepest level among the carried literals; a
        // single-literal clause asserts right after a restart, at level 1
        self.a_level = self
            .conflict_lits
            .iter()
            .skip(1)
            .map(|lit| {
                self.model[lit.variable]
                    .expect("buffer literal must be assigned")
                    .dl
            })
            .max()
            .unwrap_or(1);
        for i in 1..self.conflict_lits.len() {
            let variable = self.conflict_lits[i].variable;
            self.mark[variable] = false;
        }

        self.tmp_lits.clear();
        self.tmp_lits.extend(self.conflict_lits.iter().copied());
        let learned = self.arena.add_learned(&self.tmp_lits);
        if self.tmp_lits.len() > 1 {
            // watch the asserting literal and one literal of the assertion
            // level, so the clause wakes up exactly when it becomes unit
            let a_level = self.a_level;
            let lits = self.arena.lits_mut(learned);
            for j in 1..lits.len() {
                let level = self.model[lits[j].variable]
                    .expect("buffer literal must be assigned")
                    .dl;
                if level == a_level {
                    lits.swap(1, j);
                    break;
                }
            }
            let (first, second) = (lits[0], lits[1]);
            self.watches.add_to_lit(first, learned);
            self.watches.add_to_lit(second, learned);
        }
        self.conflict_clause = Some(learned);
    }

    /// Pops the trail down to `level`, saving phases and rewinding the
    /// decision cursor. Capacity is kept; only the top moves.
    fn backtrack(&mut self, level: usize) {
        while let Some(&top) = self.trail.last() {
            let variable = top.variable;
            let record = self.model[variable].expect("trail literal must be assigned");
            if record.dl <= level {
                break;
            }
            // a decisão do nível do conflito não sobrescreve a fase salva
            if record.dl < self.current_level {
                self.heuristic.save_phase(variable, record.polarity);
            }
            self.model[variable] = None;
            self.heuristic.on_unassign(variable);
            self.trail.pop();
        }
        self.current_level = level;
    }

    fn clause_satisfied(&self, clause: ClauseRef) -> bool {
        self.arena
            .lits(clause)
            .iter()
            .any(|&lit| Self::value_in(&self.model, lit) == Some(true))
    }

    /// Picks the next decision literal, or `None` when a complete model
    /// exists. Prefers the best free variable of a recent unsatisfied learned
    /// clause, falling back to the VSIDS order.
    fn select_literal(&mut self) -> Option<Literal> {
        let end = self.next_clause.min(self.arena.learned_count());
        let start = end.saturating_sub(CLAUSE_WINDOW);
        for i in (start..end).rev() {
            self.next_clause = i + 1;
            let clause = self.arena.learned_at(i);
            if self.clause_satisfied(clause) {
                continue;
            }
            let mut best: Option<usize> = None;
            let mut best_score = -1i64;
            for &lit in self.arena.lits(clause) {
                if self.model[lit.variable].is_some() {
                    continue;
                }
                let score = self.heuristic.score(lit.variable) as i64;
                if score > best_score {
                    best_score = score;
                    best = Some(lit.variable);
                }
            }
            if let Some(variable) = best {
                return Some(self.heuristic.select_phase(variable));
            }
        }
        let variable = self.heuristic.next_decision(&self.model)?;
        Some(self.heuristic.select_phase(variable))
    }

    /// The decide/propagate/learn loop. A conflict at level 1 involves no
    /// decision, only unconditional consequences of the formula, and settles
    /// the instance as unsatisfiable.
    pub fn run(&mut self) -> SatResult {
        if self.current_level == 0 {
            return SatResult::Unsat; // bootstrap already refuted the formula
        }
        while let Some(decision) = self.select_literal() {
            let mut outcome = self.decide(decision);
            while let Propagation::Conflict(conflict) = outcome {
                let conflict_level = self.current_level;
                self.learn_clause(conflict);
                if conflict_level == 1 {
                    return SatResult::Unsat;
                }
                if self.stats.conflicts == self.next_decay {
                    self.next_decay += HALFLIFE;
                    self.heuristic.decay();
                }
                // a próxima decisão recomeça do topo da pilha de aprendidas
                self.next_clause = self.arena.learned_count();
                if self.stats.conflicts == self.next_restart {
                    self.stats.restarts += 1;
                    self.next_restart += self.restarts.next_interval();
                    self.backtrack(1);
                    if self.current_level != self.a_level {
                        // the restart jumped past the assertion level; leave
                        // the learned literal for the next decision to find
                        break;
                    }
                } else {
                    self.backtrack(self.a_level);
                }
                outcome = self.assert_cl();
            }
        }
        if !self.verify_solution() {
            return SatResult::Unknown;
        }
        SatResult::Sat(self.assigned_literals())
    }

    /// Re-checks the final assignment against every original clause: the
    /// arena segment, the unit clauses set aside at construction, and the
    /// binary clauses reconstructed from the implication lists.
    fn verify_solution(&self) -> bool {
        for i in 0..self.arena.original_count() {
            if !self.clause_satisfied(self.arena.original_at(i)) {
                return false;
            }
        }
        for &unit in &self.units {
            if Self::value_in(&self.model, unit) != Some(true) {
                return false;
            }
        }
        for variable in 1..=self.vc {
            for polarity in [false, true] {
                let trigger = Literal { variable, polarity };
                for &partner in self.implications.get(trigger) {
                    // the list entry stands for the clause (¬trigger ∨ partner)
                    if Self::value_in(&self.model, trigger.negate()) != Some(true)
                        && Self::value_in(&self.model, partner) != Some(true)
                    {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Every assigned literal, in variable order.
    pub fn assigned_literals(&self) -> Vec<Literal> {
        (1..=self.vc)
            .filter_map(|variable| {
                self.model[variable].map(|record| Literal {
                    variable,
                    polarity: record.polarity,
                })
            })
            .collect()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }
}

#[cfg(test)]
impl<R: RestartPolicy> Cdcl<R> {
    fn learned_clauses(&self) -> Vec<Vec<i64>> {
        (0..self.arena.learned_count())
            .map(|i| {
                self.arena
                    .lits(self.arena.learned_at(i))
                    .iter()
                    .map(|lit| lit.to_dimacs())
                    .collect()
            })
            .collect()
    }

    fn check_invariants(&self) {
        // each variable appears at most once on the trail, and exactly the
        // trail variables are assigned
        let mut seen = vec![false; self.vc + 1];
        for (position, lit) in self.trail.iter().enumerate() {
            assert!(!seen[lit.variable], "variable {} twice on trail", lit.variable);
            seen[lit.variable] = true;
            let record = self.model[lit.variable].expect("trail literal unassigned");
            assert_eq!(record.polarity, lit.polarity);

            // antecedent soundness: every other literal of the antecedent is
            // false and sits earlier on the trail
            let earlier = |other: Literal| {
                self.trail[..position]
                    .iter()
                    .any(|prev| *prev == other.negate())
            };
            match record.antecedent {
                Some(Antecedent::Binary(other)) => assert!(earlier(other)),
                Some(Antecedent::Clause(clause)) => {
                    for &other in self.arena.lits(clause) {
                        if other.variable == lit.variable {
                            continue;
                        }
                        assert!(earlier(other), "{other} not false before {lit}");
                    }
                }
                None => {}
            }
        }
        for variable in 1..=self.vc {
            assert_eq!(self.model[variable].is_some(), seen[variable]);
        }

        // watch invariant: every stored clause of length >= 2 sits in exactly
        // the two watch lists of its first two literals
        let mut watch_counts = std::collections::HashMap::new();
        for variable in 1..=self.vc {
            for polarity in [false, true] {
                let lit = Literal { variable, polarity };
                for &clause in self.watches.get(lit) {
                    let lits = self.arena.lits(clause);
                    assert!(
                        lits[0] == lit || lits[1] == lit,
                        "watch of {lit} is not on the first two literals"
                    );
                    *watch_counts.entry(clause).or_insert(0usize) += 1;
                }
            }
        }
        let all_clauses = (0..self.arena.original_count())
            .map(|i| self.arena.original_at(i))
            .chain((0..self.arena.learned_count()).map(|i| self.arena.learned_at(i)));
        for clause in all_clauses {
            let expected = if self.arena.lits(clause).len() > 1 { 2 } else { 0 };
            assert_eq!(watch_counts.get(&clause).copied().unwrap_or(0), expected);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::restart::{LubyRestarts, MockRestartPolicy, LUBY_UNIT};
    use super::*;

    fn solve(cnf: &[Vec<i64>], num_vars: usize) -> SatResult {
        Cdcl::new(cnf, num_vars, LubyRestarts::new(LUBY_UNIT)).run()
    }

    fn check_model(cnf: &[Vec<i64>], model: &[Literal]) -> bool {
        let assigned: Vec<i64> = model.iter().map(|lit| lit.to_dimacs()).collect();
        cnf.iter()
            .all(|clause| clause.iter().any(|lit| assigned.contains(lit)))
    }

    /// Unit propagation from scratch over the given clauses; true when it
    /// derives the empty clause.
    fn refutation_by_unit_propagation(clauses: &[Vec<i64>]) -> bool {
        let mut forced: Vec<i64> = Vec::new();
        loop {
            let mut progress = false;
            for clause in clauses {
                if clause.iter().any(|lit| forced.contains(lit)) {
                    continue;
                }
                let free: Vec<i64> = clause
                    .iter()
                    .filter(|&&lit| !forced.contains(&-lit))
                    .copied()
                    .collect();
                match free.as_slice() {
                    [] => return true,
                    [unit] => {
                        forced.push(*unit);
                        progress = true;
                    }
                    _ => {}
                }
            }
            if !progress {
                return false;
            }
        }
    }

    /// Pigeonhole principle with 3 pigeons and 2 holes; variable `2(p-1)+h`
    /// says pigeon p sits in hole h.
    fn pigeonhole_3_2() -> Vec<Vec<i64>> {
        let var = |p: i64, h: i64| 2 * (p - 1) + h;
        let mut cnf = Vec::new();
        for p in 1..=3 {
            cnf.push(vec![var(p, 1), var(p, 2)]);
        }
        for h in 1..=2 {
            for p in 1..=3 {
                for q in (p + 1)..=3 {
                    cnf.push(vec![-var(p, h), -var(q, h)]);
                }
            }
        }
        cnf
    }

    fn random_3sat(rng: &mut StdRng, num_vars: usize, num_clauses: usize) -> Vec<Vec<i64>> {
        (0..num_clauses)
            .map(|_| {
                let mut vars: Vec<i64> = Vec::new();
                while vars.len() < 3 {
                    let v = rng.gen_range(1..=num_vars as i64);
                    if !vars.contains(&v) {
                        vars.push(v);
                    }
                }
                vars.into_iter()
                    .map(|v| if rng.gen_bool(0.5) { v } else { -v })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn empty_cnf_is_sat() {
        assert_eq!(solve(&[], 0), SatResult::Sat(vec![]));
    }

    #[test]
    fn empty_clause_is_unsat_at_bootstrap() {
        let mut solver = Cdcl::new(&[vec![]], 0, LubyRestarts::new(LUBY_UNIT));
        assert_eq!(solver.run(), SatResult::Unsat);
        assert_eq!(solver.stats().conflicts, 0);
    }

    #[test]
    fn contradicting_units_are_unsat_at_bootstrap() {
        let cnf = vec![vec![1], vec![-1]];
        let mut solver = Cdcl::new(&cnf, 1, LubyRestarts::new(LUBY_UNIT));
        assert_eq!(solver.run(), SatResult::Unsat);
        assert_eq!(solver.stats().decisions, 0);
    }

    #[test]
    fn single_unit_needs_no_decision() {
        let cnf = vec![vec![1]];
        let mut solver = Cdcl::new(&cnf, 1, LubyRestarts::new(LUBY_UNIT));
        assert_eq!(solver.run(), SatResult::Sat(vec![Literal::from_dimacs(1)]));
        assert_eq!(solver.stats().decisions, 0);
    }

    #[test]
    fn all_pure_formula_is_solved_by_bootstrap() {
        let cnf = vec![vec![1, 2], vec![2, 3], vec![1, 3]];
        let mut solver = Cdcl::new(&cnf, 3, LubyRestarts::new(LUBY_UNIT));
        match solver.run() {
            SatResult::Sat(model) => assert!(check_model(&cnf, &model)),
            other => panic!("expected SAT, got {other}"),
        }
        assert_eq!(solver.stats().decisions, 0);
    }

    #[test]
    fn forced_chain_is_sat_with_exact_model() {
        let cnf = vec![vec![1, 2, 3], vec![-1], vec![-2]];
        match solve(&cnf, 3) {
            SatResult::Sat(model) => {
                let dimacs: Vec<i64> = model.iter().map(|lit| lit.to_dimacs()).collect();
                assert_eq!(dimacs, vec![-1, -2, 3]);
            }
            other => panic!("expected SAT, got {other}"),
        }
    }

    #[test]
    fn two_cnf_is_sat() {
        let cnf = vec![vec![1, 2], vec![-1, -2]];
        match solve(&cnf, 2) {
            SatResult::Sat(model) => assert!(check_model(&cnf, &model)),
            other => panic!("expected SAT, got {other}"),
        }
    }

    #[test]
    fn binary_square_is_unsat_and_learns_units() {
        let cnf = vec![vec![1, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]];
        let mut solver = Cdcl::new(&cnf, 2, LubyRestarts::new(LUBY_UNIT));
        assert_eq!(solver.run(), SatResult::Unsat);
        assert_eq!(solver.stats().decisions, 1);
        assert_eq!(solver.stats().conflicts, 2);
        // both learned clauses are units, and replaying them refutes the cnf
        let mut replay = cnf.clone();
        replay.extend(solver.learned_clauses());
        assert!(refutation_by_unit_propagation(&replay));
    }

    #[test]
    fn implication_chain_is_unsat_by_propagation_alone() {
        let cnf = vec![vec![1, 2], vec![-1, 3], vec![-2, 3], vec![-3]];
        let mut solver = Cdcl::new(&cnf, 3, LubyRestarts::new(LUBY_UNIT));
        assert_eq!(solver.run(), SatResult::Unsat);
        assert_eq!(solver.stats().decisions, 0);
        assert_eq!(solver.stats().conflicts, 0);
    }

    #[test]
    fn pigeonhole_3_2_is_unsat() {
        let cnf = pigeonhole_3_2();
        let mut solver = Cdcl::new(&cnf, 6, LubyRestarts::new(LUBY_UNIT));
        assert_eq!(solver.run(), SatResult::Unsat);
        let mut replay = cnf.clone();
        replay.extend(solver.learned_clauses());
        assert!(refutation_by_unit_propagation(&replay));
    }

    #[test]
    fn tautologies_and_duplicates_are_dropped() {
        let cnf = vec![vec![1, -1], vec![2, 2, 3]];
        match solve(&cnf, 3) {
            SatResult::Sat(model) => assert!(check_model(&[vec![2, 3]], &model)),
            other => panic!("expected SAT, got {other}"),
        }
    }

    #[test]
    fn variable_count_is_grown_from_the_clauses() {
        // declared count below the largest variable actually used
        let cnf = vec![vec![3, -4], vec![4]];
        match solve(&cnf, 2) {
            SatResult::Sat(model) => assert!(check_model(&cnf, &model)),
            other => panic!("expected SAT, got {other}"),
        }
    }

    #[test]
    fn restart_on_every_conflict_still_refutes() {
        let mut restarts = MockRestartPolicy::new();
        restarts.expect_next_interval().returning(|| 1);
        let cnf = vec![vec![1, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]];
        let mut solver = Cdcl::new(&cnf, 2, restarts);
        assert_eq!(solver.run(), SatResult::Unsat);
        assert_eq!(solver.stats().restarts, 1);
        assert_eq!(solver.stats().conflicts, 2);
    }

    #[test]
    fn distant_restarts_never_fire_on_small_instances() {
        let mut restarts = MockRestartPolicy::new();
        restarts.expect_next_interval().returning(|| u64::MAX);
        let mut solver = Cdcl::new(&pigeonhole_3_2(), 6, restarts);
        assert_eq!(solver.run(), SatResult::Unsat);
        assert_eq!(solver.stats().restarts, 0);
    }

    #[test]
    fn random_3sat_answers_are_verified_or_certified() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let cnf = random_3sat(&mut rng, 50, 200);
        let mut solver = Cdcl::new(&cnf, 50, LubyRestarts::new(LUBY_UNIT));
        match solver.run() {
            SatResult::Sat(model) => {
                assert!(check_model(&cnf, &model));
                solver.check_invariants();
            }
            SatResult::Unsat => {
                let mut replay = cnf.clone();
                replay.extend(solver.learned_clauses());
                assert!(refutation_by_unit_propagation(&replay));
            }
            SatResult::Unknown => panic!("verifier rejected its own model"),
        }
    }

    #[test]
    fn search_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(42);
        let cnf = random_3sat(&mut rng, 40, 160);
        let mut first = Cdcl::new(&cnf, 40, LubyRestarts::new(LUBY_UNIT));
        let mut second = Cdcl::new(&cnf, 40, LubyRestarts::new(LUBY_UNIT));
        assert_eq!(first.run(), second.run());
        assert_eq!(first.stats(), second.stats());
    }

    #[test]
    fn trail_and_antecedents_stay_sound() {
        let cnf = vec![
            vec![1, 2, 3],
            vec![-1, 4, 5],
            vec![-2, -4],
            vec![-3, 5, 6],
            vec![-5, 6],
            vec![-6, 1],
        ];
        let mut solver = Cdcl::new(&cnf, 6, LubyRestarts::new(LUBY_UNIT));
        match solver.run() {
            SatResult::Sat(model) => assert!(check_model(&cnf, &model)),
            other => panic!("expected SAT, got {other}"),
        }
        solver.check_invariants();
    }
}
