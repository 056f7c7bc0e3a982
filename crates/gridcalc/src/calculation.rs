//! Sheet recompute engine
//!
//! Every recompute is a full pass over the raw store: each key is evaluated at most
//! once (memoized per pass), the cells a formula reads are evaluated before it on an
//! explicit work stack, and cycles are detected on the visiting stack. Nothing
//! survives between passes.
//!
//! # Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut store = CellStore::new();
//! store.set_value("A1", "10").unwrap();
//! store.set_value("A2", "20").unwrap();
//! store.set_value("A3", "=A1+A2").unwrap();
//!
//! let (snapshot, stats) = recompute_with_stats(&store);
//! assert_eq!(snapshot[&CellAddress::parse("A3").unwrap()], "30");
//! assert_eq!(stats.formula_count, 1);
//! ```

use crate::{
    evaluate_to_display, function_registry, is_formula, parse_formula_with_limits, CellAddress,
    CellError, CellLookup, CellStore, Instruction, Scalar,
};
use ahash::{AHashMap, AHashSet};
use std::collections::BTreeMap;

/// Display string of every stored cell after evaluation, keyed like the store
pub type EvaluatedSnapshot = BTreeMap<CellAddress, String>;

/// Statistics from a recompute pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationStats {
    /// Total number of formula cells
    pub formula_count: usize,
    /// Number of cells evaluated (formulas and literals)
    pub cells_calculated: usize,
    /// Number of cells that are part of a reference cycle
    pub circular_references: usize,
    /// Number of formula cells calling a volatile function
    pub volatile_cells: usize,
    /// Number of cells whose value is an error marker
    pub errors: usize,
}

/// Extension trait for CellStore to add recompute methods
pub trait StoreCalculationExt {
    /// Evaluate every cell of the store
    fn recompute(&self) -> EvaluatedSnapshot;

    /// Evaluate every cell and report statistics
    fn recompute_with_stats(&self) -> (EvaluatedSnapshot, CalculationStats);

    /// Evaluate a formula that does not live in any cell
    fn evaluate_formula(&self, source: &str) -> String;
}

impl StoreCalculationExt for CellStore {
    fn recompute(&self) -> EvaluatedSnapshot {
        recompute(self)
    }

    fn recompute_with_stats(&self) -> (EvaluatedSnapshot, CalculationStats) {
        recompute_with_stats(self)
    }

    fn evaluate_formula(&self, source: &str) -> String {
        evaluate_formula(source, self)
    }
}

/// Evaluate every cell of the store
pub fn recompute(store: &CellStore) -> EvaluatedSnapshot {
    recompute_with_stats(store).0
}

/// Evaluate every cell of the store and report statistics
pub fn recompute_with_stats(store: &CellStore) -> (EvaluatedSnapshot, CalculationStats) {
    let mut pass = RecalcPass::new(store);

    let snapshot: EvaluatedSnapshot = store
        .addresses()
        .map(|addr| (addr, pass.evaluate_cell(addr)))
        .collect();

    let stats = pass.finish();
    log::debug!(
        "recompute: {} cells, {} formulas, {} cyclic, {} volatile, {} errors",
        stats.cells_calculated,
        stats.formula_count,
        stats.circular_references,
        stats.volatile_cells,
        stats.errors
    );

    (snapshot, stats)
}

/// Evaluate a detached formula against a store
///
/// The formula sees the store exactly as a recompute would, but is not itself a cell,
/// so it can never be part of a cycle.
pub fn evaluate_formula(source: &str, store: &CellStore) -> String {
    let program = parse_formula_with_limits(source, &store.limits());
    let mut pass = RecalcPass::new(store);
    for addr in dependencies(&program, store) {
        pass.evaluate_cell(addr);
    }
    evaluate_to_display(&program, &mut pass)
}

/// State of one recompute pass
struct RecalcPass<'a> {
    store: &'a CellStore,
    /// Finished cells (address -> display string)
    cache: AHashMap<CellAddress, String>,
    /// Cells currently being evaluated, innermost last
    visiting: Vec<CellAddress>,
    visiting_set: AHashSet<CellAddress>,
    /// Cells found to be part of a cycle
    cyclic: AHashSet<CellAddress>,
    stats: CalculationStats,
}

/// A formula cell waiting on the cells it reads
struct Frame {
    addr: CellAddress,
    program: Vec<Instruction>,
    /// Stored cells read by `program`, in evaluation order
    deps: Vec<CellAddress>,
    next: usize,
}

impl<'a> RecalcPass<'a> {
    fn new(store: &'a CellStore) -> Self {
        Self {
            store,
            cache: AHashMap::new(),
            visiting: Vec::new(),
            visiting_set: AHashSet::new(),
            cyclic: AHashSet::new(),
            stats: CalculationStats::default(),
        }
    }

    /// Display string of a cell, evaluating it and everything it reads first
    ///
    /// References are resolved on an explicit work stack, so reference chains
    /// as long as the sheet allows never deepen the call stack.
    fn evaluate_cell(&mut self, addr: CellAddress) -> String {
        if self.store.get_at(&addr).is_empty() {
            return String::new();
        }

        let mut stack = Vec::new();
        self.enter(addr, &mut stack);
        while let Some(frame) = stack.last_mut() {
            match frame.deps.get(frame.next).copied() {
                Some(dep) => {
                    frame.next += 1;
                    self.enter(dep, &mut stack);
                }
                None => {
                    if let Some(frame) = stack.pop() {
                        let display = evaluate_to_display(&frame.program, self);
                        self.settle(frame.addr, display);
                    }
                }
            }
        }

        self.cache.get(&addr).cloned().unwrap_or_default()
    }

    /// Start evaluating a cell unless it is absent, finished or already in progress
    ///
    /// Literals settle immediately; formulas are pushed as a frame.
    fn enter(&mut self, addr: CellAddress, stack: &mut Vec<Frame>) {
        let store = self.store;
        let raw = store.get_at(&addr);
        if raw.is_empty() || self.cache.contains_key(&addr) {
            return;
        }

        if self.visiting_set.contains(&addr) {
            self.mark_cycle(addr);
            return;
        }

        self.visiting.push(addr);
        self.visiting_set.insert(addr);

        if is_formula(raw) {
            let program = self.compile(raw);
            let deps = dependencies(&program, store);
            stack.push(Frame {
                addr,
                program,
                deps,
                next: 0,
            });
        } else {
            self.settle(addr, raw.to_string());
        }
    }

    fn compile(&mut self, raw: &str) -> Vec<Instruction> {
        self.stats.formula_count += 1;

        let program = parse_formula_with_limits(raw, &self.store.limits());
        if has_volatile_call(&program) {
            self.stats.volatile_cells += 1;
        }
        program
    }

    /// Finish the innermost visiting cell with its display string
    fn settle(&mut self, addr: CellAddress, mut display: String) {
        self.visiting.pop();
        self.visiting_set.remove(&addr);

        if self.cyclic.contains(&addr) {
            display = CellError::Cycle.to_string();
        }
        if CellError::from_marker(&display).is_some() {
            self.stats.errors += 1;
        }

        log::trace!("{} = {:?}", addr, display);
        self.cache.insert(addr, display);
    }

    /// Mark every cell from `addr` up to the innermost visiting cell as cyclic
    fn mark_cycle(&mut self, addr: CellAddress) {
        if let Some(start) = self.visiting.iter().rposition(|a| *a == addr) {
            log::trace!("cycle through {}", addr);
            self.cyclic.extend(self.visiting[start..].iter().copied());
        }
    }

    fn finish(mut self) -> CalculationStats {
        self.stats.cells_calculated = self.cache.len();
        self.stats.circular_references = self.cyclic.len();
        self.stats
    }
}

/// Reads during formula evaluation; every stored dependency is already settled
/// or still on the visiting stack.
impl CellLookup for RecalcPass<'_> {
    fn cell_value(&mut self, addr: CellAddress) -> Scalar {
        match self.cache.get(&addr) {
            Some(display) => Scalar::from_display(display),
            // In progress: this read closes a cycle
            None if self.visiting_set.contains(&addr) => {
                Scalar::from_display(CellError::Cycle.as_str())
            }
            None => Scalar::Empty,
        }
    }
}

/// Stored cells a program reads, in the order the evaluator reads them
///
/// A program holding an error instruction fails before reading any cell.
fn dependencies(program: &[Instruction], store: &CellStore) -> Vec<CellAddress> {
    if program
        .iter()
        .any(|instr| matches!(instr, Instruction::Error(_)))
    {
        return Vec::new();
    }

    let stored = |addr: &CellAddress| !store.get_at(addr).is_empty();
    let mut deps = Vec::new();
    for instr in program {
        match instr {
            Instruction::Ref(addr) if stored(addr) => deps.push(*addr),
            Instruction::Range(range) => deps.extend(range.cells().filter(stored)),
            _ => {}
        }
    }
    deps
}

fn has_volatile_call(program: &[Instruction]) -> bool {
    let registry = function_registry();
    program.iter().any(|instr| match instr {
        Instruction::Call { name, .. } => registry.is_volatile(name),
        _ => false,
    })
}
