//! Counters for the instantiation engine.
//!
//! The engine is single-threaded, so these are plain integers bumped inline;
//! a snapshot is a clone.

/// Work done by one engine since construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstantiationStats {
    /// Calls to `submit`/`submit_fact`.
    pub submitted: u64,
    /// Facts accepted as new heads.
    pub accepted: u64,
    /// Facts already known.
    pub duplicate_facts: u64,
    /// Malformed facts: non-ground or arity-mismatched.
    pub rejected: u64,
    /// (stream, slot) matches that triggered a combination search.
    pub slot_matches: u64,
    /// Candidate tuples handed to unification.
    pub combinations: u64,
    /// Candidate tuples pruned by unification.
    pub unify_failures: u64,
    /// Instances admitted to the ready queue.
    pub instances: u64,
    /// Instance requests that were already admitted.
    pub duplicate_instances: u64,
}

impl InstantiationStats {
    /// Fraction of candidate tuples that unified.
    pub fn unify_success_rate(&self) -> f64 {
        if self.combinations == 0 {
            1.0
        } else {
            (self.combinations - self.unify_failures) as f64 / self.combinations as f64
        }
    }
}

impl std::fmt::Display for InstantiationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Instantiation Stats ===")?;
        writeln!(
            f,
            "Facts:              {} submitted, {} accepted, {} duplicate, {} rejected",
            self.submitted, self.accepted, self.duplicate_facts, self.rejected
        )?;
        writeln!(f, "Slot matches:       {}", self.slot_matches)?;
        writeln!(
            f,
            "Combinations:       {} ({} pruned, {:.1}% unified)",
            self.combinations,
            self.unify_failures,
            self.unify_success_rate() * 100.0
        )?;
        writeln!(
            f,
            "Instances:          {} ({} duplicate requests)",
            self.instances, self.duplicate_instances
        )?;
        Ok(())
    }
}
