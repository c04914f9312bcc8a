//! Concurrent lifecycle simulator
//!
//! Runs random transitions from several threads against one in-memory store,
//! then checks that the history and the stored items still agree:
//! - every committed transition is an edge of the lifecycle graph
//! - each item's event chain starts at `DRAFT` and ends at its stored state
//! - each item's version equals its committed transition count plus one
//! - the history hash chain verifies

use kms_governance::{
    allowed_transitions, ContentId, ContentStore, GovernanceConfig, GovernanceError,
    GovernanceService, InMemoryStore, LifecycleState, Principal, Role, UserId,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use std::thread;

/// Simulator configuration
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SimulatorConfig {
    /// Random seed for reproducibility
    pub(crate) seed: u64,
    /// Items created up front
    pub(crate) items: usize,
    /// Concurrent threads
    pub(crate) workers: usize,
    /// Transition attempts per thread
    pub(crate) operations: usize,
}

/// Outcome counters
#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct SimulatorStats {
    pub(crate) committed: u64,
    pub(crate) conflicts: u64,
    pub(crate) invalid: u64,
    pub(crate) denied: u64,
}

impl SimulatorStats {
    fn merge(&mut self, other: &SimulatorStats) {
        self.committed += other.committed;
        self.conflicts += other.conflicts;
        self.invalid += other.invalid;
        self.denied += other.denied;
    }
}

/// Final report
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SimulatorReport {
    pub(crate) config: SimulatorConfig,
    pub(crate) stats: SimulatorStats,
    pub(crate) violations: Vec<String>,
}

impl SimulatorReport {
    pub(crate) fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub(crate) fn generate_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Lifecycle Simulation Report\n");
        out.push_str("===========================\n");
        out.push_str(&format!("Seed: {}\n", self.config.seed));
        out.push_str(&format!("Items: {}\n", self.config.items));
        out.push_str(&format!(
            "Workers: {} x {} operations\n\n",
            self.config.workers, self.config.operations
        ));
        out.push_str(&format!("Committed:   {}\n", self.stats.committed));
        out.push_str(&format!("Conflicts:   {}\n", self.stats.conflicts));
        out.push_str(&format!("Invalid:     {}\n", self.stats.invalid));
        out.push_str(&format!("Denied:      {}\n\n", self.stats.denied));
        if self.passed() {
            out.push_str("Result: PASS\n");
        } else {
            out.push_str(&format!("Result: FAIL ({} violations)\n", self.violations.len()));
            for v in &self.violations {
                out.push_str(&format!("  - {v}\n"));
            }
        }
        out
    }
}

pub(crate) fn run_simulator(
    config: SimulatorConfig,
    governance: GovernanceConfig,
) -> anyhow::Result<SimulatorReport> {
    let service = Arc::new(GovernanceService::with_config(InMemoryStore::new(), governance));
    let now = chrono::Utc::now();

    let mut ids = Vec::with_capacity(config.items);
    for i in 0..config.items {
        let author = Principal::new(UserId::new(), Role::Contributor);
        let input = service.new_content(format!("Simulated document {i}"), "body")?;
        ids.push(service.create(input, &author, now)?.id());
    }
    let ids = Arc::new(ids);

    let handles: Vec<_> = (0..config.workers)
        .map(|worker| {
            let service = Arc::clone(&service);
            let ids = Arc::clone(&ids);
            let seed = config.seed.wrapping_add(worker as u64);
            let operations = config.operations;
            thread::spawn(move || run_worker(&service, &ids, seed, operations))
        })
        .collect();

    let mut stats = SimulatorStats::default();
    for handle in handles {
        let worker_stats = handle
            .join()
            .map_err(|_| anyhow::anyhow!("simulation worker panicked"))??;
        stats.merge(&worker_stats);
    }

    let violations = check_invariants(&service, &ids)?;
    Ok(SimulatorReport {
        config,
        stats,
        violations,
    })
}

fn run_worker(
    service: &GovernanceService<InMemoryStore>,
    ids: &[ContentId],
    seed: u64,
    operations: usize,
) -> anyhow::Result<SimulatorStats> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut stats = SimulatorStats::default();
    if ids.is_empty() {
        return Ok(stats);
    }

    for _ in 0..operations {
        let id = ids[rng.random_range(0..ids.len())];
        let target = LifecycleState::ALL[rng.random_range(0..LifecycleState::ALL.len())];
        let role = Role::ALL[rng.random_range(0..Role::ALL.len())];
        let current = service.store().get(id)?;
        let user_id = if rng.random_bool(0.5) {
            current.owner_id()
        } else {
            UserId::new()
        };
        let principal = Principal::new(user_id, role);

        match service.transition_from(&current, target, &principal, chrono::Utc::now()) {
            Ok(_) => stats.committed += 1,
            Err(GovernanceError::ConcurrentModification { .. }) => stats.conflicts += 1,
            Err(GovernanceError::InvalidTransition { .. }) => stats.invalid += 1,
            Err(GovernanceError::Unauthorized { .. }) => stats.denied += 1,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(stats)
}

fn check_invariants(
    service: &GovernanceService<InMemoryStore>,
    ids: &[ContentId],
) -> anyhow::Result<Vec<String>> {
    let mut violations = Vec::new();

    if let Err(e) = service.history().verify_integrity() {
        violations.push(e.to_string());
    }

    for id in ids {
        let item = service.store().get(*id)?;
        let events = service.history().events_for(*id);

        let mut state = LifecycleState::INITIAL;
        for event in &events {
            if event.from != state {
                violations.push(format!("{id}: event from {} but item was {state}", event.from));
            }
            if !allowed_transitions(event.from).contains(&event.to) {
                violations.push(format!("{id}: illegal edge {} -> {}", event.from, event.to));
            }
            state = event.to;
        }
        if state != item.state() {
            violations.push(format!("{id}: history ends at {state}, store has {}", item.state()));
        }
        if item.version() != events.len() as u64 + 1 {
            violations.push(format!(
                "{id}: version {} after {} transitions",
                item.version(),
                events.len()
            ));
        }
    }
    Ok(violations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_simulation_passes() {
        let config = SimulatorConfig {
            seed: 7,
            items: 4,
            workers: 4,
            operations: 200,
        };
        let report = run_simulator(config, GovernanceConfig::default()).unwrap();
        assert!(report.passed(), "{}", report.generate_text());
        assert_eq!(
            report.stats.committed + report.stats.conflicts + report.stats.invalid + report.stats.denied,
            800
        );
    }

    #[test]
    fn empty_store_is_trivially_consistent() {
        let config = SimulatorConfig {
            seed: 1,
            items: 0,
            workers: 2,
            operations: 10,
        };
        let report = run_simulator(config, GovernanceConfig::default()).unwrap();
        assert!(report.passed());
        assert_eq!(report.stats.committed, 0);
    }
}
