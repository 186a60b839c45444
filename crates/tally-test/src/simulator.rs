//! Ledger Simulator - Randomized create-account traffic over many ledgers
//!
//! Checks:
//! - Conservation of the total coin supply
//! - No committed negative balances
//! - Created accounts carry their ledger's starting sequence
//! - Every operation marks exactly one meter

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tally_core::{
    AccountId, CreateAccountResultCode, Operation, OperationResult, OperationResultTr, ScriptHash,
    SequenceNumber, TallyResult,
};
use tally_ops::{MetricsRegistry, OperationContext, OperationFrame};
use tally_state::{LedgerConfig, LedgerState, LedgerTxn, LedgerView};
use tracing::debug;

/// Simulation configuration
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Ledger parameters
    pub ledger: LedgerConfig,
    /// Size of the identity pool destinations are drawn from
    pub account_pool: usize,
    /// Number of operations to generate
    pub operation_count: usize,
    /// Operations grouped into each transaction
    pub ops_per_tx: usize,
    /// Transactions applied per ledger before advancing
    pub txs_per_ledger: usize,
    /// Upper bound on generated starting balances
    pub max_starting_balance: i64,
    /// Probability of a structurally malformed operation (0.0 - 1.0)
    pub malformed_prob: f64,
    /// Probability the source account does not exist
    pub unknown_source_prob: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            ledger: LedgerConfig::local(),
            account_pool: 200,
            operation_count: 1000,
            ops_per_tx: 4,
            txs_per_ledger: 10,
            max_starting_balance: 5_000,
            malformed_prob: 0.05,
            unknown_source_prob: 0.02,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    /// Light simulation for quick tests
    pub fn light() -> Self {
        SimulationConfig {
            account_pool: 30,
            operation_count: 100,
            ops_per_tx: 2,
            txs_per_ledger: 5,
            ..SimulationConfig::default()
        }
    }

    /// Heavy simulation for thorough testing
    pub fn heavy() -> Self {
        SimulationConfig {
            account_pool: 2_000,
            operation_count: 20_000,
            ops_per_tx: 8,
            txs_per_ledger: 50,
            max_starting_balance: 50_000,
            ..SimulationConfig::default()
        }
    }
}

/// Outcome counts and law checks for a simulation run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulationReport {
    pub created: u64,
    pub malformed: u64,
    pub already_exist: u64,
    pub low_reserve: u64,
    pub underfunded: u64,
    pub no_account: u64,
    pub ledgers_closed: u32,
    /// Meter events recorded during the run
    pub meter_events: u64,
    /// Descriptions of broken ledger laws
    pub violations: Vec<String>,
}

impl SimulationReport {
    pub fn total(&self) -> u64 {
        self.created
            + self.malformed
            + self.already_exist
            + self.low_reserve
            + self.underfunded
            + self.no_account
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    fn record(&mut self, result: OperationResult) {
        match result {
            OperationResult::NoAccount => self.no_account += 1,
            OperationResult::Inner(OperationResultTr::CreateAccount(code)) => match code {
                CreateAccountResultCode::Success => self.created += 1,
                CreateAccountResultCode::Malformed => self.malformed += 1,
                CreateAccountResultCode::AlreadyExist => self.already_exist += 1,
                CreateAccountResultCode::LowReserve => self.low_reserve += 1,
                CreateAccountResultCode::Underfunded => self.underfunded += 1,
            },
        }
    }
}

/// Drives randomized operations through a ledger
pub struct LedgerSimulator {
    config: SimulationConfig,
    ledger: LedgerState,
    metrics: MetricsRegistry,
    rng: StdRng,
    root: AccountId,
    /// Accounts known to exist, usable as sources
    funded: Vec<AccountId>,
    /// Ledger each account was created in
    created_in: HashMap<AccountId, u32>,
}

impl LedgerSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        let root = AccountId::from_seed(u64::MAX);
        let ledger = LedgerState::genesis(config.ledger.clone(), root);
        LedgerSimulator {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            ledger,
            metrics: MetricsRegistry::new(),
            root,
            funded: vec![root],
            created_in: HashMap::new(),
        }
    }

    pub fn ledger(&self) -> &LedgerState {
        &self.ledger
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn root(&self) -> AccountId {
        self.root
    }

    /// Generate a random operation with its effective source
    fn generate_operation(&mut self) -> OperationFrame {
        let source = if self.rng.gen::<f64>() < self.config.unknown_source_prob {
            AccountId::from_seed(self.rng.gen_range(1_000_000..2_000_000))
        } else {
            self.funded[self.rng.gen_range(0..self.funded.len())]
        };

        let roll = self.rng.gen::<f64>();
        let (destination, amount) = if roll < self.config.malformed_prob / 2.0 {
            (source, self.rng.gen_range(1..=self.config.max_starting_balance))
        } else if roll < self.config.malformed_prob {
            let dest = AccountId::from_seed(self.rng.gen_range(0..self.config.account_pool as u64));
            (dest, -self.rng.gen_range(0..=self.config.max_starting_balance))
        } else {
            let dest = AccountId::from_seed(self.rng.gen_range(0..self.config.account_pool as u64));
            (dest, self.rng.gen_range(1..=self.config.max_starting_balance))
        };

        let script = ScriptHash::of(&self.rng.gen::<[u8; 16]>());
        let op = Operation::create_account(destination, amount, script).with_source(source);
        OperationFrame::from_operation(&op, self.root)
    }

    /// Apply one transaction's operations in a single txn and commit it
    fn apply_transaction(
        &mut self,
        frames: &[OperationFrame],
        report: &mut SimulationReport,
    ) -> TallyResult<()> {
        let ctx = OperationContext::new(&self.metrics);
        let mut txn = LedgerTxn::new(&mut self.ledger);
        for frame in frames {
            let result = frame.run(&ctx, &mut txn)?;
            report.record(result);
        }
        let ledger_seq = txn.header().ledger_seq;
        let delta = txn.commit()?;

        for created in delta.created() {
            self.funded.push(created.account_id);
            self.created_in.insert(created.account_id, ledger_seq);
        }
        debug!(
            ledger_seq,
            ops = frames.len(),
            changes = delta.len(),
            "Simulated transaction committed"
        );
        Ok(())
    }

    /// Run the simulation
    pub fn run(&mut self) -> TallyResult<SimulationReport> {
        let mut report = SimulationReport::default();
        let ops_per_tx = self.config.ops_per_tx.max(1);
        let mut remaining = self.config.operation_count;
        let mut txs_in_ledger = 0;

        while remaining > 0 {
            let batch = remaining.min(ops_per_tx);
            let frames: Vec<OperationFrame> =
                (0..batch).map(|_| self.generate_operation()).collect();
            self.apply_transaction(&frames, &mut report)?;
            remaining -= batch;

            txs_in_ledger += 1;
            if txs_in_ledger == self.config.txs_per_ledger {
                self.ledger.advance_ledger();
                report.ledgers_closed += 1;
                txs_in_ledger = 0;
            }
        }

        report.meter_events = self.metrics.total();
        for (meter, count) in self.metrics.snapshot() {
            debug!(meter = %meter, count, "Meter total");
        }
        self.check_laws(&mut report);
        Ok(report)
    }

    /// Check ledger laws against the final state
    fn check_laws(&self, report: &mut SimulationReport) {
        let total = self.ledger.total_balance();
        if total != self.config.ledger.total_coins as i128 {
            report.violations.push(format!(
                "total balance {} differs from supply {}",
                total, self.config.ledger.total_coins
            ));
        }

        for (id, account) in self.ledger.iter() {
            if account.balance < 0 {
                report
                    .violations
                    .push(format!("account {} has negative balance", id));
            }
            if let Some(&ledger_seq) = self.created_in.get(id) {
                if account.seq_num != SequenceNumber::starting_for_ledger(ledger_seq) {
                    report.violations.push(format!(
                        "account {} created in ledger {} has sequence {}",
                        id, ledger_seq, account.seq_num
                    ));
                }
            }
        }

        if report.created as usize != self.created_in.len() {
            report.violations.push(format!(
                "{} successful creations but {} new accounts",
                report.created,
                self.created_in.len()
            ));
        }

        if report.meter_events != report.total() {
            report.violations.push(format!(
                "{} meter events for {} operations",
                report.meter_events,
                report.total()
            ));
        }
    }
}
