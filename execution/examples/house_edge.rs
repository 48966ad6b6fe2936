//! Play many rounds against a random provider and report the measured house edge
//! per outcome.
//!
//! `cargo run -p baccarat-execution --example house_edge --features mocks`

use baccarat_execution::{
    mocks::{create_account_keypair, table_config, MemoryTreasury, MockProvider},
    Table,
};
use baccarat_types::table::{Outcome, Phase, RequestKind};
use rand::{rngs::StdRng, SeedableRng};

const ROUNDS: u64 = 50_000;
const BET: u64 = 100;
const ROUND_MS: u64 = 60_000;

#[derive(Default, Clone)]
struct Stats {
    trials: u64,
    total_net: f64,
    total_net_sq: f64,
}

impl Stats {
    fn add(&mut self, net: i64) {
        let n = net as f64;
        self.trials += 1;
        self.total_net += n;
        self.total_net_sq += n * n;
    }

    fn mean_net(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.total_net / self.trials as f64
        }
    }

    fn house_edge(&self) -> f64 {
        -self.mean_net() / BET as f64
    }

    fn stderr(&self) -> f64 {
        if self.trials <= 1 {
            return 0.0;
        }
        let mean = self.mean_net();
        let var = (self.total_net_sq / self.trials as f64) - mean * mean;
        let var = if var < 0.0 { 0.0 } else { var };
        (var / self.trials as f64).sqrt() / BET as f64
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let mut rng = StdRng::seed_from_u64(0xbacc_a7);
    let (_, admin) = create_account_keypair(0);
    let provider = MockProvider::new(1);
    let bettors: Vec<_> = Outcome::ALL
        .iter()
        .enumerate()
        .map(|(idx, outcome)| (*outcome, create_account_keypair(10 + idx as u64).1))
        .collect();

    let mut treasury = MemoryTreasury::new(u64::MAX / 4);
    for (_, bettor) in &bettors {
        treasury.fund(bettor, ROUNDS * BET);
    }
    let mut table = Table::new(table_config(&admin, &provider.public_key()), treasury, 0);
    let mut stats: Vec<Stats> = vec![Stats::default(); bettors.len()];

    for round in 0..ROUNDS {
        let now = round * ROUND_MS;
        if round > 0 {
            table.start_new_round(&admin, now)?;
        }
        let before: Vec<u64> = bettors
            .iter()
            .map(|(_, bettor)| table.treasury().balance_of(bettor))
            .collect();
        for (outcome, bettor) in &bettors {
            table.place_stake(bettor, *outcome, BET, now + 1)?;
        }
        table.close_betting_and_deal(&admin, now + 2)?;
        while table.phase() == Phase::Dealing {
            let Some(pending) = table.pending_request().cloned() else {
                anyhow::bail!("dealing without a pending request");
            };
            let fulfillment =
                provider.fulfill_random(pending.token, pending.kind.expected_words(), &mut rng);
            match pending.kind {
                RequestKind::Initial => table.on_initial_fulfillment(&fulfillment, now + 3)?,
                RequestKind::Additional => table.on_additional_fulfillment(&fulfillment, now + 4)?,
            };
        }
        for (idx, (_, bettor)) in bettors.iter().enumerate() {
            let after = table.treasury().balance_of(bettor);
            stats[idx].add(after as i64 - before[idx] as i64);
        }
    }

    println!("{:<8} {:>10} {:>10}", "outcome", "edge %", "stderr %");
    for (idx, (outcome, _)) in bettors.iter().enumerate() {
        println!(
            "{:<8} {:>10.3} {:>10.3}",
            outcome.as_str(),
            stats[idx].house_edge() * 100.0,
            stats[idx].stderr() * 100.0
        );
    }
    println!("commission collected: {}", table.commission());
    Ok(())
}
