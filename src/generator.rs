use crate::error::Result;
use crate::schema::*;
use crate::utils::month_labels;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use rand_pcg::Pcg64Mcg;

/// Produces the synthetic billing table for a configuration.
///
/// Records are emitted month-major, carrier-minor. For each (month, carrier) pair the
/// random stream is consumed in a fixed order:
///
/// 1. invoice amount
/// 2. dispute flag
/// 3. disputed amount (only if disputed)
/// 4. reconciliation status
/// 5. dispute type (only if disputed)
/// 6. settlement status (only if disputed)
///
/// Changing this order changes every dataset produced from a given seed.
pub struct RecordGenerator {
    config: GeneratorConfig,
    carriers: Vec<String>,
    months: Vec<String>,
    invoice_amount: Uniform<f64>,
}

impl RecordGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;

        let carriers = config.carrier_labels();
        let months = month_labels(&config.start_month, config.month_count)?;
        let invoice_amount = Uniform::new(config.invoice_min_usd, config.invoice_max_usd);

        Ok(Self {
            config,
            carriers,
            months,
            invoice_amount,
        })
    }

    /// Same generator with a different seed; labels and distributions are reused.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn carriers(&self) -> &[String] {
        &self.carriers
    }

    pub fn months(&self) -> &[String] {
        &self.months
    }

    /// Generates the full table. Each call restarts the stream from the configured seed.
    pub fn generate(&self) -> Vec<BillingRecord> {
        let mut rng = Pcg64Mcg::seed_from_u64(self.config.seed);
        let mut records = Vec::with_capacity(self.config.expected_record_count());

        for month in &self.months {
            for carrier in &self.carriers {
                records.push(self.draw_record(&mut rng, carrier, month));
            }
        }

        debug!(
            "Generated {} billing records ({} months x {} carriers, seed {})",
            records.len(),
            self.months.len(),
            self.carriers.len(),
            self.config.seed
        );

        records
    }

    fn draw_record<R: Rng + ?Sized>(&self, rng: &mut R, carrier: &str, month: &str) -> BillingRecord {
        let invoice_amount_usd = self.invoice_amount.sample(rng);
        let is_disputed = rng.gen_bool(self.config.dispute_probability);

        let disputed_amount_usd = if is_disputed {
            Uniform::new(0.0, invoice_amount_usd * self.config.max_dispute_ratio).sample(rng)
        } else {
            0.0
        };

        let reconciliation_status =
            ReconciliationStatus::DRAW_ORDER[rng.gen_range(0..ReconciliationStatus::DRAW_ORDER.len())];

        let dispute_type = if is_disputed {
            Some(DisputeType::DRAW_ORDER[rng.gen_range(0..DisputeType::DRAW_ORDER.len())])
        } else {
            None
        };

        let settlement_status = if is_disputed {
            SettlementStatus::DRAW_ORDER[rng.gen_range(0..SettlementStatus::DRAW_ORDER.len())]
        } else {
            SettlementStatus::Settled
        };

        BillingRecord {
            carrier_name: carrier.to_string(),
            invoice_amount_usd,
            disputed_amount_usd,
            reconciliation_status,
            dispute_type,
            settlement_status,
            invoice_month: month.to_string(),
        }
    }
}

/// The 10 carrier x 12 month generator for calendar year 2024.
impl Default for RecordGenerator {
    fn default() -> Self {
        let config = GeneratorConfig::default();
        let carriers = config.carrier_labels();
        let months = (1..=config.month_count)
            .map(|month| format!("2024-{:02}", month))
            .collect();
        let invoice_amount = Uniform::new(config.invoice_min_usd, config.invoice_max_usd);

        Self {
            config,
            carriers,
            months,
            invoice_amount,
        }
    }
}

/// Generates the default 10 carrier x 12 month table for `seed`.
pub fn generate(seed: u64) -> Vec<BillingRecord> {
    RecordGenerator::default().with_seed(seed).generate()
}
