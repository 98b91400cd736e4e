//! Schedule engine: validate, resolve, generate, assemble

use log::debug;
use rayon::prelude::*;
use std::sync::Arc;

use super::assembler::assemble;
use super::generator::generate;
use super::records::Schedule;
use crate::asset::{validate_with, AssetDescriptor, RawAsset};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::method::{LabelResolver, MethodResolver};

/// Stateless depreciation engine
///
/// Holds only configuration and the label resolver, so one engine can be
/// shared freely across threads. Identical input always yields an identical
/// schedule.
#[derive(Clone)]
pub struct ScheduleEngine {
    config: EngineConfig,
    resolver: Arc<dyn MethodResolver>,
}

impl std::fmt::Debug for ScheduleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ScheduleEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ScheduleEngine {
    /// Engine using the console's label heuristic
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            resolver: Arc::new(LabelResolver),
        }
    }

    /// Swap the free-text label resolver
    pub fn with_resolver<R: MethodResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate raw input and compute its schedule
    pub fn generate(&self, raw: &RawAsset) -> Result<Schedule> {
        let descriptor = validate_with(raw, self.resolver.as_ref())?;
        self.generate_validated(&descriptor)
    }

    /// Compute the schedule for an already validated descriptor
    ///
    /// Only fails under `ClampingPolicy::Strict`.
    pub fn generate_validated(&self, descriptor: &AssetDescriptor) -> Result<Schedule> {
        debug!(
            "generating {} schedule for asset {}",
            descriptor.method(),
            descriptor.asset_id().unwrap_or("<unnamed>")
        );

        let generated = generate(descriptor, &self.config)?;
        Ok(assemble(descriptor, generated, self.config.rounding))
    }

    /// Compute many schedules in parallel, results in input order
    pub fn generate_batch(&self, raws: &[RawAsset]) -> Vec<Result<Schedule>> {
        raws.par_iter().map(|raw| self.generate(raw)).collect()
    }
}

/// Compute a schedule with the default configuration
pub fn generate_schedule(raw: &RawAsset) -> Result<Schedule> {
    ScheduleEngine::default().generate(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClampingPolicy, RoundingPolicy};
    use crate::error::{EngineError, ValidationError};
    use crate::method::MethodKind;
    use crate::schedule::{ClampKind, ScheduleBody};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_dispatch_by_method() {
        let engine = ScheduleEngine::default();

        let sl = engine.generate(&RawAsset::straight_line(dec!(1000), "2020-01-01", 4)).unwrap();
        assert_eq!(sl.method(), MethodKind::StraightLine);
        assert!(matches!(sl.body(), ScheduleBody::MultiPeriod { .. }));

        let hourly = engine
            .generate(&RawAsset::hourly(dec!(1000), "2020-01-01", dec!(1), dec!(1.1), dec!(10), dec!(1)))
            .unwrap();
        assert_eq!(hourly.method(), MethodKind::HourlyUsage);
        assert_eq!(hourly.records().len(), 1);
        assert!(hourly.hourly().is_some());
    }

    #[test]
    fn test_validation_error_surfaces() {
        let err = generate_schedule(&RawAsset::straight_line(dec!(1000), "2020-01-01", 0)).unwrap_err();
        assert_eq!(err, EngineError::Validation(ValidationError::MissingUsefulLife));
    }

    #[test]
    fn test_strict_clamping_rejects() {
        let raw = RawAsset::straight_line(dec!(1000), "2020-01-01", 2).with_residual(dec!(1500));

        let lenient = ScheduleEngine::default().generate(&raw).unwrap();
        assert_eq!(lenient.warnings().len(), 2);

        let strict = ScheduleEngine::new(EngineConfig::default().with_clamping(ClampingPolicy::Strict));
        match strict.generate(&raw) {
            Err(EngineError::Clamped(w)) => assert_eq!(w.kind, ClampKind::NegativeCharge),
            other => panic!("expected clamp error, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_resolver_is_used() {
        struct EverythingHourly;
        impl MethodResolver for EverythingHourly {
            fn resolve(&self, _label: &str) -> MethodKind {
                MethodKind::HourlyUsage
            }
        }

        let mut raw = RawAsset::hourly(dec!(500), "2022-01-01", dec!(1), dec!(1), dec!(1), dec!(1));
        raw.method = None;
        raw.method_label = Some("LINEA RECTA".into());

        assert_eq!(
            ScheduleEngine::default().generate(&raw).unwrap_err(),
            EngineError::Validation(ValidationError::MissingUsefulLife)
        );
        let engine = ScheduleEngine::default().with_resolver(EverythingHourly);
        assert_eq!(engine.generate(&raw).unwrap().method(), MethodKind::HourlyUsage);
    }

    #[test]
    fn test_batch_survives_out_of_range_inputs() {
        let raws = vec![
            RawAsset::straight_line(dec!(1000), "2020-01-01", 3_000_000_000),
            RawAsset::hourly(dec!(1000000000000000000000000000), "2020-01-01", dec!(1), dec!(100), dec!(1), dec!(1)),
            RawAsset::straight_line(dec!(1000), "2020-01-01", 4),
        ];

        let results = ScheduleEngine::default().generate_batch(&raws);
        assert_eq!(
            results[0],
            Err(EngineError::Validation(ValidationError::MissingUsefulLife))
        );
        assert_eq!(
            results[1],
            Err(EngineError::Validation(ValidationError::MissingOrInvalidCost))
        );
        assert_eq!(results[2].as_ref().unwrap().records().len(), 4);
    }

    #[test]
    fn test_batch_keeps_input_order() {
        let raws: Vec<RawAsset> = (1..=20)
            .map(|n| RawAsset::straight_line(Decimal::from(n * 100), "2020-01-01", n))
            .chain(std::iter::once(RawAsset::default()))
            .collect();

        let engine = ScheduleEngine::new(EngineConfig::default().with_rounding(RoundingPolicy::AtOutput));
        let results = engine.generate_batch(&raws);

        assert_eq!(results.len(), 21);
        for (n, result) in results.iter().take(20).enumerate() {
            let schedule = result.as_ref().unwrap();
            assert_eq!(schedule.records().len(), n + 1);
            assert_eq!(schedule.descriptor().cost(), Decimal::from((n as i64 + 1) * 100));
        }
        assert_eq!(
            results[20],
            Err(EngineError::Validation(ValidationError::MissingOrInvalidCost))
        );
    }
}
