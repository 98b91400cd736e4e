//! Schedule properties checked across methods and policies
//!
//! Reference scenarios must keep producing the same figures; if one of them
//! fails, the numeric behaviour of stored schedules has changed.

use approx::assert_abs_diff_eq;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fleet_depreciation::{
    generate_schedule, EngineConfig, EngineError, RawAsset, RoundingPolicy, Schedule,
    ScheduleEngine, ValidationError,
};

fn multi_period_cases() -> Vec<RawAsset> {
    vec![
        RawAsset::straight_line(dec!(10000), "2020-01-01", 5),
        RawAsset::straight_line(dec!(10000), "2020-01-01", 3).with_residual(dec!(333.33)),
        RawAsset::straight_line(dec!(87654.32), "2015-07-31", 17).with_residual(dec!(1234.56)),
        RawAsset::straight_line(dec!(0.09), "2020-01-01", 6),
        RawAsset::straight_line(dec!(125000), "2001-02-28", 40),
        RawAsset::declining(dec!(10000), "2020-01-01", 3, dec!(0.5)).with_residual(dec!(1000)),
        RawAsset::declining(dec!(45999.99), "2012-03-01", 8, dec!(0.2)).with_residual(dec!(2500)),
        RawAsset::declining(dec!(7777.77), "2019-11-11", 12, dec!(0.125)),
        RawAsset::declining(dec!(1000), "2020-01-01", 5, dec!(1)).with_residual(dec!(10)),
    ]
}

fn engines() -> Vec<ScheduleEngine> {
    vec![
        ScheduleEngine::default(),
        ScheduleEngine::new(EngineConfig::default().with_rounding(RoundingPolicy::AtOutput)),
    ]
}

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(f64::NAN)
}

#[test]
fn scenario_a_straight_line() {
    let schedule = generate_schedule(&RawAsset::straight_line(dec!(10000), "2020-01-01", 5)).unwrap();
    let records = schedule.records();

    assert_eq!(records.len(), 5);
    let years: Vec<_> = records.iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2020, 2021, 2022, 2023, 2024]);
    assert!(records.iter().all(|r| r.annual_depreciation == dec!(2000.00)));

    let books: Vec<_> = records.iter().map(|r| r.book_value).collect();
    assert_eq!(books, vec![dec!(8000), dec!(6000), dec!(4000), dec!(2000), dec!(0)]);
    assert!(schedule.warnings().is_empty());
}

#[test]
fn scenario_b_declining_coefficient() {
    let raw = RawAsset::declining(dec!(10000), "2020-01-01", 3, dec!(0.5)).with_residual(dec!(1000));
    let schedule = generate_schedule(&raw).unwrap();
    let r = schedule.records();

    assert_eq!((r[0].annual_depreciation, r[0].book_value), (dec!(4500.00), dec!(5500.00)));
    assert_eq!((r[1].annual_depreciation, r[1].book_value), (dec!(2250.00), dec!(3250.00)));
    assert_eq!((r[2].annual_depreciation, r[2].book_value), (dec!(2250.00), dec!(1000.00)));
    assert_eq!(r[2].accumulated_depreciation, dec!(9000.00));
}

#[test]
fn scenario_c_hourly_usage() {
    let raw = RawAsset::hourly(dec!(50000), "2022-01-01", dec!(2.0), dec!(2.2), dec!(500), dec!(10))
        .with_prior_accumulated(dec!(0));
    let schedule = generate_schedule(&raw).unwrap();
    let h = schedule.hourly().expect("hourly detail");

    assert_eq!(schedule.records().len(), 1);
    assert_eq!(h.updated_asset_value, dec!(55000.00));
    assert_eq!(h.asset_value_increment, dec!(5000.00));
    assert_eq!(h.accumulated_depreciation_indexed, dec!(0.00));
    assert_eq!(h.period_depreciation(), dec!(5000.00));
    assert_eq!(h.total_accumulated_depreciation(), dec!(5000.00));
    assert_eq!(h.ending_book_value(), dec!(50000.00));
}

#[test]
fn sum_of_charges_matches_depreciable_amount() {
    for engine in engines() {
        for raw in multi_period_cases() {
            let schedule = engine.generate(&raw).unwrap();
            let d = schedule.descriptor();
            let life = d.useful_life_years().unwrap();
            let total: Decimal = schedule.records().iter().map(|r| r.annual_depreciation).sum();

            assert_abs_diff_eq!(
                to_f64(total),
                to_f64(d.cost() - d.residual_value()),
                epsilon = 0.01 * life as f64
            );
        }
    }
}

#[test]
fn final_book_value_hits_residual_exactly() {
    for engine in engines() {
        for raw in multi_period_cases() {
            let schedule = engine.generate(&raw).unwrap();
            let last = schedule.final_record().unwrap();
            assert_eq!(last.book_value, schedule.descriptor().residual_value(), "{:?}", raw);
        }
    }
}

#[test]
fn book_value_and_accumulation_are_monotonic() {
    for engine in engines() {
        for raw in multi_period_cases() {
            let schedule = engine.generate(&raw).unwrap();
            let residual = schedule.descriptor().residual_value();
            let records = schedule.records();

            for pair in records.windows(2) {
                assert!(pair[1].book_value <= pair[0].book_value, "{:?}", raw);
                assert!(pair[1].accumulated_depreciation >= pair[0].accumulated_depreciation);
            }
            assert!(records.iter().all(|r| r.book_value >= residual));
            assert!(records.iter().all(|r| r.annual_depreciation >= Decimal::ZERO));
        }
    }
}

#[test]
fn per_field_rounding_keeps_cents() {
    for raw in multi_period_cases() {
        let schedule = generate_schedule(&raw).unwrap();
        for r in schedule.records() {
            assert!(r.annual_depreciation.scale() <= 2);
            assert!(r.accumulated_depreciation.scale() <= 2);
            assert!(r.book_value.scale() <= 2);
        }
    }
}

#[test]
fn hourly_identity_is_exact() {
    let cases = [
        RawAsset::hourly(dec!(50000), "2022-01-01", dec!(2.0), dec!(2.2), dec!(500), dec!(10)),
        RawAsset::hourly(dec!(123456.78), "2018-01-01", dec!(2.12345), dec!(2.45678), dec!(1234.5), dec!(7.77))
            .with_prior_accumulated(dec!(23456.01)),
        RawAsset::hourly(dec!(999.99), "2018-01-01", dec!(3), dec!(1), dec!(0), dec!(0.01))
            .with_prior_accumulated(dec!(333.33)),
    ];

    for engine in engines() {
        for raw in &cases {
            let schedule = engine.generate(raw).unwrap();
            let h = schedule.hourly().unwrap();
            assert_eq!(
                h.ending_book_value(),
                h.updated_asset_value - h.total_accumulated_depreciation()
            );
        }
    }
}

#[test]
fn generation_is_idempotent() {
    let mut cases = multi_period_cases();
    cases.push(
        RawAsset::hourly(dec!(123456.78), "2018-01-01", dec!(2.1), dec!(2.4), dec!(1234.5), dec!(7.77))
            .with_prior_accumulated(dec!(2345.6)),
    );

    for raw in &cases {
        let first: Schedule = generate_schedule(raw).unwrap();
        let second: Schedule = generate_schedule(raw).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn missing_required_fields_map_to_their_error() {
    let sl = RawAsset::straight_line(dec!(10000), "2020-01-01", 5);
    let dc = RawAsset::declining(dec!(10000), "2020-01-01", 3, dec!(0.5));
    let hu = RawAsset::hourly(dec!(50000), "2022-01-01", dec!(2.0), dec!(2.2), dec!(500), dec!(10));

    let cases: Vec<(RawAsset, ValidationError)> = vec![
        (RawAsset { cost: None, ..sl.clone() }, ValidationError::MissingOrInvalidCost),
        (RawAsset { purchase_date: None, ..sl.clone() }, ValidationError::InvalidPurchaseDate),
        (RawAsset { useful_life_years: None, ..sl.clone() }, ValidationError::MissingUsefulLife),
        (RawAsset { useful_life_years: None, ..dc.clone() }, ValidationError::MissingUsefulLife),
        (RawAsset { coefficient: None, ..dc.clone() }, ValidationError::MissingCoefficient),
        (RawAsset { index_initial: None, ..hu.clone() }, ValidationError::MissingIndexationInputs),
        (RawAsset { index_final: None, ..hu.clone() }, ValidationError::MissingIndexationInputs),
        (RawAsset { hours_in_period: None, ..hu.clone() }, ValidationError::MissingIndexationInputs),
        (RawAsset { hourly_rate: None, ..hu.clone() }, ValidationError::MissingIndexationInputs),
    ];

    for (raw, expected) in cases {
        assert_eq!(generate_schedule(&raw), Err(EngineError::Validation(expected)));
    }
}

#[test]
fn label_only_input_resolves_at_the_boundary() {
    let raw = RawAsset {
        cost: Some(dec!(50000)),
        purchase_date: Some("01/06/2022".into()),
        method_label: Some("Depreciacion por HRS. trabajadas".into()),
        index_initial: Some(dec!(2.0)),
        index_final: Some(dec!(2.2)),
        hours_in_period: Some(dec!(500)),
        hourly_rate: Some(dec!(10)),
        ..Default::default()
    };
    let schedule = generate_schedule(&raw).unwrap();
    assert!(schedule.hourly().is_some());
    assert_eq!(schedule.records()[0].year, 2022);
}

#[test]
fn out_of_range_inputs_are_rejected_not_generated() {
    let cases: Vec<(RawAsset, ValidationError)> = vec![
        (
            RawAsset::straight_line(dec!(1000), "2020-01-01", 3_000_000_000),
            ValidationError::MissingUsefulLife,
        ),
        (
            RawAsset::declining(dec!(1000), "2020-01-01", i64::MAX, dec!(0.5)),
            ValidationError::MissingUsefulLife,
        ),
        (
            RawAsset::hourly(dec!(1000000000000000000000000000), "2020-01-01", dec!(1), dec!(100), dec!(1), dec!(1)),
            ValidationError::MissingOrInvalidCost,
        ),
        (
            RawAsset::hourly(dec!(50000), "2020-01-01", dec!(0.0000000000000000000000000001), dec!(10), dec!(1), dec!(1)),
            ValidationError::MissingIndexationInputs,
        ),
    ];

    for (raw, expected) in cases {
        assert_eq!(generate_schedule(&raw), Err(EngineError::Validation(expected)));
    }
}
