//! Alternate unit identity and registration, end to end

use std::panic::{self, AssertUnwindSafe};
use std::sync::Barrier;
use std::thread;

use measure_units::prelude::*;
use measure_units::{Duration, Frequency, Length, UnitKind};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

struct Fixture {
    registry: SymbolRegistry,
    metre: Unit<Length>,
    second: Unit<Duration>,
}

fn fixture() -> Fixture {
    init_tracing();
    let registry = SymbolRegistry::new();
    let metre = Unit::base("m", Dimension::LENGTH, &registry).unwrap();
    let second = Unit::base("s", Dimension::TIME, &registry).unwrap();
    Fixture { registry, metre, second }
}

#[test]
fn test_redefinition_is_accepted_and_equal() {
    let fx = fixture();
    let second_reciprocal = fx.second.inverse();

    let first = second_reciprocal.alternate::<Frequency>("Hz", &fx.registry).unwrap();
    let again = second_reciprocal.alternate::<Frequency>("Hz", &fx.registry).unwrap();

    assert_eq!(first.symbol(), Some("Hz"));
    assert_eq!(again.symbol(), Some("Hz"));
    assert_eq!(first, again);

    // Both outcomes are kept: the duplicate is usable but not registered.
    let registered = fx.registry.lookup("Hz").unwrap();
    assert!(registered.same_instance(&first));
    assert!(!registered.same_instance(&again));
}

#[test]
fn test_conflicting_parent_is_rejected() {
    let fx = fixture();
    let second_reciprocal = fx.second.inverse();

    let hertz = second_reciprocal.alternate::<Frequency>("Hz", &fx.registry).unwrap();
    let err = fx.metre.alternate::<Length>("Hz", &fx.registry).unwrap_err();

    assert!(matches!(err, UnitError::SymbolConflict { ref symbol, .. } if symbol == "Hz"));
    assert!(err.is_recoverable());
    assert!(fx.registry.lookup("Hz").unwrap().same_instance(&hertz));
}

#[test]
fn test_symbol_owned_by_base_unit_is_a_conflict() {
    let fx = fixture();
    let err = fx.metre.alternate::<Length>("s", &fx.registry).unwrap_err();
    assert!(matches!(err, UnitError::SymbolConflict { .. }));
}

#[test]
fn test_non_standard_parent_fails_before_registry_mutation() {
    let fx = fixture();
    let kilometre = fx.metre.scale_ratio(1000, 1);
    let before = fx.registry.symbols();

    assert!(kilometre.check_standard().is_err());
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        kilometre.alternate::<Length>("klick", &fx.registry)
    }));

    assert!(result.is_err());
    assert_eq!(fx.registry.symbols(), before);
    assert!(!fx.registry.contains("klick"));
}

#[test]
fn test_alternate_is_its_own_standard_unit() {
    let fx = fixture();
    let hertz = fx.second.inverse().alternate::<Frequency>("Hz", &fx.registry).unwrap();

    assert!(hertz.is_standard_unit());
    assert!(hertz.standard_unit().same_instance(&hertz));
    assert_eq!(hertz.parent().unwrap(), fx.second.inverse());
    assert!(matches!(hertz.kind(), UnitKind::Alternate(a) if a.symbol() == "Hz"));

    let to_standard = hertz.to_standard_unit();
    for x in [-1.5e300, -2.0, 0.0, 0.125, 60.0, 1.0e-300] {
        assert_eq!(to_standard.convert(x), x);
        assert_eq!(to_standard.inverse().convert(x), x);
    }
}

#[test]
fn test_concurrent_registration_has_one_winner() {
    const THREADS: usize = 16;

    let fx = fixture();
    let per_second = fx.second.inverse();
    let per_metre = fx.metre.inverse();
    let barrier = Barrier::new(THREADS);

    let outcomes: Vec<(bool, Result<Unit, UnitError>)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let parent = if i % 2 == 0 { &per_second } else { &per_metre };
                let (registry, barrier) = (&fx.registry, &barrier);
                scope.spawn(move || {
                    barrier.wait();
                    (i % 2 == 0, parent.alternate::<measure_units::Untyped>("X", registry))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winner = fx.registry.lookup("X").unwrap();
    let winner_parent = winner.parent().unwrap();
    assert_eq!(fx.registry.symbols().iter().filter(|s| *s == "X").count(), 1);

    for (even, outcome) in outcomes {
        let parent = if even { per_second.untyped() } else { per_metre.untyped() };
        match outcome {
            Ok(unit) => {
                assert_eq!(parent, winner_parent);
                assert_eq!(unit, winner);
            }
            Err(err) => {
                assert_ne!(parent, winner_parent);
                assert!(matches!(err, UnitError::SymbolConflict { .. }));
            }
        }
    }
}

#[test]
fn test_isolated_registries_do_not_interact() {
    let a = fixture();
    let b = fixture();

    a.second.inverse().alternate::<Frequency>("Hz", &a.registry).unwrap();
    b.metre.alternate::<Length>("Hz", &b.registry).unwrap();

    let in_a = a.registry.lookup("Hz").unwrap();
    let in_b = b.registry.lookup("Hz").unwrap();
    assert_ne!(in_a.parent(), in_b.parent());
    assert_ne!(in_a.dimension(), in_b.dimension());
}
