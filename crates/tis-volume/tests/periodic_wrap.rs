use std::sync::Arc;

use tis_core::{FnOrderParameter, OrderParameter, TisError};
use tis_volume::{LambdaVolumePeriodic, Volume, VolumeKind, VolumeNode};

fn angle() -> Arc<dyn OrderParameter<f64>> {
    Arc::new(FnOrderParameter::new("phi", |s: &f64| *s))
}

#[test]
fn wrap_around_interval_is_union_of_arcs() {
    let volume = Volume::lambda_periodic(angle(), 0.9, 0.1, Some(0.0), Some(1.0)).unwrap();
    assert_eq!(volume.kind(), VolumeKind::LambdaPeriodic);
    assert!(volume.evaluate(&0.95));
    assert!(volume.evaluate(&0.05));
    assert!(!volume.evaluate(&0.5));
    // values outside the domain are wrapped first
    assert!(volume.evaluate(&1.05));
    assert!(volume.evaluate(&-0.02));
    assert!(!volume.evaluate(&2.5));
}

#[test]
fn bounds_are_wrapped_into_domain() {
    let volume =
        LambdaVolumePeriodic::new(angle(), -190.0, -170.0, Some(-180.0), Some(180.0)).unwrap();
    assert!(volume.wraps());
    assert_eq!(volume.lambda_min(), 170.0);
    assert_eq!(volume.lambda_max(), -170.0);
    assert!(volume.evaluate(&175.0));
    assert!(volume.evaluate(&-175.0));
    assert!(volume.evaluate(&185.0));
    assert!(!volume.evaluate(&0.0));
}

#[test]
fn full_width_interval_resets_to_domain() {
    let volume = LambdaVolumePeriodic::new(angle(), 0.5, 1.5, Some(0.0), Some(1.0)).unwrap();
    assert_eq!(volume.lambda_min(), 0.0);
    assert_eq!(volume.lambda_max(), 1.0);
    for x in [0.0, 0.3, 0.99, 7.25, -3.6] {
        assert!(volume.evaluate(&x), "{x} should be inside the full domain");
    }
}

#[test]
fn range_wider_than_period_is_rejected() {
    let err = Volume::lambda_periodic(angle(), 0.0, 1.5, Some(0.0), Some(1.0)).unwrap_err();
    match err {
        TisError::Construction(info) => {
            assert_eq!(info.code, "range-exceeds-period");
            assert!(info.context.contains_key("period_len"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn degenerate_period_is_rejected() {
    let err = Volume::lambda_periodic(angle(), 0.0, 0.0, Some(1.0), Some(1.0)).unwrap_err();
    assert_eq!(err.code(), "empty-period");
}

#[test]
fn missing_period_bound_disables_wrapping() {
    let volume = LambdaVolumePeriodic::new(angle(), 0.2, 0.4, Some(0.0), None).unwrap();
    assert!(!volume.wraps());
    assert!(volume.evaluate(&0.3));
    assert!(!volume.evaluate(&1.3));
    assert_eq!(volume.to_string(), "{x|phi(x) [periodic] in [0.2, 0.4]}");

    let inverted = LambdaVolumePeriodic::new(angle(), 0.9, 0.1, None, None).unwrap();
    assert!(inverted.evaluate(&0.95));
    assert!(!inverted.evaluate(&0.5));
}

#[test]
fn display_distinguishes_wrapped_forms() {
    let simple = Volume::lambda_periodic(angle(), 0.2, 0.4, Some(0.0), Some(1.0)).unwrap();
    assert_eq!(
        simple.to_string(),
        "{x|(phi(x) - 0.0) % 1.0 + 0.0 in [0.2, 0.4]}"
    );

    let wrapped = Volume::lambda_periodic(angle(), 0.9, 0.1, Some(0.0), Some(1.0)).unwrap();
    assert_eq!(
        wrapped.to_string(),
        "{x|(phi(x) - 0.0) % 1.0 + 0.0 in [0.0, 0.1] union [0.9, 1.0]}"
    );
}

#[test]
fn periodic_volumes_compose_like_any_leaf() {
    let arc = Volume::lambda_periodic(angle(), 0.9, 0.1, Some(0.0), Some(1.0)).unwrap();
    let outside = !&arc;
    match outside.node() {
        VolumeNode::Negated(inner) => assert!(inner.ptr_eq(&arc)),
        _ => panic!("expected negation"),
    }
    assert!(outside.evaluate(&0.5));
    assert!(!outside.evaluate(&0.0));
}
