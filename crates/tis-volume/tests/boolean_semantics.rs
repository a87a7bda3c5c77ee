use std::sync::Arc;

use proptest::prelude::*;
use tis_core::{FnOrderParameter, OrderParameter};
use tis_volume::Volume;

fn identity() -> Arc<dyn OrderParameter<f64>> {
    Arc::new(FnOrderParameter::new("x", |s: &f64| *s))
}

/// Builds a leaf from a selector: sentinels or an interval.
fn leaf(selector: u8, lo: f64, width: f64) -> Volume<f64> {
    match selector % 4 {
        0 => Volume::empty(),
        1 => Volume::full(),
        _ => Volume::lambda(identity(), lo, lo + width),
    }
}

fn leaf_strategy() -> impl Strategy<Value = (u8, f64, f64)> {
    (any::<u8>(), -2.0f64..2.0, 0.0f64..2.0)
}

proptest! {
    #[test]
    fn operators_match_boolean_semantics(
        a in leaf_strategy(),
        b in leaf_strategy(),
        x in -3.0f64..5.0,
    ) {
        let va = leaf(a.0, a.1, a.2);
        let vb = leaf(b.0, b.1, b.2);
        let ea = va.evaluate(&x);
        let eb = vb.evaluate(&x);

        prop_assert_eq!(va.union(&vb).evaluate(&x), ea || eb);
        prop_assert_eq!(va.intersection(&vb).evaluate(&x), ea && eb);
        prop_assert_eq!(va.difference(&vb).evaluate(&x), ea && !eb);
        prop_assert_eq!(va.symmetric_difference(&vb).evaluate(&x), ea ^ eb);
        prop_assert_eq!(va.negate().evaluate(&x), !ea);
    }

    #[test]
    fn nested_trees_match_boolean_semantics(
        a in leaf_strategy(),
        b in leaf_strategy(),
        c in leaf_strategy(),
        x in -3.0f64..5.0,
    ) {
        let va = leaf(a.0, a.1, a.2);
        let vb = leaf(b.0, b.1, b.2);
        let vc = leaf(c.0, c.1, c.2);
        let (ea, eb, ec) = (va.evaluate(&x), vb.evaluate(&x), vc.evaluate(&x));

        let tree = &(&va | &vb) - &(!&vc ^ &va);
        prop_assert_eq!(tree.evaluate(&x), (ea || eb) && !(!ec ^ ea));

        let self_terms = &(&va - &va) | &(&vb & &vb);
        prop_assert_eq!(self_terms.evaluate(&x), eb);
    }
}
