use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use decoy::wildcard::{GenericTypeArgumentMatcher, WildcardRegistry};
use decoy::{Constraint, ConstraintManager, MatchingContext, Type, Value};
use proptest::prelude::*;

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<u8>().prop_map(Value::from),
        any::<char>().prop_map(Value::from),
        ".{0,8}".prop_map(Value::from),
        prop::collection::vec(any::<i32>(), 0..4).prop_map(Value::from),
    ]
}

fn named_type() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(Type::i32()),
        Just(Type::u8()),
        Just(Type::string()),
        Just(Type::object()),
        "[A-Z][a-z]{0,6}".prop_map(Type::reference),
    ]
}

fn counting(calls: &Arc<AtomicUsize>) -> Constraint {
    let calls = calls.clone();

    MatchingContext::default().that::<i32>().matches(
        move |_| {
            calls.fetch_add(1, Ordering::Relaxed);

            true
        },
        |w| w.write("counted"),
    )
}

proptest! {
    #[test]
    fn negation_inverts_validity(x in value(), threshold in any::<i32>()) {
        let that = MatchingContext::default().that::<Value>();
        let check = move |v: &Value| matches!(v, Value::I32(i) if *i > threshold);
        let positive = that.matches(check, |w| w.write("above threshold"));
        let negative = that.not().matches(check, |w| w.write("above threshold"));

        prop_assert_eq!(positive.is_valid(&x).unwrap(), !negative.is_valid(&x).unwrap());
        prop_assert_eq!(
            negative.description().unwrap(),
            format!("<not {}", &positive.description().unwrap()[1..])
        );
    }

    #[test]
    fn equal_types_match_without_wildcards(ty in named_type()) {
        let registry = WildcardRegistry::builder()
            .declare(ty.clone(), |_: &Type| false)
            .build()
            .unwrap();
        let matcher = GenericTypeArgumentMatcher::new(registry);

        prop_assert!(matcher.are_matching_types(&ty, &ty).unwrap());
    }

    #[test]
    fn incompatible_arguments_skip_the_predicate(x in value()) {
        let calls = Arc::new(AtomicUsize::new(0));
        let constraint = counting(&calls);

        let valid = constraint.is_valid(&x).unwrap();
        let compatible = matches!(x, Value::I32(_));

        prop_assert_eq!(valid, compatible);
        prop_assert_eq!(calls.load(Ordering::Relaxed), usize::from(compatible));
    }

    #[test]
    fn equality_never_accepts_null(x in value()) {
        let context = MatchingContext::default();
        prop_assume!(!x.is_null());

        let constraint = context.equal_to(x, Type::object());

        prop_assert!(!constraint.is_valid(&Value::Null).unwrap());
    }
}
