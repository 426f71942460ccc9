use domaincover::{
    CompareOp, DomainCoverage, Feature, Fragment, Predicate, Rule, ScaleRange, Selector, Simplifier,
};
use proptest::prelude::*;

const OPS: [CompareOp; 6] = [
    CompareOp::Equal,
    CompareOp::NotEqual,
    CompareOp::Less,
    CompareOp::LessOrEqual,
    CompareOp::Greater,
    CompareOp::GreaterOrEqual,
];

// ------------- Strategies -------------
fn range_strategy() -> impl Strategy<Value = ScaleRange> {
    (0u8..10, 0u8..10, any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(a, b, min_included, max_included, open)| {
            let (min, max) = if a <= b { (a, b) } else { (b, a) };
            if open {
                ScaleRange::new(min as f64, min_included, f64::INFINITY, false).unwrap()
            } else {
                ScaleRange::new(min as f64, min_included, max as f64, max_included).unwrap()
            }
        },
    )
}

fn literal_strategy() -> impl Strategy<Value = Predicate> {
    prop_oneof![
        (0usize..6, 0u8..4).prop_map(|(op, c)| Predicate::compare("a", OPS[op], c as f64).unwrap()),
        (any::<bool>(), prop_oneof![Just("x"), Just("y")]).prop_map(|(equal, text)| {
            let op = if equal { CompareOp::Equal } else { CompareOp::NotEqual };
            Predicate::compare("b", op, text).unwrap()
        }),
    ]
}

fn predicate_strategy() -> impl Strategy<Value = Predicate> {
    let leaf = prop_oneof![1 => Just(Predicate::Include), 4 => literal_strategy()];
    leaf.prop_recursive(2, 8, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(Predicate::negate),
            prop::collection::vec(inner.clone(), 2..=3).prop_map(Predicate::And),
            prop::collection::vec(inner, 2..=3).prop_map(Predicate::Or),
        ]
    })
}

fn fragment_strategy() -> impl Strategy<Value = Fragment> {
    (range_strategy(), predicate_strategy()).prop_map(|(r, p)| Fragment::new(r, p))
}

fn disjunct_strategy() -> impl Strategy<Value = Selector> {
    (prop::option::of(range_strategy()), predicate_strategy()).prop_map(|(range, predicate)| match range {
        Some(range) => Selector::and(Selector::Scale(range), Selector::Data(predicate)),
        None => Selector::Data(predicate),
    })
}

fn selector_strategy() -> impl Strategy<Value = Selector> {
    prop_oneof![
        disjunct_strategy(),
        prop::collection::vec(disjunct_strategy(), 2..=3).prop_map(Selector::Or),
    ]
}

// ------------- Sampling -------------
// every cell of the ranges and literals generated above holds one of these
fn scales() -> Vec<f64> {
    let mut scales: Vec<f64> = (0..=21).map(|k| k as f64 / 2.0).collect();
    scales.push(1e9);
    scales
}

fn features() -> Vec<Feature> {
    let numbers = [None, Some(-1.0), Some(0.0), Some(0.5), Some(1.0), Some(1.5), Some(2.0), Some(2.5), Some(3.0), Some(4.0)];
    let texts = [None, Some("x"), Some("y"), Some("z")];
    let mut features = Vec::new();
    for n in numbers {
        for t in texts {
            let mut f = Feature::new();
            if let Some(n) = n {
                f = f.with("a", n);
            }
            if let Some(t) = t {
                f = f.with("b", t);
            }
            features.push(f);
        }
    }
    features
}

fn disjunct_matches(selector: &Selector, scale: f64, feature: &Feature) -> bool {
    let range = selector.scale_range().unwrap().unwrap_or(ScaleRange::FULL);
    range.contains(scale) && selector.predicate(None).unwrap().evaluate(feature)
}

fn selector_matches(selector: &Selector, scale: f64, feature: &Feature) -> bool {
    match selector {
        Selector::Or(children) => children.iter().any(|c| disjunct_matches(c, scale, feature)),
        other => disjunct_matches(other, scale, feature),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn difference_partitions_the_domain(a in fragment_strategy(), b in fragment_strategy()) {
        let simplifier = Simplifier::default();
        let pieces = a.difference(&b, &simplifier);
        prop_assert!(pieces.len() <= 3);
        let features = features();
        for scale in scales() {
            for feature in &features {
                let expected = a.contains(scale, feature) && !b.contains(scale, feature);
                let hits = pieces.iter().filter(|p| p.contains(scale, feature)).count();
                prop_assert!(hits <= 1, "pieces overlap at scale {} for {:?}", scale, feature);
                prop_assert_eq!(hits == 1, expected, "scale {} feature {:?}", scale, feature);
            }
        }
    }

    #[test]
    fn coverage_stays_disjoint_and_grows_by_each_rule(selectors in prop::collection::vec(selector_strategy(), 1..=5)) {
        let mut coverage = DomainCoverage::new(None);
        let features = features();
        for (position, selector) in selectors.into_iter().enumerate() {
            let rule = Rule::new(selector, position, position);
            let before = coverage.clone();
            let derived = coverage.add_rule(&rule).unwrap();
            for scale in scales() {
                for feature in &features {
                    let owners = coverage.fragments().iter().filter(|f| f.contains(scale, feature)).count();
                    prop_assert!(owners <= 1, "coverage overlaps at scale {}", scale);
                    let was = before.covers(scale, feature);
                    let matched = selector_matches(rule.selector(), scale, feature);
                    prop_assert_eq!(coverage.covers(scale, feature), was || matched);
                    let emitted = derived.iter().filter(|d| selector_matches(d.selector(), scale, feature)).count();
                    if before.is_empty() {
                        prop_assert_eq!(emitted == 1, matched);
                    } else {
                        prop_assert!(emitted <= 1);
                        prop_assert_eq!(emitted == 1, matched && !was);
                    }
                }
            }
            // nothing provably empty is emitted as a live rule
            if !before.is_empty() {
                for d in &derived {
                    let live = scales().into_iter().any(|s| features.iter().any(|f| selector_matches(d.selector(), s, f)));
                    prop_assert!(live, "derived rule {} matches nothing", d);
                    prop_assert_eq!(d.position(), position);
                }
            }
        }
    }
}

// the second disjunct lies entirely inside the first
#[test]
fn nested_disjunct_as_first_rule_keeps_coverage_disjoint() {
    let selector = Selector::Or(vec![
        Selector::Data(Predicate::Include),
        Selector::and(
            Selector::Scale(ScaleRange::new(0.0, false, f64::INFINITY, false).unwrap()),
            Selector::Data(Predicate::Include),
        ),
    ]);
    let mut coverage = DomainCoverage::new(None);
    let rule = Rule::new(selector, 0, 0);
    assert_eq!(coverage.add_rule(&rule).unwrap(), vec![rule.clone()]);
    assert_eq!(coverage.len(), 1);
    for scale in scales() {
        for feature in &features() {
            assert_eq!(coverage.fragments().iter().filter(|f| f.contains(scale, feature)).count(), 1);
        }
    }
}
