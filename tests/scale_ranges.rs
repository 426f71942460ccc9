use domaincover::ScaleRange;

fn range(min: f64, min_included: bool, max: f64, max_included: bool) -> ScaleRange {
    ScaleRange::new(min, min_included, max, max_included).unwrap()
}

#[test]
fn rejects_nan_and_inverted_bounds() {
    assert!(ScaleRange::new(f64::NAN, true, 10.0, false).is_err());
    let err = ScaleRange::between(10.0, 5.0).unwrap_err();
    assert!(format!("{}", err).contains("greater than maximum"));
}

#[test]
fn emptiness_depends_on_bound_flags() {
    assert!(!range(5.0, true, 5.0, true).is_empty());
    assert!(range(5.0, true, 5.0, false).is_empty());
    assert!(range(5.0, false, 5.0, true).is_empty());
    assert!(!ScaleRange::FULL.is_empty());
}

#[test]
fn contains_honours_flags() {
    let r = range(100.0, false, 200.0, true);
    assert!(!r.contains(100.0));
    assert!(r.contains(100.5));
    assert!(r.contains(200.0));
    assert!(!r.contains(200.5));
    assert!(ScaleRange::FULL.contains(0.0));
    assert!(ScaleRange::FULL.contains(1e12));
    assert!(!ScaleRange::FULL.contains(-1.0));
}

#[test]
fn touching_ranges_do_not_intersect() {
    let low = ScaleRange::between(0.0, 1000.0).unwrap();
    let high = ScaleRange::between(1000.0, 2000.0).unwrap();
    assert!(!low.intersects(&high));
    assert!(low.intersect(&high).is_empty());
    // closing the lower range makes them share a single point
    let closed = range(0.0, true, 1000.0, true);
    assert_eq!(closed.intersect(&high), range(1000.0, true, 1000.0, true));
}

#[test]
fn subtract_inner_range_yields_two_pieces() {
    let outer = ScaleRange::between(0.0, 1000.0).unwrap();
    let inner = ScaleRange::between(200.0, 300.0).unwrap();
    let pieces = outer.subtract(&inner);
    assert_eq!(
        pieces,
        vec![
            ScaleRange::between(0.0, 200.0).unwrap(),
            range(300.0, true, 1000.0, false)
        ]
    );
}

#[test]
fn subtract_flips_the_flags_at_the_cut() {
    let outer = range(0.0, true, 10.0, true);
    let inner = range(2.0, false, 5.0, true);
    let pieces = outer.subtract(&inner);
    assert_eq!(pieces, vec![range(0.0, true, 2.0, true), range(5.0, false, 10.0, true)]);
}

#[test]
fn subtract_overlapping_and_covering_ranges() {
    let this = ScaleRange::between(500.0, 1500.0).unwrap();
    let other = ScaleRange::between(0.0, 1000.0).unwrap();
    assert_eq!(this.subtract(&other), vec![ScaleRange::between(1000.0, 1500.0).unwrap()]);
    assert!(this.subtract(&ScaleRange::FULL).is_empty());
    // disjoint ranges come back unchanged
    let far = ScaleRange::between(5000.0, 6000.0).unwrap();
    assert_eq!(this.subtract(&far), vec![this]);
}

#[test]
fn lower_bounds_order_inclusive_first() {
    let inclusive = range(100.0, true, 200.0, false);
    let exclusive = range(100.0, false, 150.0, false);
    assert!(inclusive.lower() < exclusive.lower());
    assert!(ScaleRange::between(50.0, 60.0).unwrap().lower() < inclusive.lower());
    assert_eq!(range(-0.0, true, 1.0, false), range(0.0, true, 1.0, false));
}

#[test]
fn open_upper_end_survives_json() {
    let json = serde_json::to_string(&ScaleRange::FULL).unwrap();
    assert!(!json.contains("max\""));
    let back: ScaleRange = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ScaleRange::FULL);

    let parsed: ScaleRange = serde_json::from_str(r#"{"min": 1000, "max": 50000}"#).unwrap();
    assert_eq!(parsed, ScaleRange::between(1000.0, 50000.0).unwrap());
    assert!(serde_json::from_str::<ScaleRange>(r#"{"min": 10, "max": 5}"#).is_err());
}

#[test]
fn display_shows_bound_flags() {
    assert_eq!(range(0.0, true, 1000.0, false).to_string(), "[0, 1000)");
    assert_eq!(range(1.5, false, 2.0, true).to_string(), "(1.5, 2]");
    assert_eq!(ScaleRange::FULL.to_string(), "[0, inf)");
}
