use crate::sim::SimTime;

#[test]
fn constructors_convert_units() {
    assert_eq!(SimTime::from_minutes(2), SimTime(120));
    assert_eq!(SimTime::from_hours(1), SimTime(3_600));
    assert_eq!(SimTime::ZERO, SimTime(0));
}

#[test]
fn minute_conversions_round_as_documented() {
    assert_eq!(SimTime(119).minutes(), 1);
    assert_eq!(SimTime(119).ceil_minutes(), 2);
    assert_eq!(SimTime(120).ceil_minutes(), 2);
    assert_eq!(SimTime(90).as_minutes_f64(), 1.5);
}

#[test]
fn saturating_arithmetic_never_wraps() {
    assert_eq!(SimTime(u64::MAX).saturating_add(SimTime(10)), SimTime(u64::MAX));
    assert_eq!(SimTime(5).saturating_sub(SimTime(10)), SimTime::ZERO);
    assert_eq!(SimTime(10).saturating_sub(SimTime(4)), SimTime(6));
}
