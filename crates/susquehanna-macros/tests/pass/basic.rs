use susquehanna_macros::Trajectory;

#[derive(Debug, Clone, Copy, Trajectory)]
pub struct DayLevels {
    pub conowingo: f64,
    pub muddy_run: f64,
}

fn main() {
    let r = DayLevels { conowingo: 108.5, muddy_run: 505.0 };
    let mut series = DayLevelsSeries::with_capacity(365);
    assert!(series.is_empty());
    series.push(&r);
    assert_eq!(series.len(), 1);
    assert_eq!(series.conowingo, vec![108.5]);
    assert_eq!(DayLevels::field_names(), &["conowingo", "muddy_run"]);
}
