use susquehanna_macros::Trajectory;

#[derive(Debug, Clone, Copy, Trajectory)]
#[trajectory(series_name = "ReleaseLog")]
pub struct DailyRelease {
    pub atomic: f64,
    pub downstream: f64,
}

fn main() {
    let mut log = ReleaseLog::with_capacity(2);
    log.push(&DailyRelease { atomic: 40.0, downstream: 20_000.0 });
    log.push(&DailyRelease { atomic: 35.0, downstream: 18_000.0 });
    assert_eq!(log.len(), 2);
    assert_eq!(log.row(1).map(|r| r.atomic), Some(35.0));
    assert!(log.row(2).is_none());
}
