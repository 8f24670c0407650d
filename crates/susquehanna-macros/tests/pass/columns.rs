use susquehanna_macros::Trajectory;

#[derive(Debug, Clone, Copy, Trajectory)]
struct Energy {
    generated: f64,
    pumped: f64,
}

fn main() {
    let mut s = EnergySeries::default();
    s.push(&Energy { generated: 3.0, pumped: 1.0 });
    assert_eq!(s.column("pumped"), Some(&[1.0][..]));
    assert_eq!(s.column("missing"), None);
    let names: Vec<&str> = s.columns().iter().map(|(n, _)| *n).collect();
    assert_eq!(names, vec!["generated", "pumped"]);
}
