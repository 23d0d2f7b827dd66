//! Monitor reporting through the public API

use adaptune_metering::{EpisodeMonitor, MetricRecord};

#[test]
fn test_windows_accumulate_results() {
    let mut monitor = EpisodeMonitor::default();

    for window in 0..3 {
        for episode in 1..=20 {
            let index = window * 20 + episode;
            monitor.monitor(
                MetricRecord::new()
                    .with("reward", (index % 7) as f64)
                    .with("episode", index as f64),
            );
        }
        let result = monitor.process(20, 0.9, 10.0).unwrap();
        assert_eq!(result.episodes, 20);
        assert_eq!(result.key().unwrap().highest, 6.0);
        assert!(monitor.buffer().is_empty());
    }

    assert_eq!(monitor.results().len(), 3);
    let log = monitor.get_log().unwrap();
    assert!(log.starts_with("\n|   episodes |"));
    assert!(log.ends_with("|\n"));
    assert!(log.contains("\n\n| category   |"));
}

#[test]
fn test_custom_key_metric() {
    let mut monitor = EpisodeMonitor::new("steps", "episode");
    monitor.monitor(MetricRecord::new().with("steps", 5.0).with("reward", -1.0));
    monitor.monitor(MetricRecord::new().with("steps", 9.0).with("reward", -7.0));

    let result = monitor.process(0, 0.5, 2.0).unwrap();
    assert_eq!(result.key_metric, "steps");
    assert_eq!(result.metric("reward").unwrap().highest, -7.0);
    assert_eq!(monitor.key_metric(), "steps");
}
