mod tests {
    use myrtio_light_script::{Duration, Instant, LogLevel, Logger};

    fn at(millis: u64) -> Instant {
        Instant::from_millis(millis)
    }

    #[test]
    fn test_periodic_is_limited_per_key() {
        let logger =
            Logger::new(LogLevel::Warn).with_periodic_interval(Duration::from_millis(100));
        let warn =
            |key, millis| logger.periodic(key, at(millis), LogLevel::Warn, format_args!("x"));

        assert!(warn("window", 0));
        assert!(!warn("window", 50));
        assert!(warn("dropped", 50), "other keys keep their own interval");
        assert!(!warn("dropped", 120));
        assert!(warn("window", 100));
        assert_eq!(logger.warning_count(), 5);
    }

    #[test]
    fn test_periodic_counts_by_level() {
        let logger = Logger::default();
        assert!(logger.periodic("eval", at(0), LogLevel::Error, format_args!("bad")));
        assert!(!logger.periodic("eval", at(10), LogLevel::Error, format_args!("bad")));
        assert!(!logger.periodic("eval", at(999), LogLevel::Error, format_args!("bad")));
        assert!(logger.periodic("eval", at(1000), LogLevel::Error, format_args!("bad")));
        assert_eq!(logger.error_count(), 4);
        assert_eq!(logger.warning_count(), 0);
    }

    #[test]
    fn test_periodic_emits_when_slots_run_out() {
        const KEYS: [&str; 17] = [
            "k0", "k1", "k2", "k3", "k4", "k5", "k6", "k7", "k8", "k9", "k10", "k11", "k12",
            "k13", "k14", "k15", "k16",
        ];
        let logger = Logger::default();
        for key in KEYS {
            assert!(logger.periodic(key, at(0), LogLevel::Warn, format_args!("{key}")));
        }
        assert!(logger.periodic("k16", at(1), LogLevel::Warn, format_args!("again")));
        assert!(!logger.periodic("k0", at(1), LogLevel::Warn, format_args!("again")));
        assert_eq!(logger.warning_count(), 19);
    }
}
