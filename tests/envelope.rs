mod tests {
    use piano_backdrop::Smoothing;
    use piano_backdrop::envelope::{BETA, GAMMA_DEC, GAMMA_INC, KeyEnvelopeTable, NUM_KEYS};

    #[test]
    fn test_strike_sets_raw() {
        let mut table = KeyEnvelopeTable::default();
        assert!(table.strike(60, 80));
        assert_eq!(table.get(60).unwrap().raw, 80.0);
        assert_eq!(table.get(60).unwrap().fast, 0.0);
        assert_eq!(table.sum_raw(), 80.0);
        assert_eq!(table.iter().count(), NUM_KEYS);
    }

    #[test]
    fn test_release_does_not_touch_table() {
        let mut table = KeyEnvelopeTable::default();
        table.strike(60, 80);
        table.tick();
        let before = *table.get(60).unwrap();
        assert!(table.strike(60, 0));
        assert_eq!(*table.get(60).unwrap(), before);
    }

    #[test]
    fn test_strike_out_of_range() {
        let mut table = KeyEnvelopeTable::default();
        assert!(!table.strike(128, 80));
        assert!(!table.strike(255, 80));
        assert_eq!(table.sum_raw(), 0.0);
        assert!(table.get(128).is_none());
    }

    #[test]
    fn test_strike_then_release_envelope() {
        let mut table = KeyEnvelopeTable::default();
        table.strike(60, 80);

        let (mut raw, mut fast) = (80.0f32, 0.0f32);
        let mut saw_attack = false;
        let mut saw_release = false;
        for tick in 0..400 {
            if tick == 1 {
                table.strike(60, 0);
            }
            table.tick();

            raw *= BETA;
            let previous = fast;
            if fast >= raw {
                fast = GAMMA_DEC * fast + (1.0 - GAMMA_DEC) * raw;
                assert!(fast <= previous, "release must not raise fast");
                saw_release = true;
            } else {
                fast = GAMMA_INC * fast + (1.0 - GAMMA_INC) * raw;
                assert!(fast > previous, "attack must raise fast");
                saw_attack = true;
            }

            let key = table.get(60).unwrap();
            assert!((key.raw - raw).abs() < 1e-4, "tick {}: raw {} != {}", tick, key.raw, raw);
            assert!((key.fast - fast).abs() < 1e-4, "tick {}: fast {} != {}", tick, key.fast, fast);
            assert!(key.raw >= 0.0 && key.fast >= 0.0);
        }
        assert!(saw_attack && saw_release);
    }

    #[test]
    fn test_raw_decays_geometrically() {
        let mut table = KeyEnvelopeTable::default();
        table.strike(10, 100);
        for _ in 0..10 {
            table.tick();
        }
        let expected = 100.0 * BETA.powi(10);
        assert!((table.get(10).unwrap().raw - expected).abs() < 1e-3);
    }

    #[test]
    fn test_envelopes_reach_zero() {
        let mut table = KeyEnvelopeTable::default();
        table.strike(40, 127);
        for _ in 0..60_000 {
            table.tick();
        }
        assert_eq!(table.sum_raw(), 0.0);
        assert_eq!(table.get(40).unwrap().fast, 0.0);
    }

    #[test]
    fn test_custom_smoothing() {
        let smoothing = Smoothing {
            beta: 0.5,
            gamma_inc: 0.0,
            ..Smoothing::default()
        };
        let mut table = KeyEnvelopeTable::new(&smoothing);
        table.strike(1, 64);
        table.tick();
        let key = table.get(1).unwrap();
        assert_eq!(key.raw, 32.0);
        assert_eq!(key.fast, 32.0);
    }
}
