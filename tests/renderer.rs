mod tests {
    use piano_backdrop::color::hsv_to_rgb;
    use piano_backdrop::{
        BackdropConfig, BackdropState, Color, ColorControl, Instant, Intent, IntentChannel,
        Renderer, Rgb, SharedColor, key_to_led, parse_datagram, velocity_to_brightness,
    };

    const SIZE: usize = 32;

    fn key(datagram: &str, at_ms: u64) -> Intent {
        Intent::Key(parse_datagram(datagram.as_bytes(), Instant::from_millis(at_ms)).unwrap())
    }

    fn distance(a: Color, b: Color) -> f32 {
        ((a.r - b.r).powi(2) + (a.g - b.g).powi(2) + (a.b - b.b).powi(2)).sqrt()
    }

    fn led_index(key: u8) -> usize {
        usize::try_from(key_to_led(key)).unwrap()
    }

    #[test]
    fn test_snap_after_silence() {
        let mut state = BackdropState::default();
        if let Intent::Key(event) = key("60,80,0.5", 1000) {
            state.apply_key_event(&event);
        }
        let cyan = hsv_to_rgb(0.5, 1.0, 1.0);
        assert_eq!(state.target_color(), cyan);
        assert_eq!(state.current_color(), cyan);
        assert_eq!(state.keys().get(60).unwrap().raw, 80.0);
    }

    #[test]
    fn test_no_snap_right_after_release() {
        let mut state = BackdropState::default();
        for intent in [key("40,0", 1000), key("60,80,0.5", 1050)] {
            if let Intent::Key(event) = intent {
                state.apply_key_event(&event);
            }
        }
        assert_eq!(state.last_release(), Instant::from_millis(1000));
        assert_eq!(state.current_color(), Color::new(0.0, 0.0, 0.0));
        assert_eq!(state.target_color(), hsv_to_rgb(0.5, 1.0, 1.0));
    }

    #[test]
    fn test_no_snap_while_key_held() {
        let mut state = BackdropState::default();
        for intent in [key("40,100", 1000), key("60,80,0.5", 5000)] {
            if let Intent::Key(event) = intent {
                state.apply_key_event(&event);
            }
        }
        assert_eq!(state.current_color(), Color::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_release_with_hue_retargets_without_snap() {
        let mut state = BackdropState::default();
        if let Intent::Key(event) = key("60,0,0.5", 5000) {
            state.apply_key_event(&event);
        }
        assert_eq!(state.target_color(), hsv_to_rgb(0.5, 1.0, 1.0));
        assert_eq!(state.current_color(), Color::new(0.0, 0.0, 0.0));
        assert_eq!(state.keys().sum_raw(), 0.0);
    }

    #[test]
    fn test_snap_within_same_tick() {
        let channel = IntentChannel::<SIZE>::new();
        let mut renderer = Renderer::new(channel.receiver(), &BackdropConfig::default());
        channel.try_send(key("60,80,0.5", 1000)).unwrap();

        renderer.render(Instant::from_millis(1000));
        let cyan = hsv_to_rgb(0.5, 1.0, 1.0);
        assert!(distance(renderer.state().current_color(), cyan) < 1e-6);
    }

    #[test]
    fn test_struck_key_lights_two_leds() {
        let channel = IntentChannel::<SIZE>::new();
        let mut renderer = Renderer::new(channel.receiver(), &BackdropConfig::default());
        channel.try_send(key("60,80,0.5", 1000)).unwrap();

        for tick in 0..40 {
            renderer.render(Instant::from_millis(1000 + tick));
        }

        let led = led_index(60);
        assert_eq!(led, 109);
        let ceiling = (velocity_to_brightness(80.0) * 255.0).round() as u8;
        for slot in [led, led + 1] {
            let (intensity, rgb) = renderer.frame().led(slot).unwrap();
            assert_eq!(intensity, 31);
            assert_eq!(rgb.r, 0);
            assert_eq!(rgb.g, rgb.b);
            assert!(rgb.g > 0 && rgb.g <= ceiling, "green {}", rgb.g);
        }

        // Neighbouring keys stay dark
        assert_eq!(renderer.frame().led(led + 2), Some((0, Rgb::new(0, 0, 0))));
        assert_eq!(renderer.frame().led(led - 1), Some((0, Rgb::new(0, 0, 0))));
    }

    #[test]
    fn test_unlit_keys_are_off() {
        let channel = IntentChannel::<SIZE>::new();
        let mut renderer = Renderer::new(channel.receiver(), &BackdropConfig::default());
        let frame = renderer.render(Instant::from_millis(0));
        for i in 0..frame.num_leds() {
            assert_eq!(frame.led(i), Some((0, Rgb::new(0, 0, 0))));
        }
    }

    #[test]
    fn test_later_key_overwrites_shared_leds() {
        // Keys below 28 share LEDs with key 28, which is drawn after them.
        let channel = IntentChannel::<SIZE>::new();
        let mut renderer = Renderer::new(channel.receiver(), &BackdropConfig::default());
        channel.try_send(key("20,100,0.0", 1000)).unwrap();
        for tick in 0..10 {
            renderer.render(Instant::from_millis(1000 + tick));
        }
        assert_eq!(led_index(20), led_index(28));
        assert_eq!(renderer.frame().led(led_index(28)).unwrap().0, 0);

        channel.try_send(key("28,100", 2000)).unwrap();
        for tick in 0..10 {
            renderer.render(Instant::from_millis(2000 + tick));
        }
        assert_eq!(renderer.frame().led(led_index(28)).unwrap().0, 31);
    }

    #[test]
    fn test_small_strip_wraps() {
        let channel = IntentChannel::<SIZE>::new();
        let config = BackdropConfig {
            num_leds: 100,
            ..BackdropConfig::default()
        };
        let mut renderer = Renderer::new(channel.receiver(), &config);
        channel.try_send(key("60,100,0.0", 1000)).unwrap();
        for tick in 0..10 {
            renderer.render(Instant::from_millis(1000 + tick));
        }
        // LED 109 wraps to 9
        assert_eq!(renderer.frame().led(9).unwrap().0, 31);
        assert_eq!(renderer.frame().led(10).unwrap().0, 31);
    }

    #[test]
    fn test_color_control_round_trip() {
        let channel = IntentChannel::<SIZE>::new();
        let shared = SharedColor::default();
        let mut renderer = Renderer::new(channel.receiver(), &BackdropConfig::default())
            .with_shared_color(&shared);
        let control = ColorControl::new(&shared, channel.sender());

        assert_eq!(control.current(), Color::new(0.0, 0.0, 0.0));
        assert_eq!(control.intensity(), 31);

        control.set_color(Color::new(1.0, 0.0, 0.0)).unwrap();
        control.set_intensity(40).unwrap();
        // Not applied until the next tick
        assert_eq!(control.current(), Color::new(0.0, 0.0, 0.0));

        renderer.render(Instant::from_millis(0));
        let snapshot = control.snapshot();
        assert!(distance(snapshot.current, Color::new(1.0, 0.0, 0.0)) < 1e-6);
        assert_eq!(snapshot.target, Color::new(1.0, 0.0, 0.0));
        assert_eq!(snapshot.intensity, 31);

        control.set_target(Color::new(0.0, 0.0, 2.0)).unwrap();
        control.set_intensity(10).unwrap();
        renderer.render(Instant::from_millis(1));
        let snapshot = control.snapshot();
        assert_eq!(snapshot.target, Color::new(0.0, 0.0, 1.0));
        assert!((snapshot.current.r - 0.97).abs() < 1e-5);
        assert!((snapshot.current.b - 0.03).abs() < 1e-5);
        assert_eq!(control.intensity(), 10);
    }

    #[test]
    fn test_intensity_applies_to_lit_keys() {
        let channel = IntentChannel::<SIZE>::new();
        let config = BackdropConfig {
            intensity: 12,
            ..BackdropConfig::default()
        };
        let mut renderer = Renderer::new(channel.receiver(), &config);
        channel.try_send(key("60,100,0.0", 1000)).unwrap();
        renderer.render(Instant::from_millis(1000));
        assert_eq!(renderer.frame().led(led_index(60)).unwrap().0, 12);
    }
}
