mod tests {
    use std::net::UdpSocket;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant as StdInstant};

    use piano_backdrop::{Instant, Intent, IntentChannel, UdpIngestor};

    const SIZE: usize = 8;

    #[test]
    fn test_handle_datagram() {
        let channel = IntentChannel::<SIZE>::new();
        let ingestor = UdpIngestor::bind("127.0.0.1:0", channel.sender()).unwrap();

        assert!(ingestor.handle_datagram(b"60,80,0.5", Instant::from_millis(7)));
        assert!(!ingestor.handle_datagram(b"200,80", Instant::from_millis(8)));
        assert!(!ingestor.handle_datagram(b"1,2,3,4", Instant::from_millis(9)));
        assert!(!ingestor.handle_datagram(b"garbage", Instant::from_millis(10)));

        let mut pending = channel.take_pending();
        assert_eq!(pending.len(), 1);
        let Some(Intent::Key(event)) = pending.pop_front() else {
            panic!("expected a key intent");
        };
        assert_eq!((event.note, event.velocity), (60, 80));
        assert_eq!(event.hue, Some(0.5));
        assert_eq!(event.at, Instant::from_millis(7));
    }

    #[test]
    fn test_full_queue_drops_events() {
        let channel = IntentChannel::<2>::new();
        let ingestor = UdpIngestor::bind("127.0.0.1:0", channel.sender()).unwrap();
        let at = Instant::from_millis(0);
        assert!(ingestor.handle_datagram(b"1,1", at));
        assert!(ingestor.handle_datagram(b"2,1", at));
        assert!(!ingestor.handle_datagram(b"3,1", at));
        assert_eq!(channel.take_dropped(), 1);
    }

    #[test]
    fn test_receives_over_loopback() {
        let channel = IntentChannel::<SIZE>::new();
        let ingestor = UdpIngestor::bind("127.0.0.1:0", channel.sender()).unwrap();
        let addr = ingestor.local_addr().unwrap();
        let shutdown = AtomicBool::new(false);

        std::thread::scope(|scope| {
            let listener = scope.spawn(|| ingestor.run(&shutdown));

            let client = UdpSocket::bind("127.0.0.1:0").unwrap();
            let deadline = StdInstant::now() + Duration::from_secs(5);
            while channel.is_empty() && StdInstant::now() < deadline {
                client.send_to(b"64,100", addr).unwrap();
                std::thread::sleep(Duration::from_millis(20));
            }

            shutdown.store(true, Ordering::Release);
            listener.join().unwrap().unwrap();
        });

        let mut pending = channel.take_pending();
        let Some(Intent::Key(event)) = pending.pop_front() else {
            panic!("no key event received");
        };
        assert_eq!((event.note, event.velocity, event.hue), (64, 100, None));
    }
}
