use motion_pattern::config::{ClassifierConfig, EstimatorConfig, FilterConfig};
use motion_pattern::{DetectorWorker, MotionConfig, MotionError, PatternEvent, PatternType, synthetic};

fn config() -> MotionConfig {
    MotionConfig {
        estimator: EstimatorConfig {
            search_radius: 6,
            window_size: 32,
            sample_step: 1,
        },
        filter: FilterConfig {
            capacity: 5,
            average_frames: 1,
        },
        classifier: ClassifierConfig {
            threshold: 12.0,
            window: 10,
            pairing_window: 10,
        },
        ..MotionConfig::default()
    }
}

#[tokio::test]
async fn nod_and_shake_arrive_in_order() {
    let frames =
        synthetic::session(64, 64, &[PatternType::Nod, PatternType::Shake], 4, 3, 5).unwrap();
    assert_eq!(frames.len(), 23);

    let (worker, mut events) = DetectorWorker::spawn(&config()).unwrap();
    for frame in frames {
        worker.submit(frame).await.unwrap();
    }
    let summary = worker.shutdown().await.unwrap();

    let mut received = Vec::new();
    while let Some(event) = events.recv().await {
        received.push(event);
    }
    assert_eq!(
        received,
        vec![
            PatternEvent {
                frame_index: 7,
                pattern: PatternType::Nod
            },
            PatternEvent {
                frame_index: 18,
                pattern: PatternType::Shake
            },
        ]
    );
    assert_eq!(summary.frames_received, 23);
    assert_eq!(summary.frames_estimated, 22);
    assert_eq!(summary.pairs_dropped, 0);
    assert_eq!(summary.patterns_detected, 2);
}

#[tokio::test]
async fn single_swipes_are_not_reported() {
    let frames = synthetic::session(64, 64, &[PatternType::Up], 4, 3, 12).unwrap();
    let (worker, mut events) = DetectorWorker::spawn(&config()).unwrap();
    for frame in frames {
        worker.submit(frame).await.unwrap();
    }
    let summary = worker.shutdown().await.unwrap();
    assert!(events.recv().await.is_none());
    assert_eq!(summary.patterns_detected, 0);
}

#[tokio::test]
async fn size_change_drops_one_pair() {
    let (worker, _events) = DetectorWorker::spawn(&config()).unwrap();
    worker.submit(synthetic::shifted_frame(64, 64, 0, 0).unwrap()).await.unwrap();
    worker.submit(synthetic::shifted_frame(64, 64, 1, 0).unwrap()).await.unwrap();
    worker.submit(synthetic::shifted_frame(40, 40, 0, 0).unwrap()).await.unwrap();
    worker.submit(synthetic::shifted_frame(40, 40, 2, 0).unwrap()).await.unwrap();
    let summary = worker.shutdown().await.unwrap();

    assert_eq!(summary.frames_received, 4);
    assert_eq!(summary.frames_estimated, 2);
    assert_eq!(summary.pairs_dropped, 1);
}

#[tokio::test]
async fn gap_reprimes_without_losing_the_first_leg() {
    let (worker, mut events) = DetectorWorker::spawn(&config()).unwrap();
    for frame in synthetic::render(64, 64, &[(0, -4), (0, -8), (0, -12)]).unwrap() {
        worker.submit(frame).await.unwrap();
    }
    worker.capture_gap().await.unwrap();
    for dy in [-12, -8, -4, 0] {
        worker
            .submit(synthetic::shifted_frame(64, 64, 0, dy).unwrap())
            .await
            .unwrap();
    }
    let summary = worker.shutdown().await.unwrap();

    let event = events.recv().await.unwrap();
    assert_eq!(event.pattern, PatternType::Nod);
    assert_eq!(event.frame_index, 8);
    assert_eq!(summary.frames_estimated, 6);
}

#[tokio::test]
async fn reset_forgets_the_pending_leg() {
    let (worker, mut events) = DetectorWorker::spawn(&config()).unwrap();
    for frame in synthetic::render(64, 64, &[(4, 0), (8, 0), (12, 0)]).unwrap() {
        worker.submit(frame).await.unwrap();
    }
    worker.reset().await.unwrap();
    for dx in [12, 8, 4, 0] {
        worker
            .submit(synthetic::shifted_frame(64, 64, dx, 0).unwrap())
            .await
            .unwrap();
    }
    worker.shutdown().await.unwrap();
    assert!(events.recv().await.is_none());
}

#[tokio::test]
async fn try_submit_reports_a_full_queue() {
    let mut config = config();
    config.capture.queue_depth = 1;
    let (worker, _events) = DetectorWorker::spawn(&config).unwrap();

    // The actor may or may not have drained the first frame yet, but a queue of one
    // cannot absorb a burst of ten.
    let mut accepted = 0;
    for i in 0..10 {
        if worker
            .try_submit(synthetic::shifted_frame(64, 64, i, 0).unwrap())
            .unwrap()
        {
            accepted += 1;
        }
    }
    assert!(accepted >= 1);
    assert!(accepted < 10);

    let summary = worker.shutdown().await.unwrap();
    assert_eq!(summary.frames_received, accepted);
}

#[tokio::test]
async fn invalid_config_does_not_spawn() {
    let mut config = config();
    config.filter.average_frames = 0;
    assert!(matches!(
        DetectorWorker::spawn(&config),
        Err(MotionError::Config { .. })
    ));
}
