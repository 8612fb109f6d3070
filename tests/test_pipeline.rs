//! Test the skeleton smoothing pipeline.

use na::Vector3;
use nalgebra as na;

use keypoint_estimate::config::{SmoothingConfig, LOW_PASS_MAX_ORDER};
use keypoint_estimate::error::FilterError;
use keypoint_estimate::pipeline::{ImageRotation, KeyPoint, KeypointSmoother, PoseSink, DEFAULT_JOINT_COUNT};
use keypoint_estimate::smoothing::{WarmUp, KALMAN_WARM_UP};

use approx::assert_relative_eq;

const DT: f32 = 1. / 30.;

fn frame(t: f32) -> Vec<KeyPoint> {
    (0..DEFAULT_JOINT_COUNT)
        .map(|j| {
            let offset = j as f32 * 0.1;
            KeyPoint::observed(j, Vector3::new(offset + 0.2 * t, 1. - offset, 0.5 + 0.1 * t), 0.9)
        })
        .collect()
}

fn disabled() -> SmoothingConfig {
    SmoothingConfig {
        kalman_enabled: false,
        low_pass_enabled: false,
        one_euro_enabled: false,
        ..SmoothingConfig::default()
    }
}

#[derive(Default)]
struct FrameCounter {
    frames: usize,
    last: Vec<KeyPoint>,
}

impl PoseSink for FrameCounter {
    fn consume(&mut self, keypoints: &[KeyPoint]) {
        self.frames += 1;
        self.last = keypoints.to_vec();
    }
}

#[test]
fn test_rotation() {
    let p = Vector3::new(1., 2., 3.);
    assert_eq!(ImageRotation::None.apply(&p), Vector3::new(-1., -2., 3.));
    assert_eq!(ImageRotation::CounterClockwise.apply(&p), Vector3::new(-2., 1., 3.));
    assert_eq!(ImageRotation::Clockwise.apply(&p), Vector3::new(2., -1., 3.));
    assert_eq!(ImageRotation::default(), ImageRotation::None);
}

#[test]
fn test_all_stages_disabled() {
    let mut smoother = KeypointSmoother::new(DEFAULT_JOINT_COUNT, disabled()).unwrap();
    smoother.set_rotation(ImageRotation::Clockwise);
    let mut keypoints = frame(0.);
    smoother.smooth_frame(&mut keypoints, DT).unwrap();
    for kp in keypoints.iter() {
        assert_eq!(kp.pos_3d, ImageRotation::Clockwise.apply(&kp.now_3d));
    }
}

#[test]
fn test_joint_count_mismatch() {
    let mut smoother = KeypointSmoother::new(DEFAULT_JOINT_COUNT, SmoothingConfig::default()).unwrap();
    let mut keypoints = frame(0.);
    keypoints.pop();
    assert_eq!(
        smoother.smooth_frame(&mut keypoints, DT),
        Err(FilterError::DimensionMismatch {
            expected: (DEFAULT_JOINT_COUNT, 1),
            actual: (DEFAULT_JOINT_COUNT - 1, 1)
        })
    );
    assert!(keypoints.iter().all(|kp| kp.pos_3d == Vector3::zeros()));
}

#[test]
fn test_kalman_stage() {
    let config = SmoothingConfig {
        kalman_enabled: true,
        ..disabled()
    };
    let mut smoother = KeypointSmoother::new(DEFAULT_JOINT_COUNT, config).unwrap();
    smoother.set_kalman_parameter(DT, 0.01).unwrap();

    for k in 0..KALMAN_WARM_UP {
        let mut keypoints = frame(k as f32 * DT);
        smoother.smooth_frame(&mut keypoints, DT).unwrap();
        for kp in keypoints.iter() {
            assert_eq!(kp.pos_3d, ImageRotation::None.apply(&kp.now_3d));
        }
    }
    for f in smoother.kalman_filters() {
        assert_eq!(f.warm_up(), WarmUp::Active);
    }

    let steps = 300;
    let mut keypoints = Vec::new();
    for k in KALMAN_WARM_UP as usize..steps {
        keypoints = frame(k as f32 * DT);
        smoother.smooth_frame(&mut keypoints, DT).unwrap();
    }
    let next = frame(steps as f32 * DT);
    for (kp, expected) in keypoints.iter().zip(next.iter()) {
        assert_relative_eq!(kp.pos_3d, ImageRotation::None.apply(&expected.now_3d), epsilon = 1e-3);
    }
}

#[test]
fn test_toggle_restarts_stage() {
    let mut smoother = KeypointSmoother::new(4, SmoothingConfig::default()).unwrap();
    let mut keypoints: Vec<KeyPoint> = frame(0.).into_iter().take(4).collect();
    for _ in 0..60 {
        smoother.smooth_frame(&mut keypoints, DT).unwrap();
    }
    assert_eq!(smoother.kalman_filters()[0].warm_up(), WarmUp::Active);
    assert_eq!(smoother.low_pass_filters()[0].warm_up(), WarmUp::Active);

    smoother.set_kalman_enabled(false).unwrap();
    smoother.set_kalman_enabled(true).unwrap();
    assert_eq!(smoother.kalman_filters()[0].warm_up(), WarmUp::WarmingUp { count: 0 });
    assert_eq!(smoother.kalman_filters()[0].position(), Vector3::zeros());

    // Setting the current value leaves the stage running
    smoother.set_low_pass_enabled(true);
    assert_eq!(smoother.low_pass_filters()[0].warm_up(), WarmUp::Active);
    smoother.set_low_pass_enabled(false);
    assert!(!smoother.config().low_pass_enabled);
    assert_eq!(smoother.low_pass_filters()[0].warm_up(), WarmUp::WarmingUp { count: 0 });

    smoother.set_one_euro_enabled(false);
    assert_eq!(*smoother.one_euro_filters()[0].value(), Vector3::zeros());
}

#[test]
fn test_parameters() {
    let mut smoother = KeypointSmoother::new(2, SmoothingConfig::default()).unwrap();
    assert_eq!(smoother.joint_count(), 2);

    smoother.set_low_pass_parameter(0, 0.3);
    assert_eq!(smoother.config().low_pass.order, 1);
    smoother.set_low_pass_parameter(40, 0.3);
    assert_eq!(smoother.config().low_pass.order, LOW_PASS_MAX_ORDER);
    assert!(smoother.low_pass_filters().iter().all(|f| f.order() == LOW_PASS_MAX_ORDER));

    smoother.set_one_euro_parameter(2., 0.1, 1.);
    assert_eq!(smoother.config().one_euro.min_cutoff, 2.);
    assert!(smoother.one_euro_filters().iter().all(|f| f.config().beta == 0.1));

    smoother.set_kalman_parameter(0.1, 0.2).unwrap();
    assert_eq!(smoother.config().kalman.time_interval, 0.1);
    assert!(smoother.kalman_filters().iter().all(|f| f.config().noise == 0.2));
}

#[test]
fn test_kalman_parameter_restarts_stage() {
    let mut smoother = KeypointSmoother::new(DEFAULT_JOINT_COUNT, SmoothingConfig::default()).unwrap();
    for k in 0..60 {
        let mut keypoints = frame(k as f32 * DT);
        smoother.smooth_frame(&mut keypoints, DT).unwrap();
    }
    assert_eq!(smoother.kalman_filters()[3].warm_up(), WarmUp::Active);
    assert_ne!(smoother.kalman_filters()[3].position(), Vector3::zeros());

    smoother.set_kalman_parameter(DT, 0.01).unwrap();
    for f in smoother.kalman_filters() {
        assert_eq!(f.warm_up(), WarmUp::WarmingUp { count: 0 });
        assert_eq!(f.position(), Vector3::zeros());
        assert_eq!(f.state().velocity, Vector3::zeros());
        assert_eq!(f.config().time_interval, DT);
    }

    // The first frames after the restart pass through the Kalman stage raw
    let config = SmoothingConfig {
        kalman_enabled: true,
        ..disabled()
    };
    let mut smoother = KeypointSmoother::new(DEFAULT_JOINT_COUNT, config).unwrap();
    for k in 0..60 {
        let mut keypoints = frame(k as f32 * DT);
        smoother.smooth_frame(&mut keypoints, DT).unwrap();
    }
    smoother.set_kalman_parameter(2. * DT, 0.02).unwrap();
    let mut keypoints = frame(60. * DT);
    smoother.smooth_frame(&mut keypoints, DT).unwrap();
    for kp in keypoints.iter() {
        assert_eq!(kp.pos_3d, ImageRotation::None.apply(&kp.now_3d));
    }
}

#[test]
fn test_kalman_parameter_rejected() {
    let mut smoother = KeypointSmoother::new(2, SmoothingConfig::default()).unwrap();
    let mut keypoints: Vec<KeyPoint> = frame(0.).into_iter().take(2).collect();
    for _ in 0..5 {
        smoother.smooth_frame(&mut keypoints, DT).unwrap();
    }
    let position = smoother.kalman_filters()[1].position();

    assert_eq!(smoother.set_kalman_parameter(DT, f32::NAN), Err(FilterError::Singular));
    assert_eq!(smoother.config().kalman, SmoothingConfig::default().kalman);
    assert_eq!(smoother.kalman_filters()[1].position(), position);
    assert_eq!(smoother.kalman_filters()[1].warm_up(), WarmUp::WarmingUp { count: 5 });
}

#[test]
fn test_sink() {
    let mut smoother = KeypointSmoother::new(DEFAULT_JOINT_COUNT, SmoothingConfig::default()).unwrap();
    let mut sink = FrameCounter::default();
    for k in 0..3 {
        let mut keypoints = frame(k as f32 * DT);
        smoother.smooth_frame_into(&mut keypoints, DT, &mut sink).unwrap();
    }
    assert_eq!(sink.frames, 3);
    assert_eq!(sink.last.len(), DEFAULT_JOINT_COUNT);
    assert_eq!(sink.last[5].index, 5);
    assert_eq!(sink.last[5].score_3d, 0.9);
}
