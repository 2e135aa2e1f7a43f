//! End-to-end rounds on the bundled physics world

use glam::Vec2;
use plinko_sim::Settings;
use plinko_sim::consts::SIM_DT;
use plinko_sim::sim::{BasicWorld, PhysicsWorld, RoundController, RoundOutcome, RoundPhase};

/// Frames allowed per round: watchdog (60 s) plus close delay plus slack
const FRAME_LIMIT: u32 = 70 * 60;

fn play(controller: &mut RoundController<BasicWorld>) -> (Vec<RoundOutcome>, u32) {
    let mut decided = Vec::new();
    let mut frames = 0;
    while controller.state().phase != RoundPhase::Idle && frames < FRAME_LIMIT {
        if let Some(outcome) = controller.update(SIM_DT) {
            decided.push(outcome);
        }
        frames += 1;
    }
    (decided, frames)
}

#[test]
fn test_round_reaches_exactly_one_outcome() {
    let mut controller = RoundController::basic(Settings::default(), 2024).unwrap();
    controller.start_round().unwrap();
    let (decided, frames) = play(&mut controller);

    assert_eq!(controller.state().phase, RoundPhase::Idle, "stuck after {} frames", frames);
    assert_eq!(decided.len(), 1);
    assert_eq!(controller.state().result, Some(decided[0]));
    assert_eq!(controller.world().body_count(), 0);

    if let RoundOutcome::Landed { slot, multiplier } = decided[0] {
        assert_eq!(controller.scores().score(slot), Some(multiplier));
    }
}

#[test]
fn test_same_seed_same_result() {
    let mut a = RoundController::basic(Settings::default(), 77).unwrap();
    let mut b = RoundController::basic(Settings::default(), 77).unwrap();
    a.start_round().unwrap();
    b.start_round().unwrap();
    let (da, _) = play(&mut a);
    let (db, _) = play(&mut b);
    assert_eq!(da, db);
}

#[test]
fn test_consecutive_rounds_reuse_world() {
    let mut controller = RoundController::basic(Settings::default(), 5).unwrap();
    for round in 1..=3 {
        controller.start_round().unwrap();
        assert_eq!(controller.state().round, round);
        let (decided, _) = play(&mut controller);
        assert_eq!(decided.len(), 1);
        assert_eq!(controller.world().body_count(), 0);
    }
}

#[test]
fn test_ball_without_bases_falls_out() {
    let mut controller = RoundController::basic(Settings::default(), 11)
        .unwrap()
        .with_templates(Vec::new());
    controller.start_round().unwrap();
    let (decided, _) = play(&mut controller);
    // Nothing to land on: the ball either leaves the field or gets stuck on a peg
    assert!(matches!(
        decided.as_slice(),
        [RoundOutcome::OutOfBounds] | [RoundOutcome::Stalled]
    ));
    assert_eq!(controller.state().score(), Some(-1.0));
}

#[test]
fn test_ball_spawns_in_jitter_band() {
    let mut controller = RoundController::basic(Settings::default(), 9).unwrap();
    controller.start_round().unwrap();
    let spawn = controller.scene().unwrap().ball_spawn;
    assert!(spawn.x >= 1050.0 / 2.1 - 1e-3 && spawn.x <= 1050.0 / 1.9 + 1e-3);
    assert_eq!(spawn.y, -20.0);

    // The ball moves down once stepping starts
    controller.update(SIM_DT);
    let motion = controller.ball_motion().unwrap();
    assert!(motion.position.y > spawn.y);
}

#[test]
fn test_label_anchors_follow_viewport() {
    let controller = RoundController::basic(Settings::default(), 1).unwrap();
    let a = controller.label_anchors(Vec2::ZERO);
    let b = controller.label_anchors(Vec2::new(40.0, 15.0));
    for (a, b) in a.iter().zip(&b) {
        assert_eq!(a.slot_index, b.slot_index);
        assert!((b.screen_x - a.screen_x - 40.0).abs() < 1e-3);
        assert!((b.screen_y - a.screen_y - 15.0).abs() < 1e-3);
    }
}

#[test]
fn test_custom_board_from_json() {
    let settings = Settings::from_json(
        r#"{ "rows": 8, "slot_count": 9, "scores": [20, 5, 2, 1, 0.5, 1, 2, 5, 20] }"#,
    )
    .unwrap();
    let mut controller = RoundController::basic(settings, 3).unwrap();
    controller.start_round().unwrap();
    assert_eq!(controller.layout().unwrap().pegs.len(), (0..8).map(|i| 3 + i).sum::<usize>());
    let (decided, _) = play(&mut controller);
    assert_eq!(decided.len(), 1);
}

#[test]
fn test_round_survives_bad_frame_time() {
    let mut controller = RoundController::basic(Settings::default(), 2024).unwrap();
    controller.start_round().unwrap();
    let spawn_y = controller.ball_motion().unwrap().position.y;
    controller.update(f32::NAN);
    for _ in 0..10 {
        controller.update(SIM_DT);
    }
    assert!(controller.ball_motion().unwrap().position.y > spawn_y);

    let (decided, _) = play(&mut controller);
    assert_eq!(decided.len(), 1);
    assert_eq!(controller.state().phase, RoundPhase::Idle);
}
