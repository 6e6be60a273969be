//! Unit tests for the animation state machine: hand alternation, idle
//! decay, burst detection, and queued-input replay.
//!
//! These tests drive the machine entirely through its public API with
//! synthesized timestamps, so no real time passes and no terminal is
//! required.

use std::time::{Duration, Instant};

use typing_cat::animator::{
    opacity_at, phase_at, scale_at, Animator, BurstPhase, Pose, PositionEvent, Timer, Timings,
};

fn at(t0: Instant, ms: u64) -> Instant {
    t0 + Duration::from_millis(ms)
}

fn key(t0: Instant, ms: u64) -> PositionEvent {
    PositionEvent::new(10, 5, at(t0, ms))
}

/// Fire every due timer at `now`, returning how many fired.
fn drain_timers(animator: &mut Animator, now: Instant) -> usize {
    let mut fired = 0;
    while let Some(timer) = animator.poll_timer(now) {
        animator.on_timer(timer, now);
        fired += 1;
    }
    fired
}

/// Type `count` keystrokes 10ms apart starting at `t0`, then let the
/// settle timer fire. Returns the settle instant.
fn type_streak_and_settle(animator: &mut Animator, t0: Instant, count: u64) -> Instant {
    for i in 0..count {
        animator.on_keystroke(key(t0, i * 10));
    }
    let settle_at = at(t0, (count - 1) * 10 + 500);
    assert_eq!(animator.poll_timer(settle_at), Some(Timer::Settle));
    animator.on_timer(Timer::Settle, settle_at);
    settle_at
}

// ==================== Hand Alternation Tests ====================

#[test]
fn test_rapid_sequence_alternates_strictly_from_right() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());

    let mut expected = [Pose::Right, Pose::Left].iter().cycle();
    for i in 0..10u64 {
        animator.on_keystroke(key(t0, i * 100));
        assert_eq!(animator.state().pose, *expected.next().unwrap());
    }
    assert_eq!(animator.state().consecutive_count, 10);
}

#[test]
fn test_sequence_after_gap_restarts_with_right() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());

    animator.on_keystroke(key(t0, 0));
    animator.on_keystroke(key(t0, 100)); // Left

    // 500ms is NOT rapid (strictly-less-than comparison)
    animator.on_keystroke(key(t0, 600));
    assert_eq!(animator.state().pose, Pose::Right);
    assert_eq!(animator.state().consecutive_count, 1);
}

#[test]
fn test_gap_just_inside_window_counts_as_rapid() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());

    animator.on_keystroke(key(t0, 0));
    animator.on_keystroke(key(t0, 499));
    assert_eq!(animator.state().pose, Pose::Left);
    assert_eq!(animator.state().consecutive_count, 2);
}

#[test]
fn test_anchor_tracks_every_event() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());

    animator.on_keystroke(PositionEvent::new(3, 2, at(t0, 0)));
    assert_eq!(animator.state().anchor, (3, 2));
    animator.on_keystroke(PositionEvent::new(4, 2, at(t0, 100)));
    assert_eq!(animator.state().anchor, (4, 2));
}

// ==================== Idle Decay Tests ====================

#[test]
fn test_idle_sequence_settles_then_hides() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());

    animator.on_keystroke(key(t0, 0));
    animator.on_keystroke(key(t0, 100));
    animator.on_keystroke(key(t0, 200));
    assert_eq!(animator.state().pose, Pose::Left);
    assert_eq!(animator.state().consecutive_count, 3);

    // Settle fires 500ms after the last event
    assert_eq!(drain_timers(&mut animator, at(t0, 700)), 1);
    assert_eq!(animator.state().pose, Pose::Middle);
    assert_eq!(animator.state().consecutive_count, 0);

    // Hide fires 1000ms after the last event, independent of settle
    assert_eq!(drain_timers(&mut animator, at(t0, 1200)), 1);
    assert_eq!(animator.state().pose, Pose::Hidden);
}

#[test]
fn test_new_keystroke_supersedes_pending_idle_timers() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());

    animator.on_keystroke(key(t0, 0));
    animator.on_keystroke(key(t0, 400));

    // The deadlines from the first keystroke must not fire
    assert_eq!(animator.poll_timer(at(t0, 500)), None);
    assert_eq!(animator.poll_timer(at(t0, 899)), None);
    assert_eq!(animator.poll_timer(at(t0, 900)), Some(Timer::Settle));
}

#[test]
fn test_both_timers_fire_when_polled_late() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());

    animator.on_keystroke(key(t0, 0));
    // Poll far past both deadlines: settle first (earlier deadline),
    // then hide
    assert_eq!(animator.poll_timer(at(t0, 2000)), Some(Timer::Settle));
    assert_eq!(animator.poll_timer(at(t0, 2000)), Some(Timer::Hide));
    assert_eq!(animator.poll_timer(at(t0, 2000)), None);
}

// ==================== Burst Entry Tests ====================

#[test]
fn test_threshold_streak_enters_burst() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());
    type_streak_and_settle(&mut animator, t0, 20);

    assert_eq!(animator.state().pose, Pose::Burst);
    let burst = animator.state().burst.as_ref().expect("burst record");
    assert!((burst.scale - 1.0).abs() < f32::EPSILON);
    assert!((burst.opacity - 1.0).abs() < f32::EPSILON);
    assert!(burst.queued.is_empty());
}

#[test]
fn test_below_threshold_settles_to_middle() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());
    type_streak_and_settle(&mut animator, t0, 19);

    assert_eq!(animator.state().pose, Pose::Middle);
    assert!(animator.state().burst.is_none());
}

#[test]
fn test_burst_entry_cancels_hide_timer() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());
    let settle_at = type_streak_and_settle(&mut animator, t0, 20);

    // The only live deadline is the effect ticker, 25ms out
    assert_eq!(
        animator.next_deadline(),
        Some(settle_at + Duration::from_millis(25))
    );
}

#[test]
fn test_custom_threshold_is_honored() {
    let t0 = Instant::now();
    let timings = Timings {
        burst_threshold: 3,
        ..Timings::default()
    };
    let mut animator = Animator::new(timings);
    type_streak_and_settle(&mut animator, t0, 3);
    assert_eq!(animator.state().pose, Pose::Burst);
}

// ==================== Burst Timeline Tests ====================

#[test]
fn test_shake_phase_holds_scale_and_opacity() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());
    let start = type_streak_and_settle(&mut animator, t0, 20);

    for ms in (25..300).step_by(25) {
        animator.on_timer(Timer::EffectTick, start + Duration::from_millis(ms));
        let burst = animator.state().burst.as_ref().unwrap();
        assert!((burst.scale - 1.0).abs() < f32::EPSILON, "tick at {}ms", ms);
        assert!((burst.opacity - 1.0).abs() < f32::EPSILON, "tick at {}ms", ms);
    }
}

#[test]
fn test_grow_fade_is_monotonic_toward_bounds() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());
    let start = type_streak_and_settle(&mut animator, t0, 20);

    let mut prev_scale = 1.0f32;
    let mut prev_opacity = 1.0f32;
    for ms in (300..1500).step_by(25) {
        animator.on_timer(Timer::EffectTick, start + Duration::from_millis(ms));
        let burst = animator.state().burst.as_ref().unwrap();
        assert!(burst.scale >= prev_scale);
        assert!(burst.opacity <= prev_opacity);
        prev_scale = burst.scale;
        prev_opacity = burst.opacity;
    }
    // Just before completion the values approach the bounds
    assert!(prev_scale > 1.9);
    assert!(prev_opacity < 0.1);
}

#[test]
fn test_timeline_math_reaches_exact_bounds() {
    let timings = Timings::default();
    let end = timings.burst_duration();
    assert_eq!(phase_at(&timings, end), BurstPhase::Done);
    assert!((scale_at(&timings, end) - timings.max_scale).abs() < 1e-5);
    assert!(opacity_at(&timings, end).abs() < 1e-5);
}

// ==================== Queued Input Tests ====================

#[test]
fn test_mid_burst_keystrokes_queue_in_arrival_order() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());
    let start = type_streak_and_settle(&mut animator, t0, 20);

    let before = animator.next_deadline();
    animator.on_keystroke(PositionEvent::new(1, 1, start + Duration::from_millis(50)));
    animator.on_keystroke(PositionEvent::new(2, 1, start + Duration::from_millis(60)));
    animator.on_keystroke(PositionEvent::new(3, 1, start + Duration::from_millis(70)));

    // Pose, counter, and timers are untouched
    assert_eq!(animator.state().pose, Pose::Burst);
    assert_eq!(animator.state().consecutive_count, 0);
    assert_eq!(animator.next_deadline(), before);

    let burst = animator.state().burst.as_ref().unwrap();
    let positions: Vec<(u16, u16)> = burst.queued.iter().map(|e| e.position()).collect();
    assert_eq!(positions, vec![(1, 1), (2, 1), (3, 1)]);

    // Anchor tracks the latest queued event
    assert_eq!(animator.state().anchor, (3, 1));
}

#[test]
fn test_completion_with_queue_resumes_typing_sequence() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());
    let start = type_streak_and_settle(&mut animator, t0, 20);

    for i in 0..5u16 {
        animator.on_keystroke(PositionEvent::new(
            20 + i,
            9,
            start + Duration::from_millis(100 + i as u64 * 10),
        ));
    }

    let done_at = start + Duration::from_millis(1500);
    animator.on_timer(Timer::EffectTick, done_at);

    assert_eq!(animator.state().pose, Pose::Right);
    assert_eq!(animator.state().consecutive_count, 5);
    assert_eq!(animator.state().anchor, (24, 9));
    assert_eq!(animator.state().last_event_at, Some(done_at));
    assert!(animator.state().burst.is_none());

    // Idle timers re-armed from the completion instant
    assert_eq!(
        animator.next_deadline(),
        Some(done_at + Duration::from_millis(500))
    );
}

#[test]
fn test_completion_with_empty_queue_hides() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());
    let start = type_streak_and_settle(&mut animator, t0, 20);

    animator.on_timer(Timer::EffectTick, start + Duration::from_millis(1500));
    assert_eq!(animator.state().pose, Pose::Hidden);
    assert!(animator.state().burst.is_none());
    assert!(animator.next_deadline().is_none());
}

#[test]
fn test_resumed_sequence_can_reach_burst_again() {
    let t0 = Instant::now();
    let timings = Timings {
        burst_threshold: 3,
        ..Timings::default()
    };
    let mut animator = Animator::new(timings);
    let start = type_streak_and_settle(&mut animator, t0, 3);

    // Queue another threshold-sized streak during the effect
    for i in 0..3u64 {
        animator.on_keystroke(PositionEvent::new(
            5,
            5,
            start + Duration::from_millis(100 + i * 10),
        ));
    }
    let done_at = start + Duration::from_millis(1500);
    animator.on_timer(Timer::EffectTick, done_at);
    assert_eq!(animator.state().consecutive_count, 3);

    // Going idle settles the resumed streak into a second burst
    let settle_at = done_at + Duration::from_millis(500);
    assert_eq!(animator.poll_timer(settle_at), Some(Timer::Settle));
    animator.on_timer(Timer::Settle, settle_at);
    assert_eq!(animator.state().pose, Pose::Burst);
}

// ==================== Lifecycle Tests ====================

#[test]
fn test_shutdown_twice_is_safe() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());
    animator.on_keystroke(key(t0, 0));

    animator.shutdown();
    assert_eq!(animator.state().pose, Pose::Hidden);
    assert!(animator.next_deadline().is_none());

    animator.shutdown();
    assert!(animator.next_deadline().is_none());
}

#[test]
fn test_shutdown_mid_burst_drops_the_effect() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());
    type_streak_and_settle(&mut animator, t0, 20);

    animator.shutdown();
    assert!(animator.state().burst.is_none());
    assert_eq!(animator.state().pose, Pose::Hidden);
    assert!(animator.next_deadline().is_none());
}

// ==================== End-to-End Scenario ====================

#[test]
fn test_full_session_type_settle_hide() {
    let t0 = Instant::now();
    let mut animator = Animator::new(Timings::default());

    // Events at t=0, 100, 200, all rapid
    animator.on_keystroke(key(t0, 0));
    animator.on_keystroke(key(t0, 100));
    animator.on_keystroke(key(t0, 200));
    assert_eq!(animator.state().pose, Pose::Left);
    assert_eq!(animator.state().consecutive_count, 3);

    // No event until t=700: settle fires, streak below threshold
    assert_eq!(animator.poll_timer(at(t0, 700)), Some(Timer::Settle));
    animator.on_timer(Timer::Settle, at(t0, 700));
    assert_eq!(animator.state().pose, Pose::Middle);

    // No event until t=1200: hide fires
    assert_eq!(animator.poll_timer(at(t0, 1200)), Some(Timer::Hide));
    animator.on_timer(Timer::Hide, at(t0, 1200));
    assert_eq!(animator.state().pose, Pose::Hidden);
}
