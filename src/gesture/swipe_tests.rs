//! Tests for the swipe recognizer.

use super::*;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn pressed_at(x: f32, y: f32) -> SwipeRecognizer {
    let mut swipe = SwipeRecognizer::default();
    assert!(swipe.press(
        Point::new(x, y),
        PointerSource::Touch,
        PointerButton::Primary,
        ms(0)
    ));
    swipe
}

// ===== Threshold behaviour =====

#[test]
fn short_horizontal_drag_does_not_fire_and_resets() {
    let mut swipe = pressed_at(100.0, 100.0);
    swipe.on_move(Point::new(150.0, 102.0));
    assert!(swipe.state().is_swiping);

    assert_eq!(swipe.release(), None);
    assert_eq!(swipe.state(), SwipeState::neutral());
}

#[test]
fn right_swipe_past_threshold_fires_right_once() {
    let mut swipe = pressed_at(100.0, 100.0);
    swipe.on_move(Point::new(140.0, 100.0));
    swipe.on_move(Point::new(185.0, 101.0));

    assert_eq!(swipe.release(), Some(SwipeDirection::Right));
    assert_eq!(swipe.release(), None, "second release must not fire again");
    assert_eq!(swipe.state(), SwipeState::neutral());
}

#[test]
fn left_swipe_exactly_at_threshold_fires_left() {
    let mut swipe = pressed_at(200.0, 100.0);
    swipe.on_move(Point::new(120.0, 100.0));

    assert_eq!(swipe.state().distance, 80.0);
    assert_eq!(swipe.release(), Some(SwipeDirection::Left));
}

#[test]
fn direction_follows_final_sign_of_dx() {
    let mut swipe = pressed_at(100.0, 100.0);
    swipe.on_move(Point::new(200.0, 100.0));
    swipe.on_move(Point::new(0.0, 100.0));

    let state = swipe.state();
    assert_eq!(state.direction, Some(SwipeDirection::Left));
    assert_eq!(state.distance, 100.0);
    assert_eq!(swipe.release(), Some(SwipeDirection::Left));
}

// ===== Axis lock =====

#[test]
fn vertical_drag_never_swipes() {
    let mut swipe = pressed_at(100.0, 100.0);
    let suppress = swipe.on_move(Point::new(101.0, 130.0));
    assert!(!suppress, "vertical drags keep native scrolling");

    swipe.on_move(Point::new(400.0, 130.0));
    assert!(!swipe.state().is_swiping);
    assert_eq!(swipe.release(), None);
}

#[test]
fn horizontal_lock_suppresses_default_on_every_move() {
    let mut swipe = pressed_at(0.0, 0.0);
    assert!(!swipe.on_move(Point::new(3.0, 0.0)), "inside slop");
    assert!(swipe.on_move(Point::new(10.0, 2.0)));
    assert!(swipe.on_move(Point::new(10.0, 50.0)));
}

// ===== Mouse parity and cancel =====

#[test]
fn secondary_mouse_button_is_ignored() {
    let mut swipe = SwipeRecognizer::default();
    let started = swipe.press(
        Point::new(0.0, 0.0),
        PointerSource::Mouse,
        PointerButton::Secondary,
        ms(0),
    );
    assert!(!started);
    assert!(!swipe.is_active());
    assert!(!swipe.on_move(Point::new(200.0, 0.0)));
    assert_eq!(swipe.release(), None);
}

#[test]
fn primary_mouse_button_swipes_like_touch() {
    let mut swipe = SwipeRecognizer::default();
    swipe.press(
        Point::new(0.0, 0.0),
        PointerSource::Mouse,
        PointerButton::Primary,
        ms(0),
    );
    swipe.on_move(Point::new(90.0, 0.0));
    assert_eq!(swipe.release(), Some(SwipeDirection::Right));
}

#[test]
fn cancel_resets_without_firing_and_is_idempotent() {
    let mut swipe = pressed_at(0.0, 0.0);
    swipe.on_move(Point::new(150.0, 0.0));

    swipe.cancel();
    swipe.cancel();

    assert_eq!(swipe.state(), SwipeState::neutral());
    assert_eq!(swipe.release(), None, "stray release after cancel is a no-op");
}

// ===== Visual helpers =====

#[test]
fn offset_is_signed_and_clamped() {
    let state = SwipeState {
        direction: Some(SwipeDirection::Left),
        distance: 300.0,
        is_swiping: true,
    };
    assert_eq!(state.offset(MAX_SWIPE_OFFSET), -120.0);
    assert_eq!(SwipeState::neutral().offset(MAX_SWIPE_OFFSET), 0.0);
}

#[test]
fn progress_saturates_at_one() {
    let state = SwipeState {
        direction: Some(SwipeDirection::Right),
        distance: 40.0,
        is_swiping: true,
    };
    assert_eq!(state.progress(80.0), 0.5);

    let far = SwipeState {
        distance: 500.0,
        ..state
    };
    assert_eq!(far.progress(80.0), 1.0);
}
