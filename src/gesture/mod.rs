//! Gesture recognition core.
//!
//! Pure state machines driven by [`PointerEvent`]s and an injected clock.
//! Nothing in here reads the wall clock or schedules work: callers feed
//! events as they arrive and call `tick(now)` often enough (every frame) for
//! timers to fire on time.

pub mod config;
pub mod drag;
pub mod list;
pub mod long_press;
pub mod pointer;
pub mod router;
pub mod swipe;
pub mod timer;

pub use config::{GestureConfig, DEFAULT_EXIT_DURATION};
pub use drag::{
    nearest_center_index, DragConfig, DragPhase, DragReorderController, DragState,
    ReorderCommit, ReorderHost, RowSlot,
};
pub use list::ListInteraction;
pub use long_press::{LongPressConfig, LongPressRecognizer, LongPressState};
pub use pointer::{
    AxisLock, PointerButton, PointerEvent, PointerInput, PointerSource, PointerTracker,
    TrackSample,
};
pub use router::{
    Activity, ExitKind, InteractionRouter, PointerSession, Region, RouteOutcome, RowEffect,
};
pub use swipe::{SwipeConfig, SwipeDirection, SwipeRecognizer, SwipeState};
pub use timer::Timer;
