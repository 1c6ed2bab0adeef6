// Controller handle registry shared by every native entry point

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use simpleplayer_core::{
    ControllerEvent, Edge, EngineEvent, EngineNotifier, PlaybackController, PlaybackError,
    PlaybackPhase, Result, StepOutcome,
};
use std::cell::Cell;
use std::collections::HashMap;

static CONTROLLER_REGISTRY: Lazy<Mutex<HashMap<i64, PlaybackController>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));
static NOTIFIER_REGISTRY: Lazy<Mutex<HashMap<i64, EngineNotifier>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));
static NEXT_CONTROLLER_ID: Lazy<Mutex<i64>> = Lazy::new(|| Mutex::new(1));

thread_local! {
    // Set while this thread holds the controller registry
    static IN_CONTROLLER: Cell<bool> = const { Cell::new(false) };
}

struct InControllerGuard;

impl InControllerGuard {
    fn enter() -> Self {
        IN_CONTROLLER.with(|flag| flag.set(true));
        InControllerGuard
    }
}

impl Drop for InControllerGuard {
    fn drop(&mut self) {
        IN_CONTROLLER.with(|flag| flag.set(false));
    }
}

fn reject_reentry(id: i64) -> Result<()> {
    if IN_CONTROLLER.with(|flag| flag.get()) {
        return Err(PlaybackError::InvalidState(format!(
            "Re-entrant call into controller {} from a callback",
            id
        )));
    }
    Ok(())
}

/// Store a controller and hand back its handle
pub fn register_controller(controller: PlaybackController) -> i64 {
    crate::init_logging();

    let mut next = NEXT_CONTROLLER_ID.lock();
    let id = *next;
    *next += 1;
    drop(next);

    NOTIFIER_REGISTRY.lock().insert(id, controller.notifier());
    CONTROLLER_REGISTRY.lock().insert(id, controller);
    log::info!("Playback controller registered with ID: {}", id);
    id
}

/// Run `f` against a controller. Engine reports still queued are applied
/// first, and reports that queue up during `f` are applied on the way out.
pub fn with_controller_mut<R>(
    id: i64,
    f: impl FnOnce(&mut PlaybackController) -> Result<R>,
) -> Result<R> {
    reject_reentry(id)?;
    let mut registry = CONTROLLER_REGISTRY.lock();
    let controller = registry
        .get_mut(&id)
        .ok_or_else(|| PlaybackError::InvalidState(format!("Invalid controller ID: {}", id)))?;

    let _guard = InControllerGuard::enter();
    controller.dispatch_pending();
    let result = f(controller);
    controller.dispatch_pending();
    result
}

pub fn with_controller<R>(id: i64, f: impl FnOnce(&PlaybackController) -> Result<R>) -> Result<R> {
    reject_reentry(id)?;
    let registry = CONTROLLER_REGISTRY.lock();
    let controller = registry
        .get(&id)
        .ok_or_else(|| PlaybackError::InvalidState(format!("Invalid controller ID: {}", id)))?;
    f(controller)
}

/// Queue an engine report for controller `id` and apply it, waiting for the
/// registry if another thread holds it. A report raised from inside a
/// controller call on this same thread stays queued; `with_controller_mut`
/// applies it on the way out.
pub fn deliver_engine_event(id: i64, event: EngineEvent) -> Result<()> {
    let notifier = NOTIFIER_REGISTRY
        .lock()
        .get(&id)
        .cloned()
        .ok_or_else(|| PlaybackError::InvalidState(format!("Invalid controller ID: {}", id)))?;
    notifier.notify(event);

    if IN_CONTROLLER.with(|flag| flag.get()) {
        log::debug!("Engine report for {} raised re-entrantly, left queued", id);
        return Ok(());
    }

    let mut registry = CONTROLLER_REGISTRY.lock();
    if let Some(controller) = registry.get_mut(&id) {
        let _guard = InControllerGuard::enter();
        controller.dispatch_pending();
    }
    Ok(())
}

/// Remove a controller from the registry and release it
pub fn release_controller(id: i64) -> Result<()> {
    reject_reentry(id)?;
    NOTIFIER_REGISTRY.lock().remove(&id);
    let controller = CONTROLLER_REGISTRY.lock().remove(&id);
    match controller {
        Some(mut controller) => {
            controller.release();
            log::info!("Playback controller {} released", id);
            Ok(())
        }
        None => Err(PlaybackError::InvalidState(format!(
            "Invalid controller ID: {}",
            id
        ))),
    }
}

pub fn to_code(result: Result<()>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => {
            log::error!("FFI error: {}", err);
            -1
        }
    }
}

/// 1 = moved, 0 = stayed at the playlist edge, -1 = error
pub fn step_code(result: Result<StepOutcome>) -> i32 {
    match result {
        Ok(StepOutcome::Moved) => 1,
        Ok(StepOutcome::Boundary) => 0,
        Err(err) => {
            log::error!("FFI error: {}", err);
            -1
        }
    }
}

pub fn phase_code(phase: PlaybackPhase) -> i32 {
    match phase {
        PlaybackPhase::Idle => 0,
        PlaybackPhase::Loading => 1,
        PlaybackPhase::Playing => 2,
        PlaybackPhase::Paused => 3,
        PlaybackPhase::Failed => 4,
    }
}

/// Flatten a controller event into the `(code, value)` pair listeners on
/// the Java side receive
pub fn event_code(event: &ControllerEvent) -> (i32, i64) {
    match event {
        ControllerEvent::PlaylistReplaced { len } => (0, *len as i64),
        ControllerEvent::TrackSelected { index } => (1, *index as i64),
        ControllerEvent::LoadRequested { index, .. } => (2, *index as i64),
        ControllerEvent::PlaybackStarted { index } => (3, *index as i64),
        ControllerEvent::PhaseChanged { new_phase, .. } => (4, phase_code(*new_phase) as i64),
        ControllerEvent::Boundary { edge } => (
            5,
            match edge {
                Edge::Start => 0,
                Edge::End => 1,
            },
        ),
        ControllerEvent::TrackFinished { index } => (6, *index as i64),
        ControllerEvent::ResolutionFailed { index, .. } => (7, *index as i64),
        ControllerEvent::EngineError { .. } => (8, 0),
    }
}
