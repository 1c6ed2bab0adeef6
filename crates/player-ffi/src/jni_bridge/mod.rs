// -------------------------------
// JNI bindings for Android/JVM
// -------------------------------
// Entry points for com.simpleplayer.playback.NativePlaybackController.

mod callbacks;
mod engine;
mod java;

use crate::registry::{
    deliver_engine_event, register_controller, release_controller, step_code, to_code,
    with_controller, with_controller_mut,
};
use callbacks::{JniCompletionHook, JniListener, JniSession};
use engine::JniMediaEngine;
use java::jni_error;
use jni::objects::{JClass, JLongArray, JObject, JObjectArray, JString};
use jni::sys::{jboolean, jint, jlong, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use simpleplayer_core::{
    ContentUriResolver, EngineEvent, PlaybackController, PlaybackError, Result, Track, TrackId,
    TransportCommand,
};
use std::sync::Arc;

fn jstring_to_string(env: &mut JNIEnv, jstr: &JString) -> Result<String> {
    let java_str = env.get_string(jstr).map_err(jni_error)?;
    Ok(java_str.into())
}

fn read_long_array(env: &JNIEnv, array: &JLongArray) -> Result<Vec<i64>> {
    if array.is_null() {
        return Ok(Vec::new());
    }
    let len = env.get_array_length(array).map_err(jni_error)?;
    let mut values = vec![0i64; len.max(0) as usize];
    env.get_long_array_region(array, 0, &mut values)
        .map_err(jni_error)?;
    Ok(values)
}

/// Read a `String[]` whose array or entries may be null
fn read_string_array(env: &mut JNIEnv, array: &JObjectArray) -> Result<Vec<Option<String>>> {
    if array.is_null() {
        return Ok(Vec::new());
    }
    let len = env.get_array_length(array).map_err(jni_error)?;
    let mut values = Vec::with_capacity(len.max(0) as usize);
    for i in 0..len {
        let element = env.get_object_array_element(array, i).map_err(jni_error)?;
        if element.is_null() {
            values.push(None);
            continue;
        }
        let jstr = JString::from(element);
        values.push(Some(jstring_to_string(env, &jstr)?));
        env.delete_local_ref(jstr).map_err(jni_error)?;
    }
    Ok(values)
}

fn create_controller(env: &mut JNIEnv, engine: &JObject, content_base: &JString) -> Result<i64> {
    if engine.is_null() {
        return Err(PlaybackError::InvalidState("Engine object is null".to_string()));
    }
    let resolver = if content_base.is_null() {
        ContentUriResolver::new()
    } else {
        ContentUriResolver::with_base(jstring_to_string(env, content_base)?)
    };
    let engine = JniMediaEngine::new(env, engine)?;
    let controller = PlaybackController::new(Box::new(engine), Box::new(resolver));
    Ok(register_controller(controller))
}

struct PlaylistColumns {
    ids: Vec<i64>,
    durations: Vec<i64>,
    titles: Vec<Option<String>>,
    artists: Vec<Option<String>>,
}

fn build_playlist(columns: PlaylistColumns) -> Vec<Track> {
    let PlaylistColumns {
        ids,
        durations,
        mut titles,
        mut artists,
    } = columns;
    ids.into_iter()
        .enumerate()
        .map(|(i, id)| {
            let mut track = Track::new(TrackId(id));
            if let Some(&duration) = durations.get(i) {
                if duration >= 0 {
                    track = track.with_duration_ms(duration as u64);
                }
            }
            if let Some(title) = titles.get_mut(i).and_then(Option::take) {
                track = track.with_title(title);
            }
            if let Some(artist) = artists.get_mut(i).and_then(Option::take) {
                track = track.with_artist(artist);
            }
            track
        })
        .collect()
}

fn read_playlist(
    env: &mut JNIEnv,
    ids: &JLongArray,
    durations: &JLongArray,
    titles: &JObjectArray,
    artists: &JObjectArray,
) -> Result<Vec<Track>> {
    let columns = PlaylistColumns {
        ids: read_long_array(env, ids)?,
        durations: read_long_array(env, durations)?,
        titles: read_string_array(env, titles)?,
        artists: read_string_array(env, artists)?,
    };
    Ok(build_playlist(columns))
}

fn to_jboolean(result: Result<bool>) -> jboolean {
    match result {
        Ok(true) => JNI_TRUE,
        Ok(false) => JNI_FALSE,
        Err(err) => {
            log::error!("FFI error: {}", err);
            JNI_FALSE
        }
    }
}

/// Create a controller around a Java engine object.
/// Returns the controller handle, or -1 on failure.
#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeCreate(
    mut env: JNIEnv,
    _class: JClass,
    engine: JObject,
    content_base: JString,
) -> jlong {
    crate::init_logging();
    match create_controller(&mut env, &engine, &content_base) {
        Ok(id) => id,
        Err(err) => {
            log::error!("Failed to create playback controller: {}", err);
            -1
        }
    }
}

/// Replace the playlist. `durations`, `titles` and `artists` are parallel to
/// `ids`; any of them may be null or shorter.
#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeSetPlaylist(
    mut env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
    ids: JLongArray,
    durations: JLongArray,
    titles: JObjectArray,
    artists: JObjectArray,
) -> jint {
    match read_playlist(&mut env, &ids, &durations, &titles, &artists) {
        Ok(tracks) => to_code(with_controller_mut(controller_id, |c| {
            c.set_playlist(tracks);
            Ok(())
        })) as jint,
        Err(err) => {
            log::error!("Failed to read playlist: {}", err);
            -1
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeSetCursor(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
    index: jint,
) -> jint {
    to_code(with_controller_mut(controller_id, |c| {
        let index = usize::try_from(index).map_err(|_| PlaybackError::InvalidCursor {
            index: usize::MAX,
            len: c.playlist().len(),
        })?;
        c.set_cursor(index)
    })) as jint
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativePlay(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
) -> jint {
    to_code(with_controller_mut(controller_id, |c| {
        c.play();
        Ok(())
    })) as jint
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativePause(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
) -> jint {
    to_code(with_controller_mut(controller_id, |c| {
        c.pause();
        Ok(())
    })) as jint
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeResume(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
) -> jint {
    to_code(with_controller_mut(controller_id, |c| {
        c.resume();
        Ok(())
    })) as jint
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeSeek(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
    position_ms: jlong,
) -> jint {
    to_code(with_controller_mut(controller_id, |c| {
        c.seek(position_ms.max(0) as u64);
        Ok(())
    })) as jint
}

/// 1 = advanced, 0 = already at the last track, -1 = error
#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeNext(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
) -> jint {
    step_code(with_controller_mut(controller_id, |c| Ok(c.next()))) as jint
}

/// 1 = moved back, 0 = first track restarted, -1 = error
#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativePrev(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
) -> jint {
    step_code(with_controller_mut(controller_id, |c| Ok(c.prev()))) as jint
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeSetAutoAdvance(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
    enabled: jboolean,
) -> jint {
    to_code(with_controller_mut(controller_id, |c| {
        c.set_auto_advance(enabled != JNI_FALSE);
        Ok(())
    })) as jint
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeIsPlaying(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
) -> jboolean {
    to_jboolean(with_controller(controller_id, |c| Ok(c.is_playing())))
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeIsStarted(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
) -> jboolean {
    to_jboolean(with_controller(controller_id, |c| Ok(c.is_started())))
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeGetPosition(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
) -> jlong {
    with_controller(controller_id, |c| Ok(c.current_position_ms()))
        .map(|pos| pos as jlong)
        .unwrap_or(-1)
}

/// Duration while playing; `Long.MAX_VALUE` when unset, -1 on error
#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeGetDuration(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
) -> jlong {
    with_controller(controller_id, |c| Ok(c.current_duration_ms()))
        .map(|dur| dur.min(i64::MAX as u64) as jlong)
        .unwrap_or(-1)
}

/// Selected index, -1 for an empty playlist or an unknown handle
#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeGetCursor(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
) -> jint {
    with_controller(controller_id, |c| Ok(c.cursor()))
        .ok()
        .flatten()
        .map(|index| index as jint)
        .unwrap_or(-1)
}

/// Pass null to go back to advancing directly
#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeSetCompletionHook(
    env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
    hook: JObject,
) -> jint {
    let result = if hook.is_null() {
        with_controller_mut(controller_id, |c| {
            c.clear_completion_hook();
            Ok(())
        })
    } else {
        JniCompletionHook::new(&env, &hook).and_then(|hook| {
            with_controller_mut(controller_id, |c| {
                c.set_completion_hook(Arc::new(hook));
                Ok(())
            })
        })
    };
    to_code(result) as jint
}

/// Replace the Java listener; null removes it
#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeSetListener(
    env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
    listener: JObject,
) -> jint {
    let listener = if listener.is_null() {
        Ok(None)
    } else {
        JniListener::new(&env, &listener).map(Some)
    };
    let result = listener.and_then(|listener| {
        with_controller_mut(controller_id, |c| {
            c.clear_listeners();
            if let Some(listener) = listener {
                c.add_listener(Arc::new(listener));
            }
            Ok(())
        })
    });
    to_code(result) as jint
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeAttachSession(
    env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
    session: JObject,
) -> jint {
    if session.is_null() {
        log::error!("attachSession called with null session");
        return -1;
    }
    let result = JniSession::new(&env, &session).and_then(|session| {
        with_controller_mut(controller_id, |c| c.attach_session(Box::new(session)))
    });
    to_code(result) as jint
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeDetachSession(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
) -> jint {
    to_code(with_controller_mut(controller_id, |c| c.detach_session())) as jint
}

/// Apply a transport command from the notification or media buttons.
/// Skip commands return their step code, others 0; -1 on error.
#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeHandleCommand(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
    code: jint,
    arg: jlong,
) -> jint {
    let Some(command) = TransportCommand::from_code(code, arg) else {
        log::error!("Unknown transport command {} ({})", code, arg);
        return -1;
    };
    match with_controller_mut(controller_id, |c| Ok(c.handle_command(command))) {
        Ok(Some(outcome)) => step_code(Ok(outcome)) as jint,
        Ok(None) => 0,
        Err(err) => {
            log::error!("FFI error: {}", err);
            -1
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeOnPrepared(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
    generation: jlong,
) -> jint {
    to_code(deliver_engine_event(
        controller_id,
        EngineEvent::Prepared {
            generation: generation as u64,
        },
    )) as jint
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeOnCompletion(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
    generation: jlong,
) -> jint {
    to_code(deliver_engine_event(
        controller_id,
        EngineEvent::Completed {
            generation: generation as u64,
        },
    )) as jint
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeOnError(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
    generation: jlong,
    what: jint,
    extra: jint,
) -> jint {
    to_code(deliver_engine_event(
        controller_id,
        EngineEvent::Error {
            generation: generation as u64,
            what,
            extra,
        },
    )) as jint
}

#[no_mangle]
pub extern "system" fn Java_com_simpleplayer_playback_NativePlaybackController_nativeRelease(
    _env: JNIEnv,
    _class: JClass,
    controller_id: jlong,
) -> jint {
    to_code(release_controller(controller_id)) as jint
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_playlist_with_metadata() {
        let tracks = build_playlist(PlaylistColumns {
            ids: vec![7, 8, 9],
            durations: vec![120_000, -1],
            titles: vec![Some("Intro".to_string()), None, Some("Outro".to_string())],
            artists: vec![Some("Band".to_string())],
        });

        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].id(), TrackId(7));
        assert_eq!(tracks[0].title(), Some("Intro"));
        assert_eq!(tracks[0].artist(), Some("Band"));
        assert_eq!(tracks[0].duration_ms(), Some(120_000));
        assert_eq!(tracks[1].title(), None);
        assert_eq!(tracks[1].duration_ms(), None);
        assert_eq!(tracks[2].title(), Some("Outro"));
        assert_eq!(tracks[2].artist(), None);
    }
}
