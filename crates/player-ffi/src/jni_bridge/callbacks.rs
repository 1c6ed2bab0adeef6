// Java-side hook, session and listener adapters

use super::java::JavaObject;
use crate::registry::event_code;
use jni::objects::{JObject, JValue};
use jni::JNIEnv;
use simpleplayer_core::{
    CompletionHook, ControllerEvent, ControllerListener, MediaSession, PlaybackController, Result,
};

/// Lets the UI refresh its track display before auto-advance moves on.
/// `onBeforeAdvance` must not call back into the controller.
pub(crate) struct JniCompletionHook {
    java: JavaObject,
}

impl JniCompletionHook {
    pub(crate) fn new(env: &JNIEnv, hook: &JObject) -> Result<Self> {
        Ok(Self {
            java: JavaObject::new(env, hook)?,
        })
    }
}

impl CompletionHook for JniCompletionHook {
    fn on_track_finished(&self, controller: &mut PlaybackController) {
        let from = controller.cursor().map(|index| index as i32).unwrap_or(-1);
        if let Err(err) = self
            .java
            .call_void("onBeforeAdvance", "(I)V", &[JValue::Int(from)])
        {
            log::warn!("Completion hook failed: {}", err);
        }
        let outcome = controller.next();
        log::debug!("Auto-advance through hook: {:?}", outcome);
    }
}

/// Media session and notification owned by the Java service
pub(crate) struct JniSession {
    java: JavaObject,
}

impl JniSession {
    pub(crate) fn new(env: &JNIEnv, session: &JObject) -> Result<Self> {
        Ok(Self {
            java: JavaObject::new(env, session)?,
        })
    }
}

impl MediaSession for JniSession {
    fn attach(&mut self) -> Result<()> {
        self.java.call_void("initSession", "()V", &[])
    }

    fn detach(&mut self) {
        if let Err(err) = self.java.call_void("releaseSession", "()V", &[]) {
            log::warn!("Session release failed: {}", err);
        }
    }
}

/// Forwards controller events as `onPlaybackEvent(int code, long value)`
pub(crate) struct JniListener {
    java: JavaObject,
}

impl JniListener {
    pub(crate) fn new(env: &JNIEnv, listener: &JObject) -> Result<Self> {
        Ok(Self {
            java: JavaObject::new(env, listener)?,
        })
    }
}

impl ControllerListener for JniListener {
    fn on_event(&self, event: &ControllerEvent) {
        let (code, value) = event_code(event);
        if let Err(err) = self.java.call_void(
            "onPlaybackEvent",
            "(IJ)V",
            &[JValue::Int(code), JValue::Long(value)],
        ) {
            log::warn!("Listener callback failed: {}", err);
        }
    }
}
