// MediaEngine backed by a Java wrapper around the platform player

use super::java::JavaObject;
use jni::objects::{JObject, JValue};
use jni::JNIEnv;
use simpleplayer_core::{EngineNotifier, MediaEngine, PlaybackError, Result};

/// Drives the Java engine object. Its Java side reports back through
/// `nativeOnPrepared` / `nativeOnCompletion` / `nativeOnError`, passing the
/// generation it was given in `loadAsync`.
pub(crate) struct JniMediaEngine {
    java: JavaObject,
    released: bool,
}

impl JniMediaEngine {
    pub(crate) fn new(env: &JNIEnv, engine: &JObject) -> Result<Self> {
        log::info!("Wrapping Java media engine");
        Ok(Self {
            java: JavaObject::new(env, engine)?,
            released: false,
        })
    }

    fn engine_call(&self, name: &str, sig: &str, args: &[JValue]) -> Result<()> {
        if self.released {
            return Err(PlaybackError::Engine(format!("{} after release", name)));
        }
        self.java
            .call_void(name, sig, args)
            .map_err(|err| PlaybackError::Engine(err.to_string()))
    }
}

impl MediaEngine for JniMediaEngine {
    fn reset(&mut self) {
        if let Err(err) = self.engine_call("reset", "()V", &[]) {
            log::warn!("Engine reset failed: {}", err);
        }
    }

    fn release(&mut self) {
        if let Err(err) = self.engine_call("release", "()V", &[]) {
            log::warn!("Engine release failed: {}", err);
        }
        self.released = true;
    }

    fn load_async(&mut self, resource: &str, generation: u64) -> Result<()> {
        if self.released {
            return Err(PlaybackError::Engine("loadAsync after release".to_string()));
        }
        self.java
            .call_string_long("loadAsync", resource, generation as i64)
            .map_err(|err| PlaybackError::Engine(err.to_string()))
    }

    fn start(&mut self) -> Result<()> {
        self.engine_call("start", "()V", &[])
    }

    fn pause(&mut self) -> Result<()> {
        self.engine_call("pause", "()V", &[])
    }

    fn seek_to(&mut self, position_ms: u64) -> Result<()> {
        let position_ms = position_ms.min(i64::MAX as u64) as i64;
        self.engine_call("seekTo", "(J)V", &[JValue::Long(position_ms)])
    }

    fn is_playing(&self) -> bool {
        if self.released {
            return false;
        }
        self.java.call_bool("isPlaying").unwrap_or_else(|err| {
            log::warn!("isPlaying failed: {}", err);
            false
        })
    }

    fn current_position_ms(&self) -> u64 {
        if self.released {
            return 0;
        }
        match self.java.call_long("getCurrentPosition") {
            Ok(position) => position.max(0) as u64,
            Err(err) => {
                log::warn!("getCurrentPosition failed: {}", err);
                0
            }
        }
    }

    fn duration_ms(&self) -> u64 {
        if self.released {
            return 0;
        }
        match self.java.call_long("getDuration") {
            Ok(duration) => duration.max(0) as u64,
            Err(err) => {
                log::warn!("getDuration failed: {}", err);
                0
            }
        }
    }

    fn set_notifier(&mut self, _notifier: EngineNotifier) {
        // Reports arrive through the native callbacks, which look the
        // notifier up in the registry by controller handle
        log::debug!("Java engine reports through native callbacks");
    }
}
