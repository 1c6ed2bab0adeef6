// Calls from native code into a Java object held by the bridge

use jni::objects::{GlobalRef, JObject, JValue};
use jni::{JNIEnv, JavaVM};
use simpleplayer_core::{PlaybackError, Result};

pub(crate) fn jni_error(err: jni::errors::Error) -> PlaybackError {
    PlaybackError::Other(format!("JNI error: {}", err))
}

/// Global reference to a Java object plus the VM needed to reach it from
/// whichever thread the controller runs on
pub(crate) struct JavaObject {
    vm: JavaVM,
    target: GlobalRef,
}

impl JavaObject {
    pub(crate) fn new(env: &JNIEnv, object: &JObject) -> Result<Self> {
        Ok(Self {
            vm: env.get_java_vm().map_err(jni_error)?,
            target: env.new_global_ref(object).map_err(jni_error)?,
        })
    }

    /// Run `f` with an attached env. A pending Java exception is logged and
    /// cleared so it cannot leak into the next call.
    fn with_env<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut JNIEnv, &GlobalRef) -> jni::errors::Result<R>,
    ) -> Result<R> {
        // Threads that are already attached (JNI entry points) stay attached
        let mut env = self.vm.attach_current_thread().map_err(jni_error)?;
        match f(&mut *env, &self.target) {
            Ok(value) => Ok(value),
            Err(err) => {
                if env.exception_check().unwrap_or(false) {
                    let _ = env.exception_describe();
                    let _ = env.exception_clear();
                }
                Err(PlaybackError::Other(format!(
                    "Java call {} failed: {}",
                    name, err
                )))
            }
        }
    }

    pub(crate) fn call_void(&self, name: &str, sig: &str, args: &[JValue]) -> Result<()> {
        self.with_env(name, |env, target| {
            env.call_method(target, name, sig, args).map(|_| ())
        })
    }

    pub(crate) fn call_bool(&self, name: &str) -> Result<bool> {
        self.with_env(name, |env, target| env.call_method(target, name, "()Z", &[])?.z())
    }

    pub(crate) fn call_long(&self, name: &str) -> Result<i64> {
        self.with_env(name, |env, target| env.call_method(target, name, "()J", &[])?.j())
    }

    /// Call a `(String, long) -> void` method
    pub(crate) fn call_string_long(&self, name: &str, text: &str, value: i64) -> Result<()> {
        self.with_env(name, |env, target| {
            let jstr = env.new_string(text)?;
            env.call_method(
                target,
                name,
                "(Ljava/lang/String;J)V",
                &[JValue::Object(&jstr), JValue::Long(value)],
            )
            .map(|_| ())
        })
    }
}
