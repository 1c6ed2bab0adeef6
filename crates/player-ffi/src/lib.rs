// Hosting bridge for the SimplePlayer playback controller
// Keeps controllers in a handle registry and exposes them to Java/Kotlin over JNI.

pub mod registry;

#[cfg(any(feature = "android", feature = "desktop"))]
mod jni_bridge;

pub use registry::{
    deliver_engine_event, event_code, phase_code, register_controller, release_controller,
    step_code, to_code, with_controller, with_controller_mut,
};

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize logging for the current platform. Safe to call repeatedly.
pub fn init_logging() {
    INIT_LOGGER.call_once(|| {
        #[cfg(target_os = "android")]
        {
            android_logger::init_once(
                android_logger::Config::default()
                    .with_max_level(log::LevelFilter::Debug)
                    .with_tag("SimplePlayer"),
            );
        }

        #[cfg(not(target_os = "android"))]
        {
            let _ = env_logger::builder()
                .is_test(cfg!(test))
                .filter_level(log::LevelFilter::Info)
                .try_init();
        }
    });
}
