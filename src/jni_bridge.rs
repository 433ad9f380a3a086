//! JNI exports for `com.blade.testoboe.MainActivity`.
//!
//! Each export decodes its arguments, calls the installed [`RecorderBridge`]
//! and turns the `Result` into a JNI value. `false` from `startRecording` /
//! `stopRecording` always means a real failure; the activity can fetch the
//! reason with `lastRecorderErrorCode()` / `lastRecorderErrorMessage()`.

use jni::objects::{JObject, JString};
use jni::sys::{jboolean, jint, jstring, JNI_FALSE, JNI_TRUE};
use jni::{JNIEnv, JavaVM};
use once_cell::sync::OnceCell;

use crate::bridge::{status_code, RecorderBridge};
use crate::error::{log_recorder_error, ErrorCode, RecorderError};

/// Bridge built by `JNI_OnLoad`; the exports only ever borrow it.
static BRIDGE: OnceCell<RecorderBridge> = OnceCell::new();

/// Install the bridge the exports forward to. Only the first call wins.
pub fn install_bridge(bridge: RecorderBridge) -> Result<(), RecorderError> {
    BRIDGE.set(bridge).map_err(|_| RecorderError::JniInitFailed {
        reason: "recorder bridge already installed".to_string(),
    })
}

fn bridge() -> Result<&'static RecorderBridge, RecorderError> {
    BRIDGE.get().ok_or(RecorderError::BridgeNotInstalled)
}

/// Hand the application context to ndk-context so oboe's Java interface works
///
/// The global reference is intentionally leaked: ndk-context expects the
/// context to stay valid for the life of the process.
pub fn init_android_context(vm: &JavaVM) -> Result<(), RecorderError> {
    let mut env = vm.get_env().map_err(|e| RecorderError::JniInitFailed {
        reason: format!("get_env: {}", e),
    })?;

    let application = env
        .call_static_method(
            "android/app/ActivityThread",
            "currentApplication",
            "()Landroid/app/Application;",
            &[],
        )
        .and_then(|value| value.l())
        .map_err(|e| RecorderError::JniInitFailed {
            reason: format!("currentApplication: {}", e),
        })?;
    if application.is_null() {
        return Err(RecorderError::ContextNotInitialized);
    }

    let context = env
        .new_global_ref(&application)
        .map_err(|e| RecorderError::JniInitFailed {
            reason: format!("new_global_ref: {}", e),
        })?;

    // SAFETY: the VM pointer comes from the runtime that loaded us and the
    // context is a global reference that is never released.
    unsafe {
        ndk_context::initialize_android_context(
            vm.get_java_vm_pointer().cast(),
            context.as_obj().as_raw().cast(),
        );
    }
    std::mem::forget(context);
    Ok(())
}

fn to_jboolean<T>(result: &Result<T, RecorderError>) -> jboolean {
    if result.is_ok() {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

fn new_java_string(env: &mut JNIEnv, text: &str) -> jstring {
    match env.new_string(text) {
        Ok(string) => string.into_raw(),
        Err(e) => {
            log::error!("Failed to create Java string: {}", e);
            JObject::null().into_raw()
        }
    }
}

fn decode_path(env: &mut JNIEnv, path: &JString) -> Result<String, RecorderError> {
    env.get_string(path)
        .map(String::from)
        .map_err(|e| RecorderError::InvalidPath {
            reason: format!("could not decode Java string: {}", e),
        })
}

#[no_mangle]
pub extern "system" fn Java_com_blade_testoboe_MainActivity_stringFromJNI<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    let text = bridge()
        .map(RecorderBridge::identify)
        .unwrap_or(crate::bridge::IDENTIFICATION);
    new_java_string(&mut env, text)
}

#[no_mangle]
pub extern "system" fn Java_com_blade_testoboe_MainActivity_startRecording<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    full_path_to_file: JString<'local>,
    recording_frequency: jint,
    input_preset: jint,
    performance_mode: jint,
) -> jboolean {
    let result = bridge().and_then(|bridge| match decode_path(&mut env, &full_path_to_file) {
        Ok(path) => {
            bridge.start_recording_with(&path, recording_frequency, input_preset, performance_mode)
        }
        Err(err) => bridge.reject_start(err),
    });

    if let Err(RecorderError::BridgeNotInstalled) = &result {
        log_recorder_error(&RecorderError::BridgeNotInstalled, "startRecording");
    }
    to_jboolean(&result)
}

#[no_mangle]
pub extern "system" fn Java_com_blade_testoboe_MainActivity_stopRecording<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jboolean {
    let result = bridge().and_then(RecorderBridge::stop_recording);

    if let Err(RecorderError::BridgeNotInstalled) = &result {
        log_recorder_error(&RecorderError::BridgeNotInstalled, "stopRecording");
    }
    to_jboolean(&result)
}

#[no_mangle]
pub extern "system" fn Java_com_blade_testoboe_MainActivity_lastRecorderErrorCode<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jint {
    match bridge() {
        Ok(bridge) => bridge.last_error().map(|err| err.code()).unwrap_or(0),
        Err(err) => status_code::<()>(&Err(err)),
    }
}

#[no_mangle]
pub extern "system" fn Java_com_blade_testoboe_MainActivity_lastRecorderErrorMessage<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    let last = match bridge() {
        Ok(bridge) => bridge.last_error(),
        Err(err) => Some(err),
    };
    match last {
        Some(err) => new_java_string(&mut env, &err.message()),
        None => JObject::null().into_raw(),
    }
}
