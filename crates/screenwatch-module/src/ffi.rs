// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JNI exports for the Android host.
//
// The Java glue declares these as static natives on
// `com.screenwatch.ScreenwatchModule`. Structured results cross the
// boundary as JSON strings; failures serialise as `{"error": "..."}` so the
// Java side never has to deal with a thrown exception from native code.

#![cfg(target_os = "android")]

use std::sync::{Arc, Mutex, OnceLock};

use android_logger::Config;
use jni::objects::{GlobalRef, JClass, JObject, JString, JValue};
use jni::sys::{JNI_FALSE, JNI_TRUE, jboolean, jint, jstring};
use jni::{JNIEnv, JavaVM};
use log::LevelFilter;

use screenwatch_core::error::{Result, ScreenwatchError};
use screenwatch_core::types::{DisplayEvent, StatusPayload, VideoStoreChange};

use crate::events::EventSink;
use crate::module::ScreenStatusModule;

/// Process-wide module instance, installed by `nativeInit`.
static MODULE: OnceLock<ScreenStatusModule> = OnceLock::new();

/// Current host event emitter. Refreshed on every `nativeInit` so a
/// recreated host context keeps receiving events.
static EMITTER: Mutex<Option<GlobalRef>> = Mutex::new(None);

/// Guards the one-time `ndk_context` installation.
static CONTEXT_READY: OnceLock<()> = OnceLock::new();

fn module() -> Result<&'static ScreenStatusModule> {
    MODULE.get().ok_or_else(|| {
        ScreenwatchError::Bridge("module not initialised, call nativeInit first".into())
    })
}

// ---------------------------------------------------------------------------
// Event sink over the host emitter
// ---------------------------------------------------------------------------

/// Sink that forwards events to the Java emitter object.
///
/// The emitter contract is `void emit(String eventName, String payloadJson)`.
/// Emission happens on platform notification threads, so the thread is
/// attached on demand and every failure is logged rather than propagated.
struct JniEmitterSink {
    vm: JavaVM,
}

impl JniEmitterSink {
    fn emit_inner(&self, event: &str, payload: &StatusPayload) -> Result<()> {
        let emitter = EMITTER
            .lock()
            .expect("emitter slot poisoned")
            .clone()
            .ok_or_else(|| ScreenwatchError::Bridge("no event emitter registered".into()))?;

        let mut env = self
            .vm
            .attach_current_thread_permanently()
            .map_err(|e| ScreenwatchError::Bridge(format!("failed to attach emitter thread: {e}")))?;

        let body = serde_json::to_string(payload)?;
        let j_event = env
            .new_string(event)
            .map_err(|e| ScreenwatchError::Bridge(format!("new_string(event): {e}")))?;
        let j_body = env
            .new_string(&body)
            .map_err(|e| ScreenwatchError::Bridge(format!("new_string(payload): {e}")))?;

        env.call_method(
            emitter.as_obj(),
            "emit",
            "(Ljava/lang/String;Ljava/lang/String;)V",
            &[JValue::Object(&j_event), JValue::Object(&j_body)],
        )
        .map_err(|e| {
            if env.exception_check().unwrap_or(false) {
                let _ = env.exception_clear();
            }
            ScreenwatchError::Bridge(format!("emitter.emit: {e}"))
        })?;
        Ok(())
    }
}

impl EventSink for JniEmitterSink {
    fn emit(&self, event: &str, payload: StatusPayload) {
        if let Err(e) = self.emit_inner(event, &payload) {
            tracing::warn!(event, error = %e, "event emission failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Result plumbing
// ---------------------------------------------------------------------------

fn error_body(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Run `f` and hand its result to Java as a JSON string.
fn json_result<T, F>(env: &mut JNIEnv, f: F) -> jstring
where
    T: serde::Serialize,
    F: FnOnce() -> Result<T>,
{
    let body = match f() {
        Ok(value) => {
            serde_json::to_string(&value).unwrap_or_else(|e| error_body(&e.to_string()))
        }
        Err(e) => error_body(&e.to_string()),
    };
    match env.new_string(&body) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// Install logging, publish the host context to the bridge, register the
/// event emitter, and build the module singleton.
///
/// Safe to call again after a host context recreation: the emitter is
/// refreshed, everything else stays as first installed.
#[unsafe(no_mangle)]
pub extern "C" fn Java_com_screenwatch_ScreenwatchModule_nativeInit(
    mut env: JNIEnv,
    _class: JClass,
    context: JObject,
    emitter: JObject,
) {
    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Info)
            .with_tag("Screenwatch"),
    );

    let vm = match env.get_java_vm() {
        Ok(vm) => vm,
        Err(e) => {
            tracing::error!(error = %e, "nativeInit could not obtain the JavaVM");
            return;
        }
    };

    if CONTEXT_READY.set(()).is_ok() {
        let context_ref = match env.new_global_ref(&context) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "nativeInit could not pin the host context");
                return;
            }
        };
        // SAFETY: both pointers are live, process-lifetime handles. The
        // global ref is leaked below because ndk_context keeps the raw
        // pointer forever.
        unsafe {
            ndk_context::initialize_android_context(
                vm.get_java_vm_pointer().cast(),
                context_ref.as_obj().as_raw().cast(),
            );
        }
        std::mem::forget(context_ref);
    }

    match env.new_global_ref(&emitter) {
        Ok(r) => {
            *EMITTER.lock().expect("emitter slot poisoned") = Some(r);
        }
        Err(e) => {
            tracing::error!(error = %e, "nativeInit could not pin the event emitter");
            return;
        }
    }

    let installed = MODULE
        .set(ScreenStatusModule::new(
            Arc::from(screenwatch_bridge::platform_bridge()),
            Arc::new(JniEmitterSink { vm }),
        ))
        .is_ok();
    if installed {
        tracing::info!("Screenwatch module initialised");
    } else {
        tracing::debug!("Screenwatch module already initialised, emitter refreshed");
    }
}

/// Current screen status as `{"screenStatus": "..."}`.
#[unsafe(no_mangle)]
pub extern "C" fn Java_com_screenwatch_ScreenwatchModule_nativeGetCurrentStatus(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    json_result(&mut env, || {
        Ok(StatusPayload::new(module()?.current_status()?))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn Java_com_screenwatch_ScreenwatchModule_nativeCheckIsBlueStacks(
    _env: JNIEnv,
    _class: JClass,
) -> jboolean {
    let detected = module().map(|m| m.is_bluestacks()).unwrap_or(false);
    if detected { JNI_TRUE } else { JNI_FALSE }
}

#[unsafe(no_mangle)]
pub extern "C" fn Java_com_screenwatch_ScreenwatchModule_nativeIsEmulator(
    _env: JNIEnv,
    _class: JClass,
) -> jboolean {
    let detected = module().map(|m| m.is_emulator()).unwrap_or(false);
    if detected { JNI_TRUE } else { JNI_FALSE }
}

/// Emulator report as `{"isEmulator": ..., "methods": [...]}`.
#[unsafe(no_mangle)]
pub extern "C" fn Java_com_screenwatch_ScreenwatchModule_nativeGetEmulatorReport(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    json_result(&mut env, || Ok(module()?.emulator_report()))
}

/// Fingerprints of the first signer as `{"sha1": ..., "md5": ..., "sha256": ...}`.
#[unsafe(no_mangle)]
pub extern "C" fn Java_com_screenwatch_ScreenwatchModule_nativeGetCertificateFingerprint(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    json_result(&mut env, || module()?.certificate_fingerprint())
}

/// Folded signer hash as `{"certificateHash": ...}`.
#[unsafe(no_mangle)]
pub extern "C" fn Java_com_screenwatch_ScreenwatchModule_nativeGetCertificateValue(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    json_result(&mut env, || module()?.certificate_value())
}

#[unsafe(no_mangle)]
pub extern "C" fn Java_com_screenwatch_ScreenwatchModule_nativeEnableSecureScreen(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    json_result(&mut env, || {
        module()?.enable_secure_screen()?;
        Ok(serde_json::json!({ "secure": true }))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn Java_com_screenwatch_ScreenwatchModule_nativeDisableSecureScreen(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    json_result(&mut env, || {
        module()?.disable_secure_screen()?;
        Ok(serde_json::json!({ "secure": false }))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn Java_com_screenwatch_ScreenwatchModule_nativeSubscribe(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    json_result(&mut env, || {
        module()?.subscribe()?;
        Ok(serde_json::json!({ "subscribed": true }))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn Java_com_screenwatch_ScreenwatchModule_nativeUnsubscribe(
    _env: JNIEnv,
    _class: JClass,
) {
    if let Ok(m) = module() {
        m.unsubscribe();
    }
}

/// Relay entry for `DisplayManager.DisplayListener` callbacks.
///
/// `kind` is 0 for added, 1 for changed, 2 for removed.
#[unsafe(no_mangle)]
pub extern "C" fn Java_com_screenwatch_ScreenwatchModule_nativeOnDisplayEvent(
    _env: JNIEnv,
    _class: JClass,
    kind: jint,
    display_id: jint,
) {
    let event = match kind {
        0 => DisplayEvent::Added(display_id),
        1 => DisplayEvent::Changed(display_id),
        2 => DisplayEvent::Removed(display_id),
        other => {
            tracing::warn!(kind = other, display_id, "unknown display event kind");
            return;
        }
    };
    screenwatch_bridge::android::dispatch_display_event(event);
}

/// Relay entry for the video store `ContentObserver`.
#[unsafe(no_mangle)]
pub extern "C" fn Java_com_screenwatch_ScreenwatchModule_nativeOnVideoStoreChange(
    mut env: JNIEnv,
    _class: JClass,
    uri: JString,
) {
    let uri: String = match env.get_string(&uri) {
        Ok(s) => s.into(),
        Err(e) => {
            tracing::warn!(error = %e, "video uri could not be read");
            return;
        }
    };
    screenwatch_bridge::android::dispatch_video_change(VideoStoreChange { uri });
}
