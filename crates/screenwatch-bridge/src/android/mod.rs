// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Each trait method invokes the corresponding
// Android API through JNI calls into the ART runtime.
//
// ## Architecture notes
//
// Queries that complete synchronously via JNI (DisplayManager,
// PackageManager, ActivityManager) are fully implemented here.
//
// The two OS notification feeds (DisplayManager.DisplayListener and the
// video-store ContentObserver) are Java interfaces and cannot be
// synthesised from Rust. They live in the `com.screenwatch.HostRelay` glue
// class, which registers them on request and forwards every notification
// into the `nativeOnDisplayEvent` / `nativeOnVideoStoreChange` exports.
// Those exports hand the notification to [`dispatch_display_event`] and
// [`dispatch_video_change`], which invoke whichever callback is armed.
// The secure-surface flag also goes through the relay because it needs the
// current Activity and the UI thread, and Rust only holds the long-lived
// host context. See `ANDROID-INTEGRATION.md` for the glue code.

#![cfg(target_os = "android")]

use std::sync::{Mutex, OnceLock};

use jni::JNIEnv;
use jni::objects::{JByteArray, JObject, JObjectArray, JString, JValue};

use screenwatch_core::error::{Result, ScreenwatchError};
use screenwatch_core::types::{DisplayEvent, PackageInventory, SIGNING_CERTIFICATES_API};

use crate::traits::*;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// JVM class hosting the Java-side glue (see ANDROID-INTEGRATION.md).
const RELAY_CLASS: &str = "com/screenwatch/HostRelay";

/// `DisplayManager.DISPLAY_CATEGORY_PRESENTATION`.
const DISPLAY_CATEGORY_PRESENTATION: &str = "android.hardware.display.category.PRESENTATION";

/// `PackageManager.GET_SIGNATURES` (legacy signature lookup).
const GET_SIGNATURES: i32 = 0x0000_0040;

/// `PackageManager.GET_SIGNING_CERTIFICATES` (API 28 and above).
const GET_SIGNING_CERTIFICATES: i32 = 0x0800_0000;

/// `PackageManager.GET_META_DATA`.
const GET_META_DATA: i32 = 0x0000_0080;

/// Process-wide `JavaVM` handle, built from `ndk_context` on first use.
static VM: OnceLock<jni::JavaVM> = OnceLock::new();

/// Obtain a [`JNIEnv`] for the current thread, attaching it if needed.
///
/// The `JavaVM` handle is cached for the process lifetime, which is what
/// lets the returned env carry the `'static` borrow.
fn jni_env() -> Result<JNIEnv<'static>> {
    let vm = match VM.get() {
        Some(vm) => vm,
        None => {
            let ctx = ndk_context::android_context();
            // SAFETY: `ctx.vm()` is the `JavaVM*` installed by the module
            // init export; it stays valid for the lifetime of the process.
            let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
                .map_err(|e| ScreenwatchError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
            VM.get_or_init(|| vm)
        }
    };
    vm.attach_current_thread_permanently()
        .map_err(|e| ScreenwatchError::Bridge(format!("failed to attach JNI thread: {e}")))
}

/// Obtain the host Android `Context` as a [`JObject`].
///
/// The pointer comes from `ndk_context::android_context().context()`, the
/// global reference registered by the module's init export. It is the
/// long-lived host context, not an Activity; window-level operations go
/// through the relay, which resolves the current Activity on the Java side.
fn host_context() -> Result<JObject<'static>> {
    let ctx = ndk_context::android_context();
    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(ScreenwatchError::Bridge(
            "Android context is null, module not initialised".into(),
        ));
    }
    // SAFETY: the init export registers a global jobject for the host
    // context before any bridge call can run.
    Ok(unsafe { JObject::from_raw(ptr.cast()) })
}

/// Map a `jni::errors::Error` into `ScreenwatchError::Bridge`, clearing any
/// pending Java exception so later JNI calls on this thread stay usable.
fn jni_err(env: &mut JNIEnv<'_>, context: &str, e: jni::errors::Error) -> ScreenwatchError {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_clear();
    }
    ScreenwatchError::Bridge(format!("{context}: {e}"))
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the Screenwatch platform bridge.
///
/// All methods go through JNI to call the Android SDK. The struct is
/// zero-sized; all state lives on the Java side or in the armed callback
/// slots below.
pub struct AndroidBridge;

impl AndroidBridge {
    /// Create a new Android bridge.
    ///
    /// This does **not** touch JNI — the first JNI call happens lazily when
    /// a trait method is invoked.
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

// ---------------------------------------------------------------------------
// DisplayStatus — android.hardware.display.DisplayManager
// ---------------------------------------------------------------------------

impl DisplayStatus for AndroidBridge {
    /// Read `Build.VERSION.SDK_INT`.
    fn api_level(&self) -> Result<u32> {
        let mut env = jni_env()?;
        Ok(sdk_int(&mut env)?.max(0) as u32)
    }

    /// Count displays in the presentation category.
    ///
    /// `DisplayManager.getDisplays(DISPLAY_CATEGORY_PRESENTATION)` returns
    /// the wired and wireless mirroring targets; the array length is the
    /// whole answer.
    fn presentation_display_count(&self) -> Result<usize> {
        let mut env = jni_env()?;
        let context = host_context()?;

        let dm = system_service(&mut env, &context, "display")?;

        let j_category: JString = env
            .new_string(DISPLAY_CATEGORY_PRESENTATION)
            .map_err(|e| jni_err(&mut env, "new_string(category)", e))?;

        let displays: JObject = env
            .call_method(
                &dm,
                "getDisplays",
                "(Ljava/lang/String;)[Landroid/view/Display;",
                &[JValue::Object(&j_category)],
            )
            .map_err(|e| jni_err(&mut env, "DisplayManager.getDisplays", e))?
            .l()
            .map_err(|e| jni_err(&mut env, "getDisplays->l", e))?;

        let displays = JObjectArray::from(displays);
        let count = env
            .get_array_length(&displays)
            .map_err(|e| jni_err(&mut env, "getDisplays length", e))?;

        tracing::debug!(count, "presentation displays queried");
        Ok(count.max(0) as usize)
    }
}

// ---------------------------------------------------------------------------
// SecureSurface — WindowManager.LayoutParams.FLAG_SECURE via the relay
// ---------------------------------------------------------------------------

impl SecureSurface for AndroidBridge {
    /// Set `FLAG_SECURE` on the host window.
    ///
    /// The relay posts the flag change to the UI thread; window flags must
    /// not be touched from a binder or JNI worker thread.
    fn set_secure_flag(&self) -> Result<()> {
        call_relay("setSecureFlag")?;
        tracing::info!("secure-surface flag set");
        Ok(())
    }

    /// Clear `FLAG_SECURE` from the host window.
    fn clear_secure_flag(&self) -> Result<()> {
        call_relay("clearSecureFlag")?;
        tracing::info!("secure-surface flag cleared");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PackageQuery — android.content.pm.PackageManager / ActivityManager
// ---------------------------------------------------------------------------

impl PackageQuery for AndroidBridge {
    /// Read the DER bytes of every signer of the host package.
    ///
    /// On API 28+ the signing-certificate history is asked first
    /// (`GET_SIGNING_CERTIFICATES`); when that yields nothing the legacy
    /// `GET_SIGNATURES` array is used, as on older devices.
    fn signing_certificates(&self) -> Result<Vec<Vec<u8>>> {
        let mut env = jni_env()?;
        let context = host_context()?;

        let pm = package_manager(&mut env, &context)?;
        let pkg: JObject = env
            .call_method(&context, "getPackageName", "()Ljava/lang/String;", &[])
            .map_err(|e| jni_err(&mut env, "getPackageName", e))?
            .l()
            .map_err(|e| jni_err(&mut env, "getPackageName->l", e))?;

        let api = sdk_int(&mut env)?;
        let signatures = if api >= SIGNING_CERTIFICATES_API as i32 {
            match signing_info_signers(&mut env, &pm, &pkg)? {
                Some(arr) => arr,
                None => legacy_signatures(&mut env, &pm, &pkg)?,
            }
        } else {
            legacy_signatures(&mut env, &pm, &pkg)?
        };

        let count = env
            .get_array_length(&signatures)
            .map_err(|e| jni_err(&mut env, "signatures length", e))?;

        let mut signers = Vec::with_capacity(count.max(0) as usize);
        for i in 0..count {
            let signature: JObject = env
                .get_object_array_element(&signatures, i)
                .map_err(|e| jni_err(&mut env, "signatures[i]", e))?;

            let bytes_obj: JObject = env
                .call_method(&signature, "toByteArray", "()[B", &[])
                .map_err(|e| jni_err(&mut env, "Signature.toByteArray", e))?
                .l()
                .map_err(|e| jni_err(&mut env, "toByteArray->l", e))?;

            let bytes = JByteArray::from(bytes_obj);
            signers.push(
                env.convert_byte_array(&bytes)
                    .map_err(|e| jni_err(&mut env, "convert_byte_array(signature)", e))?,
            );
        }

        tracing::debug!(signers = signers.len(), "signing certificates read");
        Ok(signers)
    }

    /// Collect the launcher, installed-package, and running-service names
    /// plus the build product string.
    fn package_inventory(&self, service_limit: u32) -> Result<PackageInventory> {
        let mut env = jni_env()?;
        let context = host_context()?;

        let pm = package_manager(&mut env, &context)?;
        let launcher_packages = launcher_packages(&mut env, &pm)?;
        let installed_packages = installed_packages(&mut env, &pm)?;
        let running_services = running_services(&mut env, &context, service_limit)?;
        let build_product = static_string(&mut env, "android/os/Build", "PRODUCT")?;

        tracing::debug!(
            launchers = launcher_packages.len(),
            installed = installed_packages.len(),
            services = running_services.len(),
            "package inventory collected"
        );

        Ok(PackageInventory {
            launcher_packages,
            installed_packages,
            running_services,
            build_product,
        })
    }
}

// ---------------------------------------------------------------------------
// SignalFeed — armed callback slots fed by the relay exports
// ---------------------------------------------------------------------------

/// Armed display callback, read by [`dispatch_display_event`].
static DISPLAY_CALLBACK: Mutex<Option<DisplayCallback>> = Mutex::new(None);

/// Armed video callback, read by [`dispatch_video_change`].
static VIDEO_CALLBACK: Mutex<Option<VideoCallback>> = Mutex::new(None);

impl SignalFeed for AndroidBridge {
    /// Arm the display callback, then ask the relay to register the
    /// platform `DisplayListener`.
    fn watch_displays(&self, callback: DisplayCallback) -> Result<()> {
        *DISPLAY_CALLBACK
            .lock()
            .expect("display callback lock poisoned") = Some(callback);

        if let Err(e) = call_relay("startDisplayWatch") {
            // Disarm so a failed registration leaves no half-armed slot.
            *DISPLAY_CALLBACK
                .lock()
                .expect("display callback lock poisoned") = None;
            return Err(e);
        }
        tracing::info!("display watch registered");
        Ok(())
    }

    fn unwatch_displays(&self) -> Result<()> {
        let result = call_relay("stopDisplayWatch");
        *DISPLAY_CALLBACK
            .lock()
            .expect("display callback lock poisoned") = None;
        tracing::info!("display watch deregistered");
        result
    }

    /// Arm the video callback, then ask the relay to register the
    /// `ContentObserver` on the external video store.
    fn watch_video_store(&self, callback: VideoCallback) -> Result<()> {
        *VIDEO_CALLBACK
            .lock()
            .expect("video callback lock poisoned") = Some(callback);

        if let Err(e) = call_relay("startVideoWatch") {
            *VIDEO_CALLBACK
                .lock()
                .expect("video callback lock poisoned") = None;
            return Err(e);
        }
        tracing::info!("video-store watch registered");
        Ok(())
    }

    fn unwatch_video_store(&self) -> Result<()> {
        let result = call_relay("stopVideoWatch");
        *VIDEO_CALLBACK
            .lock()
            .expect("video callback lock poisoned") = None;
        tracing::info!("video-store watch deregistered");
        result
    }
}

/// Forward a display notification from the relay to the armed callback.
///
/// Called by the `nativeOnDisplayEvent` export. The callback is invoked
/// outside the slot lock so it may freely re-enter the bridge.
pub fn dispatch_display_event(event: DisplayEvent) {
    let callback = DISPLAY_CALLBACK
        .lock()
        .expect("display callback lock poisoned")
        .clone();
    match callback {
        Some(cb) => cb(event),
        None => tracing::debug!(?event, "display event with no armed callback"),
    }
}

/// Forward a video-store notification from the relay to the armed callback.
pub fn dispatch_video_change(change: screenwatch_core::types::VideoStoreChange) {
    let callback = VIDEO_CALLBACK
        .lock()
        .expect("video callback lock poisoned")
        .clone();
    match callback {
        Some(cb) => cb(change),
        None => tracing::debug!(uri = %change.uri, "video change with no armed callback"),
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Read `Build.VERSION.SDK_INT`.
fn sdk_int(env: &mut JNIEnv<'_>) -> Result<i32> {
    env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
        .map_err(|e| jni_err(env, "Build.VERSION.SDK_INT", e))?
        .i()
        .map_err(|e| jni_err(env, "SDK_INT->i", e))
}

/// Invoke a void static on the relay class, passing the host context.
fn call_relay(method: &str) -> Result<()> {
    let mut env = jni_env()?;
    let context = host_context()?;

    env.call_static_method(
        RELAY_CLASS,
        method,
        "(Landroid/content/Context;)V",
        &[JValue::Object(&context)],
    )
    .map_err(|e| jni_err(&mut env, &format!("HostRelay.{method}"), e))?;
    Ok(())
}

/// `context.getSystemService(name)`, null-checked.
fn system_service<'a>(
    env: &mut JNIEnv<'a>,
    context: &JObject<'_>,
    name: &str,
) -> Result<JObject<'a>> {
    let j_name: JString = env
        .new_string(name)
        .map_err(|e| jni_err(env, "new_string(service)", e))?;

    let service: JObject = env
        .call_method(
            context,
            "getSystemService",
            "(Ljava/lang/String;)Ljava/lang/Object;",
            &[JValue::Object(&j_name)],
        )
        .map_err(|e| jni_err(env, "getSystemService", e))?
        .l()
        .map_err(|e| jni_err(env, "getSystemService->l", e))?;

    if service.is_null() {
        return Err(ScreenwatchError::Bridge(format!(
            "system service {name} unavailable"
        )));
    }
    Ok(service)
}

/// `context.getPackageManager()`.
fn package_manager<'a>(env: &mut JNIEnv<'a>, context: &JObject<'_>) -> Result<JObject<'a>> {
    env.call_method(
        context,
        "getPackageManager",
        "()Landroid/content/pm/PackageManager;",
        &[],
    )
    .map_err(|e| jni_err(env, "getPackageManager", e))?
    .l()
    .map_err(|e| jni_err(env, "getPackageManager->l", e))
}

/// `pm.getPackageInfo(pkg, flags)`. NameNotFound surfaces as a
/// certificate error because only the certificate paths call this.
fn package_info<'a>(
    env: &mut JNIEnv<'a>,
    pm: &JObject<'_>,
    pkg: &JObject<'_>,
    flags: i32,
) -> Result<JObject<'a>> {
    env.call_method(
        pm,
        "getPackageInfo",
        "(Ljava/lang/String;I)Landroid/content/pm/PackageInfo;",
        &[JValue::Object(pkg), JValue::Int(flags)],
    )
    .map_err(|e| {
        let bridged = jni_err(env, "getPackageInfo", e);
        ScreenwatchError::Certificate(bridged.to_string())
    })?
    .l()
    .map_err(|e| jni_err(env, "getPackageInfo->l", e))
}

/// Signers from the API 28+ signing-certificate history, or `None` when
/// the platform reports no `signingInfo` for the package.
fn signing_info_signers<'a>(
    env: &mut JNIEnv<'a>,
    pm: &JObject<'_>,
    pkg: &JObject<'_>,
) -> Result<Option<JObjectArray<'a>>> {
    let info = package_info(env, pm, pkg, GET_SIGNING_CERTIFICATES)?;

    let signing_info: JObject = env
        .get_field(&info, "signingInfo", "Landroid/content/pm/SigningInfo;")
        .map_err(|e| jni_err(env, "PackageInfo.signingInfo", e))?
        .l()
        .map_err(|e| jni_err(env, "signingInfo->l", e))?;

    if signing_info.is_null() {
        return Ok(None);
    }

    let signers: JObject = env
        .call_method(
            &signing_info,
            "getApkContentsSigners",
            "()[Landroid/content/pm/Signature;",
            &[],
        )
        .map_err(|e| jni_err(env, "getApkContentsSigners", e))?
        .l()
        .map_err(|e| jni_err(env, "getApkContentsSigners->l", e))?;

    if signers.is_null() {
        return Ok(None);
    }
    Ok(Some(JObjectArray::from(signers)))
}

/// Signers from the legacy `PackageInfo.signatures` array.
fn legacy_signatures<'a>(
    env: &mut JNIEnv<'a>,
    pm: &JObject<'_>,
    pkg: &JObject<'_>,
) -> Result<JObjectArray<'a>> {
    let info = package_info(env, pm, pkg, GET_SIGNATURES)?;

    let signatures: JObject = env
        .get_field(&info, "signatures", "[Landroid/content/pm/Signature;")
        .map_err(|e| jni_err(env, "PackageInfo.signatures", e))?
        .l()
        .map_err(|e| jni_err(env, "signatures->l", e))?;

    if signatures.is_null() {
        return Err(ScreenwatchError::Certificate(
            "package has no signature data".into(),
        ));
    }
    Ok(JObjectArray::from(signatures))
}

/// Package names of launcher-category activities.
fn launcher_packages(env: &mut JNIEnv<'_>, pm: &JObject<'_>) -> Result<Vec<String>> {
    let j_action: JString = env
        .new_string("android.intent.action.MAIN")
        .map_err(|e| jni_err(env, "new_string(ACTION_MAIN)", e))?;

    let intent: JObject = env
        .new_object(
            "android/content/Intent",
            "(Ljava/lang/String;)V",
            &[JValue::Object(&j_action)],
        )
        .map_err(|e| jni_err(env, "new Intent(MAIN)", e))?;

    let j_category: JString = env
        .new_string("android.intent.category.LAUNCHER")
        .map_err(|e| jni_err(env, "new_string(CATEGORY_LAUNCHER)", e))?;

    env.call_method(
        &intent,
        "addCategory",
        "(Ljava/lang/String;)Landroid/content/Intent;",
        &[JValue::Object(&j_category)],
    )
    .map_err(|e| jni_err(env, "addCategory(LAUNCHER)", e))?;

    let list: JObject = env
        .call_method(
            pm,
            "queryIntentActivities",
            "(Landroid/content/Intent;I)Ljava/util/List;",
            &[JValue::Object(&intent), JValue::Int(0)],
        )
        .map_err(|e| jni_err(env, "queryIntentActivities", e))?
        .l()
        .map_err(|e| jni_err(env, "queryIntentActivities->l", e))?;

    list_strings(env, &list, |env, item| {
        let info: JObject = env
            .get_field(item, "activityInfo", "Landroid/content/pm/ActivityInfo;")
            .map_err(|e| jni_err(env, "ResolveInfo.activityInfo", e))?
            .l()
            .map_err(|e| jni_err(env, "activityInfo->l", e))?;
        let info = env.auto_local(info);

        let name: JObject = env
            .get_field(&info, "packageName", "Ljava/lang/String;")
            .map_err(|e| jni_err(env, "ActivityInfo.packageName", e))?
            .l()
            .map_err(|e| jni_err(env, "packageName->l", e))?;
        jstring_value(env, name)
    })
}

/// Names of all installed packages.
fn installed_packages(env: &mut JNIEnv<'_>, pm: &JObject<'_>) -> Result<Vec<String>> {
    let list: JObject = env
        .call_method(
            pm,
            "getInstalledApplications",
            "(I)Ljava/util/List;",
            &[JValue::Int(GET_META_DATA)],
        )
        .map_err(|e| jni_err(env, "getInstalledApplications", e))?
        .l()
        .map_err(|e| jni_err(env, "getInstalledApplications->l", e))?;

    list_strings(env, &list, |env, item| {
        let name: JObject = env
            .get_field(item, "packageName", "Ljava/lang/String;")
            .map_err(|e| jni_err(env, "ApplicationInfo.packageName", e))?
            .l()
            .map_err(|e| jni_err(env, "packageName->l", e))?;
        jstring_value(env, name)
    })
}

/// Class names of up to `limit` running services.
fn running_services(
    env: &mut JNIEnv<'_>,
    context: &JObject<'_>,
    limit: u32,
) -> Result<Vec<String>> {
    let am = system_service(env, context, "activity")?;

    let list: JObject = env
        .call_method(
            &am,
            "getRunningServices",
            "(I)Ljava/util/List;",
            &[JValue::Int(limit.min(i32::MAX as u32) as i32)],
        )
        .map_err(|e| jni_err(env, "getRunningServices", e))?
        .l()
        .map_err(|e| jni_err(env, "getRunningServices->l", e))?;

    list_strings(env, &list, |env, item| {
        let component: JObject = env
            .get_field(item, "service", "Landroid/content/ComponentName;")
            .map_err(|e| jni_err(env, "RunningServiceInfo.service", e))?
            .l()
            .map_err(|e| jni_err(env, "service->l", e))?;
        let component = env.auto_local(component);

        let name: JObject = env
            .call_method(&component, "getClassName", "()Ljava/lang/String;", &[])
            .map_err(|e| jni_err(env, "ComponentName.getClassName", e))?
            .l()
            .map_err(|e| jni_err(env, "getClassName->l", e))?;
        jstring_value(env, name)
    })
}

/// Read a static `String` field (e.g. `Build.PRODUCT`).
fn static_string(env: &mut JNIEnv<'_>, class: &str, field: &str) -> Result<String> {
    let obj: JObject = env
        .get_static_field(class, field, "Ljava/lang/String;")
        .map_err(|e| jni_err(env, &format!("{class}.{field}"), e))?
        .l()
        .map_err(|e| jni_err(env, &format!("{class}.{field}->l"), e))?;
    jstring_value(env, obj)
}

/// Drain a `java.util.List` into strings via `extract`.
///
/// Elements are wrapped in auto-released local refs; installed-package
/// lists routinely exceed the default JNI local reference budget.
fn list_strings<'a, F>(env: &mut JNIEnv<'a>, list: &JObject<'_>, mut extract: F) -> Result<Vec<String>>
where
    F: FnMut(&mut JNIEnv<'a>, &JObject<'a>) -> Result<String>,
{
    let size = env
        .call_method(list, "size", "()I", &[])
        .map_err(|e| jni_err(env, "List.size", e))?
        .i()
        .map_err(|e| jni_err(env, "List.size->i", e))?;

    let mut out = Vec::with_capacity(size.max(0) as usize);
    for i in 0..size {
        let item: JObject = env
            .call_method(list, "get", "(I)Ljava/lang/Object;", &[JValue::Int(i)])
            .map_err(|e| jni_err(env, "List.get", e))?
            .l()
            .map_err(|e| jni_err(env, "List.get->l", e))?;
        let item = env.auto_local(item);
        out.push(extract(env, item.as_ref())?);
    }
    Ok(out)
}

/// Convert a `java.lang.String` object to a Rust `String`, releasing the
/// local ref. Null maps to the empty string.
fn jstring_value(env: &mut JNIEnv<'_>, obj: JObject<'_>) -> Result<String> {
    if obj.is_null() {
        return Ok(String::new());
    }
    let j_str = JString::from(obj);
    let value: String = env
        .get_string(&j_str)
        .map_err(|e| jni_err(env, "get_string", e))?
        .into();
    env.delete_local_ref(j_str)
        .map_err(|e| jni_err(env, "delete_local_ref(string)", e))?;
    Ok(value)
}
