fn main() {
    // The Tauri context is only generated for the desktop shell; the library
    // and its tests build without webview system packages.
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
