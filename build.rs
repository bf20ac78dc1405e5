fn main() {
    // The remote page may only reach the relay command; declaring the app
    // manifest generates the `allow-bridge-message` permission used by
    // capabilities/bridge.json.
    tauri_build::try_build(
        tauri_build::Attributes::new()
            .app_manifest(tauri_build::AppManifest::new().commands(&["bridge_message"])),
    )
    .expect("failed to run tauri-build");
}
