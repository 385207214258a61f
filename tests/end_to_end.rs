use std::fs;
use std::sync::Arc;

use gsi_checker::analyzer::gsi::GSI_DOCS_URL;
use gsi_checker::collector::props::DumpStore;
use gsi_checker::report::text::Lang;
use gsi_checker::session::Session;
use gsi_checker::types::RootManager;
use tempfile::TempDir;

const PIXEL_DUMP: &str = "\
[ro.product.brand]: [google]
[ro.product.model]: [Pixel 9 Pro]
[ro.build.version.release]: [16]
[ro.build.version.sdk]: [36]
[ro.product.cpu.abilist]: [arm64-v8a]
[ro.vndk.version]: []
[ro.boot.slot_suffix]: [_b]
";

#[test]
fn dump_file_produces_full_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("getprop.txt");
    fs::write(&path, PIXEL_DUMP).unwrap();

    let store = DumpStore::from_file(&path).unwrap();
    let mut session = Session::new(Lang::Chinese);
    let report = session.detect(&store).unwrap().clone();

    assert_eq!(report.model, "Pixel 9 Pro");
    assert_eq!(report.vndk_version, "35");
    assert_eq!(report.first_api_level, "35");
    assert!(report.is_ab_partition);
    assert_eq!(report.recommended_gsi_url, GSI_DOCS_URL);
    assert!(session.rendered().contains("架构：arm64-v8a (AB)"));
}

#[test]
fn missing_dump_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(DumpStore::from_file(&dir.path().join("absent.txt")).is_err());
}

#[cfg(unix)]
#[test]
fn fake_kernelsu_interpreter() {
    use gsi_checker::collector::shell::SuShell;
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;

    let dir = TempDir::new().unwrap();
    let su = dir.path().join("su");
    fs::write(
        &su,
        "#!/bin/sh\n\
         shift\n\
         case \"$1\" in\n\
           'which su') echo /data/adb/ksu/bin/su ;;\n\
           'uname -r') echo 5.10.198-android13 ;;\n\
           getenforce) echo Permissive ;;\n\
           *) exit 1 ;;\n\
         esac\n",
    )
    .unwrap();
    fs::set_permissions(&su, fs::Permissions::from_mode(0o755)).unwrap();

    let store = DumpStore::parse(PIXEL_DUMP);
    let mut session = Session::new(Lang::Chinese);
    session.detect(&store).unwrap();

    let shell = Arc::new(SuShell::new(su.to_string_lossy(), Duration::from_secs(5)));
    session.request_root(shell).unwrap();
    assert!(session.wait_root().unwrap());

    let root = session.root().unwrap();
    assert_eq!(root.root_manager, RootManager::KernelSU);
    assert_eq!(root.kernel_version, "5.10.198-android13");
    assert_eq!(root.selinux_mode, "Permissive");
    assert!(root.magisk.is_none());
    assert_eq!(
        session.rendered().matches(Lang::Chinese.root_marker()).count(),
        1
    );
}
