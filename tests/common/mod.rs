//! Common test utilities for radar integration tests

use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::path::PathBuf;

/// A project directory with an optional config and fake tools on PATH
pub struct TestProject {
    pub dir: TempDir,
    pub bin_dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
            bin_dir: TempDir::new().expect("Failed to create bin dir"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join(".radar").join("conf.json")
    }

    /// Write `.radar/conf.json` with the given content
    pub fn write_config(&self, content: &str) {
        self.dir
            .child(".radar/conf.json")
            .write_str(content)
            .expect("Failed to write test config");
    }

    /// Write a complete config pointing at a fake host
    pub fn write_complete_config(&self) {
        self.write_config(
            r#"{
 "server_address": "example.com",
 "local_path": "/home/u/proj",
 "remote_path": "/srv/proj",
 "user": "deploy",
 "key_path": null,
 "exclude": [".git", "*.log"]
}"#,
        );
    }

    /// Install a fake `rsync` that prints its arguments and exits with `code`
    #[cfg(unix)]
    pub fn install_fake_rsync(&self, code: i32) {
        use std::os::unix::fs::PermissionsExt;

        let script = format!(
            "#!/bin/sh\nfor arg in \"$@\"; do echo \"arg:$arg\"; done\necho 'fake rsync failure' >&2\nexit {}\n",
            code
        );
        let rsync = self.bin_dir.child("rsync");
        rsync.write_str(&script).expect("Failed to write fake rsync");
        std::fs::set_permissions(rsync.path(), std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake rsync executable");
    }

    /// PATH with the fake tools first
    pub fn path_env(&self) -> std::ffi::OsString {
        let mut paths = vec![self.bin_dir.path().to_path_buf()];
        if let Some(path) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&path));
        }
        std::env::join_paths(paths).expect("Failed to join PATH")
    }
}
