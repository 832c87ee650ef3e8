//! Shared fixtures for pkgfs-tools integration tests.
//!
//! External tools are replaced by small shell scripts so the tests run
//! offline and behave the same on every host.

#![allow(dead_code)]

use pkgfs_tools::{Config, Context};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// curl stand-in: body on stdout, `-o` honoured, URLs containing
/// `unreachable` write a partial body and fail. `-z` skips the transfer
/// when the reference file exists, like an unchanged remote would.
pub const FAKE_CURL: &str = r#"
out=""; since=""; prev=""
for arg; do
  [ "$prev" = "-o" ] && out="$arg"
  [ "$prev" = "-z" ] && since="$arg"
  prev="$arg"; last="$arg"
done
[ "$last" = "--version" ] && exit 0
case "$last" in
  *unreachable*) printf 'partial'; exit 7 ;;
esac
[ -n "$since" ] && [ -f "$since" ] && exit 0
if [ -n "$out" ]; then
  printf 'payload for %s\n' "$last" > "$out"
else
  printf 'payload for %s\n' "$last"
fi
"#;

/// wget stand-in: `-O` and `-N` honoured; `-N` skips files already present,
/// like an unchanged remote would.
pub const FAKE_WGET: &str = r#"
out=""; stamp=""; prev=""
for arg; do
  [ "$prev" = "-O" ] && out="$arg"
  [ "$arg" = "-N" ] && stamp=1
  prev="$arg"; last="$arg"
done
[ "$last" = "--version" ] && exit 0
case "$last" in
  *unreachable*) [ -n "$out" ] && : > "$out"; exit 4 ;;
esac
if [ -n "$stamp" ]; then
  name="${last##*/}"
  [ -f "$name" ] && exit 0
  printf 'payload\n' > "$name"
elif [ -n "$out" ]; then
  printf 'payload\n' > "$out"
else
  printf 'payload\n' > index.html
fi
"#;

/// Write an executable `/bin/sh` script.
pub fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A config where every known tool key points into `bin`; only scripts
/// actually written there exist.
pub fn isolated_config(bin: &Path) -> Config {
    let mut config = Config {
        user_agent: "pkgfs/test".into(),
        ..Default::default()
    };
    for key in ["curl", "wget", "md5sum", "openssl", "md5"] {
        config.set_tool(key, bin.join(key));
    }
    config
}

/// A scratch area: `bin/` for fake tools and `work/` as the logical base.
pub struct Sandbox {
    pub root: tempfile::TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("bin")).unwrap();
        std::fs::create_dir(root.path().join("work")).unwrap();
        Self { root }
    }

    pub fn bin(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    pub fn work(&self) -> PathBuf {
        self.root.path().join("work")
    }

    pub fn tool(&self, key: &str, body: &str) -> PathBuf {
        script(&self.bin(), key, body)
    }

    pub fn context(&self) -> Context {
        Context::new(isolated_config(&self.bin())).with_base(self.work())
    }

    pub fn context_with(&self, adjust: impl FnOnce(&mut Config)) -> Context {
        let mut config = isolated_config(&self.bin());
        adjust(&mut config);
        Context::new(config).with_base(self.work())
    }
}
