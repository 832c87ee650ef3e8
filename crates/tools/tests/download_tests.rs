//! Download protocol tests against fake curl and wget.

#![cfg(unix)]

mod common;

use common::{FAKE_CURL, FAKE_WGET, Sandbox};
use pkgfs_tools::{Capability, Error};
use std::path::Path;

const URL: &str = "http://example.test/pkg-1.0.tar.gz";

#[test]
fn test_curl_download_named_after_url() {
    let sandbox = Sandbox::new();
    sandbox.tool("curl", FAKE_CURL);
    let mut ctx = sandbox.context();

    let path = ctx.download(URL, None, false).unwrap();
    assert_eq!(path.file_name().unwrap(), "pkg-1.0.tar.gz");
    assert_eq!(path, sandbox.work().join("pkg-1.0.tar.gz"));
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
    assert!(std::fs::read_to_string(&path).unwrap().contains(URL));
}

#[test]
fn test_curl_is_preferred_over_wget() {
    let sandbox = Sandbox::new();
    sandbox.tool("curl", FAKE_CURL);
    sandbox.tool("wget", FAKE_WGET);
    let ctx = sandbox.context();
    assert_eq!(ctx.resolve(Capability::Downloader).unwrap().key, "curl");
}

#[test]
fn test_explicit_filename_relative_to_logical_directory() {
    let sandbox = Sandbox::new();
    sandbox.tool("curl", FAKE_CURL);
    std::fs::create_dir(sandbox.work().join("distfiles")).unwrap();
    let mut ctx = sandbox.context();
    ctx.change_dir("distfiles").unwrap();

    let path = ctx
        .download(URL, Some(Path::new("renamed.tgz")), false)
        .unwrap();
    assert_eq!(path, sandbox.work().join("distfiles/renamed.tgz"));
    assert!(path.is_file());
    assert!(!sandbox.work().join("pkg-1.0.tar.gz").exists());
}

#[test]
fn test_curl_failure_removes_partial_file() {
    let sandbox = Sandbox::new();
    sandbox.tool("curl", FAKE_CURL);
    let mut ctx = sandbox.context();

    let err = ctx
        .download("http://unreachable.test/pkg-1.0.tar.gz", None, false)
        .unwrap_err();
    assert!(matches!(err, Error::Execution { .. }));
    assert!(!sandbox.work().join("pkg-1.0.tar.gz").exists());
}

#[test]
fn test_wget_used_when_curl_absent() {
    let sandbox = Sandbox::new();
    sandbox.tool("wget", FAKE_WGET);
    let mut ctx = sandbox.context();

    let path = ctx.download(URL, None, false).unwrap();
    assert_eq!(ctx.resolve(Capability::Downloader).unwrap().key, "wget");
    assert_eq!(path, sandbox.work().join("pkg-1.0.tar.gz"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "payload\n");
}

#[test]
fn test_wget_failure_removes_empty_file() {
    let sandbox = Sandbox::new();
    sandbox.tool("wget", FAKE_WGET);
    let mut ctx = sandbox.context();

    assert!(
        ctx.download("http://unreachable.test/pkg-1.0.tar.gz", None, false)
            .is_err()
    );
    assert!(!sandbox.work().join("pkg-1.0.tar.gz").exists());
}

#[test]
fn test_wget_cache_mode_skips_unchanged() {
    let sandbox = Sandbox::new();
    sandbox.tool("wget", FAKE_WGET);
    std::fs::create_dir(sandbox.work().join("distfiles")).unwrap();
    let mut ctx = sandbox.context();
    let target = Path::new("distfiles/pkg-1.0.tar.gz");
    let depth = ctx.dirs().depth();

    let first = ctx.download(URL, Some(target), true).unwrap();
    assert_eq!(first, sandbox.work().join("distfiles/pkg-1.0.tar.gz"));
    let modified = std::fs::metadata(&first).unwrap().modified().unwrap();

    std::thread::sleep(std::time::Duration::from_millis(20));
    let second = ctx.download(URL, Some(target), true).unwrap();
    assert_eq!(second, first);
    assert_eq!(
        std::fs::metadata(&second).unwrap().modified().unwrap(),
        modified
    );
    assert_eq!(ctx.dirs().depth(), depth);
    assert_eq!(ctx.current_directory().unwrap(), sandbox.work());
}

#[test]
fn test_wget_cache_mode_pops_on_failure() {
    let sandbox = Sandbox::new();
    sandbox.tool("wget", FAKE_WGET);
    std::fs::create_dir(sandbox.work().join("distfiles")).unwrap();
    let mut ctx = sandbox.context();

    let result = ctx.download(
        "http://unreachable.test/pkg-1.0.tar.gz",
        Some(Path::new("distfiles/pkg-1.0.tar.gz")),
        true,
    );
    assert!(result.is_err());
    assert_eq!(ctx.dirs().depth(), 0);
}

#[test]
fn test_wget_cache_mode_ignores_explicit_name() {
    let sandbox = Sandbox::new();
    sandbox.tool("wget", FAKE_WGET);
    let mut ctx = sandbox.context();

    let path = ctx
        .download(URL, Some(Path::new("renamed.tgz")), true)
        .unwrap();
    assert_eq!(path, sandbox.work().join("pkg-1.0.tar.gz"));
    assert!(path.is_file());
    assert!(!sandbox.work().join("renamed.tgz").exists());
}

#[test]
fn test_wget_cache_mode_missing_directory() {
    let sandbox = Sandbox::new();
    sandbox.tool("wget", FAKE_WGET);
    let mut ctx = sandbox.context();

    let err = ctx
        .download(URL, Some(Path::new("nowhere/pkg-1.0.tar.gz")), true)
        .unwrap_err();
    assert!(matches!(err, Error::DirectoryNotFound { .. }));
    assert_eq!(ctx.dirs().depth(), 0);
}

#[test]
fn test_wget_default_naming_without_filename() {
    let sandbox = Sandbox::new();
    sandbox.tool("wget", FAKE_WGET);
    let mut ctx = sandbox.context();

    let path = ctx.download("http://example.test/dist/", None, false).unwrap();
    assert_eq!(path, sandbox.work());
    assert!(sandbox.work().join("index.html").is_file());
}

#[test]
fn test_curl_cache_mode_skips_unchanged() {
    let sandbox = Sandbox::new();
    sandbox.tool("curl", FAKE_CURL);
    std::fs::create_dir(sandbox.work().join("distfiles")).unwrap();
    let mut ctx = sandbox.context();
    let target = Path::new("distfiles/pkg-1.0.tar.gz");
    let depth = ctx.dirs().depth();

    let first = ctx.download(URL, Some(target), true).unwrap();
    assert_eq!(first, sandbox.work().join("distfiles/pkg-1.0.tar.gz"));
    let body = std::fs::read_to_string(&first).unwrap();
    let modified = std::fs::metadata(&first).unwrap().modified().unwrap();

    std::thread::sleep(std::time::Duration::from_millis(20));
    let second = ctx.download(URL, Some(target), true).unwrap();
    assert_eq!(second, first);
    assert_eq!(
        std::fs::metadata(&second).unwrap().modified().unwrap(),
        modified
    );
    assert_eq!(std::fs::read_to_string(&second).unwrap(), body);
    assert_eq!(ctx.dirs().depth(), depth);
    assert_eq!(ctx.current_directory().unwrap(), sandbox.work());
}

#[test]
fn test_no_downloader_available() {
    let sandbox = Sandbox::new();
    let mut ctx = sandbox.context();

    let err = ctx.download(URL, None, false).unwrap_err();
    assert!(matches!(err, Error::ToolUnavailable { .. }));
    assert_eq!(err.to_string(), "No downloader tool is available");
    assert!(!sandbox.work().join("pkg-1.0.tar.gz").exists());
}

#[test]
fn test_user_agent_and_timeout_reach_the_tool() {
    let sandbox = Sandbox::new();
    let log = sandbox.root.path().join("args.log");
    sandbox.tool(
        "curl",
        &format!("[ \"$1\" = --version ] && exit 0\nprintf '%s\\n' \"$@\" > '{}'\necho ok", log.display()),
    );
    let mut ctx = sandbox.context_with(|config| {
        config.connect_timeout = 9;
        config.curl_cert_flags = vec!["--insecure".into()];
    });

    ctx.download(URL, None, false).unwrap();
    let args: Vec<String> = std::fs::read_to_string(&log)
        .unwrap()
        .lines()
        .map(String::from)
        .collect();
    assert_eq!(args.first().map(String::as_str), Some("--insecure"));
    assert!(args.contains(&"pkgfs/test (curl)".to_string()));
    assert!(args.windows(2).any(|w| w == ["--connect-timeout", "9"]));
    assert_eq!(args.last().map(String::as_str), Some(URL));
}
