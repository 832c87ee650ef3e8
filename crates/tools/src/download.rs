//! Downloads through whichever downloader the registry resolved.
//!
//! Two tool families are supported:
//!
//! - **curl** writes the body to stdout, which is redirected straight into
//!   the target file. With cache mode and an existing target, a
//!   time-conditional request (`-z`) writes the file only if the remote
//!   copy is newer.
//! - **wget** writes the file itself. In cache mode it runs inside the
//!   target's directory with timestamping (`-N`) and names the file after
//!   the URL; an explicit output name cannot be combined with `-N`, so it
//!   is ignored there and the file lands under the URL's basename.
//!
//! Whatever the tool, a failed download leaves no file at the target path.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use pkgfs_core::{Config, Error, Result, fs, paths};
use tracing::{debug, info, warn};

use crate::capability::Capability;
use crate::context::Context;
use crate::exec;
use crate::registry::ResolvedTool;

/// Where wget should put the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WgetOutput<'a> {
    /// `-N` in the current directory, named after the URL.
    Timestamped,
    /// `-O <file>`.
    File(&'a Path),
    /// The tool's own naming in the current directory.
    Default,
}

/// Where curl should put the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurlOutput<'a> {
    /// Body on stdout; the caller redirects it.
    Stdout,
    /// `-z <file> -R -o <file>`: only replace `file` if the remote is newer.
    IfModified(&'a Path),
    /// `-O`: the tool names the file after the URL.
    RemoteName,
}

fn wget_args(
    config: &Config,
    tool: &ResolvedTool,
    url: &str,
    output: WgetOutput<'_>,
) -> Vec<String> {
    let mut args = config.wget_cert_flags.clone();
    args.push("--no-cache".into());
    args.push(format!("--user-agent={}", config.user_agent_for(tool.name)));
    args.push("-q".into());
    if let Some(secs) = config.connect_timeout_secs() {
        args.push(format!("--timeout={secs}"));
        args.push("--tries=1".into());
    }
    match output {
        WgetOutput::Timestamped => args.push("-N".into()),
        WgetOutput::File(path) => {
            args.push("-O".into());
            args.push(path.to_string_lossy().into_owned());
        }
        WgetOutput::Default => {}
    }
    args.push(url.into());
    args
}

fn curl_args(
    config: &Config,
    tool: &ResolvedTool,
    url: &str,
    output: CurlOutput<'_>,
) -> Vec<String> {
    let mut args = config.curl_cert_flags.clone();
    args.extend(["-L".into(), "-f".into(), "-s".into()]);
    args.push("-A".into());
    args.push(config.user_agent_for(tool.name));
    if let Some(secs) = config.connect_timeout_secs() {
        args.push("--connect-timeout".into());
        args.push(secs.to_string());
    }
    match output {
        CurlOutput::Stdout => {}
        CurlOutput::IfModified(path) => {
            let path = path.to_string_lossy().into_owned();
            args.extend(["-z".into(), path.clone(), "-R".into(), "-o".into(), path]);
        }
        CurlOutput::RemoteName => args.push("-O".into()),
    }
    args.push(url.into());
    args
}

impl Context {
    /// Download `url` and return the absolute path of the local file.
    ///
    /// The file is named `filename` when given, else after the last path
    /// segment of `url`, relative to the logical current directory. When
    /// no name can be derived at all the tool picks one and the returned
    /// path is the directory it was written into.
    ///
    /// With `cache` set, an unchanged remote file is not fetched again.
    /// For wget this switches to timestamping, which ignores `filename`
    /// (see the module docs).
    ///
    /// On failure any partial file at the target path is deleted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolUnavailable`] if no downloader is installed,
    /// or [`Error::Execution`] if the transfer fails.
    pub fn download(
        &mut self,
        url: &str,
        filename: Option<&Path>,
        cache: bool,
    ) -> Result<PathBuf> {
        let cwd = self.current_directory()?;
        let target = match filename {
            Some(name) => Some(fs::absolutize(name, &cwd)),
            None => {
                let name = paths::basename(url);
                (!name.is_empty()).then(|| cwd.join(name))
            }
        };

        let Some(tool) = self.registry.resolve(Capability::Downloader).cloned() else {
            return Err(Error::tool_unavailable(Capability::Downloader.name()));
        };

        info!(%url, tool = tool.name, target = ?target, cache, "Downloading");
        let (landing, outcome) = match tool.key {
            "wget" if cache => {
                let dir = target
                    .as_deref()
                    .and_then(Path::parent)
                    .map_or_else(|| cwd.clone(), Path::to_path_buf);
                let name = paths::basename(url);
                if filename.is_some_and(|f| fs::absolutize(f, &cwd) != dir.join(name)) {
                    warn!(%url, "Timestamped download ignores the explicit filename");
                }
                let landing = (!name.is_empty()).then(|| dir.join(name));
                let outcome = self.wget_timestamped(&tool, url, &dir);
                (landing, outcome.map(|()| dir))
            }
            "wget" => {
                let output = target
                    .as_deref()
                    .map_or(WgetOutput::Default, WgetOutput::File);
                let outcome = self.wget(&tool, url, output, &cwd);
                (target.clone(), outcome.map(|()| cwd.clone()))
            }
            "curl" => {
                let outcome = self.curl(&tool, url, target.as_deref(), cache, &cwd);
                (target.clone(), outcome.map(|()| cwd.clone()))
            }
            other => (
                None,
                Err(Error::execution(other, "not a supported downloader")),
            ),
        };

        match outcome {
            Ok(dir) => {
                let path = landing.unwrap_or(dir);
                debug!(%url, path = ?path, "Download complete");
                Ok(path)
            }
            Err(e) => {
                if let Some(partial) = landing
                    && fs::remove_file_best_effort(&partial)
                {
                    warn!(path = ?partial, "Removed partial download");
                }
                Err(e)
            }
        }
    }

    fn wget(
        &self,
        tool: &ResolvedTool,
        url: &str,
        output: WgetOutput<'_>,
        cwd: &Path,
    ) -> Result<()> {
        let args = wget_args(&self.config, tool, url, output);
        exec::run(tool.command().args(&args).current_dir(cwd), tool.name)
    }

    fn wget_timestamped(&mut self, tool: &ResolvedTool, url: &str, dir: &Path) -> Result<()> {
        let args = wget_args(&self.config, tool, url, WgetOutput::Timestamped);
        let scoped = self.dirs.scoped(dir)?;
        let cwd = scoped.current_directory()?;
        exec::run(tool.command().args(&args).current_dir(&cwd), tool.name)
    }

    fn curl(
        &self,
        tool: &ResolvedTool,
        url: &str,
        target: Option<&Path>,
        cache: bool,
        cwd: &Path,
    ) -> Result<()> {
        let mut cmd = tool.command();
        cmd.current_dir(cwd).stderr(Stdio::null());

        match target {
            Some(path) if cache && path.is_file() => {
                cmd.args(curl_args(&self.config, tool, url, CurlOutput::IfModified(path)));
            }
            Some(path) => {
                let file = File::create(path).map_err(|e| {
                    Error::io(e, Some(path.to_path_buf()), "creating download target")
                })?;
                cmd.args(curl_args(&self.config, tool, url, CurlOutput::Stdout))
                    .stdout(Stdio::from(file));
            }
            None => {
                cmd.args(curl_args(&self.config, tool, url, CurlOutput::RemoteName));
            }
        }

        exec::run(&mut cmd, tool.name)
    }
}
