//! Per-workflow execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pkgfs_core::{Config, Result};

use crate::capability::Capability;
use crate::dirstack::DirectoryStack;
use crate::registry::{ResolvedTool, ToolRegistry};

/// One workflow's view of the world.
///
/// Each context owns its own [`DirectoryStack`], so independent workflows
/// (for example parallel package builds) never see each other's directory
/// changes. The configuration and [`ToolRegistry`] are shared, which keeps
/// tool resolution to one probe per capability.
#[derive(Debug, Clone)]
pub struct Context {
    pub(crate) config: Arc<Config>,
    pub(crate) registry: Arc<ToolRegistry>,
    pub(crate) dirs: DirectoryStack,
}

impl Context {
    /// Create a context with its own registry over the process working directory.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(ToolRegistry::new(&config));
        Self::with_registry(Arc::new(config), registry)
    }

    /// Create a context sharing an existing registry.
    #[must_use]
    pub fn with_registry(config: Arc<Config>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            config,
            registry,
            dirs: DirectoryStack::new(),
        }
    }

    /// Create a context from the discovered configuration and the
    /// process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn from_env() -> Result<Self> {
        let config = Config::discover()?;
        let registry = ToolRegistry::shared(&config);
        Ok(Self::with_registry(Arc::new(config), registry))
    }

    /// Replace the base directory the stack folds over.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.dirs = DirectoryStack::with_base(base);
        self
    }

    /// A new context for an independent workflow: same config, registry and
    /// base directory, empty directory stack.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            registry: Arc::clone(&self.registry),
            dirs: self.dirs.fresh(),
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The tool registry in use.
    #[must_use]
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// The directory stack.
    #[must_use]
    pub fn dirs(&self) -> &DirectoryStack {
        &self.dirs
    }

    /// Resolve a capability through the shared registry.
    #[must_use]
    pub fn resolve(&self, capability: Capability) -> Option<&ResolvedTool> {
        self.registry.resolve(capability)
    }

    /// The logical current directory.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if the base directory cannot be determined.
    pub fn current_directory(&self) -> Result<PathBuf> {
        self.dirs.current_directory()
    }

    /// See [`DirectoryStack::change_dir`].
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not an existing directory.
    pub fn change_dir(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.dirs.change_dir(path)
    }

    /// See [`DirectoryStack::change_dir_to_root`].
    pub fn change_dir_to_root(&mut self) {
        self.dirs.change_dir_to_root();
    }

    /// See [`DirectoryStack::pop_dir`].
    pub fn pop_dir(&mut self) -> bool {
        self.dirs.pop_dir()
    }

    /// Make `path` absolute against the logical current directory.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if the current directory is unknown.
    pub fn absolute(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        Ok(pkgfs_core::fs::absolutize(
            path.as_ref(),
            &self.current_directory()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fork_isolates_stacks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("build")).unwrap();
        let mut ctx = Context::new(Config::default()).with_base(dir.path());
        let mut other = ctx.fork();

        ctx.change_dir("build").unwrap();
        assert_eq!(ctx.current_directory().unwrap(), dir.path().join("build"));
        assert_eq!(other.current_directory().unwrap(), dir.path());
        assert!(!other.pop_dir());
        assert!(Arc::ptr_eq(ctx.registry(), other.registry()));
    }

    #[test]
    fn test_absolute_uses_logical_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("work")).unwrap();
        let mut ctx = Context::new(Config::default()).with_base(dir.path());
        ctx.change_dir("work").unwrap();

        assert_eq!(
            ctx.absolute("pkg.tar.gz").unwrap(),
            dir.path().join("work/pkg.tar.gz")
        );
        assert_eq!(ctx.absolute("/etc/hosts").unwrap(), PathBuf::from("/etc/hosts"));
    }
}
