//! Script resolution and the drawing-routine registry.
//!
//! Every figure command names a script file. The file itself must exist
//! (resolving and opening it is what lets the host track it as a build
//! dependency), but the drawing routine behind it is compiled in: the
//! [`ScriptRegistry`] maps script stems to [`EntryPoint`]s registered by
//! the embedding application. A script file with no registered routine is
//! a contract violation, same as a file that is missing outright.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::context::FigureContext;
use crate::errors::{ContractViolation, Error, NotFound, RenderFailure};
use crate::figure::Figure;
use crate::host::Host;
use crate::log::debug;
use crate::value::ParsedCall;

/// Extension appended to script names given without one.
pub const SCRIPT_EXTENSION: &str = "py";

/// A plain drawing routine: receives the figure and the call arguments.
pub type DrawFn = fn(&mut Figure, &ParsedCall) -> Result<(), RenderFailure>;

/// A context-aware drawing routine: additionally receives the
/// [`FigureContext`], for routines that need the requested geometry or
/// output location.
pub type ContextDrawFn =
    for<'a, 'h> fn(&'a FigureContext<'h>, &mut Figure, &ParsedCall) -> Result<(), RenderFailure>;

/// The compiled routine behind one script.
#[derive(Debug, Clone, Copy)]
pub enum EntryPoint {
    Plain(DrawFn),
    ContextAware(ContextDrawFn),
}

/// Registry of drawing routines, keyed by script stem (`"fig"` for
/// `fig.py`).
#[derive(Debug, Default)]
pub struct ScriptRegistry {
    entries: BTreeMap<String, EntryPoint>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a routine. A later registration for the same stem replaces
    /// the earlier one.
    pub fn register(&mut self, stem: &str, entry: EntryPoint) -> &mut Self {
        self.entries.insert(stem.to_string(), entry);
        self
    }

    pub fn get(&self, stem: &str) -> Option<EntryPoint> {
        self.entries.get(stem).copied()
    }
}

/// A script that resolved to an existing file with a registered routine.
#[derive(Debug, Clone)]
pub struct LoadedScript {
    pub path: PathBuf,
    pub entry: EntryPoint,
}

/// Resolves script names to paths and loads them against a registry.
#[derive(Debug, Default)]
pub struct ScriptLoader;

impl ScriptLoader {
    /// Resolve a script name to a path, without touching the filesystem.
    ///
    /// The search root is the host's script directory; when the host is
    /// processing files relative to their own location, the script
    /// directory is joined onto the current file's directory and must
    /// therefore be relative.
    pub fn resolve(host: &dyn Host, name: &str) -> Result<PathBuf, Error> {
        let script_path = host.script_path();
        let root = match host.current_file_dir() {
            Some(dir) => {
                if script_path.is_absolute() {
                    return Err(ContractViolation {
                        script: script_path,
                        message: "script directory must be relative when scripts \
                                  are resolved against the current file"
                            .to_string(),
                    }
                    .into());
                }
                dir.join(&script_path)
            }
            None => script_path,
        };
        Ok(root.join(name))
    }

    /// Resolve, open, and look up a script.
    ///
    /// The file is opened and read through the host even though its
    /// contents are not executed, so the host records it as a dependency
    /// and a change to it invalidates the figure on the next pass.
    pub fn load(
        host: &dyn Host,
        registry: &ScriptRegistry,
        name: &str,
    ) -> Result<LoadedScript, Error> {
        let path = Self::resolve(host, name)?;
        debug!("loading figure script from {:?}", path);

        let mut reader = host.open(&path).map_err(|_| NotFound::Script {
            name: name.to_string(),
            resolved: path.clone(),
        })?;
        let mut source = String::new();
        reader
            .read_to_string(&mut source)
            .map_err(RenderFailure::from)?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());

        let entry = registry.get(&stem).ok_or_else(|| ContractViolation {
            script: path.clone(),
            message: format!("no drawing routine registered for `{stem}`"),
        })?;

        Ok(LoadedScript { path, entry })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::io;

    #[derive(Debug)]
    struct TestHost {
        script_dir: PathBuf,
        file_dir: Option<PathBuf>,
        opened: RefCell<Vec<PathBuf>>,
    }

    impl Host for TestHost {
        fn font_size(&self) -> String {
            "10".into()
        }
        fn text_width(&self) -> String {
            "72.27".into()
        }
        fn line_width(&self) -> String {
            "72.27".into()
        }
        fn output_dir(&self) -> PathBuf {
            PathBuf::from(".")
        }
        fn script_path(&self) -> PathBuf {
            self.script_dir.clone()
        }
        fn current_file_dir(&self) -> Option<PathBuf> {
            self.file_dir.clone()
        }
        fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
            self.opened.borrow_mut().push(path.to_path_buf());
            Ok(Box::new(fs::File::open(path)?))
        }
        fn add_created(&self, _path: &Path) {}
    }

    fn noop(_fig: &mut Figure, _call: &ParsedCall) -> Result<(), RenderFailure> {
        Ok(())
    }

    #[test]
    fn loads_registered_script_and_records_dependency() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fig.py"), "def main(): pass\n").unwrap();

        let host = TestHost {
            script_dir: dir.path().to_path_buf(),
            file_dir: None,
            opened: RefCell::new(Vec::new()),
        };
        let mut registry = ScriptRegistry::new();
        registry.register("fig", EntryPoint::Plain(noop));

        let loaded = ScriptLoader::load(&host, &registry, "fig.py").unwrap();
        assert_eq!(loaded.path, dir.path().join("fig.py"));
        assert!(matches!(loaded.entry, EntryPoint::Plain(_)));
        assert_eq!(host.opened.borrow().as_slice(), &[dir.path().join("fig.py")]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let host = TestHost {
            script_dir: dir.path().to_path_buf(),
            file_dir: None,
            opened: RefCell::new(Vec::new()),
        };
        let registry = ScriptRegistry::new();

        let err = ScriptLoader::load(&host, &registry, "ghost.py").unwrap_err();
        match err {
            Error::NotFound(NotFound::Script { name, resolved }) => {
                assert_eq!(name, "ghost.py");
                assert_eq!(resolved, dir.path().join("ghost.py"));
            }
            other => panic!("expected missing-script error, got {other:?}"),
        }
    }

    #[test]
    fn existing_file_without_routine_is_contract_violation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fig.py"), "").unwrap();
        let host = TestHost {
            script_dir: dir.path().to_path_buf(),
            file_dir: None,
            opened: RefCell::new(Vec::new()),
        };
        let registry = ScriptRegistry::new();

        let err = ScriptLoader::load(&host, &registry, "fig.py").unwrap_err();
        assert!(matches!(err, Error::Contract(_)));
    }

    #[test]
    fn relative_mode_joins_current_file_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("scripts")).unwrap();
        fs::write(dir.path().join("scripts/fig.py"), "").unwrap();

        let host = TestHost {
            script_dir: PathBuf::from("scripts"),
            file_dir: Some(dir.path().to_path_buf()),
            opened: RefCell::new(Vec::new()),
        };
        let mut registry = ScriptRegistry::new();
        registry.register("fig", EntryPoint::Plain(noop));

        let loaded = ScriptLoader::load(&host, &registry, "fig.py").unwrap();
        assert_eq!(loaded.path, dir.path().join("scripts/fig.py"));
    }

    #[test]
    fn relative_mode_rejects_absolute_script_dir() {
        let dir = tempfile::tempdir().unwrap();
        let host = TestHost {
            script_dir: dir.path().to_path_buf(),
            file_dir: Some(dir.path().to_path_buf()),
            opened: RefCell::new(Vec::new()),
        };
        let err = ScriptLoader::resolve(&host, "fig.py").unwrap_err();
        assert!(matches!(err, Error::Contract(_)));
    }
}
