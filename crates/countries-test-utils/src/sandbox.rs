//! Hermetic test sandbox for the `countries` binary.
//!
//! - Private home directory via `COUNTRIES_HOME`, so preference writes never
//!   touch the real `~/.countries`
//! - Catalog API pointed at an unroutable address; tests feed data through
//!   `--catalog-file` instead
//! - `RUST_LOG` cleared so log output never leaks into snapshots
//!
//! Everything lives under an `assert_fs::TempDir` and is cleaned up on drop.
//!
//! ## Quick example
//! ```no_run
//! use countries_test_utils::sandbox::Sandbox;
//!
//! let mut sb = Sandbox::new();
//! sb.seed_catalog();
//! let output = sb.snapshot_run("countries", ["--catalog-file", "countries.json", "list"]);
//! println!("{output}");
//! ```

use assert_fs::TempDir;
use assert_fs::fixture::PathChild;
use duct::Expression;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::CATALOG_FIXTURE;

/// Nothing listens here; any test that reaches the network fails fast.
pub const UNREACHABLE_API_URL: &str = "http://127.0.0.1:9";

pub struct Sandbox {
    root: TempDir,
    pub home: PathBuf,
    api_url: String,
    default_cwd: PathBuf,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    /// Create a new sandbox; all state is under an auto-cleaned TempDir.
    pub fn new() -> Self {
        let root = TempDir::new().expect("create sandbox TempDir");
        let home = root.child("home").to_path_buf();
        fs::create_dir_all(&home).expect("create home dir");
        let default_cwd = root.path().to_path_buf();

        Self {
            root,
            home,
            api_url: UNREACHABLE_API_URL.to_string(),
            default_cwd,
        }
    }

    /// Absolute path to the sandbox root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path of the preference file the binary reads and writes.
    pub fn preferences_path(&self) -> PathBuf {
        self.home.join(".countries").join("preferences.toml")
    }

    /// Write/overwrite a file relative to the sandbox root.
    pub fn write<P: AsRef<Path>, S: AsRef<[u8]>>(&mut self, rel: P, contents: S) -> &mut Self {
        let p = self.root_path().join(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(p, contents).expect("write file");
        self
    }

    /// Write the bundled catalog fixture to `countries.json` at the sandbox root.
    pub fn seed_catalog(&mut self) -> &mut Self {
        self.write("countries.json", CATALOG_FIXTURE)
    }

    /// Build a `duct::Expression` for a cargo binary, pre-wired with the
    /// sandbox env and cwd. Exit status is not checked.
    pub fn cmd<I>(&self, program: &str, args: I) -> Expression
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let bin = assert_cmd::cargo::cargo_bin(program)
            .to_string_lossy()
            .to_string();
        let args: Vec<_> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string_lossy().to_string())
            .collect();
        let expr = duct::cmd(bin, args)
            .dir(&self.default_cwd)
            .unchecked();
        self.inject_env(expr)
    }

    /// Run a cargo binary and return stdout. Errors on non-zero exit.
    pub fn run<I>(&self, program: &str, args: I) -> Result<String, String>
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let output = self
            .cmd(program, args)
            .stdout_capture()
            .stderr_capture()
            .run()
            .map_err(|e| format!("command failed: {e}"))?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(format!(
                "command exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            ))
        }
    }

    /// Run a cargo binary and render exit code, stdout, and stderr as one
    /// string suitable for `assert_snapshot!`.
    pub fn snapshot_run<I>(&self, program: &str, args: I) -> String
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let output = self
            .cmd(program, args)
            .stdout_capture()
            .stderr_capture()
            .run()
            .expect("spawn command");

        let code = output
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        let stdout = String::from_utf8_lossy(&output.stdout).replace("\r\n", "\n");
        let stderr = String::from_utf8_lossy(&output.stderr).replace("\r\n", "\n");
        let root = self.root_path().to_string_lossy().into_owned();

        format!("Exit Code: {code}\n--- STDOUT ---\n{stdout}\n--- STDERR ---\n{stderr}")
            .replace(&root, "<ROOT>")
    }

    pub fn inject_env(&self, expr: Expression) -> Expression {
        let mut env_map: HashMap<String, String> = HashMap::new();
        if let Ok(path) = std::env::var("PATH") {
            env_map.insert("PATH".into(), path);
        }
        env_map.insert("HOME".into(), self.home.to_string_lossy().into_owned());
        env_map.insert(
            "COUNTRIES_HOME".into(),
            self.home.to_string_lossy().into_owned(),
        );
        env_map.insert("COUNTRIES_API_URL".into(), self.api_url.clone());
        env_map.insert("NO_COLOR".into(), "1".into());
        env_map.insert("TERM".into(), "dumb".into());

        expr.full_env(&env_map)
    }
}
