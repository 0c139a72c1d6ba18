use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Ok, Result, bail};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod check;

const BIN_NAME: &str = "flowcov";

/// Stand-in for `flow`: prints `<file>.coverage.json` for `flow coverage --json <file>`.
const FAKE_FLOW: &str = "#!/bin/sh\ncat \"$3.coverage.json\"\n";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    /// Canned `flow coverage --json` output for `path`.
    pub fn write_coverage(&self, path: &str, json: &str) -> Result<()> {
        self.write_file(&format!("{}.coverage.json", path), json)
    }

    /// Install the fake flow binary and return its path.
    #[cfg(unix)]
    pub fn install_fake_flow(&self) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let bin = self.project_dir.join("bin/flow");
        self.write_file("bin/flow", FAKE_FLOW)?;
        let mut perms = fs::metadata(&bin)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&bin, perms)?;
        Ok(bin)
    }

    /// Turn the project into a git repository with everything committed.
    pub fn git_commit_all(&self) -> Result<()> {
        fs::remove_dir_all(self.project_dir.join(".git"))?;
        self.git(&["init", "-q"])?;
        self.git(&["add", "."])?;
        self.git(&["commit", "-q", "-m", "initial"])
    }

    fn git(&self, args: &[&str]) -> Result<()> {
        let output = Command::new("git")
            .args([
                "-c",
                "user.name=flowcov",
                "-c",
                "user.email=flowcov@example.com",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .current_dir(&self.project_dir)
            .env_remove("GIT_DIR")
            .env_remove("GIT_WORK_TREE")
            .env_remove("GIT_INDEX_FILE")
            .output()
            .context("Failed to run git")?;
        if !output.status.success() {
            bail!("git {:?} failed: {}", args, stderr_of(&output));
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        if let Some(path) = std::env::var_os("PATH") {
            cmd.env("PATH", path); // The fake flow script needs `cat`
        }
        cmd
    }

    /// Like [`CliTest::command`], but run from a subdirectory of the project.
    pub fn command_in(&self, subdir: &str) -> Command {
        let mut cmd = self.command();
        cmd.current_dir(self.project_dir.join(subdir));
        cmd
    }

    pub fn check_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("check").arg("--flow-bin").arg("./bin/flow");
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
