//! External collaborators: the build tool and the container runtime.
//!
//! The workflows only see the [`BuildInvoker`] and [`SessionRunner`] traits;
//! the process-backed types here shell out and block until the child exits.
//! Child processes inherit stdio so interactive sessions get the terminal.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use components_core::{ComponentName, ProjectFile};

use crate::error::WorkflowError;

/// Image tag used by `run` and `edit`.
pub const EDITOR_TAG: &str = "editor";

/// Command run in a container when none is given.
pub const DEFAULT_COMMAND: &str = "/bin/bash";

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of an external process run to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// `exit_code` is `None` when the process was terminated by a signal.
    Failure { exit_code: Option<i32> },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl From<ExitStatus> for Outcome {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            Outcome::Success
        } else {
            Outcome::Failure {
                exit_code: status.code(),
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Failure { exit_code: Some(code) } => write!(f, "exit code {code}"),
            Outcome::Failure { exit_code: None } => write!(f, "terminated by signal"),
        }
    }
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Builds component images.
pub trait BuildInvoker {
    /// Build `components`, supplied in dependency order. An empty slice means
    /// "everything".
    fn build(&mut self, components: &[ComponentName]) -> Result<Outcome, WorkflowError>;
}

/// Runs a blocking interactive session against a component.
pub trait SessionRunner {
    fn run_session(&mut self, component: &ComponentName) -> Result<Outcome, WorkflowError>;
}

// ---------------------------------------------------------------------------
// Build tool
// ---------------------------------------------------------------------------

/// `<program> build <component>...`, run from the project root.
#[derive(Debug, Clone)]
pub struct BuildTool {
    program: String,
    project_dir: PathBuf,
}

impl BuildTool {
    pub fn new(program: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            project_dir: project_dir.into(),
        }
    }

    /// Arguments passed to the build program.
    pub fn args(components: &[ComponentName]) -> Vec<String> {
        std::iter::once("build".to_string())
            .chain(components.iter().map(|c| c.0.clone()))
            .collect()
    }
}

impl BuildInvoker for BuildTool {
    fn build(&mut self, components: &[ComponentName]) -> Result<Outcome, WorkflowError> {
        let args = Self::args(components);
        tracing::debug!("build command: {} {}", self.program, args.join(" "));
        let mut cmd = Command::new(&self.program);
        cmd.args(&args).current_dir(&self.project_dir);
        status(cmd, &self.program)
    }
}

// ---------------------------------------------------------------------------
// Container runtime
// ---------------------------------------------------------------------------

/// A docker-compatible CLI used to run component images with the
/// `components/` directory mounted at the image's working directory.
#[derive(Debug, Clone)]
pub struct ContainerRuntime {
    program: String,
    project_dir: PathBuf,
    project: ProjectFile,
}

impl ContainerRuntime {
    pub fn new(program: impl Into<String>, project_dir: impl Into<PathBuf>, project: ProjectFile) -> Self {
        Self {
            program: program.into(),
            project_dir: project_dir.into(),
            project,
        }
    }

    /// `<project>-<component>:<tag>`
    pub fn image(&self, component: &ComponentName, tag: &str) -> String {
        self.project.image(component, tag)
    }

    /// Whether `image` exists locally (`<program> inspect <image>`).
    pub fn image_exists(&self, image: &str) -> Result<bool, WorkflowError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["inspect", image])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        Ok(status(cmd, &self.program)?.is_success())
    }

    /// The working directory baked into `image`, found by running `pwd` in it.
    pub fn workdir(&self, image: &str) -> Result<PathBuf, WorkflowError> {
        let output = Command::new(&self.program)
            .args(["run", "--rm", image, "pwd"])
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| spawn_err(&self.program, e))?;
        let outcome = Outcome::from(output.status);
        if !outcome.is_success() {
            return Err(WorkflowError::ContainerFailed {
                image: image.to_string(),
                outcome,
            });
        }
        let dir = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(PathBuf::from(dir))
    }

    /// Run `command` in the component's `tag` image.
    ///
    /// With `in_component_dir` the container starts in
    /// `<workdir>/<component>` instead of the image's working directory.
    pub fn run(
        &self,
        component: &ComponentName,
        tag: &str,
        command: &[String],
        in_component_dir: bool,
    ) -> Result<Outcome, WorkflowError> {
        let image = self.image(component, tag);
        let workdir = self.workdir(&image)?;
        let args = run_args(
            &self.project_dir,
            &workdir,
            &image,
            in_component_dir.then_some(component),
            command,
        );
        tracing::debug!("running container: {} {}", self.program, args.join(" "));
        let mut cmd = Command::new(&self.program);
        cmd.args(&args);
        status(cmd, &self.program)
    }
}

/// Arguments for an interactive `run` with `components/` mounted at `workdir`.
pub fn run_args(
    project_dir: &Path,
    workdir: &Path,
    image: &str,
    component_dir: Option<&ComponentName>,
    command: &[String],
) -> Vec<String> {
    let mount = format!(
        "{}/{}:{}",
        host_path(project_dir),
        components_core::registry::COMPONENTS_DIR,
        workdir.display()
    );
    let mut args: Vec<String> = ["run", "--rm", "-it", "-v"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    args.push(mount);
    if let Some(component) = component_dir {
        args.push("-w".to_string());
        args.push(workdir.join(&component.0).display().to_string());
    }
    args.push(image.to_string());
    args.extend(command.iter().cloned());
    args
}

/// Host path as the container CLI expects it; Cygwin's `/cygdrive` prefix is dropped.
fn host_path(path: &Path) -> String {
    let display = path.display().to_string();
    match display.strip_prefix("/cygdrive") {
        Some(rest) => rest.to_string(),
        None => display,
    }
}

/// The interactive `edit` session: a shell in the component's editor image,
/// started in the component's directory.
#[derive(Debug, Clone, Copy)]
pub struct EditorSession<'a> {
    runtime: &'a ContainerRuntime,
}

impl<'a> EditorSession<'a> {
    pub fn new(runtime: &'a ContainerRuntime) -> Self {
        Self { runtime }
    }
}

impl SessionRunner for EditorSession<'_> {
    fn run_session(&mut self, component: &ComponentName) -> Result<Outcome, WorkflowError> {
        self.runtime
            .run(component, EDITOR_TAG, &[DEFAULT_COMMAND.to_string()], true)
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn status(mut cmd: Command, program: &str) -> Result<Outcome, WorkflowError> {
    cmd.status()
        .map(Outcome::from)
        .map_err(|e| spawn_err(program, e))
}

fn spawn_err(program: &str, source: std::io::Error) -> WorkflowError {
    WorkflowError::Spawn {
        program: program.to_string(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
