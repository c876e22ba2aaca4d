//! Edit-rebuild protocol.
//!
//! 1. Fingerprint the component's `poetry.lock`.
//! 2. Run the interactive session; a failed session aborts with no rebuild.
//! 3. Fingerprint again. Equal fingerprints (including both absent) end the
//!    workflow without touching the build tool.
//! 4. Rebuild the dependency graph from the current configs and resolve the
//!    component's dependents in build order. Graph errors abort here, before
//!    any build is started.
//! 5. Build the component alone, then its dependents in one call.
//!
//! Nothing is retried and a successful first build is never rolled back.

use components_core::{fingerprint, ComponentName, DependencyGraph, Registry};

use crate::error::WorkflowError;
use crate::process::{BuildInvoker, SessionRunner};

/// What an edit session led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The lock file did not change; nothing was built.
    Unchanged,
    /// The component and its `dependents` (in build order) were rebuilt.
    Rebuilt {
        component: ComponentName,
        dependents: Vec<ComponentName>,
    },
}

/// Run the edit-rebuild protocol for `component`.
pub fn edit_component<S, B>(
    registry: &Registry,
    component: &ComponentName,
    session: &mut S,
    builder: &mut B,
) -> Result<EditOutcome, WorkflowError>
where
    S: SessionRunner + ?Sized,
    B: BuildInvoker + ?Sized,
{
    let before = fingerprint::lock_fingerprint(registry, component)?;

    let outcome = session.run_session(component)?;
    if !outcome.is_success() {
        tracing::warn!(%component, %outcome, "encountered an error when editing the component");
        return Err(WorkflowError::SessionFailed {
            component: component.clone(),
            outcome,
        });
    }

    let after = fingerprint::lock_fingerprint(registry, component)?;
    if before == after {
        tracing::info!("No changes detected; will not rebuild the component image");
        return Ok(EditOutcome::Unchanged);
    }

    let graph = DependencyGraph::build(registry)?;
    let dependents = graph.dependents_for(component)?;
    if dependents.is_empty() {
        tracing::info!("Changes detected; building the updated component image");
    } else {
        tracing::info!(
            "Changes detected; building the updated component image and dependent components: {}",
            components_core::error::join_names(&dependents, ", ")
        );
    }

    let first = builder.build(std::slice::from_ref(component))?;
    if !first.is_success() {
        tracing::error!("Failed to build {component} component after you edited it");
        return Err(WorkflowError::BuildFailed {
            targets: vec![component.clone()],
            outcome: first,
        });
    }

    if !dependents.is_empty() {
        let second = builder.build(&dependents)?;
        if !second.is_success() {
            tracing::error!("Failed to build all dependent components after you edited {component}");
            return Err(WorkflowError::BuildFailed {
                targets: dependents,
                outcome: second,
            });
        }
    }

    Ok(EditOutcome::Rebuilt {
        component: component.clone(),
        dependents,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use components_core::{config, fingerprint::LOCK_FILE, registry};
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::process::Outcome;

    /// Session that optionally rewrites the lock file before "exiting".
    struct ScriptedSession {
        lock: PathBuf,
        write: Option<&'static str>,
        outcome: Outcome,
        calls: usize,
    }

    impl SessionRunner for ScriptedSession {
        fn run_session(&mut self, _component: &ComponentName) -> Result<Outcome, WorkflowError> {
            self.calls += 1;
            if let Some(contents) = self.write {
                std::fs::write(&self.lock, contents).expect("write lock");
            }
            Ok(self.outcome)
        }
    }

    #[derive(Default)]
    struct RecordingBuilder {
        calls: Vec<Vec<String>>,
        fail_on_call: Option<usize>,
    }

    impl BuildInvoker for RecordingBuilder {
        fn build(&mut self, components: &[ComponentName]) -> Result<Outcome, WorkflowError> {
            self.calls
                .push(components.iter().map(|c| c.0.clone()).collect());
            if self.fail_on_call == Some(self.calls.len()) {
                Ok(Outcome::Failure { exit_code: Some(1) })
            } else {
                Ok(Outcome::Success)
            }
        }
    }

    fn project(deps: &[(&str, &str)]) -> (TempDir, Registry) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join(registry::COMPONENTS_DIR);
        for (component, yaml) in deps {
            let dir = root.join(component);
            std::fs::create_dir_all(&dir).unwrap();
            if !yaml.is_empty() {
                std::fs::write(dir.join(config::CONFIG_FILE), yaml).unwrap();
            }
        }
        let reg = Registry::discover(tmp.path()).unwrap();
        (tmp, reg)
    }

    fn session(reg: &Registry, component: &str, write: Option<&'static str>) -> ScriptedSession {
        ScriptedSession {
            lock: reg.component_dir(&component.into()).join(LOCK_FILE),
            write,
            outcome: Outcome::Success,
            calls: 0,
        }
    }

    #[test]
    fn absent_lock_before_and_after_is_unchanged() {
        let (_tmp, reg) = project(&[("x", "")]);
        let mut session = session(&reg, "x", None);
        let mut builder = RecordingBuilder::default();
        let outcome = edit_component(&reg, &"x".into(), &mut session, &mut builder).unwrap();
        assert_eq!(outcome, EditOutcome::Unchanged);
        assert_eq!(session.calls, 1);
        assert!(builder.calls.is_empty());
    }

    #[test]
    fn rewriting_identical_content_is_unchanged() {
        let (_tmp, reg) = project(&[("x", "")]);
        let lock = reg.component_dir(&"x".into()).join(LOCK_FILE);
        std::fs::write(&lock, "same").unwrap();
        let mut session = session(&reg, "x", Some("same"));
        let mut builder = RecordingBuilder::default();
        let outcome = edit_component(&reg, &"x".into(), &mut session, &mut builder).unwrap();
        assert_eq!(outcome, EditOutcome::Unchanged);
        assert!(builder.calls.is_empty());
    }

    #[test]
    fn failed_session_aborts_without_building() {
        let (_tmp, reg) = project(&[("x", "")]);
        let mut session = session(&reg, "x", Some("changed"));
        session.outcome = Outcome::Failure { exit_code: Some(130) };
        let mut builder = RecordingBuilder::default();
        let err = edit_component(&reg, &"x".into(), &mut session, &mut builder).unwrap_err();
        assert!(matches!(err, WorkflowError::SessionFailed { .. }), "got: {err}");
        assert!(builder.calls.is_empty());
    }

    #[test]
    fn change_without_dependents_builds_once() {
        let (_tmp, reg) = project(&[("x", ""), ("other", "")]);
        let mut session = session(&reg, "x", Some("new lock"));
        let mut builder = RecordingBuilder::default();
        let outcome = edit_component(&reg, &"x".into(), &mut session, &mut builder).unwrap();
        assert_eq!(
            outcome,
            EditOutcome::Rebuilt {
                component: "x".into(),
                dependents: vec![]
            }
        );
        assert_eq!(builder.calls, vec![vec!["x".to_string()]]);
    }

    #[rstest]
    #[case::component_build(1, vec!["x"])]
    #[case::dependent_build(2, vec!["y", "z"])]
    fn failed_build_stops_at_that_stage(#[case] fail_on_call: usize, #[case] targets: Vec<&str>) {
        let (_tmp, reg) = project(&[
            ("x", ""),
            ("y", "dependencies: [x]\n"),
            ("z", "dependencies: [y]\n"),
        ]);
        let mut session = session(&reg, "x", Some("new lock"));
        let mut builder = RecordingBuilder {
            fail_on_call: Some(fail_on_call),
            ..Default::default()
        };
        let err = edit_component(&reg, &"x".into(), &mut session, &mut builder).unwrap_err();
        match err {
            WorkflowError::BuildFailed { targets: failed, .. } => {
                let failed: Vec<&str> = failed.iter().map(ComponentName::as_str).collect();
                assert_eq!(failed, targets);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(builder.calls.len(), fail_on_call);
    }

    #[test]
    fn cycle_introduced_during_session_blocks_every_build() {
        let (_tmp, reg) = project(&[("x", ""), ("y", "dependencies: [x]\n")]);
        // The session edits x's config to depend on y, closing a cycle.
        let x_config = reg.component_dir(&"x".into()).join(config::CONFIG_FILE);
        std::fs::write(&x_config, "dependencies: [y]\n").unwrap();
        let mut session = session(&reg, "x", Some("new lock"));
        let mut builder = RecordingBuilder::default();
        let err = edit_component(&reg, &"x".into(), &mut session, &mut builder).unwrap_err();
        assert_eq!(err.exit_code(), 15, "got: {err}");
        assert!(builder.calls.is_empty());
    }
}
