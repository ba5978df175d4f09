//! End-to-end sync scenarios driven through the engine and scheduler.

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use projsync_core::{
    CancellationToken, Error, ManifestStore, Scheduler, SchedulerState, SyncConfig, SyncEngine,
    SyncPass, backup_path,
};
use projsync_fs::LockedFile;
use projsync_test_utils::{TestProject, manifest_with_items};

fn run_once(engine: &SyncEngine) -> projsync_core::Result<Vec<SyncPass>> {
    let mut passes = Vec::new();
    let mut scheduler = Scheduler::new(engine.config().interval());
    scheduler.run(&CancellationToken::new(), || engine.run_pass(), |outcome| {
        if let Ok(pass) = outcome {
            passes.push(pass.clone());
        }
    })?;
    Ok(passes)
}

#[test]
fn test_new_source_file_is_compiled() {
    let project = TestProject::new()
        .with_manifest(&[])
        .with_file("Program.cs", "class Program {}");
    let engine = SyncEngine::new(
        project.root(),
        SyncConfig {
            write_backup: false,
            ..SyncConfig::default()
        },
    )
    .unwrap();

    let passes = run_once(&engine).unwrap();

    assert_eq!(passes.len(), 1);
    assert!(passes[0].mutated);
    assert_eq!(
        project.read_manifest(),
        manifest_with_items(&[("Compile", "Program.cs")])
    );
}

#[test]
fn test_deleted_file_loses_its_entry() {
    let project = TestProject::new().with_manifest(&[("Content", "old.txt")]);
    let engine = SyncEngine::new(project.root(), SyncConfig::default()).unwrap();

    let passes = run_once(&engine).unwrap();

    assert!(passes[0].mutated);
    assert_eq!(passes[0].removed.len(), 1);
    assert_eq!(project.read_manifest(), manifest_with_items(&[]));
}

#[test]
fn test_excluded_output_is_ignored() {
    let project = TestProject::new()
        .with_manifest(&[("Compile", "Program.cs")])
        .with_file("Program.cs", "")
        .with_file("bin/output.dll", "")
        .with_file("bin/Debug/output.pdb", "");
    let before = project.read_manifest();
    let engine = SyncEngine::new(project.root(), SyncConfig::default()).unwrap();

    let passes = run_once(&engine).unwrap();

    assert!(!passes[0].mutated);
    assert!(passes[0].added.is_empty());
    assert_eq!(project.read_manifest(), before);
    assert!(project.backups().is_empty());
}

#[test]
fn test_zero_interval_runs_a_single_pass() {
    let project = TestProject::new().with_manifest(&[]);
    let engine = SyncEngine::new(project.root(), SyncConfig::default()).unwrap();
    assert_eq!(engine.config().interval(), None);

    let mut scheduler = Scheduler::new(Some(Duration::ZERO));
    let started = Instant::now();
    let summary = scheduler
        .run(&CancellationToken::new(), || engine.run_pass(), |_| {})
        .unwrap();

    assert_eq!(summary.passes, 1);
    assert_eq!(summary.state, SchedulerState::Stopped);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_two_manifests_touch_nothing() {
    let project = TestProject::new()
        .with_manifest(&[])
        .with_file("Second.csproj", "<Project />")
        .with_file("Program.cs", "");
    let before = project.read_manifest();

    let result = SyncEngine::new(project.root(), SyncConfig::default());

    assert!(matches!(result, Err(Error::ManifestNotFound { found: 2, .. })));
    assert_eq!(project.read_manifest(), before);
    assert!(project.backups().is_empty());
}

#[test]
fn test_backup_holds_pre_pass_bytes() {
    let project = TestProject::new()
        .with_manifest(&[("Content", "old.txt")])
        .with_file("Program.cs", "");
    let before = project.read_manifest();
    let engine = SyncEngine::new(project.root(), SyncConfig::default()).unwrap();

    let pass = engine.run_pass().unwrap();

    let backup = pass.backup.expect("mutating pass writes a backup");
    assert_eq!(backup, backup_path(project.root(), "csproj", pass.started_at));
    assert_eq!(project.backups(), vec![backup.clone()]);
    assert_eq!(std::fs::read_to_string(&backup).unwrap(), before);
}

#[test]
fn test_locked_manifest_fails_the_pass() {
    let project = TestProject::new()
        .with_manifest(&[])
        .with_file("Program.cs", "");
    let before = project.read_manifest();
    let engine = SyncEngine::new(project.root(), SyncConfig::default()).unwrap();

    let held = LockedFile::try_open(project.manifest_path()).unwrap();
    let blocked = ManifestStore::open(project.root(), "csproj");
    assert!(matches!(blocked, Err(Error::ManifestLocked { .. })));
    assert!(matches!(engine.run_pass(), Err(Error::ManifestLocked { .. })));
    held.unlock().unwrap();

    assert_eq!(project.read_manifest(), before);
    assert!(engine.run_pass().unwrap().mutated);
}

#[test]
fn test_polling_picks_up_changes_between_passes() {
    let project = TestProject::new()
        .with_manifest(&[])
        .with_file("Program.cs", "");
    let engine = SyncEngine::new(
        project.root(),
        SyncConfig {
            write_backup: false,
            ..SyncConfig::default()
        },
    )
    .unwrap();
    let token = CancellationToken::new();
    let mut scheduler =
        Scheduler::new(Some(Duration::from_millis(20))).with_tick(Duration::from_millis(5));
    let mut passes: Vec<SyncPass> = Vec::new();
    let mut count = 0;

    let summary = scheduler
        .run(
            &token,
            || {
                count += 1;
                match count {
                    2 => project.write_file("Views/Index.cshtml", ""),
                    3 => project.remove_file("Program.cs"),
                    4 => token.cancel(),
                    _ => {}
                }
                engine.run_pass()
            },
            |outcome| passes.push(outcome.as_ref().unwrap().clone()),
        )
        .unwrap();

    assert_eq!(summary.passes, 4);
    assert_eq!(summary.failures, 0);
    let mutated: Vec<bool> = passes.iter().map(|p| p.mutated).collect();
    assert_eq!(mutated, vec![true, true, true, false]);
    assert_eq!(
        project.read_manifest(),
        manifest_with_items(&[("Compile", "Views\\Index.cshtml")])
    );
}

#[test]
fn test_polling_survives_a_failed_pass() {
    let project = TestProject::new()
        .with_manifest(&[])
        .with_file("Program.cs", "");
    let engine = SyncEngine::new(
        project.root(),
        SyncConfig {
            write_backup: false,
            ..SyncConfig::default()
        },
    )
    .unwrap();
    let token = CancellationToken::new();
    let mut scheduler =
        Scheduler::new(Some(Duration::from_millis(10))).with_tick(Duration::from_millis(2));
    let mut held = Some(LockedFile::try_open(project.manifest_path()).unwrap());
    let mut count = 0;

    let summary = scheduler
        .run(
            &token,
            || {
                count += 1;
                if count == 2 {
                    if let Some(lock) = held.take() {
                        lock.unlock()?;
                    }
                    token.cancel();
                }
                engine.run_pass()
            },
            |_| {},
        )
        .unwrap();

    assert_eq!(summary.passes, 2);
    assert_eq!(summary.failures, 1);
    project.assert_manifest_contains("<Compile Include=\"Program.cs\" />");
}
