//! Unit tests for the bootstrap state machine and its collaborators.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rstest::{fixture, rstest};

use cronkeep_config::{DbField, DbSettings, InstallMarker};

use crate::bootstrap::{BootstrapError, BootstrapOutcome, BootstrapStage, bootstrap_with};
use crate::environment::{DirectoryAccess, EnvironmentProbes, NamedPlatform, PathError};
use crate::resources::{ResourceKind, Resources};

use super::support::{
    APP_CONFIG, FAKE_TOOL, FakeEnvironment, HealthEvent, RecordingHealthReporter,
    RecordingResourceProvider, ServiceRoot,
};

struct Harness {
    environment: FakeEnvironment,
    reporter: Arc<RecordingHealthReporter>,
    provider: RecordingResourceProvider,
}

impl Harness {
    fn run(
        &self,
        root: &ServiceRoot,
    ) -> Result<BootstrapOutcome<RecordingResourceProvider>, BootstrapError> {
        bootstrap_with(
            root.path(),
            &self.environment.probes(),
            self.reporter.clone(),
            &self.provider,
        )
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        environment: FakeEnvironment::default(),
        reporter: Arc::new(RecordingHealthReporter::default()),
        provider: RecordingResourceProvider::default(),
    }
}

#[rstest]
#[case("conf")]
#[case("log")]
#[case("data")]
fn each_missing_directory_halts_and_is_named(harness: Harness, #[case] missing: &str) {
    let root = ServiceRoot::installed();
    root.remove_dir(missing);

    let error = harness.run(&root).expect_err("bootstrap must fail");

    assert!(matches!(error, BootstrapError::Path { .. }), "{error}");
    assert!(
        error.to_string().contains(&root.dir(missing).display().to_string()),
        "{error}"
    );
    assert!(harness.provider.constructed().is_empty());
    assert!(harness.environment.exports().is_empty());
}

#[rstest]
fn directories_are_checked_in_fixed_order(harness: Harness) {
    let root = ServiceRoot::with_layout();

    harness.run(&root).expect("bootstrap should succeed");

    assert_eq!(
        harness.environment.checked(),
        vec![root.dir("conf"), root.dir("log"), root.dir("data")]
    );
}

#[rstest]
fn permission_denied_is_distinct_from_missing(harness: Harness) {
    let root = ServiceRoot::with_layout();
    harness.environment.deny(root.dir("conf"));

    let error = harness.run(&root).expect_err("bootstrap must fail");

    let message = error.to_string();
    assert!(message.contains("permission denied"), "{message}");
    assert!(!message.contains("does not exist"), "{message}");
}

#[rstest]
fn installation_state_follows_the_marker(harness: Harness) {
    let root = ServiceRoot::with_layout();
    root.write_app_config(APP_CONFIG);

    let outcome = harness.run(&root).expect("bootstrap should succeed");
    assert!(!outcome.context().installed());
    assert_eq!(outcome.stage(), BootstrapStage::NotInstalled);

    root.mark_installed();
    let outcome = harness.run(&root).expect("bootstrap should succeed");
    assert!(outcome.context().installed());
    assert_eq!(outcome.stage(), BootstrapStage::Ready);
}

#[rstest]
fn removing_the_marker_after_bootstrap_keeps_the_captured_state(harness: Harness) {
    let root = ServiceRoot::installed();
    let outcome = harness.run(&root).expect("bootstrap should succeed");

    root.remove_marker();

    assert!(outcome.context().installed());
    let marker = InstallMarker::for_paths(root.paths());
    assert!(!marker.is_installed().expect("marker state readable"));
}

#[rstest]
fn installed_bootstrap_reports_every_stage_in_order(harness: Harness) {
    let root = ServiceRoot::installed();

    harness.run(&root).expect("bootstrap should succeed");

    assert_eq!(
        harness.reporter.stages(),
        vec![
            BootstrapStage::Start,
            BootstrapStage::EnvironmentChecked,
            BootstrapStage::PathsVerified,
            BootstrapStage::InstallationDetermined,
            BootstrapStage::ResourcesInitialized,
            BootstrapStage::Ready,
        ]
    );
    let events = harness.reporter.events();
    assert_eq!(
        events.first(),
        Some(&HealthEvent::BootstrapStarting(root.path().to_path_buf()))
    );
    assert_eq!(events.last(), Some(&HealthEvent::BootstrapSucceeded));
    for kind in ResourceKind::ALL {
        assert!(events.contains(&HealthEvent::ResourceStarting(kind)));
        assert!(events.contains(&HealthEvent::ResourceReady(kind)));
    }
}

#[rstest]
fn storage_receives_the_literal_db_settings(harness: Harness) {
    let root = ServiceRoot::installed();

    let outcome = harness.run(&root).expect("bootstrap should succeed");

    let BootstrapOutcome::Ready(daemon) = outcome else {
        panic!("expected a ready daemon");
    };
    let settings = &daemon.resources().storage().value;
    assert_eq!(settings.as_map().len(), 8);
    assert_eq!(settings.get(DbField::User), "cron");
    assert_eq!(settings.get(DbField::Password), "hunter2");
    assert_eq!(settings.get(DbField::Prefix), "ck_");
    assert_eq!(
        daemon.resources().inventory().value,
        root.paths().hosts_file()
    );
}

#[rstest]
fn stopping_the_daemon_releases_in_reverse_order(harness: Harness) {
    let root = ServiceRoot::installed();
    let BootstrapOutcome::Ready(daemon) = harness.run(&root).expect("bootstrap should succeed")
    else {
        panic!("expected a ready daemon");
    };

    daemon.stop();

    assert_eq!(
        harness.provider.released(),
        vec![
            ResourceKind::TaskRunner,
            ResourceKind::Scheduler,
            ResourceKind::Inventory,
            ResourceKind::Storage,
        ]
    );
}

#[rstest]
fn unparseable_config_halts_before_resources(harness: Harness) {
    let root = ServiceRoot::installed();
    root.write_app_config("[db\nuser = root\n");

    let error = harness.run(&root).expect_err("bootstrap must fail");

    assert!(matches!(error, BootstrapError::ConfigRead { .. }), "{error}");
    assert_eq!(error.stage(), BootstrapStage::InstallationDetermined);
    assert!(harness.provider.constructed().is_empty());
}

#[rstest]
fn failure_is_reported_once_with_its_stage(harness: Harness) {
    let root = ServiceRoot::installed();
    harness.provider.fail_on(ResourceKind::Storage, "db offline");

    let error = harness.run(&root).expect_err("bootstrap must fail");

    assert!(matches!(error, BootstrapError::Resource { .. }), "{error}");
    let failures: Vec<_> = harness
        .reporter
        .events()
        .into_iter()
        .filter(|event| matches!(event, HealthEvent::BootstrapFailed { .. }))
        .collect();
    assert_eq!(
        failures,
        vec![HealthEvent::BootstrapFailed {
            stage: BootstrapStage::InstallationDetermined,
            message: error.to_string(),
        }]
    );
    assert!(harness.provider.constructed().is_empty());
}

#[cfg(unix)]
#[rstest]
fn indeterminate_marker_state_is_fatal(harness: Harness) {
    let root = ServiceRoot::with_layout();
    // A marker path whose parent is a file yields ENOTDIR, not NotFound.
    fs::remove_dir(root.dir("conf")).expect("remove conf dir");
    fs::write(root.dir("conf"), b"").expect("replace conf with a file");
    let access = FakeEnvironment::default();
    let probes = EnvironmentProbes::system(FAKE_TOOL)
        .with_capability(NamedPlatform::new("linux"))
        .with_tool_probe(access.clone())
        .with_directory_access(AcceptAll)
        .with_exporter(access);

    let error = bootstrap_with(
        root.path(),
        &probes,
        harness.reporter.clone(),
        &harness.provider,
    )
    .expect_err("bootstrap must fail");

    assert!(matches!(error, BootstrapError::Installation { .. }), "{error}");
    assert_eq!(error.stage(), BootstrapStage::PathsVerified);
}

#[rstest]
fn resources_release_handles_directly(harness: Harness) {
    let root = ServiceRoot::installed();
    let settings = DbSettings::load(root.paths().app_config())
        .expect("app.ini should load");
    let reporter = RecordingHealthReporter::default();

    let resources = Resources::initialise(&harness.provider, &settings, root.paths(), &reporter)
        .expect("resources should initialise");
    assert_eq!(harness.provider.constructed(), ResourceKind::ALL.to_vec());

    resources.release();
    assert_eq!(harness.provider.released().len(), 4);
}

struct AcceptAll;

impl DirectoryAccess for AcceptAll {
    fn check(&self, _path: &Path) -> Result<(), PathError> {
        Ok(())
    }
}
