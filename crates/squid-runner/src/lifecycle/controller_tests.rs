//! Unit tests for the start, stop and status flows.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use camino::Utf8PathBuf;
use mockall::mock;
use rstest::rstest;
use squid_runner_config::{Config, StatErrorPolicy};

use super::{
    CommandRunner, DaemonInvocation, DaemonState, LifecycleCommand, LifecycleController,
    LifecycleError, LifecycleOutcome, LifecycleOutput, SystemProbe,
};
use crate::tests::support::{FakeClock, FakeRoots, ScriptedProbe, fake_roots, instance};

mock! {
    Runner {}
    impl CommandRunner for Runner {
        fn run(&self, invocation: &DaemonInvocation) -> Result<(), LifecycleError>;
    }
}

const INSTANCE: &str = "svc1";

fn output() -> LifecycleOutput<Vec<u8>, Vec<u8>> {
    LifecycleOutput::new(Vec::new(), Vec::new())
}

fn pid_path(roots: &FakeRoots) -> Utf8PathBuf {
    roots.config.run_dir().join(format!("{INSTANCE}.pid"))
}

fn stderr_text(output: &LifecycleOutput<Vec<u8>, Vec<u8>>) -> String {
    String::from_utf8(output.stderr.clone()).expect("stderr utf8")
}

fn system_controller<'a>(
    roots: &FakeRoots,
    runner: MockRunner,
    clock: &'a FakeClock,
) -> LifecycleController<SystemProbe, MockRunner, &'a FakeClock> {
    LifecycleController::new(
        &roots.config,
        &instance(INSTANCE),
        SystemProbe::new(StatErrorPolicy::FailOpen),
        runner,
        clock,
    )
}

#[rstest]
fn start_requires_configuration_file(fake_roots: FakeRoots) {
    let mut runner = MockRunner::new();
    runner.expect_run().never();
    let clock = FakeClock::default();
    let controller = system_controller(&fake_roots, runner, &clock);

    let error = controller
        .handle(LifecycleCommand::Start, &mut output())
        .expect_err("configuration is missing");

    let LifecycleError::MissingConfiguration { path } = error else {
        panic!("expected MissingConfiguration, got {error:?}");
    };
    assert!(path.ends_with("etc/svc1.conf"), "unexpected path {path:?}");
    assert_eq!(clock.sleeps(), 0);
}

#[test]
fn start_checks_component_configuration_directory() {
    let config = Config {
        component: "x".to_owned(),
        ..Config::default()
    };
    let mut runner = MockRunner::new();
    runner.expect_run().never();
    let clock = FakeClock::default();
    let controller = LifecycleController::new(
        &config,
        &instance("missing"),
        SystemProbe::new(StatErrorPolicy::FailOpen),
        runner,
        &clock,
    );

    let error = controller
        .start(&mut output())
        .expect_err("configuration is missing");

    assert!(
        matches!(
            &error,
            LifecycleError::MissingConfiguration { path } if path == Path::new("/etc/x/missing.conf")
        ),
        "unexpected error: {error:?}"
    );
}

#[rstest]
fn start_launches_daemon_with_instance_configuration(fake_roots: FakeRoots) {
    let config_path = fake_roots.write_configuration(INSTANCE);
    let pid_file = pid_path(&fake_roots);
    let expected_arguments = vec![OsString::from("-f"), OsString::from(config_path.as_str())];
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(move |invocation: &DaemonInvocation| {
            invocation.binary() == "squid" && invocation.arguments() == expected_arguments
        })
        .once()
        .returning(move |_| {
            fs::write(&pid_file, "4242\n").map_err(LifecycleError::Io)?;
            Ok(())
        });
    let clock = FakeClock::default();
    let controller = system_controller(&fake_roots, runner, &clock);
    let mut output = output();

    let outcome = controller
        .handle(LifecycleCommand::Start, &mut output)
        .expect("daemon starts");

    assert_eq!(outcome, LifecycleOutcome::Started { waited: 0 });
    assert!(output.stdout.is_empty());
}

#[rstest]
fn start_waits_for_pid_file(fake_roots: FakeRoots) {
    let probe = ScriptedProbe::new()
        .with_fixed(
            fake_roots.config.config_dir().join("svc1.conf").as_std_path(),
            true,
        )
        .with_timeline(pid_path(&fake_roots).as_std_path(), [false, false, true]);
    let mut runner = MockRunner::new();
    runner.expect_run().once().returning(|_| Ok(()));
    let clock = FakeClock::default();
    let controller =
        LifecycleController::new(&fake_roots.config, &instance(INSTANCE), &probe, runner, &clock);
    let mut output = output();

    let outcome = controller
        .handle(LifecycleCommand::Start, &mut output)
        .expect("daemon starts");

    assert_eq!(outcome, LifecycleOutcome::Started { waited: 2 });
    assert_eq!(output.stdout, b"..");
    assert_eq!(clock.sleeps(), 2);
}

#[rstest]
fn launch_failure_is_reported_but_not_fatal(fake_roots: FakeRoots) {
    let probe = ScriptedProbe::new()
        .with_fixed(
            fake_roots.config.config_dir().join("svc1.conf").as_std_path(),
            true,
        )
        .with_fixed(pid_path(&fake_roots).as_std_path(), true);
    let mut runner = MockRunner::new();
    runner.expect_run().once().returning(|invocation| {
        Err(LifecycleError::LaunchDaemon {
            binary: invocation.binary().to_os_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })
    });
    let clock = FakeClock::default();
    let controller =
        LifecycleController::new(&fake_roots.config, &instance(INSTANCE), &probe, runner, &clock);
    let mut output = output();

    let outcome = controller
        .handle(LifecycleCommand::Start, &mut output)
        .expect("pid file already present");

    assert_eq!(outcome, LifecycleOutcome::Started { waited: 0 });
    assert!(stderr_text(&output).contains("failed to spawn daemon binary"));
}

#[rstest]
fn start_times_out_when_pid_file_never_appears(fake_roots: FakeRoots) {
    fake_roots.write_configuration(INSTANCE);
    let mut runner = MockRunner::new();
    runner.expect_run().once().returning(|_| Ok(()));
    let clock = FakeClock::default();
    let controller = system_controller(&fake_roots, runner, &clock);
    let mut output = output();

    let error = controller
        .handle(LifecycleCommand::Start, &mut output)
        .expect_err("pid file never appears");

    assert!(
        matches!(error, LifecycleError::WaitTimeout { timeout_secs: 3, .. }),
        "unexpected error: {error:?}"
    );
    assert_eq!(clock.sleeps(), 4);
    assert_eq!(output.stdout, b"....");
}

#[rstest]
fn stop_without_pid_file_is_already_stopped(fake_roots: FakeRoots) {
    fake_roots.write_configuration(INSTANCE);
    let mut runner = MockRunner::new();
    runner.expect_run().never();
    let clock = FakeClock::default();
    let controller = system_controller(&fake_roots, runner, &clock);

    let outcome = controller
        .handle(LifecycleCommand::Stop, &mut output())
        .expect("nothing to stop");

    assert_eq!(outcome, LifecycleOutcome::AlreadyStopped);
}

#[rstest]
fn stop_requires_configuration_file(fake_roots: FakeRoots) {
    fake_roots.write_pid(INSTANCE, "4242\n");
    let mut runner = MockRunner::new();
    runner.expect_run().never();
    let clock = FakeClock::default();
    let controller = system_controller(&fake_roots, runner, &clock);

    let error = controller
        .handle(LifecycleCommand::Stop, &mut output())
        .expect_err("configuration is missing");

    assert!(matches!(error, LifecycleError::MissingConfiguration { .. }));
}

#[rstest]
fn stop_requests_shutdown_and_waits_for_process_exit(fake_roots: FakeRoots) {
    let config_path = fake_roots.write_configuration(INSTANCE);
    fake_roots.write_pid(INSTANCE, "4242\n");
    let status_path = fake_roots.spawn_process_entry(4242);
    let expected_arguments = ["-k", "shutdown", "-f", config_path.as_str()].map(OsString::from);
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(move |invocation: &DaemonInvocation| {
            invocation.arguments() == expected_arguments
        })
        .once()
        .returning(move |_| {
            fs::remove_file(&status_path).map_err(LifecycleError::Io)?;
            Ok(())
        });
    let clock = FakeClock::default();
    let controller = system_controller(&fake_roots, runner, &clock);

    let outcome = controller
        .handle(LifecycleCommand::Stop, &mut output())
        .expect("daemon stops");

    assert_eq!(
        outcome,
        LifecycleOutcome::Stopped {
            pid: Some(4242),
            waited: 0
        }
    );
}

#[rstest]
fn stop_times_out_while_process_lingers(fake_roots: FakeRoots) {
    fake_roots.write_configuration(INSTANCE);
    fake_roots.write_pid(INSTANCE, "4242\n");
    fake_roots.spawn_process_entry(4242);
    let mut runner = MockRunner::new();
    runner.expect_run().once().returning(|_| Ok(()));
    let clock = FakeClock::default();
    let controller = system_controller(&fake_roots, runner, &clock);

    let error = controller
        .handle(LifecycleCommand::Stop, &mut output())
        .expect_err("process never exits");

    assert!(matches!(error, LifecycleError::WaitTimeout { .. }));
}

#[rstest]
#[case::not_decimal("12ab\n")]
#[case::blank_first_line("\n4242\n")]
fn stop_with_unusable_pid_file_still_requests_shutdown(
    fake_roots: FakeRoots,
    #[case] content: &str,
) {
    fake_roots.write_configuration(INSTANCE);
    fake_roots.write_pid(INSTANCE, content);
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(|invocation: &DaemonInvocation| {
            invocation.arguments().first() == Some(&OsString::from("-k"))
        })
        .once()
        .returning(|_| Ok(()));
    let clock = FakeClock::default();
    let controller = system_controller(&fake_roots, runner, &clock);
    let mut output = output();

    let outcome = controller
        .handle(LifecycleCommand::Stop, &mut output)
        .expect("shutdown requested");

    assert_eq!(
        outcome,
        LifecycleOutcome::Stopped {
            pid: None,
            waited: 0
        }
    );
    assert_eq!(clock.sleeps(), 0);
}

#[rstest]
fn stop_reports_malformed_pid_on_stderr(fake_roots: FakeRoots) {
    fake_roots.write_configuration(INSTANCE);
    fake_roots.write_pid(INSTANCE, "not-a-pid\n");
    let mut runner = MockRunner::new();
    runner.expect_run().once().returning(|_| Ok(()));
    let clock = FakeClock::default();
    let controller = system_controller(&fake_roots, runner, &clock);
    let mut output = output();

    controller
        .handle(LifecycleCommand::Stop, &mut output)
        .expect("shutdown requested");

    assert_eq!(
        stderr_text(&output).matches("failed to parse pid file").count(),
        1
    );
}

#[rstest]
#[case::process_alive(true, DaemonState::Running { pid: 1234 })]
#[case::process_gone(false, DaemonState::Stopped)]
fn status_reflects_process_entry(
    fake_roots: FakeRoots,
    #[case] alive: bool,
    #[case] expected: DaemonState,
) {
    fake_roots.write_pid(INSTANCE, "1234\n");
    if alive {
        fake_roots.spawn_process_entry(1234);
    }
    let mut runner = MockRunner::new();
    runner.expect_run().never();
    let clock = FakeClock::default();
    let controller = system_controller(&fake_roots, runner, &clock);

    let outcome = controller
        .handle(LifecycleCommand::Status, &mut output())
        .expect("status never fails");

    assert_eq!(outcome, LifecycleOutcome::Status(expected));
    assert_eq!(clock.sleeps(), 0);
}

#[rstest]
fn status_without_pid_file_is_stopped(fake_roots: FakeRoots) {
    let mut runner = MockRunner::new();
    runner.expect_run().never();
    let clock = FakeClock::default();
    let controller = system_controller(&fake_roots, runner, &clock);

    let state = controller.status(&mut output()).expect("status");

    assert_eq!(state, DaemonState::Stopped);
}

#[rstest]
fn paths_follow_configured_roots(fake_roots: FakeRoots) {
    let clock = FakeClock::default();
    let controller = system_controller(&fake_roots, MockRunner::new(), &clock);

    assert_eq!(
        controller.paths().pid_path().as_str(),
        pid_path(&fake_roots).as_str()
    );
    assert_eq!(
        controller.paths().process_status_path(7),
        fake_roots.config.proc_dir().join("7").join("status")
    );
}
