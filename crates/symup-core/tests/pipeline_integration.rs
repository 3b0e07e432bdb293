use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use symup_core::{
    build_version, Catalog, CommandRunner, Credentials, FailurePolicy, Invocation, Pipeline,
    Platform, ProcessOutput, Resolver, Uploader,
};
use tempfile::TempDir;

/// Records invocations; fails for the listed applications.
#[derive(Default)]
struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    fail_for: Vec<&'static str>,
}

impl RecordingRunner {
    fn failing(fail_for: &[&'static str]) -> Self {
        Self { calls: RefCell::default(), fail_for: fail_for.to_vec() }
    }

    fn applications(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|inv| arg_after(inv, "--application").to_string())
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        let app = arg_after(invocation, "--application");
        let exit_code = if self.fail_for.iter().any(|f| *f == app) { 1 } else { 0 };
        Ok(ProcessOutput {
            exit_code: Some(exit_code),
            stdout: "ok\n".into(),
            stderr: String::new(),
        })
    }
}

fn arg_after<'a>(inv: &'a Invocation, flag: &str) -> &'a str {
    let pos = inv.args.iter().position(|a| a == flag).expect("flag present");
    &inv.args[pos + 1]
}

fn touch(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"debug").unwrap();
    path
}

fn creds() -> Credentials {
    Credentials::UserPassword { user: "ci@example.com".into(), password: "hunter2".into() }
}

fn linux_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "src/app/puzzle/bin/puzzle.debug");
    touch(tmp.path(), "src/app/valentina/bin/valentina.pdb");
    touch(tmp.path(), "src/app/tape/bin/tape.pdb");
    touch(tmp.path(), "src/libs/qmuparser/bin/libQMUParserLib.so.2.7.0.debug");
    touch(tmp.path(), "src/libs/vpropertyexplorer/bin/libVPropertyExplorerLib.so.1.0.0");
    tmp
}

#[test]
fn empty_tree_records_every_target_as_missing() {
    let tmp = TempDir::new().unwrap();
    let catalog = Catalog::embedded().unwrap();
    let runner = RecordingRunner::default();

    for platform in Platform::ALL {
        let targets = catalog.targets(platform).unwrap();
        let uploader = Uploader::new(&runner, "db", "v", creds());
        let summary = Pipeline::new(targets, Resolver::new(tmp.path(), platform), uploader).run();

        assert_eq!(summary.total, 5);
        assert!(summary.uploaded.is_empty());
        assert_eq!(
            summary.missing_applications(),
            ["puzzle", "tape", "valentina", "qmuparserlib", "vpropertyexplorerlib"]
        );
        assert!(summary.is_success(false));
        assert!(!summary.is_success(true));
    }
    assert!(runner.calls.borrow().is_empty());
}

#[test]
fn linux_only_uploads_debug_artifacts() {
    let tmp = linux_tree();
    let catalog = Catalog::embedded().unwrap();
    let runner = RecordingRunner::default();
    let version = build_version("1_1_0", "gf4373acf9", "Qt_6_2", Platform::Linux, false);
    let uploader = Uploader::new(&runner, "valentina", version.as_str(), creds());

    let summary = Pipeline::new(
        catalog.targets(Platform::Linux).unwrap(),
        Resolver::new(tmp.path(), Platform::Linux),
        uploader,
    )
    .run();

    assert_eq!(summary.uploaded, ["puzzle", "qmuparserlib"]);
    assert_eq!(summary.missing_applications(), ["tape", "valentina", "vpropertyexplorerlib"]);
    assert_eq!(summary.missing[2].searched_for, "libVPropertyExplorerLib*.debug");
    assert!(summary.failed.is_empty());
    assert_eq!(summary.version, "1_1_0-gf4373acf9-Qt_6_2-linux");

    let calls = runner.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(arg_after(&calls[1], "--files"), "libQMUParserLib.so.2.7.0.debug");
    assert_eq!(
        PathBuf::from(arg_after(&calls[1], "--directory")),
        tmp.path().join("src/libs/qmuparser/bin")
    );
    assert_eq!(arg_after(&calls[0], "--version"), "1_1_0-gf4373acf9-Qt_6_2-linux");
    assert_eq!(arg_after(&calls[0], "--password"), "hunter2");
}

#[test]
fn macos_bundles_point_at_dsym_directory() {
    let tmp = TempDir::new().unwrap();
    for rel in [
        "Tape_dSYM/Tape.app.dSYM/Contents/Info.plist",
        "Valentina_dSYM/Valentina.app.dSYM/Contents/Info.plist",
        "Valentina_dSYM/QMUParserLib.framework.dSYM/Contents/Info.plist",
    ] {
        touch(tmp.path(), rel);
    }

    let catalog = Catalog::embedded().unwrap();
    let runner = RecordingRunner::default();
    let version = build_version("1_1_0", "gf4373acf9", "Qt_6_10", Platform::Macos, true);
    let uploader = Uploader::new(&runner, "db", version, creds());
    let summary = Pipeline::new(
        catalog.targets(Platform::Macos).unwrap(),
        Resolver::new(tmp.path(), Platform::Macos),
        uploader,
    )
    .run();

    assert_eq!(summary.uploaded, ["tape", "valentina", "qmuparserlib"]);
    assert_eq!(summary.missing_applications(), ["puzzle", "vpropertyexplorerlib"]);

    let calls = runner.calls.borrow();
    assert_eq!(
        PathBuf::from(arg_after(&calls[2], "--directory")),
        tmp.path().join("Valentina_dSYM")
    );
    assert_eq!(arg_after(&calls[2], "--files"), "QMUParserLib.framework.dSYM");
    assert_eq!(
        arg_after(&calls[0], "--version"),
        "1_1_0-gf4373acf9-Qt_6_10-macos-multibundle"
    );
}

#[test]
fn failed_upload_continues_by_default() {
    let tmp = TempDir::new().unwrap();
    for name in ["puzzle.pdb", "tape.pdb", "valentina.pdb"] {
        touch(tmp.path(), &format!("bin/{name}"));
    }
    let catalog = Catalog::embedded().unwrap();
    let runner = RecordingRunner::failing(&["puzzle"]);
    let uploader = Uploader::new(&runner, "db", "v", creds());

    let summary = Pipeline::new(
        catalog.targets(Platform::Windows).unwrap(),
        Resolver::new(tmp.path(), Platform::Windows),
        uploader,
    )
    .run();

    assert_eq!(runner.applications(), ["puzzle", "tape", "valentina"]);
    assert_eq!(summary.uploaded, ["tape", "valentina"]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].application, "puzzle");
    assert_eq!(summary.failed[0].exit_code, Some(1));
    assert!(summary.skipped.is_empty());
    assert!(!summary.is_success(false));
}

#[test]
fn fail_fast_stops_at_first_failure() {
    let tmp = TempDir::new().unwrap();
    for name in ["puzzle.pdb", "tape.pdb", "valentina.pdb"] {
        touch(tmp.path(), &format!("bin/{name}"));
    }
    let catalog = Catalog::embedded().unwrap();
    let runner = RecordingRunner::failing(&["tape"]);
    let uploader = Uploader::new(&runner, "db", "v", creds());

    let summary = Pipeline::new(
        catalog.targets(Platform::Windows).unwrap(),
        Resolver::new(tmp.path(), Platform::Windows),
        uploader,
    )
    .with_policy(FailurePolicy::FailFast)
    .run();

    assert_eq!(runner.applications(), ["puzzle", "tape"]);
    assert_eq!(summary.uploaded, ["puzzle"]);
    assert_eq!(summary.skipped, ["valentina", "qmuparserlib", "vpropertyexplorerlib"]);
    assert!(!summary.is_success(false));
}

#[test]
fn resolution_is_repeatable() {
    let tmp = linux_tree();
    touch(tmp.path(), "other/libQMUParserLib.so.2.6.0.debug");
    let catalog = Catalog::embedded().unwrap();
    let resolver = Resolver::new(tmp.path(), Platform::Linux);

    let first: Vec<_> = catalog
        .targets(Platform::Linux)
        .unwrap()
        .iter()
        .map(|t| resolver.resolve(t))
        .collect();
    let second: Vec<_> = catalog
        .targets(Platform::Linux)
        .unwrap()
        .iter()
        .map(|t| resolver.resolve(t))
        .collect();

    assert_eq!(first, second);
    // The shallower of the two parser libraries wins.
    assert_eq!(
        first[3].as_ref().unwrap().files_glob,
        "libQMUParserLib.so.2.6.0.debug"
    );
}
