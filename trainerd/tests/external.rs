#![cfg(unix)]

use std::path::{Path, PathBuf};

use tokio::fs;

use trainerd::{
    error::ServiceErr,
    external::{Augmenter, ScriptAugmenter, ScriptTrainer, Trainer},
};

async fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, body).await.unwrap();
    fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .await
        .unwrap();
    path
}

#[tokio::test]
async fn script_trainer_runs_with_the_documented_flags() {
    let dir = tempfile::tempdir().unwrap();
    let old_net = dir.path().join("old.net");
    fs::write(&old_net, [0u8; 4]).await.unwrap();

    // Mirrors the real contract: `--network <old> --save <dir>`.
    let script = write_script(
        dir.path(),
        "train.sh",
        "#!/bin/sh\n[ \"$1\" = \"--network\" ] || exit 2\n[ \"$3\" = \"--save\" ] || exit 2\nprintf weights > \"$4/adversarial.net\"\n",
    )
    .await;

    ScriptTrainer::new(&script)
        .train(&old_net, dir.path())
        .await
        .unwrap();

    let new_net = fs::read(dir.path().join("adversarial.net")).await.unwrap();
    assert_eq!(new_net, b"weights");
}

#[tokio::test]
async fn script_trainer_surfaces_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "train.sh", "#!/bin/sh\nexit 3\n").await;

    let err = ScriptTrainer::new(&script)
        .train(&dir.path().join("old.net"), dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceErr::TrainingFailed { status: Some(3) }));
}

#[tokio::test]
async fn missing_trainer_executable_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = ScriptTrainer::new("/nonexistent/train.sh")
        .train(&dir.path().join("old.net"), dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceErr::Io(_)));
}

#[tokio::test]
async fn script_augmenter_ignores_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "augment.sh", "#!/bin/sh\nexit 1\n").await;

    ScriptAugmenter::new(&script)
        .augment(dir.path(), dir.path(), dir.path())
        .await
        .unwrap();
}

#[tokio::test]
async fn script_augmenter_receives_the_three_directories() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        "augment.sh",
        "#!/bin/sh\nprintf '%s\\n%s\\n%s\\n' \"$1\" \"$2\" \"$3\" > \"$2/args.txt\"\n",
    )
    .await;

    let input = dir.path().join("in");
    let aug = dir.path().join("aug");
    let unaug = dir.path().join("unaug");
    for d in [&input, &aug, &unaug] {
        fs::create_dir_all(d).await.unwrap();
    }

    ScriptAugmenter::new(&script)
        .augment(&input, &aug, &unaug)
        .await
        .unwrap();

    let args = fs::read_to_string(aug.join("args.txt")).await.unwrap();
    let lines: Vec<_> = args.lines().collect();
    assert_eq!(
        lines,
        [
            input.to_str().unwrap(),
            aug.to_str().unwrap(),
            unaug.to_str().unwrap()
        ]
    );
}
