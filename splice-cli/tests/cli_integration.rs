// splice-cli/tests/cli_integration.rs
//
// Runs the compiled `splice` binary against temporary workspaces.

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::json;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

fn splice_cmd(workspace: &Path) -> Command {
    let mut cmd = Command::cargo_bin("splice").expect("Failed to find splice binary");
    cmd.env_remove("SPLICE_EXPORT_DIR")
        .env_remove("RUST_LOG")
        .env("SPLICE_WORKSPACE", workspace)
        .env("NO_COLOR", "1");
    cmd
}

/// Writes a project with one audio clip and one video clip whose media
/// files exist (as empty placeholders) inside the workspace.
fn write_project(workspace: &TempDir) -> Result<PathBuf, Box<dyn Error>> {
    let media = workspace.path().join("media");
    fs::create_dir_all(&media)?;
    let voice = media.join("voice.wav");
    let screen = media.join("screen.mp4");
    fs::write(&voice, b"")?;
    fs::write(&screen, b"")?;

    let project = json!({
        "version": 1,
        "name": "demo",
        "files": {
            "voice": {
                "id": "voice", "path": voice, "name": "voice.wav",
                "duration": 10.0, "hasVideo": false, "hasAudio": true
            },
            "screen": {
                "id": "screen", "path": screen, "name": "screen.mp4",
                "duration": 6.0, "hasVideo": true, "hasAudio": false,
                "width": 1280, "height": 720
            }
        },
        "clips": [
            {"fileId": "voice", "offset": 0.0, "trimEnd": 3.0},
            {"fileId": "screen", "offset": 1.0, "trimStart": 0.0, "trimEnd": 2.0}
        ],
        "format": "mp4",
        "tracks": 1
    });

    let dir = workspace.path().join("_projects");
    fs::create_dir_all(&dir)?;
    let path = dir.join("demo.spliceproj");
    fs::write(&path, serde_json::to_string_pretty(&project)?)?;
    Ok(path)
}

#[test]
fn test_help_lists_commands() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    splice_cmd(workspace.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("probe").and(contains("graph")).and(contains("export")));
    Ok(())
}

#[test]
fn test_graph_requires_project_argument() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    splice_cmd(workspace.path())
        .arg("graph")
        .assert()
        .failure()
        .stderr(contains("PROJECT"));
    Ok(())
}

#[test]
fn test_graph_prints_compiled_chains() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let project = write_project(&workspace)?;

    splice_cmd(workspace.path())
        .arg("graph")
        .arg(&project)
        .assert()
        .success()
        .stdout(contains("[0:a]atrim=start=0:end=3,asetpts=PTS-STARTPTS[a0]"))
        .stdout(contains("color=c=black:s=1280x720:d=1.000000:r=30,setsar=1[blk0]"))
        .stdout(contains("[blk0][v1]concat=n=2:v=1:a=0[outv]"));
    Ok(())
}

#[test]
fn test_graph_duration_override_extends_filler() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let project = write_project(&workspace)?;

    splice_cmd(workspace.path())
        .args(["graph", "--duration", "8"])
        .arg(&project)
        .assert()
        .success()
        .stdout(contains("d=5.000000"));
    Ok(())
}

#[test]
fn test_graph_reports_missing_media() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let project = write_project(&workspace)?;
    fs::remove_file(workspace.path().join("media").join("screen.mp4"))?;

    splice_cmd(workspace.path())
        .arg("graph")
        .arg(&project)
        .assert()
        .failure()
        .stdout(contains("Media file missing: screen.mp4"))
        .stderr(contains("Error:").and(contains("unknown file id 'screen'")));
    Ok(())
}

#[test]
fn test_projects_lists_saved_project() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    write_project(&workspace)?;

    splice_cmd(workspace.path())
        .arg("projects")
        .assert()
        .success()
        .stdout(contains("demo (demo.spliceproj): 2 clip(s), 2 file(s), 1 track(s)"));
    Ok(())
}

#[test]
fn test_settings_roundtrip() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let renders = workspace.path().join("renders");

    splice_cmd(workspace.path())
        .arg("settings")
        .arg("--export-dir")
        .arg(&renders)
        .assert()
        .success()
        .stdout(contains("Saved settings"));

    splice_cmd(workspace.path())
        .arg("settings")
        .assert()
        .success()
        .stdout(contains(renders.display().to_string()));
    assert!(workspace.path().join("settings.json").is_file());
    Ok(())
}

#[test]
fn test_export_with_missing_ffmpeg_fails() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let project = write_project(&workspace)?;

    splice_cmd(workspace.path())
        .arg("export")
        .arg(&project)
        .args(["--name", "cut", "--ffmpeg"])
        .arg(workspace.path().join("no-such-ffmpeg"))
        .assert()
        .failure()
        .stderr(contains("Error:"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_export_with_scripted_ffmpeg_succeeds() -> Result<(), Box<dyn Error>> {
    use std::os::unix::fs::PermissionsExt;

    let workspace = tempdir()?;
    let project = write_project(&workspace)?;

    let script = workspace.path().join("fake-ffmpeg");
    fs::write(
        &script,
        "#!/bin/sh\n\
         echo 'frame=   30 fps=0.0 q=28.0 size=     256kB time=00:00:01.50 bitrate=1.0kbits/s speed=1x' >&2\n\
         echo 'frame=   90 fps=0.0 q=28.0 size=     512kB time=00:00:03.00 bitrate=1.0kbits/s speed=1x' >&2\n\
         exit 0\n",
    )?;
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;

    splice_cmd(workspace.path())
        .arg("export")
        .arg(&project)
        .args(["--name", "cut", "--ffmpeg"])
        .arg(&script)
        .assert()
        .success()
        .stdout(contains("Exported").and(contains("cut.mp4")));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_export_engine_failure_reports_excerpt() -> Result<(), Box<dyn Error>> {
    use std::os::unix::fs::PermissionsExt;

    let workspace = tempdir()?;
    let project = write_project(&workspace)?;

    let script = workspace.path().join("failing-ffmpeg");
    fs::write(
        &script,
        "#!/bin/sh\n\
         echo 'Conversion failed!' >&2\n\
         exit 1\n",
    )?;
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;

    splice_cmd(workspace.path())
        .arg("export")
        .arg(&project)
        .args(["--name", "cut", "--ffmpeg"])
        .arg(&script)
        .assert()
        .failure()
        .stderr(contains("Error: Export failed:").and(contains("Conversion failed!")))
        .stderr(contains("worker").not());
    Ok(())
}
