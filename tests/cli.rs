use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn beautyshot_cmd(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("beautyshot").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd
}

fn write_png(dir: &Path, width: u32, height: u32) -> PathBuf {
    let path = dir.join("input.png");
    image::RgbaImage::from_pixel(width, height, image::Rgba([20, 120, 220, 255]))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn help_prints_usage() {
    let temp = TempDir::new().unwrap();
    beautyshot_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--background-preset"))
        .stdout(predicate::str::contains("--no-frame-bake"));
}

#[test]
fn input_is_required() {
    let temp = TempDir::new().unwrap();
    beautyshot_cmd(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn dump_scene_prints_default_toml() {
    let temp = TempDir::new().unwrap();
    beautyshot_cmd(temp.path())
        .arg("--dump-scene")
        .assert()
        .success()
        .stdout(predicate::str::contains("[background]"))
        .stdout(predicate::str::contains("type = \"gradient\""))
        .stdout(predicate::str::contains("[layout]"));
}

#[test]
fn list_presets_names_gradients_and_cosmic() {
    let temp = TempDir::new().unwrap();
    beautyshot_cmd(temp.path())
        .arg("--list-presets")
        .assert()
        .success()
        .stdout(predicate::str::contains("purple"))
        .stdout(predicate::str::contains("galaxy"));
}

#[test]
fn exports_png_at_requested_scale() {
    let temp = TempDir::new().unwrap();
    let input = write_png(temp.path(), 50, 30);
    let output = temp.path().join("out").join("shot.png");

    beautyshot_cmd(temp.path())
        .arg(&input)
        .args(["--scale", "2", "--background-preset", "nebula", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("shot.png"));

    let decoded = image::open(&output).unwrap();
    // (50 + 2 * 64) x (30 + 2 * 64), doubled.
    assert_eq!((decoded.width(), decoded.height()), (356, 316));
}

#[test]
fn output_extension_selects_jpeg() {
    let temp = TempDir::new().unwrap();
    let input = write_png(temp.path(), 20, 20);
    let output = temp.path().join("shot.jpg");

    beautyshot_cmd(temp.path())
        .arg(&input)
        .args(["--scale", "1", "--output"])
        .arg(&output)
        .assert()
        .success();

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..2], &[0xff, 0xd8]);
}

#[test]
fn scene_file_and_frame_title_are_applied() {
    let temp = TempDir::new().unwrap();
    let input = write_png(temp.path(), 40, 40);
    let scene = temp.path().join("scene.toml");
    std::fs::write(
        &scene,
        r##"
[layout]
padding = { top = 10.0, right = 10.0, bottom = 10.0, left = 10.0 }

[[annotations]]
kind = "mark"
x = 20.0
y = 20.0
label = 1
"##,
    )
    .unwrap();
    let output = temp.path().join("framed.png");

    beautyshot_cmd(temp.path())
        .arg(&input)
        .arg("--scene")
        .arg(&scene)
        .args(["--title", "demo", "--scale", "1", "--output"])
        .arg(&output)
        .assert()
        .success();

    let decoded = image::open(&output).unwrap();
    // 40 + 2 * 10 wide; title bar adds 28 in height.
    assert_eq!((decoded.width(), decoded.height()), (60, 88));
}

#[test]
fn unknown_background_preset_fails() {
    let temp = TempDir::new().unwrap();
    let input = write_png(temp.path(), 10, 10);

    beautyshot_cmd(temp.path())
        .arg(&input)
        .args(["--background-preset", "plaid"])
        .args(["--output"])
        .arg(temp.path().join("x.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown background preset 'plaid'"));
}

#[test]
fn undecodable_input_fails_without_output() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("notes.png");
    std::fs::write(&input, "not an image").unwrap();
    let output = temp.path().join("never.png");

    beautyshot_cmd(temp.path())
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
    assert!(!output.exists());
}

#[test]
fn config_file_sets_export_defaults() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("beautyshot");
    std::fs::create_dir_all(&config_dir).unwrap();
    let save_dir = temp.path().join("exports");
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "[export]\nformat = \"jpeg\"\nscale = 1.0\nsave_directory = {:?}\nfilename_template = \"fixed\"\n",
            save_dir.to_str().unwrap()
        ),
    )
    .unwrap();
    let input = write_png(temp.path(), 10, 10);

    beautyshot_cmd(temp.path())
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("fixed.jpg"));

    assert!(save_dir.join("fixed.jpg").exists());
}

#[test]
fn init_config_writes_example() {
    let temp = TempDir::new().unwrap();
    beautyshot_cmd(temp.path())
        .arg("--init-config")
        .assert()
        .success();
    let written = std::fs::read_to_string(temp.path().join("beautyshot/config.toml")).unwrap();
    assert!(written.contains("[export]"));

    beautyshot_cmd(temp.path())
        .arg("--init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
