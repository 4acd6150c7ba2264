//! Integration tests driving the built binary against synthetic virtual environments.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn get_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_flakedex"))
}

fn flakedex(venv: &Path, output: &Path) -> Output {
    Command::new(get_bin())
        .arg("--venv")
        .arg(venv)
        .arg("--output")
        .arg(output)
        .env_remove("VIRTUAL_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to spawn flakedex")
}

/// Create a virtualenv skeleton and return its `site-packages` directory.
fn make_venv(root: &Path) -> PathBuf {
    let site_packages = root.join("lib/python3.12/site-packages");
    fs_err::create_dir_all(&site_packages).unwrap();
    fs_err::write(root.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
    site_packages
}

fn make_dist(site_packages: &Path, dist_info: &str, metadata: &str, entry_points: Option<&str>) {
    let dir = site_packages.join(dist_info);
    fs_err::create_dir_all(&dir).unwrap();
    fs_err::write(dir.join("METADATA"), metadata).unwrap();
    if let Some(entry_points) = entry_points {
        fs_err::write(dir.join("entry_points.txt"), entry_points).unwrap();
    }
}

#[test]
#[cfg(unix)]
fn generates_report() {
    let venv_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let site_packages = make_venv(venv_dir.path());

    // A plugin with no usable home page, relying on the package-index fallback.
    make_dist(
        &site_packages,
        "flake8_foo-1.0.0.dist-info",
        "Metadata-Version: 1.0\nName: flake8-foo\nVersion: 1.0.0\nHome-page: UNKNOWN\nAuthor: J. Doe\n",
        Some("[flake8.extension]\nX1 = flake8_foo:Checker\n"),
    );
    fs_err::write(
        site_packages.join("flake8_foo.py"),
        "MSG = \"X100 something went wrong\"\n",
    )
    .unwrap();

    // A library that is not a flake8 plugin must not be listed.
    make_dist(
        &site_packages,
        "requests-2.32.0.dist-info",
        "Metadata-Version: 2.1\nName: requests\nVersion: 2.32.0\n",
        Some("[console_scripts]\nreq = requests.cli:main\n"),
    );

    let output = flakedex(venv_dir.path(), out_dir.path());
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let content = fs_err::read_to_string(out_dir.path().join("index.html")).unwrap();
    assert!(content.contains("flake8-foo"));
    assert!(content.contains("pypi.org/project/flake8-foo"));
    assert!(content.contains("X100"));
    assert!(content.contains("something went wrong"));
    assert!(!content.contains("requests"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Indexed 1 plugin"), "stdout: {stdout}");
}

#[test]
#[cfg(unix)]
fn plugins_are_listed_in_name_order() {
    let venv_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let site_packages = make_venv(venv_dir.path());

    // The dist-info directory name sorts before `flake8_alpha` byte-wise, but the normalized
    // package name sorts after it.
    make_dist(
        &site_packages,
        "Flake8_Zeta-1.0.0.dist-info",
        "Metadata-Version: 2.1\nName: Flake8_Zeta\nVersion: 1.0.0\n",
        Some("[flake8.extension]\nZ1 = flake8_zeta:Checker\n"),
    );
    make_dist(
        &site_packages,
        "flake8_alpha-1.0.0.dist-info",
        "Metadata-Version: 2.1\nName: flake8-alpha\nVersion: 1.0.0\n",
        Some("[flake8.extension]\nA1 = flake8_alpha:Checker\n"),
    );
    fs_err::write(site_packages.join("flake8_zeta.py"), "").unwrap();
    fs_err::write(site_packages.join("flake8_alpha.py"), "").unwrap();

    let output = flakedex(venv_dir.path(), out_dir.path());
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let content = fs_err::read_to_string(out_dir.path().join("index.html")).unwrap();
    let alpha = content.find("flake8-alpha").unwrap();
    let zeta = content.find("flake8-zeta").unwrap();
    assert!(alpha < zeta, "plugins are not sorted by name");
}

#[test]
#[cfg(unix)]
fn empty_environment_still_writes_a_report() {
    let venv_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    make_venv(venv_dir.path());

    let output = flakedex(venv_dir.path(), out_dir.path());
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let content = fs_err::read_to_string(out_dir.path().join("index.html")).unwrap();
    assert!(content.starts_with("<!DOCTYPE html>"));
    assert!(content.contains("No flake8 plugins are installed"));
}

#[test]
#[cfg(unix)]
fn existing_report_is_overwritten() {
    let venv_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    make_venv(venv_dir.path());
    fs_err::write(out_dir.path().join("index.html"), "stale contents").unwrap();

    let output = flakedex(venv_dir.path(), out_dir.path());
    assert!(output.status.success());

    let content = fs_err::read_to_string(out_dir.path().join("index.html")).unwrap();
    assert!(content.starts_with("<!DOCTYPE html>"));
    assert!(!content.contains("stale contents"));
}

#[test]
fn missing_environment_fails_loudly() {
    let out_dir = tempfile::tempdir().unwrap();

    let output = flakedex(Path::new("/nonexistent/.venv"), out_dir.path());
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No virtual environment found"),
        "stderr: {stderr}"
    );
    assert!(!out_dir.path().join("index.html").exists());
}
