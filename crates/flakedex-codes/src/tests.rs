use std::path::{Path, PathBuf};

use indoc::indoc;

use flakedex_site_packages::InstalledDist;

use crate::{extract, is_plugin, Error};

fn make_dist(site_packages: &Path, dist_info: &str, entry_points: &str) -> InstalledDist {
    let dir = site_packages.join(dist_info);
    fs_err::create_dir_all(&dir).unwrap();
    fs_err::write(dir.join("entry_points.txt"), entry_points).unwrap();
    InstalledDist::try_from_path(&dir).unwrap().unwrap()
}

fn site_packages() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let site_packages = dir.path().join("site-packages");
    fs_err::create_dir_all(&site_packages).unwrap();
    (dir, site_packages)
}

#[test]
fn classifies_plugins() {
    let (_dir, sp) = site_packages();

    let checker = make_dist(
        &sp,
        "flake8_foo-1.0.0.dist-info",
        "[flake8.extension]\nX1 = flake8_foo:Checker\n",
    );
    assert!(is_plugin(&checker).unwrap());

    let formatter = make_dist(
        &sp,
        "flake8_json-21.7.0.dist-info",
        "[flake8.report]\njson = flake8_json_reporter.reporters:DefaultJSON\n",
    );
    assert!(is_plugin(&formatter).unwrap());

    let library = make_dist(
        &sp,
        "requests-2.32.0.dist-info",
        "[console_scripts]\nreq = requests.cli:main\n",
    );
    assert!(!is_plugin(&library).unwrap());
}

#[test]
fn extract_from_single_file_module() {
    let (_dir, sp) = site_packages();
    let dist = make_dist(
        &sp,
        "flake8_foo-1.0.0.dist-info",
        "[flake8.extension]\nX1 = flake8_foo:Checker\n",
    );
    fs_err::write(
        sp.join("flake8_foo.py"),
        indoc! {r#"
            X100 = "X100 first thing"
            X101 = "X101 second thing"

            def check():
                yield 0, 0, "X102 third thing", None
        "#},
    )
    .unwrap();

    let table = extract(&dist, &sp).unwrap();
    let codes: Vec<_> = table
        .iter()
        .map(|(code, message)| (code.as_str(), message.as_str()))
        .collect();
    assert_eq!(
        codes,
        [
            ("X100", "first thing"),
            ("X101", "second thing"),
            ("X102", "third thing"),
        ]
    );
}

#[test]
fn extract_from_package_directory() {
    let (_dir, sp) = site_packages();
    let dist = make_dist(
        &sp,
        "flake8_simplify-0.21.0.dist-info",
        "[flake8.extension]\nSIM = flake8_simplify.checks:Checker\n",
    );
    let package = sp.join("flake8_simplify");
    fs_err::create_dir_all(&package).unwrap();
    fs_err::write(package.join("__init__.py"), "").unwrap();
    fs_err::write(
        package.join("checks.py"),
        r#"MESSAGE = "SIM101: use a single isinstance call""#,
    )
    .unwrap();

    let table = extract(&dist, &sp).unwrap();
    assert_eq!(
        table.get("SIM101").map(String::as_str),
        Some("use a single isinstance call")
    );
}

#[test]
fn unregistered_prefixes_are_ignored() {
    let (_dir, sp) = site_packages();
    let dist = make_dist(
        &sp,
        "flake8_foo-1.0.0.dist-info",
        "[flake8.extension]\nX1 = flake8_foo:Checker\n",
    );
    fs_err::write(
        sp.join("flake8_foo.py"),
        indoc! {r#"
            OWN = "X100 belongs to this plugin"
            OTHER = "E501 line too long"
        "#},
    )
    .unwrap();

    let table = extract(&dist, &sp).unwrap();
    assert!(table.contains_key("X100"));
    assert!(!table.contains_key("E501"));
}

#[test]
fn first_description_wins() {
    let (_dir, sp) = site_packages();
    let dist = make_dist(
        &sp,
        "flake8_foo-1.0.0.dist-info",
        "[flake8.extension]\nX1 = flake8_foo:Checker\n",
    );
    fs_err::write(
        sp.join("flake8_foo.py"),
        indoc! {r#"
            A = "X100 canonical description"
            B = "X100 a duplicate that must not override"
        "#},
    )
    .unwrap();

    let table = extract(&dist, &sp).unwrap();
    assert_eq!(
        table.get("X100").map(String::as_str),
        Some("canonical description")
    );
}

#[test]
fn report_only_plugin_has_empty_table() {
    let (_dir, sp) = site_packages();
    let dist = make_dist(
        &sp,
        "flake8_json-21.7.0.dist-info",
        "[flake8.report]\njson = flake8_json_reporter.reporters:DefaultJSON\n",
    );

    let table = extract(&dist, &sp).unwrap();
    assert!(table.is_empty());
}

#[test]
fn missing_module_is_an_error() {
    let (_dir, sp) = site_packages();
    let dist = make_dist(
        &sp,
        "flake8_ghost-1.0.0.dist-info",
        "[flake8.extension]\nG1 = flake8_ghost:Checker\n",
    );

    let err = extract(&dist, &sp).unwrap_err();
    assert!(matches!(err, Error::ModuleNotFound { .. }));
}

#[test]
fn submodule_falls_back_to_top_level_package() {
    let (_dir, sp) = site_packages();
    let dist = make_dist(
        &sp,
        "flake8_foo-1.0.0.dist-info",
        "[flake8.extension]\nX1 = flake8_foo.generated:Checker\n",
    );
    // The registered submodule does not exist on disk, but the top-level package does.
    let package = sp.join("flake8_foo");
    fs_err::create_dir_all(&package).unwrap();
    fs_err::write(package.join("core.py"), r#"M = "X100 found via fallback""#).unwrap();

    let table = extract(&dist, &sp).unwrap();
    assert_eq!(
        table.get("X100").map(String::as_str),
        Some("found via fallback")
    );
}
