use std::fmt::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use fs_err as fs;
use itertools::Itertools;
use owo_colors::OwoColorize;
use tracing::debug;

use flakedex_report::Plugin;
use flakedex_site_packages::{SitePackages, VirtualEnvironment};

use crate::commands::{elapsed, ExitStatus};
use crate::printer::Printer;

/// Render the plugin report for the given environment and write it to `<output>/index.html`.
pub(crate) fn generate(venv: Option<&Path>, output: &Path, printer: Printer) -> Result<ExitStatus> {
    let start = Instant::now();

    // Detect the environment to inspect.
    let venv = VirtualEnvironment::find(venv)?;
    debug!("Using environment at {}", venv.root().display());

    // Build the installed index.
    let site_packages = SitePackages::from_environment(venv)?;
    debug!("Found {} installed distributions", site_packages.len());

    // Wrap each installed plugin; derived fields are evaluated at render time.
    let mut plugins = Vec::new();
    for dist in site_packages.iter() {
        if flakedex_codes::is_plugin(dist)? {
            debug!("Found plugin `{}`", dist.name());
            plugins.push(Plugin::new(dist.clone(), site_packages.directory()));
        }
    }
    let plugins: Vec<Plugin> = plugins
        .into_iter()
        .sorted_unstable_by(|a, b| a.name().cmp(b.name()))
        .collect();

    let today = jiff::Zoned::now().date();
    let content = flakedex_report::render(&plugins, today)?;

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory `{}`", output.display()))?;
    let path = output.join("index.html");
    fs::write(&path, &content)
        .with_context(|| format!("Failed to write report to `{}`", path.display()))?;

    let count = plugins.len();
    writeln!(
        printer.stdout(),
        "Indexed {} {} in {}: {}",
        count.bold(),
        if count == 1 { "plugin" } else { "plugins" },
        elapsed(start.elapsed()),
        path.display().cyan(),
    )?;

    Ok(ExitStatus::Success)
}
