//! HTML rendering for the plugin report.
//!
//! The document is self-contained: styles are embedded, and no scripts or external assets
//! are referenced, so the output works offline and from `file://`.

use jiff::civil::Date;

use crate::{Error, Plugin};

/// Render the full report document from the sorted plugin list.
pub fn render(plugins: &[Plugin], today: Date) -> Result<String, Error> {
    let body = if plugins.is_empty() {
        r#"<p class="empty">No flake8 plugins are installed in this environment.</p>"#.to_string()
    } else {
        let sections = plugins
            .iter()
            .map(render_plugin)
            .collect::<Result<Vec<_>, Error>>()?;
        sections.join("\n")
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>flake8 plugins</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <header>
            <h1>flake8 plugins</h1>
            <div class="meta">
                <span>{count} installed</span> •
                <span>Generated on {today}</span>
            </div>
        </header>
        {body}
        {footer}
    </div>
</body>
</html>
"#,
        css = inline_css(),
        count = plugins.len(),
        today = today,
        body = body,
        footer = render_footer(),
    ))
}

/// Render one plugin section: title, metadata line, summary, and the code table.
fn render_plugin(plugin: &Plugin) -> Result<String, Error> {
    let name = html_escape(plugin.name().as_str());
    let url = html_escape(plugin.url()?);
    let short_url = html_escape(plugin.short_url()?);
    let version = html_escape(plugin.version()?);

    let mut meta = vec![format!(r#"<a href="{url}">{short_url}</a>"#)];
    if let Some(author) = plugin.author()? {
        meta.push(format!("by {}", html_escape(author)));
    }
    if let Some(license) = plugin.license()? {
        meta.push(html_escape(license));
    }
    let meta = meta.join(" • ");

    let summary = match plugin.summary()? {
        Some(summary) => format!("\n    <p class=\"summary\">{}</p>", html_escape(summary)),
        None => String::new(),
    };

    Ok(format!(
        r#"<section class="plugin" id="{name}">
    <h2>{name} <span class="version">{version}</span></h2>
    <div class="meta">{meta}</div>{summary}
{codes}
</section>"#,
        codes = render_codes(plugin.codes()?),
    ))
}

/// Render the code table, or a placeholder when the plugin defines no codes.
fn render_codes(codes: &[(String, String)]) -> String {
    if codes.is_empty() {
        return r#"    <p class="no-codes">No codes declared.</p>"#.to_string();
    }

    let rows: String = codes
        .iter()
        .map(|(code, description)| {
            format!(
                r#"<tr>
    <td class="monospace">{code}</td>
    <td>{description}</td>
</tr>"#,
                code = html_escape(code),
                description = html_escape(description),
            )
        })
        .collect();

    format!(
        r#"    <table>
        <thead>
            <tr>
                <th>Code</th>
                <th>Description</th>
            </tr>
        </thead>
        <tbody>
            {rows}
        </tbody>
    </table>"#
    )
}

/// Render footer
fn render_footer() -> String {
    r#"<footer>
    <p>Generated by flakedex</p>
</footer>"#
        .to_string()
}

/// Inline CSS styles
fn inline_css() -> &'static str {
    r#"
* {
    box-sizing: border-box;
    margin: 0;
    padding: 0;
}

body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    line-height: 1.6;
    color: #111827;
    background: #ffffff;
}

.container {
    max-width: 960px;
    margin: 0 auto;
    padding: 2rem;
}

header {
    margin-bottom: 2rem;
    padding-bottom: 1rem;
    border-bottom: 2px solid #e5e7eb;
}

header h1 {
    font-size: 2rem;
    font-weight: 700;
    margin-bottom: 0.5rem;
}

header .meta,
.plugin .meta {
    color: #6b7280;
    font-size: 0.875rem;
}

.plugin {
    margin-bottom: 2rem;
}

.plugin h2 {
    font-size: 1.25rem;
    font-weight: 700;
}

.plugin .version {
    color: #6b7280;
    font-size: 0.875rem;
    font-weight: 400;
}

.plugin .summary {
    margin: 0.5rem 0;
}

table {
    width: 100%;
    border-collapse: collapse;
    margin-top: 0.75rem;
}

th {
    padding: 0.5rem;
    text-align: left;
    font-weight: 600;
    font-size: 0.875rem;
    color: #374151;
    border-bottom: 2px solid #e5e7eb;
}

td {
    padding: 0.5rem;
    border-bottom: 1px solid #e5e7eb;
    font-size: 0.875rem;
}

tr:last-child td {
    border-bottom: none;
}

.monospace {
    font-family: 'Monaco', 'Courier New', monospace;
    font-size: 0.875rem;
    white-space: nowrap;
}

.empty,
.no-codes {
    color: #6b7280;
}

footer {
    margin-top: 3rem;
    padding-top: 1rem;
    border-top: 1px solid #e5e7eb;
    text-align: center;
    color: #6b7280;
    font-size: 0.875rem;
}
"#
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
