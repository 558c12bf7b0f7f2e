//! HTML rendering of a directory listing

use super::entry::PageModel;
use std::fmt::{self, Write};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>File and Folder Listing</title>
    <style>
        body { font-family: sans-serif; }
        table { border-collapse: collapse; width: 100%; margin-top: 20px; }
        th, td { border: 1px solid #ddd; padding: 12px; text-align: left; }
        th { background-color: #f2f2f2; }
        a { text-decoration: none; color: #007bff; }
        a:hover { text-decoration: underline; }
        .folder { color: #ffa500; font-weight: bold; }
        .file { color: #007bff; }
    </style>
</head>
<body>
"#;

const PAGE_TAIL: &str = "    </table>\n</body>\n</html>\n";

/// Escape text for HTML element content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render the full listing document
pub fn render_page(page: &PageModel) -> Result<String, fmt::Error> {
    let mut html = String::with_capacity(PAGE_HEAD.len() + page.entries.len() * 160);
    html.push_str(PAGE_HEAD);

    if page.sub_path.is_empty() {
        writeln!(html, "    <h1>Files and Folders</h1>")?;
    } else {
        writeln!(
            html,
            "    <h1>Files and Folders: /{}</h1>",
            escape_html(&page.sub_path)
        )?;
    }

    html.push_str("    <table>\n        <tr>\n            <th>Name</th>\n            <th>Last Modified</th>\n        </tr>\n");

    for entry in &page.entries {
        let (class, icon, suffix) = if entry.is_dir {
            ("folder", "📁", "/")
        } else {
            ("file", "📄", "")
        };
        writeln!(html, "        <tr>")?;
        writeln!(
            html,
            "            <td><a class=\"{class}\" href=\"{}\">{icon} {}{suffix}</a></td>",
            escape_html(&entry.href),
            escape_html(&entry.name),
        )?;
        writeln!(
            html,
            "            <td>{}</td>",
            entry.modified.as_deref().unwrap_or("")
        )?;
        writeln!(html, "        </tr>")?;
    }

    html.push_str(PAGE_TAIL);
    Ok(html)
}
