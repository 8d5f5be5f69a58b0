#![deny(missing_docs)]

//! # Rendering
//!
//! Turns a [`GenerationResult`] plus the overview text into a single Markdown
//! or HTML document.

use crate::generation::pricing::format_cost;
use crate::generation::GenerationResult;
use std::fmt::Write;

/// Output formats supported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// A Markdown document.
    #[default]
    Markdown,
    /// A standalone HTML page.
    Html,
}

/// Converts text into a URL-safe lowercase anchor slug.
///
/// Lowercases, turns spaces into hyphens and drops anything outside `[a-z0-9-]`.
pub fn sanitize_anchor(text: &str) -> String {
    text.to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Renders the result in the requested format.
pub fn render(result: &GenerationResult, overview: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Markdown => format_markdown(result, overview),
        OutputFormat::Html => format_html(result, overview),
    }
}

/// Renders a Markdown document: title, overview, table of contents, one
/// section per endpoint and generation stats.
pub fn format_markdown(result: &GenerationResult, overview: &str) -> String {
    let mut out = String::new();

    // `write!` into a String cannot fail.
    let _ = writeln!(out, "# {} (v{})\n", result.api_title, result.api_version);
    let _ = writeln!(out, "## Overview\n\n{}\n", overview.trim());

    out.push_str("## Table of Contents\n\n");
    for doc in &result.docs {
        let _ = writeln!(
            out,
            "- [{}](#{})",
            doc.endpoint_ref,
            sanitize_anchor(&doc.endpoint_ref)
        );
    }

    out.push_str("\n## Endpoints\n");
    for doc in &result.docs {
        let _ = writeln!(out, "\n### {}\n\n{}", doc.endpoint_ref, doc.markdown.trim());
    }

    out.push_str("\n## Generation Stats\n\n");
    let _ = writeln!(out, "- **Model:** {}", result.model);
    let _ = writeln!(out, "- **Endpoints documented:** {}", result.docs.len());
    let _ = writeln!(out, "- **Total tokens:** {}", result.total_tokens);
    let _ = writeln!(out, "- **Estimated cost:** {}", format_cost(result.total_cost_usd));

    out
}

/// Renders a standalone HTML page.
///
/// Generated Markdown is embedded escaped inside `<pre>` blocks.
pub fn format_html(result: &GenerationResult, overview: &str) -> String {
    let title = escape_html(&format!("{} (v{})", result.api_title, result.api_version));
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", title);
    out.push_str(
        "<style>body{font-family:sans-serif;max-width:60rem;margin:auto;padding:1rem}\
         pre{white-space:pre-wrap;background:#f6f8fa;padding:1rem}</style>\n",
    );
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h1>{}</h1>", title);

    let _ = writeln!(
        out,
        "<section id=\"overview\">\n<h2>Overview</h2>\n<pre>{}</pre>\n</section>",
        escape_html(overview.trim())
    );

    out.push_str("<nav>\n<h2>Table of Contents</h2>\n<ul>\n");
    for doc in &result.docs {
        let _ = writeln!(
            out,
            "<li><a href=\"#{}\">{}</a></li>",
            sanitize_anchor(&doc.endpoint_ref),
            escape_html(&doc.endpoint_ref)
        );
    }
    out.push_str("</ul>\n</nav>\n");

    for doc in &result.docs {
        let _ = writeln!(
            out,
            "<section id=\"{}\">\n<h3>{}</h3>\n<pre>{}</pre>\n</section>",
            sanitize_anchor(&doc.endpoint_ref),
            escape_html(&doc.endpoint_ref),
            escape_html(doc.markdown.trim())
        );
    }

    let _ = writeln!(
        out,
        "<footer>\n<h2>Generation Stats</h2>\n<p>Model: {} | Tokens: {} | Cost: {}</p>\n</footer>",
        escape_html(&result.model),
        result.total_tokens,
        format_cost(result.total_cost_usd)
    );
    out.push_str("</body>\n</html>\n");

    out
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
