//! HTML and plain-text renderings of a guide.

use std::fmt::Write;

use crate::guide::builder::resolve_field;
use crate::guide::models::{GenerationConfig, StayGuide};

const HTML_STYLE: &str = "body{font-family:Georgia,serif;max-width:760px;margin:2rem auto;color:#1f2933;line-height:1.5}\
h1{font-size:1.6rem}h2{font-size:1.2rem;border-bottom:1px solid #cbd2d9;padding-bottom:.25rem}\
blockquote{margin:0;padding:.75rem 1rem;background:#f5f7fa;border-left:4px solid #3e4c59}\
table{border-collapse:collapse;width:100%}th,td{border:1px solid #cbd2d9;padding:.5rem;vertical-align:top;text-align:left}\
@media print{body{margin:0}}";

/// Minimal escaping for text nodes and attribute values.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Standalone, printable HTML document.
pub fn render_html(guide: &StayGuide, config: &GenerationConfig) -> String {
    let mut html = String::new();

    // Writing to a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Stay Interview Guide</title>\n<style>{HTML_STYLE}</style>\n</head>\n<body>\n\
         <h1>Stay Interview Guide</h1>\n"
    );

    html.push_str("<ul class=\"context\">\n");
    for (label, value) in context_lines(config) {
        let _ = writeln!(
            html,
            "<li><strong>{}:</strong> {}</li>",
            label,
            escape_html(value)
        );
    }
    html.push_str("</ul>\n");

    let _ = writeln!(
        html,
        "<h2>Opening Script</h2>\n<blockquote>{}</blockquote>",
        escape_html(&guide.opening_script)
    );

    html.push_str("<h2>Questions</h2>\n");
    let mut number = 1;
    for tier in &guide.tiered_questions {
        let _ = writeln!(
            html,
            "<h3>{}</h3>\n<ol start=\"{}\">",
            escape_html(&tier.category),
            number
        );
        for question in &tier.questions {
            let _ = writeln!(html, "<li>{}</li>", escape_html(question));
            number += 1;
        }
        html.push_str("</ol>\n");
    }

    html.push_str(
        "<h2>Action Matrix</h2>\n<table>\n<thead><tr><th>Insight</th>\
         <th>Manager can act</th><th>Escalate</th></tr></thead>\n<tbody>\n",
    );
    for row in &guide.action_matrix {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&row.insight),
            escape_html(&row.controllable),
            escape_html(&row.uncontrollable)
        );
    }
    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");

    html
}

/// Clipboard payload.
pub fn render_text(guide: &StayGuide) -> String {
    let mut text = String::new();

    let _ = writeln!(text, "STAY INTERVIEW GUIDE\n");
    let _ = writeln!(text, "OPENING SCRIPT\n{}\n", guide.opening_script);

    let _ = writeln!(text, "QUESTIONS");
    let mut number = 1;
    for tier in &guide.tiered_questions {
        let _ = writeln!(text, "\n{}", tier.category);
        for question in &tier.questions {
            let _ = writeln!(text, "{number}. {question}");
            number += 1;
        }
    }

    let _ = writeln!(text, "\nACTION MATRIX");
    for row in &guide.action_matrix {
        let _ = writeln!(
            text,
            "- {}\n  Manager can act: {}\n  Escalate: {}",
            row.insight, row.controllable, row.uncontrollable
        );
    }

    text
}

fn context_lines(config: &GenerationConfig) -> [(&'static str, &str); 4] {
    [
        ("Trigger", resolve_field(&config.trigger, &config.custom_trigger)),
        ("Interview type", config.interview_type.as_str()),
        ("Persona", resolve_field(&config.persona, &config.custom_persona)),
        (
            "Sentiment",
            resolve_field(&config.sentiment, &config.custom_sentiment),
        ),
    ]
}
