use std::fmt::Write as _;

use html_escape::encode_text;

use crate::{
    domain::{DueItem, RevisionStatus},
    notify::Quote,
};

const WRAPPER_OPEN: &str = r#"<div style="font-family: system-ui, -apple-system, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">"#;
const WRAPPER_CLOSE: &str = "</div>";
const PARAGRAPH: &str = r#"<p style="color: #555; line-height: 1.6;">"#;
const SIGNATURE: &str = "- your revision tracker";

/// The subject, HTML body and text body of an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain text body.
    pub text: String,
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

fn line(item: &DueItem<'_>) -> String {
    let marker = if item.status == RevisionStatus::Overdue {
        " - overdue"
    } else {
        ""
    };
    format!(
        "• {} (Rev #{}){marker}",
        item.problem.title, item.revision.number
    )
}

/// Render the reminder listing every due and overdue item.
pub fn reminder(items: &[DueItem<'_>]) -> Rendered {
    let count = items.len();
    let subject = format!("{count} problem{} to revise today", plural(count));
    let intro = format!("You have {count} problem{} waiting for revision:", plural(count));
    let outro = "Lock in before midnight to keep the streak going.";

    let lines: Vec<_> = items.iter().map(line).collect();

    let mut text = format!("{subject}\n\n{intro}\n\n");
    for l in &lines {
        let _ = writeln!(text, "{l}");
    }
    let _ = write!(text, "\n{outro}\n\n{SIGNATURE}");

    let mut html = String::from(WRAPPER_OPEN);
    let _ = write!(
        html,
        r#"<h2 style="color: #333; margin-bottom: 20px;">{}</h2>"#,
        encode_text(&subject)
    );
    let _ = write!(html, "{PARAGRAPH}{}</p>", encode_text(&intro));
    html.push_str(
        r#"<div style="background: #f5f5f5; padding: 15px; border-radius: 8px; margin: 20px 0;"><pre style="margin: 0; font-family: monospace; color: #333; white-space: pre-wrap;">"#,
    );
    html.push_str(&encode_text(&lines.join("\n")));
    html.push_str("</pre></div>");
    let _ = write!(html, "{PARAGRAPH}{outro}</p>");
    let _ = write!(
        html,
        r#"<p style="color: #888; font-size: 14px; margin-top: 30px;">{}</p>"#,
        encode_text(SIGNATURE)
    );
    html.push_str(WRAPPER_CLOSE);

    Rendered {
        subject,
        html,
        text,
    }
}

/// Render the all-clear message carrying a quote.
pub fn all_clear(quote: &Quote) -> Rendered {
    let subject = "Nothing to revise today".to_string();
    let intro = "Your revision queue is empty. Enjoy the day, or pick up something new.";

    let text = format!(
        "{subject}\n\n{intro}\n\n\"{}\"\n- {}\n\n{SIGNATURE}",
        quote.text, quote.author
    );

    let mut html = String::from(WRAPPER_OPEN);
    let _ = write!(
        html,
        r#"<h2 style="color: #333; margin-bottom: 20px;">{subject}</h2>"#
    );
    let _ = write!(html, "{PARAGRAPH}{intro}</p>");
    let _ = write!(
        html,
        r#"<blockquote style="border-left: 4px solid #ddd; margin: 20px 0; padding: 10px 15px; color: #333;">{}<br><span style="color: #888;">- {}</span></blockquote>"#,
        encode_text(&quote.text),
        encode_text(&quote.author)
    );
    let _ = write!(
        html,
        r#"<p style="color: #888; font-size: 14px; margin-top: 30px;">{}</p>"#,
        encode_text(SIGNATURE)
    );
    html.push_str(WRAPPER_CLOSE);

    Rendered {
        subject,
        html,
        text,
    }
}

/// Render the fixed message used to check delivery.
pub fn test() -> Rendered {
    Rendered {
        subject: "Test email from your revision tracker".to_string(),
        html: "<p>Test email works! 🎉</p>".to_string(),
        text: "Test email works!".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::domain::{Difficulty, Problem};

    fn problem(title: &str) -> Problem {
        Problem::new(
            title.to_string(),
            format!("https://example.com/{title}"),
            Difficulty::Medium,
            Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        )
    }

    #[test]
    fn reminder_lists_items() {
        let a = problem("Two Sum");
        let b = problem("<script>alert(1)</script>");
        let items = vec![
            DueItem {
                problem: &a,
                revision: &a.revisions[0],
                status: RevisionStatus::Overdue,
            },
            DueItem {
                problem: &b,
                revision: &b.revisions[1],
                status: RevisionStatus::Due,
            },
        ];

        let rendered = reminder(&items);

        assert_eq!(rendered.subject, "2 problems to revise today");
        assert!(rendered.text.contains("• Two Sum (Rev #1) - overdue\n"));
        assert!(rendered.text.contains("• <script>alert(1)</script> (Rev #2)\n"));
        assert!(rendered.html.contains("&lt;script&gt;alert(1)&lt;/script&gt; (Rev #2)"));
        assert!(!rendered.html.contains("<script>"));
    }

    #[test]
    fn reminder_singular() {
        let a = problem("Two Sum");
        let items = vec![DueItem {
            problem: &a,
            revision: &a.revisions[0],
            status: RevisionStatus::Due,
        }];

        let rendered = reminder(&items);

        assert_eq!(rendered.subject, "1 problem to revise today");
        assert!(!rendered.text.contains("overdue"));
    }

    #[test]
    fn all_clear_includes_quote() {
        let quote = Quote {
            text: "Less is <more>".to_string(),
            author: "Someone".to_string(),
        };

        let rendered = all_clear(&quote);

        assert!(rendered.text.contains("\"Less is <more>\"\n- Someone"));
        assert!(rendered.html.contains("Less is &lt;more&gt;"));
    }
}
