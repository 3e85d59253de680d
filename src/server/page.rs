//! Server-rendered HTML for the studio page. Markup only; every piece of user
//! text goes through [`escape_html`].

use crate::{presets::SAVED_PROMPTS, session::SessionState, studio::SubmitOutcome};

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
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

fn image_tag(image_b64: &str, class: &str) -> String {
    // Base64 only ever contains [A-Za-z0-9+/=], escaping is a no-op for valid data.
    format!(
        r#"<img class="{}" src="data:image/png;base64,{}" alt="Generated image">"#,
        class,
        escape_html(image_b64)
    )
}

fn render_sidebar(session: &SessionState) -> String {
    let mut out = String::from("<aside>\n<h2>🎨 Saved Prompts</h2>\n");
    for (index, prompt) in SAVED_PROMPTS.iter().enumerate() {
        out.push_str(&format!(
            r#"<form method="post" action="/prompts/{}"><button type="submit">{}</button></form>"#,
            index,
            escape_html(prompt)
        ));
        out.push('\n');
    }

    out.push_str("<hr>\n<h2>🖼️ Image Gallery</h2>\n");
    if session.gallery().is_empty() {
        out.push_str("<p class=\"caption\">No images generated yet.</p>\n");
    } else {
        for image in session.gallery_newest_first() {
            out.push_str(&image_tag(image, "thumb"));
            out.push('\n');
        }
    }
    out.push_str("</aside>\n");
    out
}

fn render_metrics(session: &SessionState) -> String {
    let metrics = session.metrics();
    format!(
        concat!(
            "<section class=\"metrics\">\n",
            "<div><span>Cost per Image</span><strong>{}</strong></div>\n",
            "<div><span>Total Cost</span><strong>{}</strong></div>\n",
            "<div><span>Avg Latency (s)</span><strong>{}</strong></div>\n",
            "</section>\n"
        ),
        metrics.cost_per_image, metrics.total_cost, metrics.average_latency
    )
}

fn render_outcome(outcome: Option<&SubmitOutcome>) -> String {
    match outcome {
        None => String::new(),
        Some(SubmitOutcome::Warning(message)) => {
            format!("<p class=\"warning\">{}</p>\n", escape_html(message))
        }
        Some(SubmitOutcome::Failed(message)) => {
            format!("<p class=\"error\">Error: {}</p>\n", escape_html(message))
        }
        Some(SubmitOutcome::Generated { image_data, .. }) => format!(
            "<figure>{}<figcaption>Generated by Nova Canvas</figcaption></figure>\n",
            image_tag(image_data, "result")
        ),
    }
}

/// Renders the studio page. `draft` is the text of the form just submitted;
/// without one the prompt box shows the session's selected prompt.
pub fn render(
    session: &SessionState,
    outcome: Option<&SubmitOutcome>,
    draft: Option<&str>,
) -> String {
    let mut out = String::from(concat!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
        "<title>Bedrock Nova Canvas Image Generator</title>\n",
        "</head>\n<body>\n"
    ));
    out.push_str(&render_sidebar(session));
    out.push_str("<main>\n<h1>Bedrock Nova Canvas Image Generator</h1>\n");
    out.push_str(&render_metrics(session));
    out.push_str(&format!(
        concat!(
            "<form method=\"post\" action=\"/generate\">\n",
            "<label for=\"prompt\">Enter your image prompt:</label>\n",
            "<textarea id=\"prompt\" name=\"prompt\">{}</textarea>\n",
            "<button type=\"submit\">Generate Image</button>\n",
            "</form>\n"
        ),
        escape_html(draft.unwrap_or(session.selected_prompt()))
    ));
    out.push_str(&render_outcome(outcome));
    out.push_str("</main>\n</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_empty_session_page() {
        let html = render(&SessionState::default(), None, None);
        assert!(html.contains("No images generated yet."));
        assert!(html.contains("<strong>-</strong>"));
        assert!(html.contains("<strong>$0.00</strong>"));
        for index in 0..SAVED_PROMPTS.len() {
            assert!(html.contains(&format!("action=\"/prompts/{}\"", index)));
        }
    }

    #[test]
    fn test_gallery_is_newest_first() {
        let mut session = SessionState::default();
        session.append_result("b2xk".into(), 1.0);
        session.append_result("bmV3".into(), 3.0);
        let html = render(&session, None, None);

        let newest = html.find("base64,bmV3").unwrap();
        let oldest = html.find("base64,b2xk").unwrap();
        assert!(newest < oldest);
        assert!(html.contains("<strong>2.00</strong>"));
    }

    #[test]
    fn test_outcomes() {
        let session = SessionState::default();
        let html = render(&session, Some(&SubmitOutcome::Failed("<boom>".into())), None);
        assert!(html.contains("Error: &lt;boom&gt;"));

        let html = render(
            &session,
            Some(&SubmitOutcome::Warning("Please enter a prompt.".into())),
            None,
        );
        assert!(html.contains("class=\"warning\">Please enter a prompt."));
    }

    #[test]
    fn test_draft_takes_precedence_over_selected_prompt() {
        let mut session = SessionState::default();
        session.set_prompt("A cyberpunk kangaroo in Sydney");

        let html = render(&session, None, None);
        assert!(html.contains(">A cyberpunk kangaroo in Sydney</textarea>"));

        let html = render(&session, None, Some("a <new> idea"));
        assert!(html.contains(">a &lt;new&gt; idea</textarea>"));
    }
}
