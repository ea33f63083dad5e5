//! Server-built HTML for the management page.

use std::fmt::Write as _;

use url::form_urlencoded;

use crate::domain::Card;

/// Escape text for use in HTML element content and quoted attributes.
fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn delete_href(card: &Card) -> String {
    let encoded: String = form_urlencoded::byte_serialize(card.id().as_ref().as_bytes()).collect();
    format!("/delete?delete={encoded}")
}

/// Render the card list with its count, an add form and a delete link per
/// card.
pub fn render_manage_page(cards: &[Card]) -> String {
    let mut rows = String::new();
    for card in cards {
        // Writing into a String cannot fail.
        let _ = writeln!(
            rows,
            "<li>{id} <a href=\"{href}\">delete</a></li>",
            id = escape_html(card.id().as_ref()),
            href = escape_html(&delete_href(card)),
        );
    }

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html>\n",
            "<head><meta charset=\"utf-8\"><title>Manage cards</title></head>\n",
            "<body>\n",
            "<h1>Registered cards</h1>\n",
            "<p>{count} card(s) registered</p>\n",
            "<ul>\n{rows}</ul>\n",
            "<form method=\"post\" action=\"/add\">\n",
            "<input name=\"uid\" maxlength=\"8\" required>\n",
            "<button type=\"submit\">Add card</button>\n",
            "</form>\n",
            "</body>\n",
            "</html>\n"
        ),
        count = cards.len(),
        rows = rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CardId;
    use rstest::rstest;

    fn card(raw: &str) -> Card {
        Card::new(CardId::new(raw).expect("fixture card id"))
    }

    #[rstest]
    fn lists_each_card_with_a_delete_link() {
        let page = render_manage_page(&[card("AAAA0001"), card("BBBB0002")]);
        assert!(page.contains("<p>2 card(s) registered</p>"));
        assert!(page.contains("<li>AAAA0001 <a href=\"/delete?delete=AAAA0001\">delete</a></li>"));
        assert!(page.contains("<li>BBBB0002 <a href=\"/delete?delete=BBBB0002\">delete</a></li>"));
    }

    #[rstest]
    fn empty_registry_renders_zero_count() {
        let page = render_manage_page(&[]);
        assert!(page.contains("<p>0 card(s) registered</p>"));
        assert!(page.contains("action=\"/add\""));
    }

    #[rstest]
    fn identifiers_are_escaped() {
        let page = render_manage_page(&[card("<b>&\"x")]);
        assert!(page.contains("&lt;b&gt;&amp;&quot;x"));
        assert!(!page.contains("<b>"));
        assert!(page.contains("/delete?delete=%3Cb%3E%26%22x"));
    }
}
