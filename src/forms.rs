//! Search and newsletter boxes.
//!
//! Neither talks to a server. Search echoes the query back; the newsletter
//! box checks the address and clears it on success. Both report through a
//! blocking alert, and both stay inert unless the page has the button and
//! the input.

use crate::dom::{selector, Document, NodeId};
use crate::email::is_valid_email;
use crate::host::Host;
use tracing::{debug, info};

pub const SEARCH_EMPTY: &str = "Please enter a search term";
pub const NEWSLETTER_THANKS: &str = "Thank you for subscribing! You will receive our latest news.";
pub const NEWSLETTER_INVALID: &str = "Please enter a valid email address";

/// Current value of a form control.
pub fn input_value(doc: &Document, input: NodeId) -> String {
    doc.attr(input, "value").unwrap_or_default().to_string()
}

#[derive(Debug, Clone, Copy)]
pub struct SearchForm {
    button: NodeId,
    input: NodeId,
}

impl SearchForm {
    pub fn bind(doc: &Document) -> Option<Self> {
        let button = doc.query_first(&selector(".search-bar button"));
        let input = doc.query_first(&selector(".search-bar input"));
        match (button, input) {
            (Some(button), Some(input)) => Some(Self { button, input }),
            _ => {
                debug!("No search bar on this page");
                None
            }
        }
    }

    pub fn button(&self) -> NodeId {
        self.button
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    pub fn is_submit(&self, doc: &Document, target: NodeId) -> bool {
        doc.contains(self.button, target)
    }

    pub fn submit<H: Host>(&self, doc: &Document, host: &mut H) {
        let value = input_value(doc, self.input);
        let query = value.trim();
        if query.is_empty() {
            host.alert(SEARCH_EMPTY);
        } else {
            info!(%query, "Search submitted");
            host.alert(&format!("Searching for: {query}"));
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NewsletterForm {
    button: NodeId,
    input: NodeId,
}

impl NewsletterForm {
    pub fn bind(doc: &Document) -> Option<Self> {
        let button = doc.query_first(&selector(".newsletter button"));
        let input = doc.query_first(&selector(".newsletter input"));
        match (button, input) {
            (Some(button), Some(input)) => Some(Self { button, input }),
            _ => {
                debug!("No newsletter box on this page");
                None
            }
        }
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    pub fn is_submit(&self, doc: &Document, target: NodeId) -> bool {
        doc.contains(self.button, target)
    }

    /// Returns whether the address was accepted.
    pub fn submit<H: Host>(&self, doc: &mut Document, host: &mut H) -> bool {
        let value = input_value(doc, self.input);
        let email = value.trim();
        if !email.is_empty() && is_valid_email(email) {
            info!("Newsletter subscription accepted");
            host.alert(NEWSLETTER_THANKS);
            doc.set_attr(self.input, "value", "");
            true
        } else {
            host.alert(NEWSLETTER_INVALID);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;

    const PAGE: &str = r#"<body>
        <div class="search-bar"><input id="q" type="text"><button id="go">Search</button></div>
        <div class="newsletter"><input id="mail" type="email"><button id="sub">Subscribe</button></div>
    </body>"#;

    #[test]
    fn test_search_alerts_trimmed_query() {
        let mut doc = Document::parse(PAGE);
        let form = SearchForm::bind(&doc).unwrap();
        let mut host = RecordingHost::new(false);

        doc.set_attr(form.input(), "value", "  Bamenda derby ");
        form.submit(&doc, &mut host);
        doc.set_attr(form.input(), "value", "   ");
        form.submit(&doc, &mut host);

        assert_eq!(
            host.alerts(),
            vec!["Searching for: Bamenda derby", SEARCH_EMPTY]
        );
    }

    #[test]
    fn test_search_submit_target() {
        let doc = Document::parse(PAGE);
        let form = SearchForm::bind(&doc).unwrap();
        assert!(form.is_submit(&doc, doc.by_id("go").unwrap()));
        assert!(!form.is_submit(&doc, doc.by_id("q").unwrap()));
    }

    #[test]
    fn test_newsletter_accepts_and_clears() {
        let mut doc = Document::parse(PAGE);
        let form = NewsletterForm::bind(&doc).unwrap();
        let mut host = RecordingHost::new(false);

        doc.set_attr(form.input(), "value", " reader@eden.cm ");
        assert!(form.submit(&mut doc, &mut host));
        assert_eq!(input_value(&doc, form.input()), "");
        assert_eq!(host.alerts(), vec![NEWSLETTER_THANKS]);
    }

    #[test]
    fn test_newsletter_rejects_and_keeps_value() {
        let mut doc = Document::parse(PAGE);
        let form = NewsletterForm::bind(&doc).unwrap();
        let mut host = RecordingHost::new(false);

        doc.set_attr(form.input(), "value", "reader@eden");
        assert!(!form.submit(&mut doc, &mut host));
        assert_eq!(input_value(&doc, form.input()), "reader@eden");
        assert_eq!(host.alerts(), vec![NEWSLETTER_INVALID]);
    }

    #[test]
    fn test_forms_need_button_and_input() {
        let doc = Document::parse("<div class='search-bar'><input></div><div class='newsletter'></div>");
        assert!(SearchForm::bind(&doc).is_none());
        assert!(NewsletterForm::bind(&doc).is_none());
    }
}
