//! Maps a result payload to what the overlay should display.
//!
//! Rendering is pure: the same result set, messages and locale always produce
//! the same instruction, and nothing is touched on screen until a
//! [`Surface`](crate::presenter::Surface) applies it.

use serde::Serialize;

use crate::config::{LocalePreference, MessageTable};
use crate::datefmt::display_date;
use crate::types::{ResultSet, SearchResult, COUNT_PLACEHOLDER};

/// A result entry ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEntry {
    pub title: String,
    pub href: String,
    /// Short, locale-formatted date; empty when the hit carries none.
    pub date: String,
    /// Highlighted excerpt as delivered by the index.
    pub excerpt_html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    pub message: String,
    pub empty_state_visible: bool,
    pub entries: Vec<RenderedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderInstruction {
    Results(ResultsView),
    /// The query could not be answered. Never used for zero results.
    Unavailable { message: String },
}

pub struct ResultsRenderer<'a> {
    messages: &'a MessageTable,
    locale: &'a LocalePreference,
}

impl<'a> ResultsRenderer<'a> {
    pub fn new(messages: &'a MessageTable, locale: &'a LocalePreference) -> Self {
        Self { messages, locale }
    }

    pub fn render(&self, results: &ResultSet) -> RenderInstruction {
        let (message, empty_state_visible) = match results.total_hits {
            0 => (self.messages.zero.clone(), true),
            1 => (self.messages.one.clone(), false),
            n => (self.messages.other.replacen(COUNT_PLACEHOLDER, &n.to_string(), 1), false),
        };
        let entries = if results.total_hits == 0 {
            Vec::new()
        } else {
            results.hits.iter().map(|hit| self.entry(hit)).collect()
        };
        RenderInstruction::Results(ResultsView { message, empty_state_visible, entries })
    }

    pub fn render_failure(&self) -> RenderInstruction {
        RenderInstruction::Unavailable { message: self.messages.unavailable.clone() }
    }

    fn entry(&self, hit: &SearchResult) -> RenderedEntry {
        let locale = self.locale.resolve(hit.locale.as_deref());
        RenderedEntry {
            title: hit.title.clone(),
            href: hit.href().unwrap_or_default().to_string(),
            date: hit.published_date.as_ref().map(|d| display_date(d, locale)).unwrap_or_default(),
            excerpt_html: hit.excerpt_html.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PublishedDate;

    fn hit(title: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            link: None,
            permalink: Some(format!("/{title}/")),
            excerpt_html: format!("<em>{title}</em>"),
            published_date: Some(PublishedDate::Text("1986-09-04".into())),
            locale: Some("fr".into()),
        }
    }

    fn view(instruction: RenderInstruction) -> ResultsView {
        match instruction {
            RenderInstruction::Results(v) => v,
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[test]
    fn zero_hits_shows_empty_state() {
        let messages = MessageTable::default();
        let locale = LocalePreference::default();
        let v = view(ResultsRenderer::new(&messages, &locale).render(&ResultSet::new(vec![], 0)));
        assert!(v.empty_state_visible);
        assert_eq!(v.message, messages.zero);
        assert!(v.entries.is_empty());
    }

    #[test]
    fn one_hit_uses_singular_message() {
        let messages = MessageTable::default();
        let locale = LocalePreference::default();
        let v = view(ResultsRenderer::new(&messages, &locale).render(&ResultSet::new(vec![hit("a")], 1)));
        assert!(!v.empty_state_visible);
        assert_eq!(v.message, messages.one);
        assert_eq!(v.entries.len(), 1);
        assert_eq!(v.entries[0].title, "a");
        assert_eq!(v.entries[0].href, "/a/");
    }

    #[test]
    fn many_hits_substitute_count_and_keep_order() {
        let messages = MessageTable { other: "{n} posts, {n} total".into(), ..MessageTable::default() };
        let locale = LocalePreference::default();
        let set = ResultSet::new(vec![hit("c"), hit("a"), hit("b")], 5);
        let v = view(ResultsRenderer::new(&messages, &locale).render(&set));
        assert_eq!(v.message, "5 posts, {n} total");
        assert!(!v.empty_state_visible);
        let titles: Vec<&str> = v.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["c", "a", "b"]);
    }

    #[test]
    fn date_locale_precedence() {
        let messages = MessageTable::default();

        // Entry locale used when the visitor has no language settings
        let none = LocalePreference::default();
        let v = view(ResultsRenderer::new(&messages, &none).render(&ResultSet::new(vec![hit("a")], 1)));
        assert_eq!(v.entries[0].date, "4 sept. 1986");

        let browser = LocalePreference { user_language: None, language: Some("en-GB".into()) };
        let v = view(ResultsRenderer::new(&messages, &browser).render(&ResultSet::new(vec![hit("a")], 1)));
        assert_eq!(v.entries[0].date, "Sep 4, 1986");

        let user = LocalePreference { user_language: Some("de".into()), language: Some("en".into()) };
        let v = view(ResultsRenderer::new(&messages, &user).render(&ResultSet::new(vec![hit("a")], 1)));
        assert_eq!(v.entries[0].date, "4. Sep. 1986");
    }

    #[test]
    fn missing_date_and_link_render_empty() {
        let messages = MessageTable::default();
        let locale = LocalePreference::default();
        let bare = SearchResult { permalink: None, published_date: None, ..hit("x") };
        let v = view(ResultsRenderer::new(&messages, &locale).render(&ResultSet::new(vec![bare], 1)));
        assert_eq!(v.entries[0].href, "");
        assert_eq!(v.entries[0].date, "");
    }

    #[test]
    fn failure_is_distinct_from_zero_results() {
        let messages = MessageTable::default();
        let locale = LocalePreference::default();
        let renderer = ResultsRenderer::new(&messages, &locale);
        let failure = renderer.render_failure();
        assert_eq!(failure, RenderInstruction::Unavailable { message: messages.unavailable.clone() });
        assert_ne!(failure, renderer.render(&ResultSet::new(vec![], 0)));
    }
}
