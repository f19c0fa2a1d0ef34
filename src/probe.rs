//! Ordered fallback matching.
//!
//! A [`Probe`] is one structural or textual pattern tried against a page.
//! Every field the pipeline resolves is described by an ordered list of
//! probes, and all of them go through the same [`first_match`] routine: the
//! first candidate that the field's acceptance function turns into a value
//! wins, otherwise the caller gets a [`Miss`] and keeps its default.

use regex::{Captures, Regex};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::fmt;

/// How many candidates a probe contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Take {
    /// Only the first matching element or regex match
    First,
    /// Every matching element or regex match, in document order
    Every,
}

/// What a pattern probe is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The raw page markup
    Markup,
    /// The visible text content of the page
    PageText,
    /// The visible text first; the raw markup only if the text has no match
    PageTextThenMarkup,
    /// Individual text nodes inside the scope; the candidate is the whole node
    TextNodes,
}

#[derive(Debug, Clone)]
enum ProbeKind {
    Selector(Selector),
    Attribute {
        selector: Selector,
        attr: &'static str,
    },
    Pattern {
        regex: Regex,
        target: Target,
    },
}

/// A single selector or pattern attempted against a page or row.
#[derive(Debug, Clone)]
pub struct Probe {
    label: &'static str,
    kind: ProbeKind,
    take: Take,
}

/// Candidate produced by a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Element text (trimmed), attribute value, or the first capture group
    pub text: String,
    /// Capture groups of a pattern probe, starting at group 1
    pub groups: Vec<Option<String>>,
}

impl Match {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            groups: Vec::new(),
        }
    }

    fn from_captures(captures: &Captures<'_>) -> Self {
        let groups: Vec<Option<String>> = captures
            .iter()
            .skip(1)
            .map(|group| group.map(|g| g.as_str().to_string()))
            .collect();
        let text = match groups.first() {
            Some(Some(first)) => first.clone(),
            _ => captures
                .get(0)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        };
        Self { text, groups }
    }

    /// Capture group `index` (1-based), if the pattern has it and it matched.
    pub fn group(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.groups.get(i))
            .and_then(|group| group.as_deref())
    }
}

/// A value together with the probe that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub probe: &'static str,
}

/// No probe in the list produced an acceptable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Miss {
    pub probes_tried: usize,
}

impl fmt::Display for Miss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no match after {} probes", self.probes_tried)
    }
}

/// Where probes are evaluated: a whole page or one row of it.
#[derive(Debug, Clone)]
pub struct ProbeContext<'a> {
    root: ElementRef<'a>,
    markup: &'a str,
    page_text: String,
}

impl<'a> ProbeContext<'a> {
    /// Context covering a whole document and its raw markup.
    pub fn document(document: &'a Html, markup: &'a str) -> Self {
        let root = document.root_element();
        Self {
            root,
            markup,
            page_text: visible_text(root),
        }
    }

    /// Context scoped to a single element, such as a track row.
    ///
    /// Pattern probes targeting the markup or page text see nothing here.
    pub fn row(row: ElementRef<'a>) -> Self {
        Self {
            root: row,
            markup: "",
            page_text: String::new(),
        }
    }

    pub fn root(&self) -> ElementRef<'a> {
        self.root
    }

    pub fn markup(&self) -> &'a str {
        self.markup
    }

    pub fn page_text(&self) -> &str {
        &self.page_text
    }

    fn select(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.root.select(selector).collect()
    }
}

impl Probe {
    /// First element matching a CSS selector, by its trimmed text.
    ///
    /// # Panics
    ///
    /// Panics if `css` is not a valid selector. Probe tables are built from
    /// literals, so this only fires on a typo in the table itself.
    pub fn selector(css: &'static str) -> Self {
        Self::selector_taking(css, Take::First)
    }

    /// Every element matching a CSS selector, by trimmed text.
    pub fn selector_all(css: &'static str) -> Self {
        Self::selector_taking(css, Take::Every)
    }

    fn selector_taking(css: &'static str, take: Take) -> Self {
        let selector = Selector::parse(css).unwrap();
        Self {
            label: css,
            kind: ProbeKind::Selector(selector),
            take,
        }
    }

    /// Attribute of the first element matching a CSS selector.
    pub fn attribute(css: &'static str, attr: &'static str) -> Self {
        let selector = Selector::parse(css).unwrap();
        Self {
            label: css,
            kind: ProbeKind::Attribute { selector, attr },
            take: Take::First,
        }
    }

    /// Regex probe over the given target.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regular expression.
    pub fn pattern(pattern: &'static str, target: Target, take: Take) -> Self {
        let regex = Regex::new(pattern).unwrap();
        Self {
            label: pattern,
            kind: ProbeKind::Pattern { regex, target },
            take,
        }
    }

    /// The selector or pattern source, used in diagnostics.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// The compiled selector, if this is a selector probe.
    pub fn as_selector(&self) -> Option<&Selector> {
        match &self.kind {
            ProbeKind::Selector(selector) | ProbeKind::Attribute { selector, .. } => {
                Some(selector)
            }
            ProbeKind::Pattern { .. } => None,
        }
    }

    /// Evaluate the probe, returning its candidates in document order.
    pub fn candidates(&self, context: &ProbeContext<'_>) -> Vec<Match> {
        let limit = match self.take {
            Take::First => 1,
            Take::Every => usize::MAX,
        };

        match &self.kind {
            ProbeKind::Selector(selector) => context
                .select(selector)
                .into_iter()
                .take(limit)
                .map(|element| Match::plain(element_text(element)))
                .collect(),
            ProbeKind::Attribute { selector, attr } => context
                .select(selector)
                .into_iter()
                .take(limit)
                .filter_map(|element| element.value().attr(attr).map(Match::plain))
                .collect(),
            ProbeKind::Pattern { regex, target } => match target {
                Target::Markup => captures(regex, context.markup(), limit),
                Target::PageText => captures(regex, context.page_text(), limit),
                Target::PageTextThenMarkup => {
                    let from_text = captures(regex, context.page_text(), limit);
                    if from_text.is_empty() {
                        captures(regex, context.markup(), limit)
                    } else {
                        from_text
                    }
                }
                Target::TextNodes => text_nodes(context.root())
                    .filter(|text| regex.is_match(text))
                    .take(limit)
                    .map(|text| Match::plain(text.trim()))
                    .collect(),
            },
        }
    }
}

/// Try each probe in order and return the first candidate `accept` turns
/// into a value.
///
/// `accept` receives the candidate and the index of the probe that produced
/// it, so callers can attach per-probe meaning to a match.
pub fn first_match<T>(
    probes: &[Probe],
    context: &ProbeContext<'_>,
    mut accept: impl FnMut(&Match, usize) -> Option<T>,
) -> Result<Resolved<T>, Miss> {
    for (index, probe) in probes.iter().enumerate() {
        for candidate in probe.candidates(context) {
            if let Some(value) = accept(&candidate, index) {
                return Ok(Resolved {
                    value,
                    probe: probe.label(),
                });
            }
        }
    }
    Err(Miss {
        probes_tried: probes.len(),
    })
}

/// Candidates of the first probe that produces any at all.
///
/// Unlike [`first_match`] nothing is filtered; the winning probe's whole
/// candidate list is returned.
pub fn first_non_empty(
    probes: &[Probe],
    context: &ProbeContext<'_>,
) -> Result<Resolved<Vec<Match>>, Miss> {
    probes
        .iter()
        .find_map(|probe| {
            let candidates = probe.candidates(context);
            (!candidates.is_empty()).then(|| Resolved {
                value: candidates,
                probe: probe.label(),
            })
        })
        .ok_or(Miss {
            probes_tried: probes.len(),
        })
}

/// Elements matched by the first selector probe that matches anything.
///
/// Results of different probes are never merged.
pub fn first_selection<'a>(
    probes: &[Probe],
    context: &ProbeContext<'a>,
) -> Result<Resolved<Vec<ElementRef<'a>>>, Miss> {
    probes
        .iter()
        .filter_map(|probe| probe.as_selector().map(|selector| (probe, selector)))
        .find_map(|(probe, selector)| {
            let elements = context.select(selector);
            (!elements.is_empty()).then(|| Resolved {
                value: elements,
                probe: probe.label(),
            })
        })
        .ok_or(Miss {
            probes_tried: probes.len(),
        })
}

/// Trimmed text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Concatenated text of a subtree, skipping script and style contents.
pub fn visible_text(root: ElementRef<'_>) -> String {
    root.descendants()
        .filter(|node| {
            node.parent()
                .and_then(|parent| parent.value().as_element().map(|e| e.name()))
                .map_or(true, |name| !matches!(name, "script" | "style" | "noscript"))
        })
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
        .collect()
}

fn text_nodes<'a>(root: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    root.descendants().filter_map(|node| match node.value() {
        Node::Text(text) => Some(&**text),
        _ => None,
    })
}

fn captures(regex: &Regex, haystack: &str, limit: usize) -> Vec<Match> {
    regex
        .captures_iter(haystack)
        .take(limit)
        .map(|caps| Match::from_captures(&caps))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <h1 class="empty"></h1>
        <h1 data-testid="entityTitle">Chill Mix</h1>
        <div class="row"><a href="/artist/1">One</a><a href="/artist/2"> Two </a><span>3:45</span></div>
        <time datetime="2023-12-01T10:00:00Z">Dec 1</time>
        <script>var x = "50 songs";</script>
        <p>12 songs, 45 min</p>
        </body></html>"#;

    #[test]
    fn selector_probe_only_considers_first_element() {
        let document = Html::parse_document(PAGE);
        let context = ProbeContext::document(&document, PAGE);

        let first_h1 = Probe::selector("h1").candidates(&context);
        assert_eq!(first_h1, vec![Match::plain("")]);

        let resolved = first_match(
            &[Probe::selector("h1"), Probe::selector("[data-testid=\"entityTitle\"]")],
            &context,
            |m, _| (!m.text.is_empty()).then(|| m.text.clone()),
        )
        .unwrap();
        assert_eq!(resolved.value, "Chill Mix");
        assert_eq!(resolved.probe, "[data-testid=\"entityTitle\"]");
    }

    #[test]
    fn selector_all_collects_trimmed_text() {
        let document = Html::parse_document(PAGE);
        let context = ProbeContext::document(&document, PAGE);
        let texts: Vec<String> = Probe::selector_all("a[href*=\"/artist/\"]")
            .candidates(&context)
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["One", "Two"]);
    }

    #[test]
    fn attribute_probe_reads_first_element() {
        let document = Html::parse_document(PAGE);
        let context = ProbeContext::document(&document, PAGE);
        let candidates = Probe::attribute("time", "datetime").candidates(&context);
        assert_eq!(candidates[0].text, "2023-12-01T10:00:00Z");
    }

    #[test]
    fn page_text_skips_scripts() {
        let document = Html::parse_document(PAGE);
        let context = ProbeContext::document(&document, PAGE);
        assert!(context.page_text().contains("12 songs, 45 min"));
        assert!(!context.page_text().contains("var x"));

        let probe = Probe::pattern(r"(\d+)\s+songs?", Target::PageText, Take::Every);
        let counts: Vec<String> = probe
            .candidates(&context)
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(counts, vec!["12"]);

        let markup_probe = Probe::pattern(r"(\d+)\s+songs?", Target::Markup, Take::First);
        assert_eq!(markup_probe.candidates(&context)[0].text, "50");
    }

    #[test]
    fn text_then_markup_falls_through() {
        let document = Html::parse_document(PAGE);
        let context = ProbeContext::document(&document, PAGE);
        let probe = Probe::pattern(r"var (x)", Target::PageTextThenMarkup, Take::First);
        assert_eq!(probe.candidates(&context)[0].text, "x");
    }

    #[test]
    fn text_nodes_return_whole_node_in_row_scope() {
        let document = Html::parse_document(PAGE);
        let row_selector = Selector::parse("div.row").unwrap();
        let row = document.select(&row_selector).next().unwrap();
        let context = ProbeContext::row(row);

        let probe = Probe::pattern(r"\d+:\d{2}", Target::TextNodes, Take::First);
        assert_eq!(probe.candidates(&context)[0].text, "3:45");

        let markup_probe = Probe::pattern(r"(\d+)", Target::Markup, Take::First);
        assert!(markup_probe.candidates(&context).is_empty());
    }

    #[test]
    fn groups_are_one_based() {
        let regex = Regex::new(r"(\d+)\s+hr\s+(\d+)\s+min").unwrap();
        let caps = regex.captures("2 hr 15 min").unwrap();
        let m = Match::from_captures(&caps);
        assert_eq!(m.text, "2");
        assert_eq!(m.group(1), Some("2"));
        assert_eq!(m.group(2), Some("15"));
        assert_eq!(m.group(0), None);
        assert_eq!(m.group(3), None);
    }

    #[test]
    fn miss_counts_probes() {
        let document = Html::parse_document(PAGE);
        let context = ProbeContext::document(&document, PAGE);
        let probes = [Probe::selector("table"), Probe::selector("ul")];
        let miss = first_match(&probes, &context, |m, _| Some(m.text.clone())).unwrap_err();
        assert_eq!(miss, Miss { probes_tried: 2 });
        assert!(first_selection(&probes, &context).is_err());
        assert!(first_non_empty(&probes, &context).is_err());
    }
}
