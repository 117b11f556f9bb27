// Page and JSON rendering for drafts.

use std::fmt::Write;

use serde::Serialize;

use pokedraft_core::draft::Draft;
use pokedraft_core::family::{display_name, Family, FamilyId};

// ---------------------------------------------------------------------------
// JSON views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftView {
    pub picks: Vec<PickView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickView {
    /// 1-based pick number.
    pub pick: usize,
    pub families: Vec<FamilyView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyView {
    pub id: FamilyId,
    pub root: String,
    pub final_stage: String,
    pub display_name: String,
    pub stages: Vec<String>,
}

impl From<&Family> for FamilyView {
    fn from(family: &Family) -> Self {
        let final_stage = family.final_stage().name().to_string();
        Self {
            id: family.id,
            root: family.root_name().to_string(),
            display_name: display_name(&final_stage),
            final_stage,
            stages: family.stage_names().into_iter().map(String::from).collect(),
        }
    }
}

impl From<&Draft> for DraftView {
    fn from(draft: &Draft) -> Self {
        let picks = draft
            .picks
            .iter()
            .enumerate()
            .map(|(i, set)| PickView {
                pick: i + 1,
                families: set.families.iter().map(FamilyView::from).collect(),
            })
            .collect();
        Self { picks }
    }
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem}\
h2{margin-bottom:.25rem}ul{margin-top:0}";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(title)
    )
}

pub fn landing_page() -> String {
    page(
        "Pokémon Draft",
        "<h1>Pokémon Draft</h1>\n\
         <p>Eight picks, four evolution families each. No restricted legendaries, \
         no mythicals.</p>\n\
         <p><a href=\"/draft\">Generate a draft</a></p>\n",
    )
}

/// One heading per pick, listing the most-evolved stage of each family.
pub fn draft_page(draft: &Draft) -> String {
    let mut body = String::from("<h1>Your Draft</h1>\n");
    for (i, set) in draft.picks.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(body, "<section class=\"pick\">\n<h2>Pick {}</h2>\n<ul>", i + 1);
        for family in &set.families {
            let _ = writeln!(
                body,
                "<li data-family=\"{}\">{}</li>",
                family.id,
                escape_html(&family.final_display_name())
            );
        }
        body.push_str("</ul>\n</section>\n");
    }
    body.push_str("<p><a href=\"/draft\">Draft again</a></p>\n");
    page("Pokémon Draft", &body)
}

pub fn error_page(heading: &str, detail: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/draft\">Try again</a></p>\n",
        escape_html(heading),
        escape_html(detail)
    );
    page(heading, &body)
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
