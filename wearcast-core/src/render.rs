//! Parsing of generated recommendation text into display sections.
//!
//! Sections are separated by blank lines; the first line of each is its
//! header. Headers are classified by substring, so any header mentioning
//! "Weather Summary" is treated as the summary wherever it appears.
//! The clothing recommendation section keeps its body as list items.

use chrono::{Datelike, Timelike};

use crate::season::{DayPhase, Season};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    WeatherSummary,
    UserDetails,
    ClothingRecommendation,
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Paragraph(String),
    Items(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub body: SectionBody,
}

/// Tips derived from the local date and hour, independent of the model reply.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptationTips {
    pub season: Season,
    pub phase: DayPhase,
    pub tips: Vec<&'static str>,
}

impl AdaptationTips {
    pub fn title(&self) -> String {
        format!("Adaptation Tips for {} {}", self.season, self.phase)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRecommendation {
    pub sections: Vec<Section>,
    pub tips: AdaptationTips,
}

/// Render a raw reply for display at local time `now`.
pub fn render<T: Datelike + Timelike>(text: &str, now: &T) -> RenderedRecommendation {
    let sections = split_sections(text)
        .into_iter()
        .filter_map(|lines| {
            let (header, rest) = lines.split_first()?;
            Some(build_section(header, rest))
        })
        .collect();

    RenderedRecommendation {
        sections,
        tips: adaptation_tips(Season::of(now), DayPhase::of(now)),
    }
}

/// Group lines into blank-line separated blocks.
pub fn split_sections(text: &str) -> Vec<Vec<&str>> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        sections.push(current);
    }

    sections
}

pub fn classify(header: &str) -> SectionKind {
    if header.contains("Weather Summary") {
        SectionKind::WeatherSummary
    } else if header.contains("User Details") {
        SectionKind::UserDetails
    } else if header.contains("Clothing Recommendation") {
        SectionKind::ClothingRecommendation
    } else {
        SectionKind::List
    }
}

/// Drop the first `**` and the first `:**`.
pub fn clean_header(header: &str) -> String {
    header.replacen("**", "", 1).replacen(":**", "", 1).trim().to_string()
}

/// Strip the list marker and all surrounding bold decoration from one body line.
pub fn clean_item(line: &str) -> String {
    let line = line.trim();
    let line = ["- ", "* ", "• "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .unwrap_or(line);

    line.replace(":**", ":").trim().trim_matches('*').trim().to_string()
}

fn build_section(header: &str, rest: &[&str]) -> Section {
    let kind = classify(header);
    let title = clean_header(header);

    let body = match kind {
        SectionKind::WeatherSummary | SectionKind::UserDetails => {
            let text = rest.iter().map(|l| l.trim()).collect::<Vec<_>>().join(" ");
            SectionBody::Paragraph(text.trim().to_string())
        }
        SectionKind::ClothingRecommendation | SectionKind::List => SectionBody::Items(
            rest.iter().map(|l| clean_item(l)).filter(|item| !item.is_empty()).collect(),
        ),
    };

    Section { kind, title, body }
}

pub fn adaptation_tips(season: Season, phase: DayPhase) -> AdaptationTips {
    let night = phase.is_night();
    let mut tips = vec!["Layer your clothing for easy adjustment to temperature changes."];

    if matches!(season, Season::Winter | Season::Autumn) {
        tips.push("Bring extra warm layers for unexpected cold spells.");
    }

    if matches!(season, Season::Summer | Season::Spring) {
        if !night {
            tips.push("Consider UV protection (sunglasses, hat, sunscreen) for sun exposure.");
        }
        tips.push("Stay hydrated, especially during warmer parts of the day.");
    }

    if night {
        tips.push("Bring a light jacket or sweater for cooler nighttime temperatures.");
    }

    if matches!(season, Season::Spring | Season::Autumn) {
        tips.push("Be prepared for sudden weather changes with a versatile outer layer.");
    }

    AdaptationTips { season, phase, tips }
}
