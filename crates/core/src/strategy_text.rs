//! Plain-text strategy document compiler.
//!
//! Produces the shareable text for a race strategy from whatever records are
//! present. Sections appear in a fixed order and only when at least one of
//! their fields has content; output is deterministic for a given input.

use crate::pricing::{currency_symbol, format_amount};
use crate::strategy::{non_empty, AiStrategy, Preparation, RaceInfo};

/// Separator between sub-items that share a line.
pub const ITEM_SEPARATOR: &str = " | ";

pub const SECTION_FORECAST: &str = "FORECAST";
pub const SECTION_RIG_TUNING: &str = "RIG TUNING";
pub const SECTION_NOTES: &str = "MY NOTES";
pub const SECTION_RACE_PLAN: &str = "RACE PLAN";
pub const SECTION_AI_RECOMMENDATIONS: &str = "AI STRATEGIC RECOMMENDATIONS";
pub const SECTION_AI_INSIGHTS: &str = "AI INSIGHTS";

pub const FOOTER: &str = "---\nShared from the Regatta race planner";

/// Header name used when the race record is missing or unnamed.
pub const UNTITLED_RACE: &str = "Untitled race";

/// Everything the compiler may draw from. Every part is optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyInput<'a> {
    pub race: Option<&'a RaceInfo>,
    pub preparation: Option<&'a Preparation>,
    pub strategy: Option<&'a AiStrategy>,
}

/// Compile the strategy document.
pub fn compile_strategy_text(input: &StrategyInput<'_>) -> String {
    let mut blocks: Vec<String> = vec![header(input.race)];

    push_section(&mut blocks, SECTION_FORECAST, forecast_lines(input.race));
    push_section(
        &mut blocks,
        SECTION_RIG_TUNING,
        rig_lines(input.race, input.preparation),
    );
    push_section(
        &mut blocks,
        SECTION_NOTES,
        input
            .strategy
            .and_then(|s| non_empty(s.notes.as_deref()))
            .map(|n| vec![n.to_string()])
            .unwrap_or_default(),
    );
    push_section(&mut blocks, SECTION_RACE_PLAN, plan_lines(input));
    push_section(
        &mut blocks,
        SECTION_AI_RECOMMENDATIONS,
        recommendation_lines(input.strategy),
    );
    push_section(
        &mut blocks,
        SECTION_AI_INSIGHTS,
        input
            .preparation
            .map(|p| {
                p.ai_insights
                    .iter()
                    .filter_map(|i| non_empty(Some(i.as_str())))
                    .map(|i| format!("- {i}"))
                    .collect()
            })
            .unwrap_or_default(),
    );

    blocks.push(FOOTER.to_string());
    blocks.join("\n\n")
}

/// Titles of the optional sections present in compiled text, in order.
pub fn section_titles(text: &str) -> Vec<&str> {
    const TITLES: &[&str] = &[
        SECTION_FORECAST,
        SECTION_RIG_TUNING,
        SECTION_NOTES,
        SECTION_RACE_PLAN,
        SECTION_AI_RECOMMENDATIONS,
        SECTION_AI_INSIGHTS,
    ];
    text.lines()
        .filter(|line| TITLES.contains(line))
        .collect()
}

fn push_section(blocks: &mut Vec<String>, title: &str, lines: Vec<String>) {
    if lines.is_empty() {
        return;
    }
    blocks.push(format!("{title}\n{}", lines.join("\n")));
}

fn header(race: Option<&RaceInfo>) -> String {
    let Some(race) = race else {
        return format!("RACE STRATEGY: {UNTITLED_RACE}");
    };
    let name = non_empty(Some(race.name.as_str())).unwrap_or(UNTITLED_RACE);

    let mut items = Vec::new();
    if let Some(start) = race.scheduled_start {
        items.push(start.format("%a %d %b %Y %H:%M UTC").to_string());
    }
    if let Some(venue) = non_empty(race.venue.as_deref()) {
        items.push(venue.to_string());
    }
    items.push(race.race_type.label().to_string());
    if let Some(distance) = race.distance_nm {
        items.push(format!("{distance:.1} nm"));
    }
    if let Some(fee) = race.entry_fee {
        items.push(format!(
            "Entry fee: {}{}",
            currency_symbol(race.currency.as_deref()),
            format_amount(fee)
        ));
    }

    format!("RACE STRATEGY: {name}\n{}", items.join(ITEM_SEPARATOR))
}

fn forecast_lines(race: Option<&RaceInfo>) -> Vec<String> {
    let Some(race) = race else {
        return Vec::new();
    };
    let f = &race.forecast;
    let direction = non_empty(f.wind_direction.as_deref());

    let mut items = Vec::new();
    match (f.wind_speed_kts, direction) {
        (Some(speed), Some(dir)) => items.push(format!("Wind speed: {speed:.1} kts from {dir}")),
        (Some(speed), None) => items.push(format!("Wind speed: {speed:.1} kts")),
        (None, Some(dir)) => items.push(format!("Wind direction: {dir}")),
        (None, None) => {}
    }
    if let Some(gust) = f.wind_gust_kts {
        items.push(format!("Gusts: {gust:.1} kts"));
    }
    if let Some(waves) = f.wave_height_m {
        items.push(format!("Waves: {waves:.1} m"));
    }
    if let Some(tide) = non_empty(f.tide_summary.as_deref()) {
        items.push(format!("Tide: {tide}"));
    }

    let mut lines = Vec::new();
    if !items.is_empty() {
        lines.push(items.join(ITEM_SEPARATOR));
    }
    if let Some(summary) = non_empty(f.forecast_summary.as_deref()) {
        lines.push(summary.to_string());
    }
    lines
}

fn rig_lines(race: Option<&RaceInfo>, prep: Option<&Preparation>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(race) = race {
        let settings: Vec<String> = race
            .rig_tuning
            .iter()
            .filter_map(|(k, v)| {
                non_empty(Some(v.as_str())).map(|v| format!("{}: {v}", humanize_key(k)))
            })
            .collect();
        if !settings.is_empty() {
            lines.push(settings.join(ITEM_SEPARATOR));
        }
    }
    if let Some(notes) = prep.and_then(|p| non_empty(p.rig_notes.as_deref())) {
        lines.push(notes.to_string());
    }
    lines
}

fn plan_lines(input: &StrategyInput<'_>) -> Vec<String> {
    let Some(prep) = input.preparation else {
        return Vec::new();
    };
    let race_type = input.race.map(|r| r.race_type).unwrap_or_default();
    race_type
        .phases()
        .iter()
        .filter_map(|phase| {
            prep.phase_text(phase.key)
                .map(|text| format!("{}: {text}", phase.label))
        })
        .collect()
}

fn recommendation_lines(strategy: Option<&AiStrategy>) -> Vec<String> {
    let Some(s) = strategy else {
        return Vec::new();
    };
    [
        ("Wind", &s.wind_strategy),
        ("Tide", &s.tide_strategy),
        ("Current", &s.current_strategy),
        ("Favored end", &s.favored_end),
        ("Tactics", &s.tactics),
    ]
    .into_iter()
    .filter_map(|(label, value)| non_empty(value.as_deref()).map(|v| format!("{label}: {v}")))
    .collect()
}

/// `upper_shrouds` → `Upper shrouds`.
fn humanize_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
