//! Terminal output.

use wearcast_core::{RenderedRecommendation, SectionBody, SectionKind, UserAttributes, WeatherView};

pub fn print_banner(message: &str) {
    eprintln!("! {message}");
}

pub fn print_notice(title: &str, message: &str) {
    println!();
    println!("{title}");
    println!("  {message}");
}

pub fn print_weather(view: &WeatherView) {
    println!("Current Weather - {}", view.place);
    println!("  {}  {}  (feels like {})", view.temperature, view.description, view.feels_like);
    println!("  Wind: {}   Humidity: {}   Cloud cover: {}", view.wind, view.humidity, view.cloud_cover);
    println!("  Date: {}   Season: {}", view.date, view.season);
    println!();

    println!("Today's Forecast");
    if view.rows.is_empty() {
        println!("  No forecast entries left for today.");
        return;
    }

    println!("  {:<6} {:>8} {:>11}  Description", "Time", "Temp", "Feels Like");
    for row in &view.rows {
        println!(
            "  {:<6} {:>8} {:>11}  {}",
            row.time, row.temperature, row.feels_like, row.description
        );
    }
}

pub fn print_recommendation(rendered: &RenderedRecommendation) {
    println!();
    println!("Clothing Recommendation");
    println!("=======================");

    for section in &rendered.sections {
        println!();
        match section.kind {
            SectionKind::ClothingRecommendation => {
                println!("{}", section.title.to_uppercase());
            }
            _ => println!("{}", section.title),
        }

        match &section.body {
            SectionBody::Paragraph(text) if !text.is_empty() => println!("  {text}"),
            SectionBody::Paragraph(_) => {}
            SectionBody::Items(items) => {
                for item in items {
                    println!("  - {item}");
                }
            }
        }
    }

    println!();
    println!("{}", rendered.tips.title());
    for tip in &rendered.tips.tips {
        println!("  - {tip}");
    }
}

pub fn print_profile(attrs: &UserAttributes) {
    fn show<T: std::fmt::Display>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_else(|| "(not set)".to_string())
    }

    println!("Location:      {}", show(attrs.location.as_deref()));
    println!("Age:           {}", show(attrs.age));
    println!("Gender:        {}", show(attrs.gender.as_deref()));
    println!("Activity:      {}", show(attrs.activity.as_deref()));
    println!("Time outdoors: {}", show(attrs.outdoors_time.map(|h| format!("{h} h"))));
}
