// src/utils/log.rs

//! Console rendering with server-style formatting.
//!
//! Diagnostics go through the `log` facade; this module prints the
//! user-facing output of the CLI (headers, listing cards, summaries) as
//! timestamped lines on stdout.

use chrono::{DateTime, Local, Utc};

use crate::models::{GiveawayStats, Listing, Platform, Selection, display_name};
use crate::pipeline::BrowserView;

const WIDTH: usize = 60;

/// Format a line with a timestamp prefix
fn format_line(message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{}] {}", timestamp, message)
}

/// Print a plain line
pub fn line(message: &str) {
    println!("{}", format_line(message));
}

/// Print a separator line
pub fn separator() {
    println!("{}", format_line(&"─".repeat(WIDTH)));
}

/// Print a header
pub fn header(title: &str) {
    let border = "═".repeat(WIDTH);
    println!("{}", format_line(&border));
    println!("{}", format_line(&format!("  {}", title)));
    println!("{}", format_line(&border));
}

/// Print a sub-item (indented)
pub fn sub_item(message: &str) {
    println!("{}", format_line(&format!("    {}", message)));
}

/// Print a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("{}", format_line(&format!("[SUMMARY] {}", title)));
    for (key, value) in items {
        println!("{}", format_line(&format!("    {}: {}", key, value)));
    }
}

/// Lines describing one listing.
pub fn card_lines(listing: &Listing, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![format!(
        "#{} {} [{}] {}",
        listing.id,
        listing.title,
        listing.kind().as_str(),
        listing.worth
    )];

    let badges: Vec<String> = listing
        .platform_badges()
        .into_iter()
        .map(|badge| match badge.icon {
            Some(icon) => format!("{} ({})", badge.name, icon),
            None => badge.name,
        })
        .collect();
    if !badges.is_empty() {
        lines.push(format!("platforms: {}", badges.join(", ")));
    }

    match listing.time_left(now) {
        Some(left) => lines.push(left),
        None if listing.ends_at().is_some() => lines.push("ended".to_string()),
        None => {}
    }
    if listing.claim_count > 0 {
        lines.push(format!("{} users", listing.claim_count));
    }
    if !listing.claim_url.is_empty() {
        lines.push(listing.claim_url.clone());
    }
    lines
}

/// Print one listing
pub fn card(listing: &Listing, now: DateTime<Utc>) {
    let mut lines = card_lines(listing, now).into_iter();
    if let Some(first) = lines.next() {
        line(&first);
    }
    for rest in lines {
        sub_item(&rest);
    }
}

/// Print the full detail of one listing
pub fn detail(listing: &Listing, now: DateTime<Utc>) {
    header(&listing.title);
    card(listing, now);
    if !listing.description.is_empty() {
        separator();
        line(&listing.description);
    }
    if !listing.instructions.is_empty() {
        separator();
        line(&listing.instructions);
    }
    sub_item(&format!("image: {}", listing.thumbnail_or_placeholder()));
}

/// Print a browser frame: status, the current page of listings, and a pager.
pub fn page(view: &BrowserView<'_>, now: DateTime<Utc>) {
    if view.loading {
        line("Loading giveaways...");
        return;
    }
    if let Some(error) = view.error {
        line(&format!("Error: {}", error));
        sub_item("type 'reload' to try again");
        return;
    }
    if view.listings.is_empty() {
        line("No giveaways found");
    }
    for listing in &view.listings {
        card(listing, now);
        separator();
    }
    summary("Giveaways", &page_summary(view));
}

/// Key/value lines describing where a frame sits in the result set.
pub fn page_summary(view: &BrowserView<'_>) -> Vec<(&'static str, String)> {
    let mut items = vec![
        ("Page", format!("{} of {}", view.current_page, view.total_pages.max(1))),
        ("Showing", format!("{} of {}", view.total_filtered, view.total_fetched)),
        ("Platform", platform_label(&view.filters.platform)),
        ("Type", view.filters.kind.to_string()),
        ("Sort by", view.filters.sort_by.to_string()),
    ];
    if !view.filters.search_text.is_empty() {
        items.push(("Search", format!("{:?}", view.filters.search_text)));
    }
    items
}

fn platform_label(platform: &Selection<Platform>) -> String {
    match platform {
        Selection::All => platform.to_string(),
        Selection::One(p) => display_name(*p).to_string(),
    }
}

/// Print aggregate totals
pub fn stats(stats: &GiveawayStats) {
    summary(
        "Live giveaways",
        &[
            ("Count", stats.total_count.to_string()),
            ("Total worth", stats.total_worth.clone()),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::models::FilterPatch;
    use crate::pipeline::GiveawayBrowser;

    fn listing() -> Listing {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "title": "Star Drift",
            "worth": "$19.99",
            "platforms": "PC, Steam, Mystery Console",
            "type": "Early Access",
            "users": 1200,
            "open_giveaway_url": "https://example.com/open/42",
            "end_date": "N/A",
        }))
        .unwrap()
    }

    #[test]
    fn card_describes_listing() {
        let lines = card_lines(&listing(), Utc::now());
        assert_eq!(lines[0], "#42 Star Drift [early-access] $19.99");
        assert_eq!(
            lines[1],
            "platforms: PC (windows), Steam (steam), Mystery Console"
        );
        assert!(lines.contains(&"1200 users".to_string()));
        assert!(!lines.iter().any(|l| l.ends_with("left") || l == "ended"));
    }

    #[test]
    fn card_marks_countdown_and_expiry() {
        let now = Utc::now();
        let mut live = listing();
        live.end_date = (now + Duration::hours(5)).to_rfc3339();
        assert!(card_lines(&live, now).iter().any(|l| l.ends_with("hours left")));

        let mut ended = listing();
        ended.end_date = (now - Duration::hours(5)).to_rfc3339();
        assert!(card_lines(&ended, now).contains(&"ended".to_string()));
    }

    #[test]
    fn summary_reports_page_position() {
        let mut browser = GiveawayBrowser::new(12);
        let ticket = browser.begin_fetch();
        browser.commit(ticket, Ok(vec![listing()]));
        browser.search("star");

        let view = browser.view();
        let items = page_summary(&view);
        assert_eq!(items[0], ("Page", "1 of 1".to_string()));
        assert_eq!(items[1], ("Showing", "1 of 1".to_string()));
        assert_eq!(items.last().unwrap().0, "Search");
    }

    #[test]
    fn summary_names_the_platform_filter() {
        let mut browser = GiveawayBrowser::new(12);
        browser.update_filters(FilterPatch::default().platform(Platform::EpicGamesStore));
        let view = browser.view();
        let items = page_summary(&view);
        assert_eq!(items[2], ("Platform", "Epic Games Store".to_string()));

        let browser = GiveawayBrowser::new(12);
        assert_eq!(page_summary(&browser.view())[2], ("Platform", "all".to_string()));
    }
}
