//! Console report for a single video.

use chrono::{DateTime, Utc};
use chrono_tz::Europe::Kyiv;
use domain::{Count, VideoMetadata};
use std::fmt::Write;

/// Width of the `=` rule framing the report
pub const SEPARATOR_WIDTH: usize = 50;

/// Shown for counters the API did not return
pub const UNAVAILABLE: &str = "N/A";

const PUBLISH_TIME_FORMAT: &str = "%H:%M (%d.%m.%Y)";

/// Groups digits by three with a single space: `1234567` -> `1 234 567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_count(count: Option<&Count>) -> String {
    match count {
        None => UNAVAILABLE.to_string(),
        Some(Count::Exact(n)) => group_thousands(*n),
        Some(Count::Raw(text)) => text.clone(),
    }
}

/// Renders the publish instant in Kyiv local time
pub fn format_publish_time(published_at: DateTime<Utc>) -> String {
    published_at
        .with_timezone(&Kyiv)
        .format(PUBLISH_TIME_FORMAT)
        .to_string()
}

/// Builds the full report block, newline terminated
pub fn render(video: &VideoMetadata) -> String {
    let rule = "=".repeat(SEPARATOR_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "📺 Video title: {}", video.title);
    let _ = writeln!(out, "👤 Channel: {}", video.channel_title);
    let _ = writeln!(out, "⏰ Publish time: {}", format_publish_time(video.published_at));
    let _ = writeln!(out, "👀 Views: {}", format_count(video.view_count.as_ref()));
    let _ = writeln!(out, "👍 Likes: {}", format_count(video.like_count.as_ref()));
    let _ = writeln!(out, "💬 Comments: {}", format_count(video.comment_count.as_ref()));

    if video.tags.is_empty() {
        let _ = writeln!(out, "\nℹ️ No tags available");
    } else {
        let _ = writeln!(out, "\n🏷️ Tags:");
        let _ = writeln!(out, "{}", video.tags.join(", "));
    }

    let _ = writeln!(out, "{}", rule);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain::VideoId;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn sample_video() -> VideoMetadata {
        VideoMetadata {
            id: VideoId::parse("dQw4w9WgXcQ").unwrap(),
            title: "Never Gonna Give You Up".to_string(),
            channel_title: "Rick Astley".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            view_count: Some(Count::Exact(1_234_567)),
            like_count: None,
            comment_count: Some(Count::Raw("disabled".to_string())),
            tags: vec!["music".to_string(), "80s".to_string()],
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1 000");
        assert_eq!(group_thousands(123_456), "123 456");
        assert_eq!(group_thousands(1_234_567), "1 234 567");
        assert_eq!(group_thousands(u64::MAX), "18 446 744 073 709 551 615");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(None), "N/A");
        assert_eq!(format_count(Some(&Count::Exact(1000))), "1 000");
        assert_eq!(format_count(Some(&Count::Raw("-12".to_string()))), "-12");
    }

    #[test]
    fn test_publish_time_in_winter() {
        // EET, UTC+2
        assert_eq!(format_publish_time(utc("2024-01-15T12:00:00Z")), "14:00 (15.01.2024)");
    }

    #[test]
    fn test_publish_time_in_summer() {
        // EEST, UTC+3
        assert_eq!(format_publish_time(utc("2024-07-15T12:00:00Z")), "15:00 (15.07.2024)");
    }

    #[test]
    fn test_publish_time_across_dst_switch() {
        // Clocks go forward at 01:00 UTC on 2024-03-31
        assert_eq!(format_publish_time(utc("2024-03-31T00:30:00Z")), "02:30 (31.03.2024)");
        assert_eq!(format_publish_time(utc("2024-03-31T01:30:00Z")), "04:30 (31.03.2024)");
    }

    #[test]
    fn test_publish_time_rolls_over_date() {
        assert_eq!(format_publish_time(utc("2023-12-31T23:30:00Z")), "01:30 (01.01.2024)");
    }

    #[test]
    fn test_render_full_report() {
        let expected = "\n\
==================================================\n\
📺 Video title: Never Gonna Give You Up\n\
👤 Channel: Rick Astley\n\
⏰ Publish time: 14:00 (15.01.2024)\n\
👀 Views: 1 234 567\n\
👍 Likes: N/A\n\
💬 Comments: disabled\n\
\n\
🏷️ Tags:\n\
music, 80s\n\
==================================================\n";
        assert_eq!(render(&sample_video()), expected);
    }

    #[test]
    fn test_render_without_tags() {
        let mut video = sample_video();
        video.tags.clear();
        let report = render(&video);
        assert!(report.contains("\nℹ️ No tags available\n"));
        assert!(!report.contains("Tags:"));
    }
}
