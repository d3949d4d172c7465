//! Plain-text certificate card shown by `verify` and `search`.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::certificate::Certificate;

/// Renders one certificate as a verification card.
#[must_use]
pub fn card(certificate: &Certificate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Certificate ID: {}", certificate.id);
    let _ = writeln!(out, "Holder Name:    {}", certificate.holder_name);
    let _ = writeln!(out, "Event/Reason:   {}", certificate.event);
    let _ = writeln!(out, "Issue Date:     {}", display_date(&certificate.issue_date));
    if let Some(time) = &certificate.issue_time {
        let _ = writeln!(out, "Issue Time:     {time}");
    }
    if let Some(year) = &certificate.year {
        let _ = writeln!(out, "Year:           {year}");
    }
    out.push_str("Verified Certificate\n");
    out
}

/// Formats `YYYY-MM-DD` as e.g. `October 15, 2023`; anything else is shown
/// as stored.
#[must_use]
pub fn display_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_or_else(|_| raw.to_string(), |date| date.format("%B %-d, %Y").to_string())
}
