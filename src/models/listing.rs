//! Listing data structure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One job posting scraped from the listings page.
///
/// Required fields are typed; whatever else the card's detail section
/// exposes (availability, location, grade level, ...) lands in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    /// Stable identifier, taken from the listing URL
    pub id: String,

    /// 0-based rank in page order at observation time.
    /// Assigned by the snapshot store; not stable across polls.
    pub position: usize,

    /// Age of the posting in minutes, normalized from the display string
    pub age_minutes: u32,

    /// Student/requester display name
    pub student: String,

    /// Requested topic
    pub topic: String,

    /// Suggested hourly pay rate; `None` when the site shows "None"
    pub rate: Option<u32>,

    /// Posting description, newline-normalized
    pub description: String,

    /// Whether the posting already has applications
    pub has_applications: bool,

    /// Full URL of the posting
    pub url: String,

    /// Open-ended detail fields, keyed by the site's display label
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Listing {
    /// Render the report body for this listing: one
    /// `("<id>", "<field>"): "<value>"` line per field, required fields
    /// first, extra fields in sorted order.
    pub fn report_body(&self) -> String {
        let mut lines = Vec::with_capacity(7 + self.extra.len());
        let rate = match self.rate {
            Some(rate) => format!("${rate}/hr"),
            None => "None".to_string(),
        };
        let applications = if self.has_applications { "Y" } else { "N" };

        lines.push(self.report_line("Card #", &self.position.to_string()));
        lines.push(self.report_line("Age", &self.age_minutes.to_string()));
        lines.push(self.report_line("Applications", applications));
        lines.push(self.report_line("Name", &self.student));
        lines.push(self.report_line("Topic", &self.topic));
        lines.push(self.report_line("Rate", &rate));
        lines.push(self.report_line("Description", &self.description));

        for (key, value) in &self.extra {
            lines.push(self.report_line(key, value));
        }

        lines.join("\n")
    }

    fn report_line(&self, field: &str, value: &str) -> String {
        format!("(\"{}\", \"{}\"): \"{}\"", self.id, field, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_listing() -> Listing {
        Listing {
            id: "5938125".to_string(),
            position: 0,
            age_minutes: 7,
            student: "Alex".to_string(),
            topic: "Calculus".to_string(),
            rate: Some(19),
            description: "Need help with derivatives.".to_string(),
            has_applications: false,
            url: "https://example.com/tutor/jobs/5938125".to_string(),
            extra: BTreeMap::from([
                ("Availability".to_string(), "Weekends".to_string()),
                ("Grade level".to_string(), "College".to_string()),
            ]),
        }
    }

    #[test]
    fn test_report_body_format() {
        let body = sample_listing().report_body();
        assert!(body.contains("(\"5938125\", \"Rate\"): \"$19/hr\""));
        assert!(body.contains("(\"5938125\", \"Topic\"): \"Calculus\""));
        assert!(body.contains("(\"5938125\", \"Applications\"): \"N\""));
    }

    #[test]
    fn test_report_body_extra_fields_sorted() {
        let body = sample_listing().report_body();
        let availability = body.find("\"Availability\"").unwrap();
        let grade = body.find("\"Grade level\"").unwrap();
        assert!(availability < grade);
    }

    #[test]
    fn test_report_body_none_rate() {
        let listing = Listing {
            rate: None,
            ..sample_listing()
        };
        assert!(listing.report_body().contains("(\"5938125\", \"Rate\"): \"None\""));
    }
}
