//! Variant field schema, the editable form snapshot, and seed defaults.
//!
//! Pure data: which fields each content kind carries, their required flags
//! and length limits, and the seed values a freshly opened editor starts
//! from. No side effects and no error conditions.

use std::collections::BTreeSet;

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::content::{Audience, ContentKind};

/// Maximum title length in characters, both kinds.
pub const TITLE_MAX_CHARS: usize = 255;
/// Maximum Page meta title length in characters.
pub const META_TITLE_MAX_CHARS: usize = 60;
/// Maximum Page meta description length in characters.
pub const META_DESCRIPTION_MAX_CHARS: usize = 160;
/// Days between the seeded publish date and the seeded expiry date.
pub const DEFAULT_EXPIRY_OFFSET_DAYS: u64 = 7;

/// Field keys exactly as the editor UI binds them.
///
/// These are also the keys of the [`crate::validate::ErrorMap`].
pub mod field {
	pub const TITLE: &str = "title";
	pub const CONTENT: &str = "content";
	pub const STATUS: &str = "status";
	pub const FEATURED_IMAGE: &str = "featuredImage";
	pub const META_TITLE: &str = "metaTitle";
	pub const META_DESCRIPTION: &str = "metaDescription";
	pub const KEYWORDS: &str = "keywords";
	pub const PUBLISH_DATE: &str = "publishDate";
	pub const EXPIRY_DATE: &str = "expiryDate";
	pub const AUDIENCE: &str = "audience";
}

/// Static description of one editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
	/// UI binding key, see [`field`].
	pub name: &'static str,
	pub required: bool,
	/// Length limit in characters, where one applies.
	pub max_chars: Option<usize>,
}

const fn spec(name: &'static str, required: bool, max_chars: Option<usize>) -> FieldSpec {
	FieldSpec {
		name,
		required,
		max_chars,
	}
}

const PAGE_FIELDS: &[FieldSpec] = &[
	spec(field::TITLE, true, Some(TITLE_MAX_CHARS)),
	spec(field::CONTENT, true, None),
	spec(field::STATUS, true, None),
	spec(field::FEATURED_IMAGE, false, None),
	spec(field::META_TITLE, false, Some(META_TITLE_MAX_CHARS)),
	spec(field::META_DESCRIPTION, false, Some(META_DESCRIPTION_MAX_CHARS)),
	spec(field::KEYWORDS, false, None),
];

const ANNOUNCEMENT_FIELDS: &[FieldSpec] = &[
	spec(field::TITLE, true, Some(TITLE_MAX_CHARS)),
	spec(field::CONTENT, true, None),
	spec(field::STATUS, true, None),
	spec(field::PUBLISH_DATE, true, None),
	spec(field::EXPIRY_DATE, true, None),
	spec(field::AUDIENCE, true, None),
];

/// Ordered field list for a content kind.
///
/// # Examples
///
/// ```
/// use atrium_forms::{schema, ContentKind};
///
/// let names: Vec<_> = schema::fields_for(ContentKind::Announcement)
/// 	.iter()
/// 	.map(|f| f.name)
/// 	.collect();
/// assert_eq!(
/// 	names,
/// 	["title", "content", "status", "publishDate", "expiryDate", "audience"]
/// );
/// ```
pub fn fields_for(kind: ContentKind) -> &'static [FieldSpec] {
	match kind {
		ContentKind::Page => PAGE_FIELDS,
		ContentKind::Announcement => ANNOUNCEMENT_FIELDS,
	}
}

/// The mutable record currently being edited.
///
/// One struct holds the superset of fields across both kinds; fields of the
/// inactive kind are seeded but excluded from validation and assembly. Dates
/// are kept as the `YYYY-MM-DD` strings the host's date inputs bind and are
/// parsed only at validation and assembly time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
	pub title: String,
	pub content: String,
	pub status: String,
	pub featured_image: String,
	pub meta_title: String,
	pub meta_description: String,
	pub keywords: String,
	pub publish_date: String,
	pub expiry_date: String,
	pub audience: BTreeSet<Audience>,
}

/// Seed values for a freshly opened editor, using today's local date.
///
/// # Examples
///
/// ```
/// use atrium_forms::{defaults_for, ContentKind};
///
/// let page = defaults_for(ContentKind::Page);
/// assert_eq!(page.status, "draft");
/// assert!(page.title.is_empty());
///
/// let ann = defaults_for(ContentKind::Announcement);
/// assert_eq!(ann.status, "active");
/// assert!(ann.publish_date < ann.expiry_date);
/// ```
pub fn defaults_for(kind: ContentKind) -> FormSnapshot {
	defaults_on(kind, Local::now().date_naive())
}

/// Seed values anchored to an explicit calendar date.
///
/// `defaults_for` delegates here; tests use this seam directly so seeded
/// dates are deterministic.
pub fn defaults_on(kind: ContentKind, today: NaiveDate) -> FormSnapshot {
	let expiry = today
		.checked_add_days(Days::new(DEFAULT_EXPIRY_OFFSET_DAYS))
		.unwrap_or(today);

	FormSnapshot {
		title: String::new(),
		content: String::new(),
		status: kind.default_status().to_string(),
		featured_image: String::new(),
		meta_title: String::new(),
		meta_description: String::new(),
		keywords: String::new(),
		publish_date: format_date(today),
		expiry_date: format_date(expiry),
		audience: BTreeSet::from([Audience::AllUsers]),
	}
}

/// Formats a calendar date the way the snapshot stores dates.
pub fn format_date(date: NaiveDate) -> String {
	date.format("%Y-%m-%d").to_string()
}

/// Parses a snapshot date string.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
	NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Normalizes a timestamp-like string from the hosted database to the
/// calendar-date form the snapshot stores.
///
/// Accepts plain `YYYY-MM-DD`, RFC 3339 timestamps, and
/// `YYYY-MM-DD HH:MM:SS`; returns `None` for anything else.
///
/// # Examples
///
/// ```
/// use atrium_forms::schema::normalize_date_input;
///
/// assert_eq!(
/// 	normalize_date_input("2024-01-10T08:30:00Z").as_deref(),
/// 	Some("2024-01-10")
/// );
/// assert_eq!(normalize_date_input("2024-01-10").as_deref(), Some("2024-01-10"));
/// assert_eq!(normalize_date_input("next tuesday"), None);
/// ```
pub fn normalize_date_input(s: &str) -> Option<String> {
	let s = s.trim();
	if let Some(date) = parse_date(s) {
		return Some(format_date(date));
	}
	if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(s) {
		return Some(format_date(ts.date_naive()));
	}
	if let Ok(ts) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
		return Some(format_date(ts.date()));
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;

	fn day(s: &str) -> NaiveDate {
		NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
	}

	#[test]
	fn test_defaults_seed_dates_a_week_apart() {
		let snapshot = defaults_on(ContentKind::Announcement, day("2024-01-10"));
		assert_eq!(snapshot.publish_date, "2024-01-10");
		assert_eq!(snapshot.expiry_date, "2024-01-17");
	}

	#[test]
	fn test_defaults_seed_all_users_audience() {
		let snapshot = defaults_on(ContentKind::Announcement, day("2024-01-10"));
		assert_eq!(snapshot.audience, BTreeSet::from([Audience::AllUsers]));
	}

	#[test]
	fn test_defaults_use_variant_status() {
		assert_eq!(defaults_for(ContentKind::Page).status, "draft");
		assert_eq!(defaults_for(ContentKind::Announcement).status, "active");
	}

	#[test]
	fn test_required_flags_match_variant() {
		let page: Vec<_> = fields_for(ContentKind::Page)
			.iter()
			.filter(|f| f.required)
			.map(|f| f.name)
			.collect();
		assert_eq!(page, [field::TITLE, field::CONTENT, field::STATUS]);

		let ann = fields_for(ContentKind::Announcement);
		assert!(ann.iter().all(|f| f.required));
	}

	#[test]
	fn test_normalize_date_input_variants() {
		assert_eq!(
			normalize_date_input("2024-01-10T08:30:00+09:00").as_deref(),
			Some("2024-01-10")
		);
		assert_eq!(
			normalize_date_input("2024-01-10 08:30:00").as_deref(),
			Some("2024-01-10")
		);
		assert_eq!(normalize_date_input(" 2024-01-10 ").as_deref(), Some("2024-01-10"));
		assert_eq!(normalize_date_input(""), None);
		assert_eq!(normalize_date_input("2024-13-40"), None);
	}

	#[test]
	fn test_snapshot_serializes_camel_case() {
		let snapshot = defaults_on(ContentKind::Page, day("2024-01-10"));
		let value = serde_json::to_value(&snapshot).unwrap();
		assert!(value.get("metaTitle").is_some());
		assert!(value.get("publishDate").is_some());
		assert_eq!(value["audience"][0], "All Users");
	}
}
