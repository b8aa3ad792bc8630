//! Variant-conditional validation of a form snapshot.
//!
//! Every applicable rule runs on every call so the caller gets the full
//! error map in one pass; the editor renders all invalid fields at once
//! rather than one at a time. Validation failures are returned as data and
//! never raised.

use std::collections::BTreeMap;

use crate::content::ContentKind;
use crate::schema::{
	self, FormSnapshot, META_DESCRIPTION_MAX_CHARS, META_TITLE_MAX_CHARS, TITLE_MAX_CHARS,
	field,
};

/// Field key to human-readable message. Empty map means valid.
///
/// Keys are the UI binding names from [`crate::schema::field`], plus the
/// reserved [`GENERAL_ERROR_KEY`] for faults not tied to any field.
pub type ErrorMap = BTreeMap<String, String>;

/// Reserved key for faults that are not user input errors, e.g. a date
/// value no date control could have produced.
pub const GENERAL_ERROR_KEY: &str = "general";

/// Validates a snapshot against the rules of the given content kind.
///
/// Side-effect free and total: the same snapshot always yields the same
/// result, and nothing is raised past this function.
///
/// # Examples
///
/// ```
/// use atrium_forms::{defaults_for, validate, ContentKind};
///
/// let mut snapshot = defaults_for(ContentKind::Page);
/// let errors = validate(ContentKind::Page, &snapshot).unwrap_err();
/// assert_eq!(errors["title"], "Title is required");
/// assert_eq!(errors["content"], "Content is required");
///
/// snapshot.title = "Welcome".to_string();
/// snapshot.content = "<p>hi</p>".to_string();
/// assert!(validate(ContentKind::Page, &snapshot).is_ok());
/// ```
pub fn validate(kind: ContentKind, snapshot: &FormSnapshot) -> Result<(), ErrorMap> {
	let mut errors = ErrorMap::new();

	if snapshot.title.trim().is_empty() {
		insert(&mut errors, field::TITLE, "Title is required");
	} else if snapshot.title.chars().count() > TITLE_MAX_CHARS {
		insert(
			&mut errors,
			field::TITLE,
			"Title must be less than 255 characters",
		);
	}

	if snapshot.content.trim().is_empty() {
		insert(&mut errors, field::CONTENT, "Content is required");
	}

	if snapshot.status.trim().is_empty() {
		insert(&mut errors, field::STATUS, "Status is required");
	} else if !kind.statuses().contains(&snapshot.status.as_str()) {
		insert(
			&mut errors,
			field::STATUS,
			format!("Status must be one of: {}", kind.statuses().join(", ")),
		);
	}

	match kind {
		ContentKind::Page => validate_page(snapshot, &mut errors),
		ContentKind::Announcement => validate_announcement(snapshot, &mut errors),
	}

	if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn validate_page(snapshot: &FormSnapshot, errors: &mut ErrorMap) {
	if snapshot.meta_title.chars().count() > META_TITLE_MAX_CHARS {
		insert(
			errors,
			field::META_TITLE,
			"Meta title must be less than 60 characters",
		);
	}
	if snapshot.meta_description.chars().count() > META_DESCRIPTION_MAX_CHARS {
		insert(
			errors,
			field::META_DESCRIPTION,
			"Meta description must be less than 160 characters",
		);
	}
}

fn validate_announcement(snapshot: &FormSnapshot, errors: &mut ErrorMap) {
	let publish = date_value(snapshot.publish_date.as_str(), field::PUBLISH_DATE, errors);
	let expiry = date_value(snapshot.expiry_date.as_str(), field::EXPIRY_DATE, errors);

	// Boundary inclusive: expiring on the publish day is allowed.
	if let (Some(Some(publish)), Some(Some(expiry))) = (publish, expiry)
		&& expiry < publish
	{
		insert(
			errors,
			field::EXPIRY_DATE,
			"Expiry date must be after publish date",
		);
	}

	if snapshot.audience.is_empty() {
		insert(
			errors,
			field::AUDIENCE,
			"At least one audience must be selected",
		);
	}
}

/// Outer `None` means the field already failed its own rule; inner `None`
/// means the value was present but unparseable, recorded under `general`.
fn date_value(
	value: &str,
	key: &'static str,
	errors: &mut ErrorMap,
) -> Option<Option<chrono::NaiveDate>> {
	if value.trim().is_empty() {
		let label = match key {
			field::PUBLISH_DATE => "Publish date is required",
			_ => "Expiry date is required",
		};
		insert(errors, key, label);
		return None;
	}
	match schema::parse_date(value) {
		Some(date) => Some(Some(date)),
		None => {
			// A date input cannot emit this; treat it as an engine-usage
			// fault rather than a user input error.
			insert(
				errors,
				GENERAL_ERROR_KEY,
				format!("Unexpected validation error: invalid date '{}'", value.trim()),
			);
			Some(None)
		}
	}
}

fn insert(errors: &mut ErrorMap, key: &str, message: impl Into<String>) {
	// One message per field; the first violated rule wins.
	errors.entry(key.to_string()).or_insert_with(|| message.into());
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use proptest::prelude::*;
	use rstest::rstest;

	use super::*;
	use crate::schema::defaults_on;

	fn day(s: &str) -> chrono::NaiveDate {
		chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
	}

	fn valid_page() -> FormSnapshot {
		let mut snapshot = defaults_on(ContentKind::Page, day("2024-01-10"));
		snapshot.title = "Welcome".to_string();
		snapshot.content = "<p>hi</p>".to_string();
		snapshot
	}

	fn valid_announcement() -> FormSnapshot {
		let mut snapshot = defaults_on(ContentKind::Announcement, day("2024-01-10"));
		snapshot.title = "Maintenance window".to_string();
		snapshot.content = "<p>Sunday night</p>".to_string();
		snapshot
	}

	#[test]
	fn test_defaults_only_miss_title_and_content() {
		for kind in [ContentKind::Page, ContentKind::Announcement] {
			let errors = validate(kind, &defaults_on(kind, day("2024-01-10"))).unwrap_err();
			let keys: Vec<_> = errors.keys().map(String::as_str).collect();
			assert_eq!(keys, [field::CONTENT, field::TITLE], "kind: {kind}");
		}
	}

	#[rstest]
	#[case::at_limit(255, true)]
	#[case::over_limit(256, false)]
	fn test_title_length_boundary(#[case] len: usize, #[case] ok: bool) {
		let mut snapshot = valid_page();
		snapshot.title = "x".repeat(len);
		let result = validate(ContentKind::Page, &snapshot);
		assert_eq!(result.is_ok(), ok);
		if !ok {
			assert_eq!(
				result.unwrap_err()[field::TITLE],
				"Title must be less than 255 characters"
			);
		}
	}

	#[test]
	fn test_title_counts_characters_not_bytes() {
		let mut snapshot = valid_page();
		snapshot.title = "é".repeat(255);
		assert!(validate(ContentKind::Page, &snapshot).is_ok());
	}

	#[test]
	fn test_whitespace_only_title_is_missing() {
		let mut snapshot = valid_page();
		snapshot.title = "   ".to_string();
		let errors = validate(ContentKind::Page, &snapshot).unwrap_err();
		assert_eq!(errors[field::TITLE], "Title is required");
	}

	#[rstest]
	#[case::page_rejects_foreign_status(ContentKind::Page, "active")]
	#[case::announcement_rejects_foreign_status(ContentKind::Announcement, "draft")]
	#[case::unknown_status(ContentKind::Page, "archived")]
	fn test_status_must_belong_to_variant(#[case] kind: ContentKind, #[case] status: &str) {
		let mut snapshot = match kind {
			ContentKind::Page => valid_page(),
			ContentKind::Announcement => valid_announcement(),
		};
		snapshot.status = status.to_string();
		let errors = validate(kind, &snapshot).unwrap_err();
		assert!(errors[field::STATUS].starts_with("Status must be one of"));
	}

	#[rstest]
	#[case::expiry_before_publish("2024-01-10", "2024-01-05", false)]
	#[case::same_day_is_allowed("2024-01-10", "2024-01-10", true)]
	#[case::expiry_after_publish("2024-01-10", "2024-02-01", true)]
	fn test_expiry_ordering(#[case] publish: &str, #[case] expiry: &str, #[case] ok: bool) {
		let mut snapshot = valid_announcement();
		snapshot.publish_date = publish.to_string();
		snapshot.expiry_date = expiry.to_string();
		let result = validate(ContentKind::Announcement, &snapshot);
		assert_eq!(result.is_ok(), ok);
		if !ok {
			assert_eq!(
				result.unwrap_err()[field::EXPIRY_DATE],
				"Expiry date must be after publish date"
			);
		}
	}

	#[test]
	fn test_missing_dates_are_field_errors() {
		let mut snapshot = valid_announcement();
		snapshot.publish_date = String::new();
		snapshot.expiry_date = "  ".to_string();
		let errors = validate(ContentKind::Announcement, &snapshot).unwrap_err();
		assert_eq!(errors[field::PUBLISH_DATE], "Publish date is required");
		assert_eq!(errors[field::EXPIRY_DATE], "Expiry date is required");
		assert!(!errors.contains_key(GENERAL_ERROR_KEY));
	}

	#[test]
	fn test_malformed_date_is_a_general_fault() {
		let mut snapshot = valid_announcement();
		snapshot.expiry_date = "garbage".to_string();
		let errors = validate(ContentKind::Announcement, &snapshot).unwrap_err();
		assert!(errors[GENERAL_ERROR_KEY].contains("invalid date 'garbage'"));
		assert!(!errors.contains_key(field::EXPIRY_DATE));
	}

	#[test]
	fn test_empty_audience_is_rejected() {
		let mut snapshot = valid_announcement();
		snapshot.audience = BTreeSet::new();
		let errors = validate(ContentKind::Announcement, &snapshot).unwrap_err();
		assert_eq!(errors[field::AUDIENCE], "At least one audience must be selected");
	}

	#[test]
	fn test_audience_is_ignored_for_pages() {
		let mut snapshot = valid_page();
		snapshot.audience = BTreeSet::new();
		assert!(validate(ContentKind::Page, &snapshot).is_ok());
	}

	#[test]
	fn test_all_violations_reported_in_one_pass() {
		let snapshot = FormSnapshot {
			title: String::new(),
			content: String::new(),
			status: "bogus".to_string(),
			featured_image: String::new(),
			meta_title: String::new(),
			meta_description: String::new(),
			keywords: String::new(),
			publish_date: String::new(),
			expiry_date: String::new(),
			audience: BTreeSet::new(),
		};
		let errors = validate(ContentKind::Announcement, &snapshot).unwrap_err();
		for key in [
			field::TITLE,
			field::CONTENT,
			field::STATUS,
			field::PUBLISH_DATE,
			field::EXPIRY_DATE,
			field::AUDIENCE,
		] {
			assert!(errors.contains_key(key), "missing error for {key}");
		}
	}

	#[test]
	fn test_page_meta_length_limits() {
		let mut snapshot = valid_page();
		snapshot.meta_title = "x".repeat(61);
		snapshot.meta_description = "x".repeat(161);
		let errors = validate(ContentKind::Page, &snapshot).unwrap_err();
		assert_eq!(
			errors[field::META_TITLE],
			"Meta title must be less than 60 characters"
		);
		assert_eq!(
			errors[field::META_DESCRIPTION],
			"Meta description must be less than 160 characters"
		);

		snapshot.meta_title = "x".repeat(60);
		snapshot.meta_description = "x".repeat(160);
		assert!(validate(ContentKind::Page, &snapshot).is_ok());
	}

	proptest! {
		#[test]
		fn title_length_classification_matches_the_limit(len in 0usize..400) {
			let mut snapshot = valid_page();
			snapshot.title = "a".repeat(len);
			let result = validate(ContentKind::Page, &snapshot);
			match len {
				0 => {
					let errors = result.unwrap_err();
					prop_assert_eq!(
						errors.get(field::TITLE).map(String::as_str),
						Some("Title is required")
					);
				}
				l if l > TITLE_MAX_CHARS => {
					let errors = result.unwrap_err();
					prop_assert_eq!(
						errors.get(field::TITLE).map(String::as_str),
						Some("Title must be less than 255 characters")
					);
				}
				_ => prop_assert!(result.is_ok()),
			}
		}

		#[test]
		fn validate_is_pure(len in 0usize..300) {
			let mut snapshot = valid_announcement();
			snapshot.title = "a".repeat(len);
			let first = validate(ContentKind::Announcement, &snapshot);
			let second = validate(ContentKind::Announcement, &snapshot);
			prop_assert_eq!(first, second);
		}
	}
}
