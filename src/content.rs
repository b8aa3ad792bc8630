//! Content variants and the shapes the editor reads and produces.
//!
//! The authoring editor handles two structurally different content kinds,
//! Page and Announcement. This module defines the closed kind tag, the
//! per-kind status enumerations, the audience tags an Announcement targets,
//! the previously persisted shape the editor can be seeded from, and the
//! variant-shaped objects handed back to the host for persistence.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raised when a string value does not name a known enum member.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {what}: {value}")]
pub struct UnrecognizedValue {
	/// What was being parsed, e.g. `"page status"`.
	pub what: &'static str,
	/// The offending input.
	pub value: String,
}

impl UnrecognizedValue {
	fn new(what: &'static str, value: &str) -> Self {
		Self {
			what,
			value: value.to_string(),
		}
	}
}

/// The two content kinds the authoring editor can produce.
///
/// The kind is fixed for the lifetime of one editing session; switching the
/// editor to a different kind forces a full re-seed of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
	Page,
	Announcement,
}

impl ContentKind {
	/// Status values that are legal for this kind, in display order.
	///
	/// # Examples
	///
	/// ```
	/// use atrium_forms::ContentKind;
	///
	/// assert_eq!(ContentKind::Page.statuses(), ["draft", "published"]);
	/// assert_eq!(
	/// 	ContentKind::Announcement.statuses(),
	/// 	["active", "scheduled", "expired"]
	/// );
	/// ```
	pub fn statuses(&self) -> &'static [&'static str] {
		match self {
			ContentKind::Page => &["draft", "published"],
			ContentKind::Announcement => &["active", "scheduled", "expired"],
		}
	}

	/// Seed status for a freshly opened editor.
	pub fn default_status(&self) -> &'static str {
		match self {
			ContentKind::Page => "draft",
			ContentKind::Announcement => "active",
		}
	}
}

impl fmt::Display for ContentKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ContentKind::Page => write!(f, "Page"),
			ContentKind::Announcement => write!(f, "Announcement"),
		}
	}
}

/// Publication status of a Page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
	Draft,
	Published,
}

impl fmt::Display for PageStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PageStatus::Draft => write!(f, "draft"),
			PageStatus::Published => write!(f, "published"),
		}
	}
}

impl FromStr for PageStatus {
	type Err = UnrecognizedValue;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"draft" => Ok(PageStatus::Draft),
			"published" => Ok(PageStatus::Published),
			other => Err(UnrecognizedValue::new("page status", other)),
		}
	}
}

/// Lifecycle status of an Announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatus {
	Active,
	Scheduled,
	Expired,
}

impl fmt::Display for AnnouncementStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AnnouncementStatus::Active => write!(f, "active"),
			AnnouncementStatus::Scheduled => write!(f, "scheduled"),
			AnnouncementStatus::Expired => write!(f, "expired"),
		}
	}
}

impl FromStr for AnnouncementStatus {
	type Err = UnrecognizedValue;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"active" => Ok(AnnouncementStatus::Active),
			"scheduled" => Ok(AnnouncementStatus::Scheduled),
			"expired" => Ok(AnnouncementStatus::Expired),
			other => Err(UnrecognizedValue::new("announcement status", other)),
		}
	}
}

/// A user-role tag an Announcement is targeted at.
///
/// `AllUsers` is mutually exclusive with the specific tags; the exclusivity
/// rule lives in [`crate::audience::resolve_audience`]. The derive order
/// puts `AllUsers` first when iterating a `BTreeSet<Audience>`.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Audience {
	#[serde(rename = "All Users")]
	AllUsers,
	Students,
	Instructors,
	Administrators,
}

impl Audience {
	/// Every selectable tag, in display order.
	pub const ALL: [Audience; 4] = [
		Audience::AllUsers,
		Audience::Students,
		Audience::Instructors,
		Audience::Administrators,
	];
}

impl fmt::Display for Audience {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Audience::AllUsers => write!(f, "All Users"),
			Audience::Students => write!(f, "Students"),
			Audience::Instructors => write!(f, "Instructors"),
			Audience::Administrators => write!(f, "Administrators"),
		}
	}
}

impl FromStr for Audience {
	type Err = UnrecognizedValue;

	/// Parses the UI label of a tag.
	///
	/// # Examples
	///
	/// ```
	/// use atrium_forms::Audience;
	///
	/// assert_eq!("All Users".parse(), Ok(Audience::AllUsers));
	/// assert!("Everyone".parse::<Audience>().is_err());
	/// ```
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"All Users" => Ok(Audience::AllUsers),
			"Students" => Ok(Audience::Students),
			"Instructors" => Ok(Audience::Instructors),
			"Administrators" => Ok(Audience::Administrators),
			other => Err(UnrecognizedValue::new("audience tag", other)),
		}
	}
}

/// Identity stamped onto assembled content at submit time.
///
/// The engine never authenticates; it records whatever the host's identity
/// provider supplies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorIdentity {
	pub name: String,
	pub id: String,
}

impl AuthorIdentity {
	pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			id: id.into(),
		}
	}
}

/// A previously persisted content item, as the host hands it to the editor.
///
/// This is the superset shape across both kinds; the form manager overlays
/// only the fields belonging to the kind being seeded. Date strings may be
/// full timestamps from the hosted database and are normalized to calendar
/// dates during seeding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExistingContent {
	pub id: String,
	pub title: Option<String>,
	pub content: Option<String>,
	pub status: Option<String>,
	pub featured_image: Option<String>,
	pub meta_title: Option<String>,
	pub meta_description: Option<String>,
	pub keywords: Option<String>,
	pub publish_date: Option<String>,
	pub expiry_date: Option<String>,
	pub audience: Option<Vec<String>>,
}

/// A Page as assembled for the host's save path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
	/// Present when editing existing content, absent on create.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	pub title: String,
	pub content: String,
	pub status: PageStatus,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub featured_image: Option<String>,
	pub meta_title: String,
	pub meta_description: String,
	pub keywords: String,
	pub author: String,
	pub author_id: String,
}

/// An Announcement as assembled for the host's save path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementContent {
	/// Present when editing existing content, absent on create.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	pub title: String,
	pub content: String,
	pub status: AnnouncementStatus,
	pub publish_date: NaiveDate,
	pub expiry_date: NaiveDate,
	pub audience: BTreeSet<Audience>,
	pub author: String,
	pub author_id: String,
}

/// The variant-shaped object produced by a successful submit.
///
/// Only fields relevant to the active kind are present; inactive-variant
/// fields from the form snapshot are dropped at assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AssembledContent {
	Page(PageContent),
	Announcement(AnnouncementContent),
}

impl AssembledContent {
	pub fn kind(&self) -> ContentKind {
		match self {
			AssembledContent::Page(_) => ContentKind::Page,
			AssembledContent::Announcement(_) => ContentKind::Announcement,
		}
	}

	pub fn id(&self) -> Option<&str> {
		match self {
			AssembledContent::Page(p) => p.id.as_deref(),
			AssembledContent::Announcement(a) => a.id.as_deref(),
		}
	}

	pub fn title(&self) -> &str {
		match self {
			AssembledContent::Page(p) => &p.title,
			AssembledContent::Announcement(a) => &a.title,
		}
	}
}
