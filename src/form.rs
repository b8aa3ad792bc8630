//! The content authoring form: one mutable snapshot per editor session.
//!
//! `ContentForm` owns the snapshot, the error map, and the submission and
//! banner state. The host seeds it when the editor opens, forwards user
//! edits through the typed update operations, and calls [`ContentForm::submit`]
//! with its save primitive. Nothing raised by a collaborator escapes the
//! public surface; failures land in the error map or the banner.

use std::collections::BTreeSet;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::audience::resolve_audience;
use crate::content::{
	AnnouncementContent, AssembledContent, Audience, AuthorIdentity, ContentKind,
	ExistingContent, PageContent,
};
use crate::schema::{self, FormSnapshot};
use crate::validate::{ErrorMap, GENERAL_ERROR_KEY, validate};

/// Banner shown when submit is blocked by field validation errors.
const VALIDATION_BANNER: &str = "Please fix the errors below before submitting.";

/// Why a submit produced no assembled content.
///
/// Returned as data; submit never panics or propagates collaborator
/// failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
	/// A submit is already awaiting the host's save primitive; the call
	/// was a no-op.
	#[error("a submit is already in progress")]
	InProgress,
	/// The snapshot failed validation; the error map holds the details.
	#[error("validation failed")]
	ValidationFailed,
	/// The host's save primitive rejected the assembled content.
	#[error("save failed: {0}")]
	SaveFailed(String),
}

/// Host-supplied save primitive.
///
/// The engine assembles the content and hands it over; persistence is
/// entirely the host's concern.
#[async_trait]
pub trait SaveContent: Send + Sync {
	async fn save(&self, content: &AssembledContent) -> anyhow::Result<()>;
}

/// A single-field edit forwarded from the editor UI.
///
/// The rich body field has its own path,
/// [`ContentForm::update_content_body`], because the editing surface emits
/// whole-document replacements rather than keystrokes; the audience field
/// goes through [`ContentForm::set_audience`] so the exclusivity rule runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
	Title(String),
	Status(String),
	FeaturedImage(String),
	MetaTitle(String),
	MetaDescription(String),
	Keywords(String),
	PublishDate(String),
	ExpiryDate(String),
}

struct FormState {
	kind: ContentKind,
	snapshot: FormSnapshot,
	/// Snapshot as seeded, for dirty checking.
	seeded: FormSnapshot,
	/// Id of the content being edited, absent on create.
	content_id: Option<String>,
	errors: ErrorMap,
	submitting: bool,
	banner_message: Option<String>,
	banner_visible: bool,
}

impl FormState {
	fn seeded(kind: ContentKind, existing: Option<&ExistingContent>) -> Self {
		let mut snapshot = schema::defaults_for(kind);
		let content_id = existing.map(|existing| {
			overlay(kind, &mut snapshot, existing);
			existing.id.clone()
		});
		Self {
			kind,
			seeded: snapshot.clone(),
			snapshot,
			content_id,
			errors: ErrorMap::new(),
			submitting: false,
			banner_message: None,
			banner_visible: false,
		}
	}

	fn show_banner(&mut self, message: impl Into<String>) {
		self.banner_message = Some(message.into());
		self.banner_visible = true;
	}
}

/// The form state manager behind the create/edit Page or Announcement
/// editor.
///
/// One instance per open editor session. Methods take `&self` and lock
/// internally so the host can share one handle between its event handlers
/// and the upload coordinator; the lock is never held across an await.
///
/// # Examples
///
/// ```
/// use atrium_forms::{ContentForm, ContentKind, FieldEdit};
///
/// let form = ContentForm::new(ContentKind::Page);
/// form.update_field(FieldEdit::Title("Welcome".to_string()));
/// form.update_content_body("<p>hi</p>");
///
/// let snapshot = form.snapshot();
/// assert_eq!(snapshot.title, "Welcome");
/// assert_eq!(snapshot.status, "draft");
/// assert!(form.has_changed());
/// ```
pub struct ContentForm {
	state: Mutex<FormState>,
}

impl ContentForm {
	/// Opens a form for brand-new content of the given kind.
	pub fn new(kind: ContentKind) -> Self {
		Self {
			state: Mutex::new(FormState::seeded(kind, None)),
		}
	}

	/// Opens a form seeded from previously persisted content.
	pub fn for_existing(kind: ContentKind, existing: &ExistingContent) -> Self {
		Self {
			state: Mutex::new(FormState::seeded(kind, Some(existing))),
		}
	}

	/// Re-seeds the form, discarding the current snapshot.
	///
	/// Resets to variant defaults, overlays matching-variant fields from
	/// `existing` when given, and clears the error map, the banner, and the
	/// submitting flag. The host calls this whenever the editor is pointed
	/// at different content.
	pub fn seed(&self, kind: ContentKind, existing: Option<&ExistingContent>) {
		let mut state = self.state.lock();
		*state = FormState::seeded(kind, existing);
		tracing::debug!(
			kind = %kind,
			editing = state.content_id.is_some(),
			"seeded content form"
		);
	}

	/// The kind this session is editing.
	pub fn kind(&self) -> ContentKind {
		self.state.lock().kind
	}

	/// Id of the content being edited, absent on create.
	pub fn content_id(&self) -> Option<String> {
		self.state.lock().content_id.clone()
	}

	/// A copy of the current snapshot, for rendering.
	pub fn snapshot(&self) -> FormSnapshot {
		self.state.lock().snapshot.clone()
	}

	/// Replaces one field value. No validation runs until submit, so users
	/// are not interrupted mid-typing.
	pub fn update_field(&self, edit: FieldEdit) {
		let mut state = self.state.lock();
		let snapshot = &mut state.snapshot;
		match edit {
			FieldEdit::Title(value) => snapshot.title = value,
			FieldEdit::Status(value) => snapshot.status = value,
			FieldEdit::FeaturedImage(value) => snapshot.featured_image = value,
			FieldEdit::MetaTitle(value) => snapshot.meta_title = value,
			FieldEdit::MetaDescription(value) => snapshot.meta_description = value,
			FieldEdit::Keywords(value) => snapshot.keywords = value,
			FieldEdit::PublishDate(value) => snapshot.publish_date = value,
			FieldEdit::ExpiryDate(value) => snapshot.expiry_date = value,
		}
	}

	/// Replaces the whole rich body, as the editing surface emits it.
	pub fn update_content_body(&self, markup: impl Into<String>) {
		self.state.lock().snapshot.content = markup.into();
	}

	/// Stores the audience selection after applying the "All Users"
	/// exclusivity rule.
	pub fn set_audience(&self, requested: &BTreeSet<Audience>) {
		let mut state = self.state.lock();
		let resolved = resolve_audience(&state.snapshot.audience, requested);
		state.snapshot.audience = resolved;
	}

	/// Current error map; empty when the last validation passed.
	pub fn errors(&self) -> ErrorMap {
		self.state.lock().errors.clone()
	}

	/// Message for one field, by its UI binding key.
	pub fn field_error(&self, key: &str) -> Option<String> {
		self.state.lock().errors.get(key).cloned()
	}

	/// True while a submit is awaiting the host's save primitive.
	pub fn submitting(&self) -> bool {
		self.state.lock().submitting
	}

	/// Current banner text, kept even while hidden so a dismissed banner
	/// can be re-shown by the host if it wants to.
	pub fn banner_message(&self) -> Option<String> {
		self.state.lock().banner_message.clone()
	}

	pub fn banner_visible(&self) -> bool {
		self.state.lock().banner_visible
	}

	/// Hides the banner without clearing its text.
	pub fn dismiss_banner(&self) {
		self.state.lock().banner_visible = false;
	}

	/// True when the snapshot differs from the values it was seeded with,
	/// for the host's close-without-saving confirmation.
	pub fn has_changed(&self) -> bool {
		let state = self.state.lock();
		state.snapshot != state.seeded
	}

	/// Validates, assembles, and hands the content to the host's save
	/// primitive.
	///
	/// Re-entrant calls while a submit is awaiting the save primitive are
	/// no-ops ([`SubmitError::InProgress`]). On validation failure the
	/// error map is stored, the banner raised, and the snapshot left
	/// untouched. A save rejection becomes a banner message; field errors
	/// and the snapshot are kept so the user can retry without re-entering
	/// data. The submitting flag clears on every path.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use atrium_forms::{AuthorIdentity, ContentForm, ContentKind, SaveContent};
	///
	/// async fn example(form: &ContentForm, save: &dyn SaveContent) {
	/// 	let author = AuthorIdentity::new("Ada", "u-1");
	/// 	match form.submit(&author, save).await {
	/// 		Ok(content) => println!("saved {}", content.title()),
	/// 		Err(_) => println!("banner: {:?}", form.banner_message()),
	/// 	}
	/// }
	/// ```
	pub async fn submit(
		&self,
		author: &AuthorIdentity,
		save: &dyn SaveContent,
	) -> Result<AssembledContent, SubmitError> {
		let assembled = {
			let mut state = self.state.lock();
			if state.submitting {
				tracing::debug!("submit already in progress; ignoring");
				return Err(SubmitError::InProgress);
			}

			if let Err(errors) = validate(state.kind, &state.snapshot) {
				let banner = errors
					.get(GENERAL_ERROR_KEY)
					.cloned()
					.unwrap_or_else(|| VALIDATION_BANNER.to_string());
				state.errors = errors;
				state.show_banner(banner);
				return Err(SubmitError::ValidationFailed);
			}

			match assemble(state.kind, &state.snapshot, state.content_id.clone(), author) {
				Ok(assembled) => {
					state.errors.clear();
					state.submitting = true;
					assembled
				}
				Err(message) => {
					state
						.errors
						.insert(GENERAL_ERROR_KEY.to_string(), message.clone());
					state.show_banner(message);
					return Err(SubmitError::ValidationFailed);
				}
			}
		};

		// Suspension point: the lock is released while the host persists.
		let outcome = save.save(&assembled).await;

		let mut state = self.state.lock();
		state.submitting = false;
		match outcome {
			Ok(()) => {
				tracing::info!(
					kind = %assembled.kind(),
					id = assembled.id().unwrap_or("<new>"),
					"content saved"
				);
				Ok(assembled)
			}
			Err(error) => {
				tracing::warn!(error = %error, "save primitive rejected content");
				state.show_banner(format!("Failed to save: {error}"));
				Err(SubmitError::SaveFailed(error.to_string()))
			}
		}
	}

	/// Routes an uploaded image reference into the snapshot: Pages take it
	/// as the featured image, Announcements get an inline reference
	/// appended to the body.
	pub(crate) fn attach_image(&self, url: &str, alt: &str) {
		let mut state = self.state.lock();
		match state.kind {
			ContentKind::Page => {
				state.snapshot.featured_image = url.to_string();
			}
			ContentKind::Announcement => {
				let body = &mut state.snapshot.content;
				if !body.is_empty() {
					body.push('\n');
				}
				body.push_str(&format!("<img src=\"{url}\" alt=\"{alt}\" />"));
			}
		}
	}

	pub(crate) fn show_banner(&self, message: impl Into<String>) {
		self.state.lock().show_banner(message);
	}
}

/// Overlays matching-variant fields from persisted content onto a freshly
/// seeded snapshot. Fields of the other variant are left at their defaults.
fn overlay(kind: ContentKind, snapshot: &mut FormSnapshot, existing: &ExistingContent) {
	if let Some(title) = &existing.title {
		snapshot.title = title.clone();
	}
	if let Some(content) = &existing.content {
		snapshot.content = content.clone();
	}
	if let Some(status) = &existing.status {
		snapshot.status = status.clone();
	}

	match kind {
		ContentKind::Page => {
			if let Some(url) = &existing.featured_image {
				snapshot.featured_image = url.clone();
			}
			if let Some(meta_title) = &existing.meta_title {
				snapshot.meta_title = meta_title.clone();
			}
			if let Some(meta_description) = &existing.meta_description {
				snapshot.meta_description = meta_description.clone();
			}
			if let Some(keywords) = &existing.keywords {
				snapshot.keywords = keywords.clone();
			}
		}
		ContentKind::Announcement => {
			if let Some(date) = existing
				.publish_date
				.as_deref()
				.and_then(schema::normalize_date_input)
			{
				snapshot.publish_date = date;
			}
			if let Some(date) = existing
				.expiry_date
				.as_deref()
				.and_then(schema::normalize_date_input)
			{
				snapshot.expiry_date = date;
			}
			if let Some(labels) = &existing.audience {
				// Unknown labels from older data are dropped; validation
				// reports an empty audience if nothing survives.
				snapshot.audience = labels
					.iter()
					.filter_map(|label| label.parse::<Audience>().ok())
					.collect();
			}
		}
	}
}

/// Builds the variant-shaped object from a validated snapshot.
///
/// Failures here mean the snapshot passed validation but cannot be parsed
/// into the typed output, which is an engine bug; the caller surfaces the
/// message under the `general` key.
fn assemble(
	kind: ContentKind,
	snapshot: &FormSnapshot,
	id: Option<String>,
	author: &AuthorIdentity,
) -> Result<AssembledContent, String> {
	match kind {
		ContentKind::Page => {
			let status = snapshot
				.status
				.parse()
				.map_err(|e| format!("Unable to assemble page: {e}"))?;
			let featured_image = match snapshot.featured_image.trim() {
				"" => None,
				url => Some(url.to_string()),
			};
			Ok(AssembledContent::Page(PageContent {
				id,
				title: snapshot.title.clone(),
				content: snapshot.content.clone(),
				status,
				featured_image,
				meta_title: snapshot.meta_title.clone(),
				meta_description: snapshot.meta_description.clone(),
				keywords: snapshot.keywords.clone(),
				author: author.name.clone(),
				author_id: author.id.clone(),
			}))
		}
		ContentKind::Announcement => {
			let status = snapshot
				.status
				.parse()
				.map_err(|e| format!("Unable to assemble announcement: {e}"))?;
			let publish_date = schema::parse_date(&snapshot.publish_date)
				.ok_or_else(|| "Unable to assemble announcement: bad publish date".to_string())?;
			let expiry_date = schema::parse_date(&snapshot.expiry_date)
				.ok_or_else(|| "Unable to assemble announcement: bad expiry date".to_string())?;
			Ok(AssembledContent::Announcement(AnnouncementContent {
				id,
				title: snapshot.title.clone(),
				content: snapshot.content.clone(),
				status,
				publish_date,
				expiry_date,
				audience: snapshot.audience.clone(),
				author: author.name.clone(),
				author_id: author.id.clone(),
			}))
		}
	}
}
