//! Content authoring form engine for the Atrium admin console.
//!
//! Backs the admin "create/edit Page or Announcement" editor. The engine
//! owns one mutable form snapshot per editing session and provides:
//!
//! - the variant schema for the two content kinds and their seed defaults
//! - variant-conditional validation that reports every invalid field in
//!   one pass, including the expiry-after-publish rule
//! - the "All Users" exclusivity rule for the announcement audience
//!   selector
//! - guarded, banner-reporting coordination of the host's async save and
//!   image-upload primitives
//!
//! It is a pure in-memory state and validation library: no routing, no
//! persistence, no authentication. The host supplies those through the
//! [`SaveContent`] and [`UploadImage`] traits and an [`AuthorIdentity`]
//! stamped at submit time.
//!
//! # Examples
//!
//! ```
//! use atrium_forms::{ContentForm, ContentKind, FieldEdit};
//!
//! let form = ContentForm::new(ContentKind::Announcement);
//! form.update_field(FieldEdit::Title("Maintenance window".to_string()));
//! form.update_content_body("<p>Sunday night</p>");
//!
//! // Defaults already satisfy the date and audience rules.
//! let snapshot = form.snapshot();
//! assert!(atrium_forms::validate(ContentKind::Announcement, &snapshot).is_ok());
//! ```

pub mod audience;
pub mod content;
pub mod form;
pub mod schema;
pub mod upload;
pub mod validate;

pub use audience::resolve_audience;
pub use content::{
	AnnouncementContent, AnnouncementStatus, AssembledContent, Audience, AuthorIdentity,
	ContentKind, ExistingContent, PageContent, PageStatus, UnrecognizedValue,
};
pub use form::{ContentForm, FieldEdit, SaveContent, SubmitError};
pub use schema::{FieldSpec, FormSnapshot, defaults_for, defaults_on, fields_for};
pub use upload::{ImageFile, ImageUploadCoordinator, UploadImage};
pub use validate::{ErrorMap, GENERAL_ERROR_KEY, validate};
