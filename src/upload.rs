//! Asynchronous image upload coordination.
//!
//! The coordinator wraps the host's upload primitive, owns the uploading
//! flag, and routes a successful upload into the form: Pages take the URL
//! as their featured image, Announcements get an inline image reference
//! appended to the body. Upload failures are session-level banner errors,
//! never per-field validation errors, because they fault an external
//! operation rather than anything the user typed.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::content::ContentKind;
use crate::form::ContentForm;

/// A file the user picked in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
	/// Original file name, used as the inline reference's alt text.
	pub name: String,
	pub bytes: Vec<u8>,
}

impl ImageFile {
	pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
		Self {
			name: name.into(),
			bytes,
		}
	}
}

/// Host-supplied upload primitive.
///
/// Implementations push the file to the hosted object store and return a
/// public URL; they may fail with a descriptive error.
#[async_trait]
pub trait UploadImage: Send + Sync {
	async fn upload(
		&self,
		file: &ImageFile,
		kind: ContentKind,
		content_id: Option<&str>,
	) -> anyhow::Result<String>;
}

/// Drives one upload at a time against a form session.
///
/// A second upload started while one is still in flight is rejected as a
/// no-op rather than racing the first for the destination field.
///
/// # Examples
///
/// ```rust,no_run
/// use atrium_forms::{ContentForm, ImageFile, ImageUploadCoordinator, UploadImage};
///
/// async fn example<U: UploadImage>(form: &ContentForm, uploader: U) {
/// 	let coordinator = ImageUploadCoordinator::new(uploader);
/// 	let file = ImageFile::new("banner.png", vec![0u8; 16]);
/// 	if coordinator.upload(form, &file).await {
/// 		// The snapshot now references the uploaded image.
/// 	}
/// }
/// ```
pub struct ImageUploadCoordinator<U> {
	uploader: U,
	uploading: AtomicBool,
}

impl<U: UploadImage> ImageUploadCoordinator<U> {
	pub fn new(uploader: U) -> Self {
		Self {
			uploader,
			uploading: AtomicBool::new(false),
		}
	}

	/// True while an upload is awaiting the host's primitive; the host
	/// disables the upload control on this.
	pub fn is_uploading(&self) -> bool {
		self.uploading.load(Ordering::SeqCst)
	}

	/// Uploads a file and routes the resulting URL into the form.
	///
	/// Returns `true` when a reference was routed into the snapshot. On
	/// failure the form's banner carries `Failed to upload image: {reason}`
	/// and the error map is left untouched. The uploading flag clears on
	/// every path.
	pub async fn upload(&self, form: &ContentForm, file: &ImageFile) -> bool {
		if self.uploading.swap(true, Ordering::SeqCst) {
			tracing::debug!(file = %file.name, "upload already in progress; ignoring");
			return false;
		}

		let kind = form.kind();
		let content_id = form.content_id();
		let result = self
			.uploader
			.upload(file, kind, content_id.as_deref())
			.await;

		let routed = match result {
			Ok(url) => {
				tracing::debug!(kind = %kind, url = %url, "image uploaded");
				form.attach_image(&url, &file.name);
				true
			}
			Err(error) => {
				tracing::warn!(error = %error, file = %file.name, "image upload failed");
				form.show_banner(format!("Failed to upload image: {error}"));
				false
			}
		};
		self.uploading.store(false, Ordering::SeqCst);
		routed
	}
}
