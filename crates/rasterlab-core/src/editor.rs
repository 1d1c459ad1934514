use uuid::Uuid;

use crate::buffer::PixelBuffer;
use crate::error::{CoreError, Result};
use crate::histogram::{self, Histogram};
use crate::operation::Operation;

/// The open document: an untouched original and the working copy that every
/// operation replaces.
///
/// Operations are all-or-nothing. A failing operation leaves the working
/// buffer exactly as it was.
#[derive(Debug, Clone)]
pub struct Editor {
    id: Uuid,
    original: Option<PixelBuffer>,
    working: Option<PixelBuffer>,
    applied: Vec<String>,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            original: None,
            working: None,
            applied: Vec::new(),
        }
    }

    /// Start an editor with `image` already loaded.
    pub fn with_image(image: PixelBuffer) -> Self {
        let mut editor = Self::new();
        editor.load(image);
        editor
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Replace the document, as on open or paste. Both buffers start equal.
    pub fn load(&mut self, image: PixelBuffer) {
        tracing::info!(
            width = image.width(),
            height = image.height(),
            format = image.format().display_name(),
            "loaded image"
        );
        self.working = Some(image.clone());
        self.original = Some(image);
        self.applied.clear();
    }

    pub fn is_loaded(&self) -> bool {
        self.working.is_some()
    }

    pub fn original(&self) -> Option<&PixelBuffer> {
        self.original.as_ref()
    }

    pub fn working(&self) -> Option<&PixelBuffer> {
        self.working.as_ref()
    }

    /// Names of the operations applied since the last load or reset.
    pub fn applied(&self) -> &[String] {
        &self.applied
    }

    /// Apply `op` to the working buffer.
    ///
    /// With no image loaded, geometric operations do nothing and everything
    /// else fails with [`CoreError::EmptyBuffer`].
    pub fn apply(&mut self, op: &Operation) -> Result<()> {
        let Some(working) = self.working.as_ref() else {
            if op.is_geometric() {
                tracing::debug!(op = op.display_name(), "no image loaded, skipping");
                return Ok(());
            }
            return Err(CoreError::EmptyBuffer);
        };
        let output = op.apply(working).inspect_err(|e| {
            tracing::warn!(op = op.display_name(), error = %e, "operation rejected");
        })?;
        self.commit(op.display_name(), output);
        Ok(())
    }

    /// Apply several operations as one step. If any fails, none take effect.
    pub fn apply_all(&mut self, ops: &[Operation]) -> Result<()> {
        let Some(working) = self.working.as_ref() else {
            if ops.iter().all(Operation::is_geometric) {
                return Ok(());
            }
            return Err(CoreError::EmptyBuffer);
        };
        let mut current = working.clone();
        for op in ops {
            current = op.apply(&current).inspect_err(|e| {
                tracing::warn!(op = op.display_name(), error = %e, "operation rejected");
            })?;
        }
        self.working = Some(current);
        self.applied
            .extend(ops.iter().map(|op| op.display_name().to_string()));
        Ok(())
    }

    /// Reshape the working buffer's gray-level distribution to follow
    /// `reference`. The result is Grayscale8.
    pub fn match_histogram(&mut self, reference: &PixelBuffer) -> Result<()> {
        let working = self.working.as_ref().ok_or(CoreError::EmptyBuffer)?;
        let output = histogram::match_histogram(working, reference);
        tracing::debug!(
            reference_width = reference.width(),
            reference_height = reference.height(),
            "matched histogram"
        );
        self.commit("Histogram Matching", output);
        Ok(())
    }

    /// Histogram of the working buffer.
    pub fn histogram(&self) -> Result<Histogram> {
        let working = self.working.as_ref().ok_or(CoreError::EmptyBuffer)?;
        Ok(histogram::histogram(working))
    }

    /// Copy the original back into the working buffer. Does nothing when no
    /// image is loaded.
    pub fn reset(&mut self) {
        if let Some(original) = &self.original {
            tracing::info!(discarded = self.applied.len(), "reset to original");
            self.working = Some(original.clone());
            self.applied.clear();
        }
    }

    fn commit(&mut self, name: &str, output: PixelBuffer) {
        self.working = Some(output);
        self.applied.push(name.to_string());
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
