//! Section registry: named rectangular compositing regions with explicit
//! stacking order.

use crate::{
    core::Rect,
    error::{PaintError, PaintResult},
    model::PaintingInstruction,
};

/// A named rectangular region of the device surface.
///
/// Sections may overlap arbitrarily; across sections, paint order is z
/// ascending with ties broken by insertion order. Content is mutated only
/// by replacing the whole representation.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CanvasSection {
    pub name: String,
    pub x: i64,
    pub y: i64,
    pub z: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub representation: Vec<PaintingInstruction>,
    /// Declared by the model; clipping behavior is unspecified and content
    /// is currently painted wherever its effects put it.
    #[serde(default = "default_overflow")]
    pub overflow: bool,
}

fn default_overflow() -> bool {
    true
}

impl CanvasSection {
    pub fn new(name: impl Into<String>, x: i64, y: i64, z: i32, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            z,
            width,
            height,
            representation: Vec::new(),
            overflow: true,
        }
    }

    pub fn with_representation(mut self, representation: Vec<PaintingInstruction>) -> Self {
        self.representation = representation;
        self
    }

    pub fn with_overflow(mut self, overflow: bool) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn set_representation(&mut self, representation: Vec<PaintingInstruction>) {
        self.representation = representation;
    }

    /// The section's rectangle in device coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Ordered registry of [`CanvasSection`]s keyed by unique name.
///
/// Insertion order carries no rendering meaning; `z` does. Lookup by an
/// absent name is a sentinel (`None`), mutation of an absent name is a
/// hard [`PaintError::SectionNotFound`].
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    sections: Vec<CanvasSection>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[CanvasSection] {
        &self.sections
    }

    /// Register a section. Names are unique within a canvas; a duplicate is
    /// rejected rather than silently shadowed.
    pub fn add_section(&mut self, section: CanvasSection) -> PaintResult<()> {
        if self.section(&section.name).is_some() {
            return Err(PaintError::validation(format!(
                "duplicate section name '{}'",
                section.name
            )));
        }
        self.sections.push(section);
        Ok(())
    }

    pub fn section(&self, name: &str) -> Option<&CanvasSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Replace a section's representation wholesale.
    ///
    /// Fails with [`PaintError::SectionNotFound`] if `name` is absent,
    /// leaving every section untouched. There is no implicit creation.
    pub fn replace_representation(
        &mut self,
        name: &str,
        representation: Vec<PaintingInstruction>,
    ) -> PaintResult<()> {
        match self.sections.iter_mut().find(|s| s.name == name) {
            Some(section) => {
                section.set_representation(representation);
                Ok(())
            }
            None => Err(PaintError::section_not_found(name)),
        }
    }

    pub fn remove_section(&mut self, name: &str) -> Option<CanvasSection> {
        let idx = self.sections.iter().position(|s| s.name == name)?;
        Some(self.sections.remove(idx))
    }

    /// Replace representations for a list of `(name, representation)` pairs.
    ///
    /// Fail-fast, not transactional: pairs are applied in order and the
    /// first absent name stops the batch, so earlier pairs stay applied.
    pub fn batch_replace(
        &mut self,
        pairs: impl IntoIterator<Item = (String, Vec<PaintingInstruction>)>,
    ) -> PaintResult<()> {
        for (name, representation) in pairs {
            self.replace_representation(&name, representation)?;
        }
        Ok(())
    }

    /// Sections in paint order: z ascending, stable for equal z.
    pub fn sections_by_z(&self) -> Vec<&CanvasSection> {
        let mut ordered: Vec<&CanvasSection> = self.sections.iter().collect();
        ordered.sort_by_key(|s| s.z);
        ordered
    }
}
