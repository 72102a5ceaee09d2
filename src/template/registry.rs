use std::cmp::Reverse;
use super::{builtin, LicenseTemplate, TemplateDefinition, TemplateError};

/// The set of accepted templates, frozen after [`TemplateRegistry::load`].
///
/// Templates are kept most-specific-first (see
/// [`LicenseTemplate::specificity`]), ties in declaration order, so a loose
/// generic notice never shadows a stricter one.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Vec<LicenseTemplate>,
}

impl TemplateRegistry {
    /// Validate and compile definitions
    pub fn load(definitions: &[TemplateDefinition]) -> Result<Self, TemplateError> {
        let mut templates: Vec<LicenseTemplate> = Vec::with_capacity(definitions.len());

        for (index, definition) in definitions.iter().enumerate() {
            if definition.id.trim().is_empty() {
                return Err(TemplateError::EmptyId { index });
            }
            let template = LicenseTemplate::compile(definition)?;
            if templates.iter().any(|existing| existing.id() == template.id()) {
                return Err(TemplateError::DuplicateId(template.id().to_string()));
            }
            templates.push(template);
        }

        // Stable sort keeps declaration order among equals
        templates.sort_by_key(|template| Reverse(template.specificity()));

        Ok(Self { templates })
    }

    /// Registry of the built-in templates only
    pub fn builtin() -> Result<Self, TemplateError> {
        Self::load(&builtin::definitions())
    }

    /// Templates to try for a file, in priority order.
    ///
    /// License wording does not depend on the language, so every language
    /// gets the same sequence.
    pub fn templates_for(&self, _language: Option<&str>) -> &[LicenseTemplate] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&LicenseTemplate> {
        self.templates.iter().find(|template| template.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LicenseTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
