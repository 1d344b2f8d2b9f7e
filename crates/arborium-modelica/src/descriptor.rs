//! Opaque handle to a compiled grammar.

use tree_sitter_patched_arborium::ffi::TSLanguage;
use tree_sitter_patched_arborium::{
    Language, LanguageError, MIN_COMPATIBLE_LANGUAGE_VERSION, Parser, LANGUAGE_VERSION,
};

/// A tree-sitter language obtained from a grammar provider.
///
/// A descriptor never wraps a null language pointer: the only ways to build
/// one are [`LanguageDescriptor::from_raw`], which rejects null, and
/// [`LanguageDescriptor::from_language`], which takes an already valid
/// [`Language`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDescriptor {
    language: Language,
}

impl LanguageDescriptor {
    /// Wraps a raw `TSLanguage` pointer, returning `None` for null.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must point to a `TSLanguage` produced by tree-sitter's
    /// generator that stays valid for the rest of the process.
    pub unsafe fn from_raw(ptr: *const TSLanguage) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        let language = unsafe { Language::from_raw(ptr) };
        Some(Self { language })
    }

    pub fn from_language(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn into_language(self) -> Language {
        self.language
    }

    /// ABI version the grammar was generated with.
    pub fn abi_version(&self) -> usize {
        self.language.abi_version()
    }

    /// Number of distinct node kinds (named and anonymous) in the grammar.
    pub fn node_kind_count(&self) -> usize {
        self.language.node_kind_count()
    }

    /// Whether the linked tree-sitter runtime can load this grammar.
    pub fn is_abi_compatible(&self) -> bool {
        (MIN_COMPATIBLE_LANGUAGE_VERSION..=LANGUAGE_VERSION).contains(&self.abi_version())
    }

    /// Installs the language into a fresh parser.
    ///
    /// This is the same validation the runtime performs before parsing, so a
    /// descriptor that passes here can be handed to any [`Parser`].
    pub fn parser(&self) -> Result<Parser, LanguageError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }
}

impl From<LanguageDescriptor> for Language {
    fn from(descriptor: LanguageDescriptor) -> Self {
        descriptor.into_language()
    }
}
