//! Grammars compiled into shared libraries and opened at runtime.

use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use thiserror::Error;
use tracing::{debug, warn};
use tree_sitter_patched_arborium::ffi::TSLanguage;

use crate::config::LoaderConfig;
use crate::descriptor::LanguageDescriptor;
use crate::provider::GrammarProvider;

type LanguageFn = unsafe extern "C" fn() -> *const TSLanguage;

/// Errors that can occur when loading a grammar library.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// No library file at the configured location.
    #[error("grammar library not found: {0}")]
    NotFound(PathBuf),

    /// The dynamic loader rejected the file.
    #[error("failed to load grammar library {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// Library exists but doesn't export the language function.
    #[error("grammar library {path} is missing language function `{symbol}`")]
    MissingSymbol {
        path: PathBuf,
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    /// The language function returned a null pointer.
    #[error("language function `{symbol}` in {path} returned null")]
    NullLanguage { path: PathBuf, symbol: String },
}

/// A grammar in a specific shared library file.
#[derive(Debug, Clone)]
pub struct SharedLibraryGrammar {
    name: String,
    path: PathBuf,
    symbol: String,
}

impl SharedLibraryGrammar {
    /// A Modelica grammar at `path`, exporting `tree_sitter_modelica`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            name: crate::NAME.to_string(),
            path: path.into(),
            symbol: crate::LANGUAGE_SYMBOL.to_string(),
        }
    }

    /// The first existing candidate from `config`.
    pub fn locate(config: &LoaderConfig) -> Result<Self, LibraryError> {
        let path = config.resolve().ok_or_else(|| {
            let expected = config
                .candidates()
                .next()
                .unwrap_or_else(|| PathBuf::from(crate::config::library_file_name(crate::GRAMMAR_ID)));
            LibraryError::NotFound(expected)
        })?;
        Ok(Self::new(path).with_symbol(config.symbol.clone()))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Opens the library and calls its language function.
    ///
    /// The library is never unloaded: the returned descriptor points at
    /// tables inside the library image.
    pub fn load(&self) -> Result<LanguageDescriptor, LibraryError> {
        if !self.path.is_file() {
            return Err(LibraryError::NotFound(self.path.clone()));
        }

        // SAFETY: loading a tree-sitter grammar runs no initialisers beyond the
        // C runtime's; the file is expected to be a compiled parser.
        let library = unsafe { Library::new(&self.path) }.map_err(|source| LibraryError::Open {
            path: self.path.clone(),
            source,
        })?;

        let raw = {
            // SAFETY: generated parsers export `const TSLanguage *tree_sitter_<id>(void)`.
            let language_fn: Symbol<LanguageFn> = unsafe { library.get(self.symbol.as_bytes()) }
                .map_err(|source| LibraryError::MissingSymbol {
                    path: self.path.clone(),
                    symbol: self.symbol.clone(),
                    source,
                })?;
            unsafe { language_fn() }
        };

        // SAFETY: non-null pointers from the language function reference static
        // parse tables, kept alive by leaking the library below.
        let descriptor =
            unsafe { LanguageDescriptor::from_raw(raw) }.ok_or_else(|| LibraryError::NullLanguage {
                path: self.path.clone(),
                symbol: self.symbol.clone(),
            })?;

        std::mem::forget(library);
        debug!(
            grammar = %self.name,
            path = %self.path.display(),
            abi = descriptor.abi_version(),
            "loaded grammar library"
        );
        Ok(descriptor)
    }
}

impl GrammarProvider for SharedLibraryGrammar {
    fn name(&self) -> &str {
        &self.name
    }

    fn language(&self) -> Option<LanguageDescriptor> {
        self.load()
            .inspect_err(|error| warn!(grammar = %self.name, %error, "grammar library unavailable"))
            .ok()
    }
}

/// A grammar library located through a [`LoaderConfig`] each time it is asked
/// for, so libraries installed after start-up are picked up.
#[derive(Debug, Clone)]
pub struct InstalledGrammar {
    config: LoaderConfig,
}

impl InstalledGrammar {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}

impl GrammarProvider for InstalledGrammar {
    fn name(&self) -> &str {
        crate::NAME
    }

    fn language(&self) -> Option<LanguageDescriptor> {
        match SharedLibraryGrammar::locate(&self.config) {
            Ok(library) => library.language(),
            Err(error) => {
                debug!(grammar = crate::GRAMMAR_ID, %error, "no installed grammar library");
                None
            }
        }
    }
}
