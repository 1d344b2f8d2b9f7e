//! The load check: does a provider hand back a usable language?

use thiserror::Error;
use tracing::{debug, warn};
use tree_sitter_patched_arborium::LanguageError;

use crate::descriptor::LanguageDescriptor;
use crate::provider::GrammarProvider;

/// A grammar provider failed to produce a usable language.
///
/// The message is always `Error loading <Name> grammar`; the underlying
/// reason is available through [`GrammarLoadFailure::cause`] and
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
#[error("Error loading {grammar} grammar")]
pub struct GrammarLoadFailure {
    grammar: String,
    #[source]
    cause: LoadFailureCause,
}

/// Why a [`GrammarLoadFailure`] happened.
#[derive(Debug, Error)]
pub enum LoadFailureCause {
    /// The provider returned no descriptor.
    #[error("grammar provider returned no language")]
    Missing,

    /// The descriptor was generated for an ABI this runtime cannot load.
    #[error("language is incompatible with the tree-sitter runtime")]
    IncompatibleAbi(#[source] LanguageError),
}

impl GrammarLoadFailure {
    pub fn grammar(&self) -> &str {
        &self.grammar
    }

    pub fn cause(&self) -> &LoadFailureCause {
        &self.cause
    }
}

/// Obtains a descriptor from `provider` and verifies the runtime accepts it.
///
/// Stateless: calling it again with the same provider gives the same outcome.
pub fn check_grammar_loads<P>(provider: &P) -> Result<LanguageDescriptor, GrammarLoadFailure>
where
    P: GrammarProvider + ?Sized,
{
    let grammar = provider.name();

    let Some(descriptor) = provider.language() else {
        warn!(grammar, "grammar provider returned no language");
        return Err(GrammarLoadFailure {
            grammar: grammar.to_string(),
            cause: LoadFailureCause::Missing,
        });
    };

    if let Err(error) = descriptor.parser() {
        warn!(grammar, abi = descriptor.abi_version(), %error, "grammar rejected by runtime");
        return Err(GrammarLoadFailure {
            grammar: grammar.to_string(),
            cause: LoadFailureCause::IncompatibleAbi(error),
        });
    }

    debug!(
        grammar,
        abi = descriptor.abi_version(),
        node_kinds = descriptor.node_kind_count(),
        "grammar loaded"
    );
    Ok(descriptor)
}

/// Runs [`check_grammar_loads`] against the default Modelica provider.
pub fn check_modelica_grammar() -> Result<LanguageDescriptor, GrammarLoadFailure> {
    check_grammar_loads(&crate::provider::modelica())
}
