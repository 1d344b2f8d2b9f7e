//! Sources of a Modelica [`LanguageDescriptor`].
//!
//! A provider takes no input and either hands back a descriptor or nothing.
//! Why it has nothing to hand back (no vendored parser, missing library,
//! missing symbol) is logged by the provider; callers only see the absence,
//! which [`check_grammar_loads`](crate::check_grammar_loads) turns into a
//! [`GrammarLoadFailure`](crate::GrammarLoadFailure).

use std::fmt;

use crate::config::LoaderConfig;
use crate::descriptor::LanguageDescriptor;
use crate::library::InstalledGrammar;

/// Something that can produce a language descriptor for a named grammar.
pub trait GrammarProvider {
    /// Human-readable grammar name, used in failure messages.
    fn name(&self) -> &str;

    /// Obtains the descriptor, or `None` if the grammar is unavailable.
    fn language(&self) -> Option<LanguageDescriptor>;

    /// Tries `self` first and `other` if `self` has no descriptor.
    fn or<Q>(self, other: Q) -> Fallback<Self, Q>
    where
        Self: Sized,
        Q: GrammarProvider,
    {
        Fallback {
            first: self,
            second: other,
        }
    }
}

impl<P: GrammarProvider + ?Sized> GrammarProvider for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn language(&self) -> Option<LanguageDescriptor> {
        (**self).language()
    }
}

impl<P: GrammarProvider + ?Sized> GrammarProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn language(&self) -> Option<LanguageDescriptor> {
        (**self).language()
    }
}

/// The grammar compiled into this crate by `build.rs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedGrammar;

impl GrammarProvider for LinkedGrammar {
    fn name(&self) -> &str {
        crate::NAME
    }

    #[cfg(modelica_parser)]
    fn language(&self) -> Option<LanguageDescriptor> {
        // SAFETY: the symbol comes from the vendored, generated parser.c.
        unsafe { LanguageDescriptor::from_raw(crate::tree_sitter_modelica()) }
    }

    #[cfg(not(modelica_parser))]
    fn language(&self) -> Option<LanguageDescriptor> {
        tracing::debug!(
            grammar = crate::GRAMMAR_ID,
            "crate was built without vendored grammar sources"
        );
        None
    }
}

/// A provider backed by a closure.
///
/// Useful for grammars built elsewhere in the process, and as a stand-in
/// provider in tests.
pub struct FnGrammar<F> {
    name: String,
    load: F,
}

impl<F> FnGrammar<F>
where
    F: Fn() -> Option<LanguageDescriptor>,
{
    pub fn new(name: impl Into<String>, load: F) -> Self {
        Self {
            name: name.into(),
            load,
        }
    }
}

impl<F> fmt::Debug for FnGrammar<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnGrammar").field("name", &self.name).finish()
    }
}

impl<F> GrammarProvider for FnGrammar<F>
where
    F: Fn() -> Option<LanguageDescriptor>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn language(&self) -> Option<LanguageDescriptor> {
        (self.load)()
    }
}

/// Two providers tried in order. Reports the first provider's name.
#[derive(Debug, Clone)]
pub struct Fallback<P, Q> {
    first: P,
    second: Q,
}

impl<P: GrammarProvider, Q: GrammarProvider> GrammarProvider for Fallback<P, Q> {
    fn name(&self) -> &str {
        self.first.name()
    }

    fn language(&self) -> Option<LanguageDescriptor> {
        self.first.language().or_else(|| {
            tracing::debug!(
                from = self.first.name(),
                to = self.second.name(),
                "falling back to next grammar provider"
            );
            self.second.language()
        })
    }
}

/// The default Modelica provider: the linked grammar, then an installed
/// shared library located through [`LoaderConfig::from_env`].
pub fn modelica() -> Fallback<LinkedGrammar, InstalledGrammar> {
    LinkedGrammar.or(InstalledGrammar::new(LoaderConfig::from_env()))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn absent(name: &str) -> FnGrammar<impl Fn() -> Option<LanguageDescriptor>> {
        FnGrammar::new(name, || None)
    }

    #[test]
    fn fn_grammar_reports_name_and_result() {
        let provider = absent("Modelica");
        assert_eq!(provider.name(), "Modelica");
        assert!(provider.language().is_none());
    }

    #[test]
    fn fallback_tries_second_only_when_first_is_empty() {
        let calls = Cell::new(0);
        let second = FnGrammar::new("second", || {
            calls.set(calls.get() + 1);
            None
        });
        let provider = absent("first").or(&second);

        assert_eq!(provider.name(), "first");
        assert!(provider.language().is_none());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn boxed_and_borrowed_providers_delegate() {
        let boxed: Box<dyn GrammarProvider> = Box::new(absent("boxed"));
        assert_eq!(boxed.name(), "boxed");
        assert!(boxed.language().is_none());

        let borrowed = &boxed;
        assert_eq!(borrowed.name(), "boxed");
    }

    #[test]
    fn linked_grammar_is_present() {
        assert_eq!(LinkedGrammar.name(), "Modelica");
        let descriptor = LinkedGrammar.language().expect("grammar is linked by default");
        assert_eq!(LinkedGrammar.language(), Some(descriptor));
    }

    #[test]
    fn fallback_prefers_linked_grammar() {
        let calls = Cell::new(0);
        let provider = LinkedGrammar.or(FnGrammar::new("unused", || {
            calls.set(calls.get() + 1);
            None
        }));

        assert!(provider.language().is_some());
        assert_eq!(calls.get(), 0);
    }
}
