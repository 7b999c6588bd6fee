//! The bundle of style providers used by every code rule.

use std::fmt;

use spanmark_core::StyleProvider;

/// One [`StyleProvider`] per kind of code token.
///
/// Every provider is empty by default, so callers only fill in the ones their
/// theme cares about:
///
/// ```
/// use spanmark_code::CodeStyleProviders;
/// use spanmark_core::StyleProvider;
///
/// let providers: CodeStyleProviders<(), &str> = CodeStyleProviders {
///     keyword: StyleProvider::fixed(vec!["bold"]),
///     ..Default::default()
/// };
/// assert_eq!(providers.keyword.styles(&()), vec!["bold"]);
/// assert!(providers.comment.styles(&()).is_empty());
/// ```
pub struct CodeStyleProviders<R, T> {
    /// Applied over a whole code block.
    pub default: StyleProvider<R, T>,
    pub comment: StyleProvider<R, T>,
    /// Strings and numbers.
    pub literal: StyleProvider<R, T>,
    pub keyword: StyleProvider<R, T>,
    /// Function and field names.
    pub identifier: StyleProvider<R, T>,
    /// Names introduced by a definition (`class Foo`).
    pub types: StyleProvider<R, T>,
    /// Built-ins, annotations, generic parameters and XML tag names.
    pub generics: StyleProvider<R, T>,
    /// Function parameter lists and XML attributes.
    pub params: StyleProvider<R, T>,
}

impl<R: 'static, T: 'static> Default for CodeStyleProviders<R, T> {
    fn default() -> Self {
        Self {
            default: StyleProvider::empty(),
            comment: StyleProvider::empty(),
            literal: StyleProvider::empty(),
            keyword: StyleProvider::empty(),
            identifier: StyleProvider::empty(),
            types: StyleProvider::empty(),
            generics: StyleProvider::empty(),
            params: StyleProvider::empty(),
        }
    }
}

impl<R, T> Clone for CodeStyleProviders<R, T> {
    fn clone(&self) -> Self {
        Self {
            default: self.default.clone(),
            comment: self.comment.clone(),
            literal: self.literal.clone(),
            keyword: self.keyword.clone(),
            identifier: self.identifier.clone(),
            types: self.types.clone(),
            generics: self.generics.clone(),
            params: self.params.clone(),
        }
    }
}

impl<R, T> fmt::Debug for CodeStyleProviders<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeStyleProviders").finish_non_exhaustive()
    }
}
