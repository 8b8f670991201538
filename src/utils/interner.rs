//! Global String Interner
//!
//! Attribute names and shader symbols are interned into integer [`Symbol`]s so
//! the per-draw attribute resolution compares and hashes integers instead of
//! strings.

use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};

/// Global interner instance.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::new);

/// A compact integer handle for an interned string.
pub type Symbol = Spur;

/// Interns a string and returns its [`Symbol`].
///
/// Returns the existing symbol if the string was interned before.
#[inline]
pub fn intern(s: &str) -> Symbol {
    INTERNER.get_or_intern(s)
}

/// Looks up the symbol of an already interned string without allocating.
#[inline]
pub fn get(s: &str) -> Option<Symbol> {
    INTERNER.get(s)
}

/// Resolves a symbol back to its string.
#[inline]
pub fn resolve(sym: Symbol) -> &'static str {
    INTERNER.resolve(&sym)
}
