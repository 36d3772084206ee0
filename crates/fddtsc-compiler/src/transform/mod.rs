//! Post-emission rewrites of declaration trees.
//!
//! A [`Transformer`] sees every declaration file after it is built and before
//! it is printed. [`MarkerTransformer`] is the one this crate ships: it
//! rewrites type aliases and references according to sentinel comments
//! placed on alias declarations.
//!
//! ```text
//! //! fddtsc::bake      the alias body is replaced by its expanded type
//! //! fddtsc::newtype   references to the alias become `unknown`
//! //! fddtsc::unwrap    references to the alias become their first type argument
//! ```

pub mod bridge;
pub mod comments;
pub mod markers;
mod rewriter;

#[cfg(test)]
mod comments_tests;
#[cfg(test)]
mod rewriter_tests;

use tracing::debug;

pub use bridge::{AliasDeclaration, TypeResolutionBridge};
pub use markers::{Marker, MarkerSet, has_marker};

use crate::checker::Checker;
use crate::dts::{DtsBundle, DtsFile, Fold};
use rewriter::Rewriter;

/// A rewrite of declaration trees.
pub trait Transformer {
    fn transform_file(&mut self, file: DtsFile) -> DtsFile;

    fn transform_bundle(&mut self, bundle: DtsBundle) -> DtsBundle;
}

/// Applies `bake`, `newtype` and `unwrap` markers.
pub struct MarkerTransformer<'c, 'p> {
    checker: &'c Checker<'p>,
    markers: MarkerSet,
}

impl<'c, 'p> MarkerTransformer<'c, 'p> {
    pub fn new(checker: &'c Checker<'p>) -> Self {
        Self::with_markers(checker, MarkerSet::default())
    }

    pub fn with_markers(checker: &'c Checker<'p>, markers: MarkerSet) -> Self {
        Self { checker, markers }
    }
}

impl Transformer for MarkerTransformer<'_, '_> {
    fn transform_file(&mut self, file: DtsFile) -> DtsFile {
        debug!(file = ?file.source, "applying markers");
        let mut rewriter = Rewriter::new(self.checker, &self.markers, file.source);
        rewriter.fold_file(file)
    }

    fn transform_bundle(&mut self, bundle: DtsBundle) -> DtsBundle {
        bundle
    }
}
