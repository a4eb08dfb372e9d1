//! Maven interop: POM file parsing, local repository layout, and the POM
//! rewrite seam used before source builds.

pub mod pom;
pub mod repository;
pub mod rewrite;
