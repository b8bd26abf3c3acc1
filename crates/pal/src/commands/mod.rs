//! CLI command implementations.

pub(crate) mod rewrite;
pub(crate) mod scan;

pub(crate) use rewrite::RewriteArgs;
pub(crate) use scan::ScanArgs;
