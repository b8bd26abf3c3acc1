//! Replacement text for resolved directives.

use pal_directive::Directive;
use pal_resolve::Resolution;

/// Text that replaces `directive` once it resolved to `resolution`.
///
/// Inline values are used verbatim. A relocated file name replaces the final
/// segment of the locator, or follows `output_path` when a prefix is set.
pub(crate) fn replacement_text(
    directive: &Directive,
    resolution: &Resolution,
    output_path: Option<&str>,
) -> String {
    match resolution {
        Resolution::Inline(value) => value.clone(),
        Resolution::Relocated(name) => match output_path {
            Some(prefix) => format!("{prefix}{name}"),
            None => directive.with_file_name(name),
        },
    }
}
