pub mod map;
pub mod page;

/// Replaces every `placeholder` in `template`, warning when there is none.
pub(crate) fn substitute(template: &str, placeholder: &str, value: &str) -> String {
    if !template.contains(placeholder) {
        log::warn!("template has no {} placeholder", placeholder);
    }
    template.replace(placeholder, value)
}
