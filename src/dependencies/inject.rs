use super::hook::{Depends, HookArg};

pub const LEGACY_DEPENDS_WARNING: &str = "passing a hook already wrapped in `Depends` to dependency handlers is deprecated \
     and will stop being supported; pass the plain hook instead";

/// Handles the deprecated shape where callers pre-wrap some hooks. Returns None when no
/// element is pre-wrapped, so the regular path applies.
fn legacy_dependency_handling(hooks: &[HookArg]) -> Option<Vec<Depends>> {
    if !hooks.iter().any(HookArg::is_wrapped) {
        return None;
    }
    tracing::warn!(target: "crud_introspect::deprecation", "{}", LEGACY_DEPENDS_WARNING);
    Some(hooks.iter().cloned().map(HookArg::into_depends).collect())
}

/// Wrap each hook in a [`Depends`], keeping order and length.
///
/// `None` stays `None`: no hooks configured is not the same as an empty list.
pub fn inject_dependencies(hooks: Option<Vec<HookArg>>) -> Option<Vec<Depends>> {
    let hooks = hooks?;
    if let Some(handles) = legacy_dependency_handling(&hooks) {
        return Some(handles);
    }
    // Only plain hooks reach this point.
    Some(hooks.into_iter().map(HookArg::into_depends).collect())
}
