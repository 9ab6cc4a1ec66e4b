//! Tenant prefix handling.
//!
//! Inbound, the tenant prefix is removed from the raw request path to get the
//! canonical path the route table is matched against. Outbound, the same
//! prefix (as the "active base") is put back in front of generated paths.

use crate::tenant::Tenant;

/// The tenant's prefix: base URL if set, base path otherwise, with exactly one
/// trailing `/`.
pub fn build_prefix(tenant: &Tenant) -> String {
    let base = tenant.base_url.as_deref().unwrap_or(&tenant.base_path);
    format!("{}/", base.trim_end_matches('/'))
}

/// The active base stored on the request context: the prefix without its
/// trailing `/` (empty for a root tenant).
pub fn active_base(prefix: &str) -> String {
    prefix.trim_end_matches('/').to_string()
}

/// Remove `prefix` from the start of `raw_path` (case-insensitive) and
/// normalize the remainder.
///
/// A path equal to the prefix without its trailing `/` is the tenant root.
pub fn strip_prefix(raw_path: &str, prefix: &str) -> String {
    let bare = prefix.trim_end_matches('/');
    let remainder = if starts_with_ignore_case(raw_path, prefix) {
        &raw_path[prefix.len()..]
    } else if !bare.is_empty() && raw_path.eq_ignore_ascii_case(bare) {
        ""
    } else {
        raw_path
    };
    normalize_path(remainder)
}

/// Single leading `/`, no trailing `/`; the root is exactly `/`.
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}

pub(crate) fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack.len() >= prefix.len()
        && haystack.is_char_boundary(prefix.len())
        && haystack[..prefix.len()].eq_ignore_ascii_case(prefix)
}
