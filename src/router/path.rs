use percent_encoding::percent_decode_str;

/// Rewrites Express-style `:name` segments into the `{name}` form `matchit`
/// understands. A trailing `*` segment becomes a catch-all.
pub(crate) fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 4);

    for (i, segment) in path.split('/').enumerate() {
        if i > 0 {
            out.push('/');
        }

        match segment.strip_prefix(':') {
            Some(name) if !name.is_empty() => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
            _ if segment == "*" => out.push_str("{*wildcard}"),
            _ => out.push_str(segment),
        }
    }

    if out.is_empty() { "/".to_string() } else { out }
}

/// Path used for matching: one trailing slash is ignored, as with
/// Express's non-strict routing. The root stays `/`.
pub(crate) fn lookup_path(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}

/// Percent-decodes a captured segment. Segments that do not decode to
/// UTF-8 are kept raw.
pub(crate) fn decode_param(raw: &str) -> String {
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_param, lookup_path, normalize};

    #[test]
    fn express_params_are_rewritten() {
        assert_eq!(normalize("/foo/:vod"), "/foo/{vod}");
        assert_eq!(
            normalize("/channels/:channel/vods/:vod"),
            "/channels/{channel}/vods/{vod}"
        );
    }

    #[test]
    fn matchit_syntax_is_left_alone() {
        assert_eq!(normalize("/foo/{vod}"), "/foo/{vod}");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize(""), "/");
    }

    #[test]
    fn star_becomes_catch_all() {
        assert_eq!(normalize("/static/*"), "/static/{*wildcard}");
    }

    #[test]
    fn one_trailing_slash_is_ignored() {
        assert_eq!(lookup_path("/foo/abc/"), "/foo/abc");
        assert_eq!(lookup_path("/foo/abc"), "/foo/abc");
        assert_eq!(lookup_path("/foo//"), "/foo/");
        assert_eq!(lookup_path("/"), "/");
    }

    #[test]
    fn params_are_decoded() {
        assert_eq!(decode_param("caf%C3%A9%201"), "café 1");
        assert_eq!(decode_param("plain"), "plain");
        assert_eq!(decode_param("a+b"), "a+b");
        assert_eq!(decode_param("%FF%FE"), "%FF%FE");
    }
}
