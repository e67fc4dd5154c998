//! Query string splitting and percent-decoding.

/// Split a query string into raw `key=value` pairs.
///
/// A leading `?` is skipped; empty segments are ignored and a segment
/// without `=` yields an empty value.
pub(crate) fn query_pairs(query: &str) -> impl Iterator<Item = (&str, &str)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.split_once('=').unwrap_or((segment, "")))
}

/// Decode a URL-encoded component (`%XX` escapes and `+` as space).
///
/// Malformed escapes are kept verbatim; invalid UTF-8 is replaced lossily.
pub(crate) fn url_decode(s: &str) -> String {
    let mut bytes = Vec::with_capacity(s.len());
    let mut input = s.bytes();

    while let Some(b) = input.next() {
        match b {
            b'%' => {
                let h1 = input.next();
                let h2 = input.next();
                if let (Some(h1), Some(h2)) = (h1, h2) {
                    if let Ok(hex) = std::str::from_utf8(&[h1, h2])
                        && let Ok(decoded) = u8::from_str_radix(hex, 16)
                    {
                        bytes.push(decoded);
                        continue;
                    }
                    bytes.extend_from_slice(&[b'%', h1, h2]);
                } else {
                    bytes.push(b'%');
                    bytes.extend(h1);
                }
            },
            b'+' => bytes.push(b' '),
            _ => bytes.push(b),
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_decode() {
        assert_eq!(url_decode("hello%20world"), "hello world");
        assert_eq!(url_decode("a+b"), "a b");
        assert_eq!(url_decode("eyJpZCI6IjEifQ%3D%3D"), "eyJpZCI6IjEifQ==");
        assert_eq!(url_decode("caf%C3%A9"), "café");
    }

    #[test]
    fn test_url_decode_malformed_kept() {
        assert_eq!(url_decode("100%"), "100%");
        assert_eq!(url_decode("%4"), "%4");
        assert_eq!(url_decode("%zz"), "%zz");
    }

    #[test]
    fn test_query_pairs() {
        let pairs: Vec<_> = query_pairs("?a=1&&b&c=x=y").collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", ""), ("c", "x=y")]);
        assert_eq!(query_pairs("").count(), 0);
    }
}
