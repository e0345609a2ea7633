use std::borrow::Cow;

/// Replace bare `NaN` tokens in a JSON document with `null`.
///
/// The backend's forecast endpoints serialize float NaNs as the literal
/// token `NaN`, which is not valid JSON. This shim rewrites those tokens
/// before parsing, leaving occurrences inside string values untouched. It
/// is a compatibility measure for a misbehaving serializer, not protocol
/// behavior.
pub fn sanitize_nan(body: &str) -> Cow<'_, str> {
    if !body.contains("NaN") {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len() + 8);
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < body.len() {
        let rest = &body[i..];
        let c = rest.chars().next().expect("index is on a char boundary");

        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += c.len_utf8();
            continue;
        }

        if c == '"' {
            in_string = true;
            out.push('"');
            i += 1;
        } else if rest.starts_with("NaN") && !ident_follows(body.as_bytes(), i + 3) {
            out.push_str("null");
            i += 3;
        } else {
            out.push(c);
            i += c.len_utf8();
        }
    }

    Cow::Owned(out)
}

fn ident_follows(bytes: &[u8], at: usize) -> bool {
    bytes
        .get(at)
        .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
}
