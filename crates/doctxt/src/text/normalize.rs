/// Normalize whitespace in converter output.
///
/// - CRLF and lone CR become LF
/// - trailing whitespace on each line is removed
/// - runs of blank lines collapse to a single blank line
/// - blank lines at the start and end are dropped
pub fn normalize_whitespace(text: &str) -> String {
    let unified = if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    };

    let mut out = String::with_capacity(unified.len());
    let mut pending_blank = false;

    for line in unified.split('\n') {
        let line = line.trim_end();
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        out.push_str(line);
        pending_blank = false;
    }

    out
}
