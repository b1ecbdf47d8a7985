//! Command line splitting

/// Splits `input` on spaces, keeping double-quoted runs as single tokens.
///
/// Quotes cannot be escaped; an unterminated quote runs to the end of the
/// line. Empty tokens (including `""`) are dropped.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for (i, segment) in input.split('"').enumerate() {
        if i % 2 == 1 {
            if !segment.is_empty() {
                tokens.push(segment.to_string());
            }
        } else {
            tokens.extend(
                segment
                    .split([' ', '\t'])
                    .filter(|part| !part.is_empty())
                    .map(str::to_string),
            );
        }
    }

    tokens
}

/// Joins `args` with single spaces, as text values are entered
pub fn join_args(args: &[String]) -> String {
    args.join(" ")
}
