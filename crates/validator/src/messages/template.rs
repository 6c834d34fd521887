//! Positional template interpolation.
//!
//! `{0}`, `{1}`, ... are replaced by the matching argument; `{{` and `}}`
//! produce literal braces.

/// Interpolates `args` into `template`.
///
/// Returns `None` for a malformed template: an unclosed or stray brace, a
/// non-numeric placeholder, or an index without an argument.
///
/// ```
/// use warden_validator::messages::interpolate;
///
/// assert_eq!(
///     interpolate("must be between {0} and {1}", &["1".into(), "5".into()]).as_deref(),
///     Some("must be between 1 and 5"),
/// );
/// assert_eq!(interpolate("{{literal}}", &[]).as_deref(), Some("{literal}"));
/// assert_eq!(interpolate("must be {2}", &[]), None);
/// ```
#[must_use]
pub fn interpolate(template: &str, args: &[String]) -> Option<String> {
    let mut out = String::with_capacity(template.len() + args.iter().map(String::len).sum::<usize>());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut index = String::new();
                loop {
                    match chars.next()? {
                        '}' => break,
                        d if d.is_ascii_digit() => index.push(d),
                        _ => return None,
                    }
                }
                let arg = args.get(index.parse::<usize>().ok()?)?;
                out.push_str(arg);
            }
            '}' => return None,
            _ => out.push(c),
        }
    }
    Some(out)
}

/// Interpolates, falling back to the raw template when it is malformed.
#[must_use]
pub fn render(template: &str, args: &[String]) -> String {
    interpolate(template, args).unwrap_or_else(|| template.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_owned()).collect()
    }

    #[rstest]
    #[case("must be at least {0}", &["18"], "must be at least 18")]
    #[case("{1} before {0}", &["a", "b"], "b before a")]
    #[case("{0}{0}", &["x"], "xx")]
    #[case("no placeholders", &[], "no placeholders")]
    #[case("{{0}} is literal", &["x"], "{0} is literal")]
    fn interpolates(#[case] template: &str, #[case] values: &[&str], #[case] expected: &str) {
        assert_eq!(interpolate(template, &args(values)).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("unclosed {0")]
    #[case("stray } brace")]
    #[case("{name}")]
    #[case("{}")]
    #[case("{3}")]
    fn malformed_templates_render_raw(#[case] template: &str) {
        assert_eq!(interpolate(template, &args(&["a"])), None);
        assert_eq!(render(template, &args(&["a"])), template);
    }
}
