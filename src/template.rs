use std::sync::OnceLock;

use anyhow::anyhow;
use regex::{Captures, Regex};

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([A-Za-z][A-Za-z0-9_]*)\}").expect("invalid placeholder regex"))
}

/// Substitute `{name}` placeholders using `lookup`.
///
/// Text outside placeholders is copied verbatim. A placeholder that `lookup` does not
/// know is an error rather than being left in the output.
pub fn render_template<'a, L>(template: &str, lookup: L) -> anyhow::Result<String>
where
    L: Fn(&str) -> Option<&'a str>,
{
    let mut unknown = None;
    let rendered = placeholder_pattern().replace_all(template, |caps: &Captures<'_>| {
        let key = &caps[1];
        match lookup(key) {
            Some(value) => value.to_string(),
            None => {
                unknown.get_or_insert_with(|| key.to_string());
                String::new()
            }
        }
    });

    match unknown {
        Some(key) => Err(anyhow!("unknown placeholder {{{key}}} in template '{template}'")),
        None => Ok(rendered.into_owned()),
    }
}
