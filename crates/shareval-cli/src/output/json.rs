use serde_json::Value;

/// Print JSON to stdout.
///
/// Pretty-printed on a terminal. Piped output is one compact line, so an
/// `import` can feed straight into `evaluate` or `taxes` on stdin.
pub fn print_json(value: &Value) {
    let rendered = if atty::is(atty::Stream::Stdout) {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
