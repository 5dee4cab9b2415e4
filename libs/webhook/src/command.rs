/// Splits a leading slash command off message content.
///
/// Returns the command with its slash and the arguments that follow it.
/// Double quotes group words into one argument; an unterminated quote runs
/// to the end of the content. Content that does not start with a command
/// yields an empty command and no arguments.
///
/// ```
/// use webhook::parse_command;
///
/// let (cmd, args) = parse_command(r#"/test "John Doe" 123"#);
/// assert_eq!(cmd, "/test");
/// assert_eq!(args, ["John Doe", "123"]);
///
/// assert_eq!(parse_command("test"), ("", vec![]));
/// ```
pub fn parse_command(content: &str) -> (&str, Vec<String>) {
    if !content.starts_with('/') {
        return ("", Vec::new());
    }

    let end = content
        .find(char::is_whitespace)
        .unwrap_or(content.len());
    let command = &content[..end];
    if command.len() < 2 {
        return ("", Vec::new());
    }

    (command, split_args(&content[end..]))
}

fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in input.chars() {
        match ch {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_plain_content_has_no_command() {
        assert_eq!(parse_command(""), ("", vec![]));
        assert_eq!(parse_command("test"), ("", vec![]));
        assert_eq!(parse_command("hello /test"), ("", vec![]));
        assert_eq!(parse_command("/"), ("", vec![]));
    }

    #[test]
    fn command_must_open_the_content() {
        assert_eq!(parse_command("  /test a"), ("", vec![]));
        assert_eq!(parse_command("\n/test a"), ("", vec![]));
    }

    #[test]
    fn bare_command_has_no_arguments() {
        assert_eq!(parse_command("/test"), ("/test", vec![]));
        assert_eq!(parse_command("/test   "), ("/test", vec![]));
    }

    #[test]
    fn quoted_arguments_keep_spaces() {
        let (cmd, args) = parse_command(r#"/test "John Doe" 123"#);
        assert_eq!(cmd, "/test");
        assert_eq!(args, vec!["John Doe".to_string(), "123".to_string()]);
    }

    #[test]
    fn unterminated_quote_takes_the_rest() {
        let (cmd, args) = parse_command(r#"/find "John  Doe 42"#);
        assert_eq!(cmd, "/find");
        assert_eq!(args, vec!["John  Doe 42".to_string()]);
    }

    #[test]
    fn newlines_separate_arguments() {
        let (cmd, args) = parse_command("/remind\nme tomorrow");
        assert_eq!(cmd, "/remind");
        assert_eq!(args, vec!["me", "tomorrow"]);
    }
}
