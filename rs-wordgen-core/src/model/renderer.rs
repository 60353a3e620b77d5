use super::tokenizer::{BOUNDARY, is_punctuation, is_terminator};

/// Joins generated tokens into readable text.
///
/// - Punctuation is glued to the preceding text
/// - The boundary token becomes a line break
/// - Any other token is preceded by a single space
/// - A `.` is appended unless the last token already ends a sentence
///
/// An empty sequence renders as an empty string.
pub fn render<I, S>(tokens: I) -> String
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut text = String::new();
	let mut last_terminal = true;

	for token in tokens {
		let token = token.as_ref();
		if token == BOUNDARY {
			text.push('\n');
		} else if is_punctuation(token) {
			text.push_str(token);
		} else {
			text.push(' ');
			text.push_str(token);
		}
		last_terminal = is_terminator(token);
	}

	if !last_terminal {
		text.push('.');
	}
	text
}
