use miette::SourceSpan;

/// Span from `position` to the end of its line, used to label syntax errors.
///
/// An empty span is returned when `position` already sits on a line
/// terminator or at the end of input.
pub fn rest_of_line_span(source: &str, position: usize) -> SourceSpan {
    let position = position.min(source.len());
    let len = source.as_bytes()[position..]
        .iter()
        .position(|&b| b == b'\r' || b == b'\n')
        .unwrap_or(source.len() - position);
    (position, len).into()
}
