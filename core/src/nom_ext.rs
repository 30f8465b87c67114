use nom::{
	character::complete::{
		space0,
		not_line_ending
	},
	error::ParseError,
	IResult,
	Parser,
	sequence::delimited,
};

/// Parses the remainder of the current line with surrounding blanks trimmed
pub fn rest_of_line<'a, E>(input: &'a str) -> IResult<&'a str, &'a str, E>
where
	E: ParseError<&'a str>
{
	let (input, line) = not_line_ending(input)?;
	Ok((input, line.trim()))
}

/// A combinator that takes a parser `inner` and produces a parser that also consumes both leading and
/// trailing blanks (spaces and tabs, not line endings), returning the output of `inner`.
pub fn ws<'a, F, O, E>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
	E: ParseError<&'a str>,
	F: Parser<&'a str, O, E>,
{
	delimited(space0, inner, space0)
}
