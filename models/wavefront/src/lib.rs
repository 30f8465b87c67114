#[cfg(feature = "import")]
pub mod obj;
#[cfg(feature = "import")]
pub mod snapshot;

#[cfg(feature = "import")]
use nom::{
	branch::alt,
	bytes::complete::{
		take_till,
		take_till1
	},
	character::complete::{
		char,
		i64,
		space1
	},
	combinator::{
		all_consuming,
		eof,
		opt
	},
	error::{
		Error,
		ParseError
	},
	IResult,
	sequence::{
		preceded,
		terminated
	}
};

#[cfg(feature = "import")]
fn is_blank(c: char) -> bool {
	c == ' ' || c == '\t'
}

/// Parses a directive keyword at the start of a line, returning the keyword with the arguments
/// left as remaining input. A keyword alone on its line has empty arguments.
#[cfg(feature = "import")]
pub(crate) fn directive<'a, E>(input: &'a str) -> IResult<&'a str, &'a str, E>
where
	E: ParseError<&'a str>
{
	terminated(take_till1(is_blank), alt((space1, eof)))(input)
}

/// Parses a `v/vt/vn` vertex reference, keeping only the position index
#[cfg(feature = "import")]
pub(crate) fn vertex_index<'a, E>(input: &'a str) -> IResult<&'a str, i64, E>
where
	E: ParseError<&'a str>
{
	terminated(i64, opt(preceded(char('/'), take_till(is_blank))))(input)
}

/// Splits face directive arguments into position indices. On failure the offending token is
/// returned.
#[cfg(feature = "import")]
pub(crate) fn vertex_refs(args: &str) -> Result<Vec<i64>, String> {
	args.split_whitespace()
		.map(|token| match all_consuming(vertex_index::<Error<&str>>)(token) {
			Ok((_, index)) => Ok(index),
			Err(_) => Err(token.to_string()),
		})
		.collect()
}
