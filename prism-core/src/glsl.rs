/// Scanner for the interface declarations (`attribute`, `in`, `uniform`) of
/// GLSL ES shader sources
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{alpha1, alphanumeric1, char, multispace0, multispace1},
    combinator::{all_consuming, opt, recognize, value},
    multi::{many0, many0_count, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// Per-vertex input (`attribute` in GLSL ES 1.0, `in` in 3.0).
    Attribute,
    Uniform,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub type_name: String,
    pub name: String,
}

/// Lists every top-level attribute and uniform declaration in `source`, one
/// entry per declared name.
pub fn declarations(source: &str) -> Vec<Declaration> {
    strip_comments(source)
        .split(|c: char| matches!(c, ';' | '{' | '}'))
        .filter_map(|statement| declaration(statement).ok())
        .flat_map(|(_, decls)| decls)
        .collect()
}

/// True when `source` declares an attribute or uniform called `name`.
pub fn declares(source: &str, name: &str) -> bool {
    declarations(source).iter().any(|d| d.name == name)
}

/// Drops `//` and `/* */` comments and preprocessor directives.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    loop {
        let line = rest.find("//");
        let block = rest.find("/*");
        match (line, block) {
            (Some(start), block) if block.map_or(true, |b| start < b) => {
                out.push_str(&rest[..start]);
                // Keep the newline so line-based filtering still sees it.
                rest = rest[start..].find('\n').map_or("", |end| &rest[start + end..]);
            }
            (_, Some(start)) => {
                out.push_str(&rest[..start]);
                out.push(' ');
                let body = &rest[start + 2..];
                rest = body.find("*/").map_or("", |end| &body[end + 2..]);
            }
            _ => {
                out.push_str(rest);
                break;
            }
        }
    }

    out.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

fn declaration(input: &str) -> IResult<&str, Vec<Declaration>> {
    all_consuming(declaration_body)(input)
}

fn declaration_body(input: &str) -> IResult<&str, Vec<Declaration>> {
    let (input, _) = multispace0(input)?;
    let (input, kind) = alt((
        value(DeclarationKind::Attribute, tag("attribute")),
        value(DeclarationKind::Uniform, tag("uniform")),
        value(DeclarationKind::Attribute, tag("in")),
    ))(input)?;
    let (input, _) = multispace1(input)?;
    // Optional precision qualifier, then type, then the first name.
    let (input, words) = separated_list1(multispace1, identifier)(input)?;
    let (input, _) = opt(array_suffix)(input)?;
    let (input, more) = many0(preceded(
        delimited(multispace0, char(','), multispace0),
        declarator,
    ))(input)?;
    let (input, _) = multispace0(input)?;

    if words.len() < 2 {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    let type_name = words[words.len() - 2];
    let names = std::iter::once(words[words.len() - 1]).chain(more);

    let decls = names
        .map(|name| Declaration {
            kind,
            type_name: type_name.to_string(),
            name: name.to_string(),
        })
        .collect();
    Ok((input, decls))
}

/// A name with an optional array size, as in `uLights[4]`.
fn declarator(input: &str) -> IResult<&str, &str> {
    terminated(identifier, opt(array_suffix))(input)
}

fn array_suffix(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        multispace0,
        char('['),
        take_till(|c| c == ']'),
        char(']'),
    )))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}
