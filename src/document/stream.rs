//! Recursive-descent conversion between token streams and element trees.

use crate::{
    document::{
        Array, Element, Object, Primitive,
        token::{TokenKind, TokenReader},
    },
    foundation::error::{DocumentError, DocumentResult},
};

/// Parse the next value, dispatching on the peeked token kind.
pub fn parse_element<R: TokenReader + ?Sized>(reader: &mut R) -> DocumentResult<Element> {
    match reader.peek()? {
        TokenKind::BeginObject => parse_object(reader).map(Element::Object),
        TokenKind::BeginArray => parse_array(reader).map(Element::Array),
        TokenKind::String => Ok(Element::Primitive(Primitive::String(reader.next_string()?))),
        TokenKind::Number => Ok(Element::Primitive(Primitive::Number(reader.next_number()?))),
        TokenKind::Boolean => Ok(Element::Primitive(Primitive::Bool(reader.next_bool()?))),
        TokenKind::Null => {
            reader.next_null()?;
            Ok(Element::Null)
        }
        other => Err(DocumentError::parse(
            reader.offset(),
            format!("expected a value but found {other:?}"),
        )),
    }
}

/// Parse an object: members are read while the next token is a name.
pub fn parse_object<R: TokenReader + ?Sized>(reader: &mut R) -> DocumentResult<Object> {
    reader.begin_object()?;

    let mut object = Object::new();
    while reader.has_next()? && reader.peek()? == TokenKind::Name {
        let name = reader.next_name()?;
        object.add(&name, parse_element(reader)?);
    }

    reader.end_object()?;
    Ok(object)
}

pub fn parse_array<R: TokenReader + ?Sized>(reader: &mut R) -> DocumentResult<Array> {
    reader.begin_array()?;

    let mut array = Array::new();
    while reader.has_next()? {
        array.push(parse_element(reader)?);
    }

    reader.end_array()?;
    Ok(array)
}

/// Fail unless the reader is exhausted.
pub fn expect_end_of_document<R: TokenReader + ?Sized>(reader: &mut R) -> DocumentResult<()> {
    match reader.peek()? {
        TokenKind::EndDocument => Ok(()),
        other => Err(DocumentError::parse(
            reader.offset(),
            format!("expected end of document but found {other:?}"),
        )),
    }
}
