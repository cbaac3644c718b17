use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, SeqAccess, Visitor},
    ser::{SerializeMap, SerializeSeq},
};

use crate::document::{Array, Element, Object, Primitive};

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Element::Object(o) => o.serialize(serializer),
            Element::Array(a) => a.serialize(serializer),
            Element::Primitive(Primitive::Number(n)) => n.serialize(serializer),
            Element::Primitive(Primitive::String(s)) => serializer.serialize_str(s),
            Element::Primitive(Primitive::Bool(b)) => serializer.serialize_bool(*b),
            Element::Null => serializer.serialize_unit(),
        }
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.entries() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Array {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

struct ElementVisitor;

impl<'de> Visitor<'de> for ElementVisitor {
    type Value = Element;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON-like value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Element, E> {
        Ok(Element::from(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Element, E> {
        Ok(Element::from(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Element, E> {
        Ok(Element::from(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Element, E> {
        Ok(Element::from(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Element, E> {
        Ok(Element::from(v))
    }

    fn visit_string<E>(self, v: String) -> Result<Element, E> {
        Ok(Element::from(v))
    }

    fn visit_unit<E>(self) -> Result<Element, E> {
        Ok(Element::Null)
    }

    fn visit_none<E>(self) -> Result<Element, E> {
        Ok(Element::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Element, D::Error> {
        Element::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Element, A::Error> {
        let mut array = Array::new();
        while let Some(item) = seq.next_element::<Element>()? {
            array.push(item);
        }
        Ok(Element::Array(array))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Element, A::Error> {
        let mut object = Object::new();
        while let Some((key, value)) = map.next_entry::<String, Element>()? {
            object.add(&key, value);
        }
        Ok(Element::Object(object))
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ElementVisitor)
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Element::deserialize(deserializer)? {
            Element::Object(o) => Ok(o),
            other => Err(serde::de::Error::custom(format!(
                "expected an object, found {}",
                other.kind_name()
            ))),
        }
    }
}
